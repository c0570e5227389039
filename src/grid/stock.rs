//! Per-pharmacy per-medicine stock ledger

use dashmap::DashMap;
use std::collections::HashMap;

/// Quantities held by each pharmacy for each medicine.
///
/// Keyed by node id, then medicine id. Absent rows read as zero, matching
/// the stock table semantics the evaluator expects: a medicine the pharmacy
/// has never stocked is simply unavailable.
pub struct StockLedger {
    rows: DashMap<String, HashMap<u32, u32>>,
}

impl StockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Set the on-hand quantity for one (pharmacy, medicine) pair.
    pub fn set(&self, node_id: &str, medicine_id: u32, quantity: u32) {
        self.rows
            .entry(node_id.to_string())
            .or_default()
            .insert(medicine_id, quantity);
    }

    /// On-hand quantity for one (pharmacy, medicine) pair. Zero when absent.
    pub fn quantity(&self, node_id: &str, medicine_id: u32) -> u32 {
        self.rows
            .get(node_id)
            .and_then(|meds| meds.get(&medicine_id).copied())
            .unwrap_or(0)
    }

    /// On-hand quantities for a set of medicines at one pharmacy.
    ///
    /// Medicines without a stock row are omitted; callers treat absence as
    /// zero availability.
    pub fn quantities(&self, node_id: &str, medicine_ids: &[u32]) -> HashMap<u32, u32> {
        match self.rows.get(node_id) {
            Some(meds) => medicine_ids
                .iter()
                .filter_map(|id| meds.get(id).map(|qty| (*id, *qty)))
                .collect(),
            None => HashMap::new(),
        }
    }

    /// Number of distinct medicines with a stock row at one pharmacy.
    pub fn distinct_medicines(&self, node_id: &str) -> usize {
        self.rows.get(node_id).map(|meds| meds.len()).unwrap_or(0)
    }
}

impl Default for StockLedger {
    fn default() -> Self {
        Self::new()
    }
}
