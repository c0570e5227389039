//! Evaluation and decision records produced by the scheduler.
//!
//! These are ephemeral per-call results: one [`PharmacyEvaluation`] per
//! candidate node and one [`Decision`] per optimization run. Serialized
//! field names are the audit-trail contract consumed by dashboards.

use serde::Serialize;

use crate::grid::NodeView;
use crate::scheduling::geo::GeoPoint;

/// Which hard gate rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStage {
    Active,
    Load,
    Stock,
    Sla,
}

impl std::fmt::Display for GateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GateStage::Active => "active",
            GateStage::Load => "load",
            GateStage::Stock => "stock",
            GateStage::Sla => "sla",
        };
        write!(f, "{}", s)
    }
}

/// A requested medicine the pharmacy cannot fully supply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingItem {
    pub id: u32,
    pub name: String,
    pub need: u32,
    pub have: u32,
}

/// Full scoring record for a single pharmacy candidate.
///
/// A disqualified evaluation carries no sub-scores (all zeroed) and never
/// participates in ranking.
#[derive(Debug, Clone, Serialize)]
pub struct PharmacyEvaluation {
    pub node_id: String,
    pub name: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub active: bool,
    pub current_load: u32,
    pub stock_count: u32,
    pub queue_depth: u32,

    // Hard gates
    pub disqualified: bool,
    pub dq_reason: String,
    pub dq_stage: Option<GateStage>,

    // Stock check
    pub has_all_items: bool,
    pub missing_items: Vec<MissingItem>,
    pub stock_coverage: f64,
    pub total_depth: u32,

    // Distance and SLA
    pub distance_km: f64,
    pub travel_min: f64,
    pub process_min: f64,
    pub eta_min: f64,

    // Weighted sub-scores
    pub proximity_score: f64,
    pub load_score: f64,
    pub stock_score: f64,
    pub cost_score: f64,
    pub total_score: f64,

    // Cost breakdown
    pub logistics_cost: f64,
    pub sla_risk: f64,
    pub load_risk: f64,

    pub reasoning: String,
}

impl PharmacyEvaluation {
    /// Start an evaluation from a node snapshot and its resolved coordinates.
    pub fn from_node(node: &NodeView, coords: GeoPoint) -> Self {
        Self {
            node_id: node.node_id.clone(),
            name: node.name.clone(),
            location: node.location.clone(),
            lat: coords.lat,
            lng: coords.lng,
            active: node.active,
            current_load: node.load,
            stock_count: node.stock_count,
            queue_depth: 0,
            disqualified: false,
            dq_reason: String::new(),
            dq_stage: None,
            has_all_items: true,
            missing_items: Vec::new(),
            stock_coverage: 1.0,
            total_depth: 0,
            distance_km: 0.0,
            travel_min: 0.0,
            process_min: 0.0,
            eta_min: 0.0,
            proximity_score: 0.0,
            load_score: 0.0,
            stock_score: 0.0,
            cost_score: 0.0,
            total_score: 0.0,
            logistics_cost: 0.0,
            sla_risk: 0.0,
            load_risk: 0.0,
            reasoning: String::new(),
        }
    }

    /// Mark this candidate rejected at a gate. No sub-scores are computed.
    pub fn disqualify(&mut self, stage: GateStage, reason: String) {
        self.disqualified = true;
        self.dq_stage = Some(stage);
        self.dq_reason = reason;
    }
}

/// One entry of a disqualification log.
#[derive(Debug, Clone, Serialize)]
pub struct Disqualification {
    pub node_id: String,
    pub name: String,
    pub reason: String,
    pub stage: GateStage,
}

/// One row of the qualified ranking (or the single fallback row).
#[derive(Debug, Clone, Serialize)]
pub struct RankEntry {
    pub rank: usize,
    pub node_id: String,
    pub name: String,
    pub score: f64,
    pub distance_km: f64,
    pub eta_min: f64,
    pub load: u32,
    pub queue: u32,
    pub stock_coverage: String,
    pub fallback: bool,
}

/// The outcome of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub assigned_pharmacy: String,
    pub pharmacy_name: String,
    pub pharmacy_location: String,
    pub winning_score: f64,
    pub routing_reason: String,
    pub total_candidates: usize,
    pub qualified: usize,
    pub disqualified: usize,
    pub fallback_used: bool,
    pub decision_time_ms: u64,
    pub patient_location: GeoPoint,
    pub order_item_count: usize,
    pub ranking: Vec<RankEntry>,
    pub disqualification_log: Vec<Disqualification>,
    pub evaluations: Vec<PharmacyEvaluation>,
}

impl Decision {
    /// Empty decision for a run over the given patient location and order size.
    pub fn new(patient_location: GeoPoint, order_item_count: usize) -> Self {
        Self {
            assigned_pharmacy: String::new(),
            pharmacy_name: String::new(),
            pharmacy_location: String::new(),
            winning_score: 0.0,
            routing_reason: String::new(),
            total_candidates: 0,
            qualified: 0,
            disqualified: 0,
            fallback_used: false,
            decision_time_ms: 0,
            patient_location,
            order_item_count,
            ranking: Vec::new(),
            disqualification_log: Vec::new(),
            evaluations: Vec::new(),
        }
    }
}

/// Per-node row of a grid status report.
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub node_id: String,
    pub name: String,
    pub location: String,
    pub active: bool,
    pub load: u32,
    pub stock_count: u32,
    pub score: f64,
    pub distance_km: f64,
    pub eta_min: f64,
    pub disqualified: bool,
    pub reasoning: String,
}

/// Live snapshot of every node with scores, for operator dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct GridStatus {
    pub total: usize,
    pub active: usize,
    pub recommended: String,
    pub grid: Vec<GridRow>,
}

/// Round to a fixed number of decimal places for ranking rows.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
