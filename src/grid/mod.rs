//! Pharmacy grid stores.
//!
//! Provides thread-safe in-memory storage for the collaborators the
//! scheduler reads: the pharmacy directory, the per-pharmacy stock ledger,
//! the order book (queue depth), and the patient location index.

mod error;
mod node;
mod orders;
mod patients;
mod stock;

pub use error::GridError;
pub use node::{NodeView, PharmacyNode};
pub use orders::{OrderBook, OrderRecord, OrderStatus};
pub use patients::PatientIndex;
pub use stock::StockLedger;

use dashmap::DashMap;
use std::sync::atomic::Ordering;

use crate::config::PharmacyConfig;

/// The pharmacy directory stores all known pharmacy nodes.
///
/// Uses a lock-free concurrent map (DashMap) so directory reads during an
/// optimization run never block writers. The load counter on each node is
/// atomic: two simultaneous routing decisions landing on the same pharmacy
/// both take effect (no lost update).
///
/// # Examples
///
/// ```
/// use rxgrid::grid::{Directory, PharmacyNode};
///
/// let directory = Directory::new();
/// let node = PharmacyNode::new(
///     "PH-001".to_string(),
///     "Mumbai Central".to_string(),
///     "Mumbai Central, Mumbai".to_string(),
/// );
/// directory.add_node(node).unwrap();
/// assert_eq!(directory.node_count(), 1);
/// ```
pub struct Directory {
    nodes: DashMap<String, PharmacyNode>,
}

impl Directory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }

    /// Add a new pharmacy node.
    ///
    /// # Errors
    ///
    /// Returns `GridError::DuplicateNode` if a node with the same id exists.
    pub fn add_node(&self, node: PharmacyNode) -> Result<(), GridError> {
        let id = node.node_id.clone();
        if self.nodes.contains_key(&id) {
            return Err(GridError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Remove a pharmacy node.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NodeNotFound` if no node with the given id exists.
    pub fn remove_node(&self, node_id: &str) -> Result<PharmacyNode, GridError> {
        self.nodes
            .remove(node_id)
            .map(|(_, node)| node)
            .ok_or_else(|| GridError::NodeNotFound(node_id.to_string()))
    }

    /// Get a snapshot of one node.
    pub fn get_node(&self, node_id: &str) -> Option<NodeView> {
        self.nodes.get(node_id).map(|entry| entry.value().into())
    }

    /// Snapshots of every node, sorted by node id.
    ///
    /// The sort gives evaluation, ranking, and fallback selection a stable
    /// candidate order; DashMap iteration order is unspecified.
    pub fn all_nodes(&self) -> Vec<NodeView> {
        let mut nodes: Vec<NodeView> = self
            .nodes
            .iter()
            .map(|entry| entry.value().into())
            .collect();
        nodes.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        nodes
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of active nodes.
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|entry| entry.value().active).count()
    }

    /// Mark a node active or inactive.
    pub fn set_active(&self, node_id: &str, active: bool) -> Result<(), GridError> {
        let mut node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GridError::NodeNotFound(node_id.to_string()))?;
        node.active = active;
        node.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Atomically increment a node's load counter by one.
    ///
    /// Returns the new value after increment.
    pub fn increment_load(&self, node_id: &str) -> Result<u32, GridError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| GridError::NodeNotFound(node_id.to_string()))?;
        let new_val = node.load.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(new_val)
    }

    /// Atomically decrement a node's load counter (saturating at 0).
    ///
    /// If already at 0, logs a warning and returns 0. Intended for order
    /// completion hooks; the scheduler itself only increments.
    pub fn decrement_load(&self, node_id: &str) -> Result<u32, GridError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| GridError::NodeNotFound(node_id.to_string()))?;

        // Compare-exchange loop for saturating subtraction
        loop {
            let current = node.load.load(Ordering::SeqCst);
            if current == 0 {
                tracing::warn!(
                    node_id = %node_id,
                    "Attempted to decrement load when already at 0"
                );
                return Ok(0);
            }

            let new_val = current - 1;
            match node
                .load
                .compare_exchange(current, new_val, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(new_val),
                Err(_) => continue,
            }
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite of the four stores the scheduler consumes.
pub struct Grid {
    pub directory: Directory,
    pub stock: StockLedger,
    pub orders: OrderBook,
    pub patients: PatientIndex,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self {
            directory: Directory::new(),
            stock: StockLedger::new(),
            orders: OrderBook::new(),
            patients: PatientIndex::new(),
        }
    }

    /// Seed the directory from static `[[pharmacies]]` config entries.
    pub fn seed_pharmacies(&self, pharmacies: &[PharmacyConfig]) -> Result<(), GridError> {
        for entry in pharmacies {
            let mut node = PharmacyNode::new(
                entry.node_id.clone(),
                entry.name.clone(),
                entry.location.clone(),
            )
            .with_stock_count(entry.stock_count);
            if let (Some(lat), Some(lng)) = (entry.lat, entry.lng) {
                node = node.with_coordinates(lat, lng);
            }
            node.active = entry.active;
            self.directory.add_node(node)?;
        }
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
