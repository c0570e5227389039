use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// A pharmacy node in the fulfillment grid.
///
/// Contains both directory data (name, location, coordinates) and runtime
/// state (the `load` backlog counter, kept atomic so concurrent routing
/// decisions cannot lose an increment).
///
/// # Examples
///
/// ```
/// use rxgrid::grid::PharmacyNode;
///
/// let node = PharmacyNode::new(
///     "PH-001".to_string(),
///     "Mumbai Central".to_string(),
///     "Mumbai Central, Mumbai".to_string(),
/// );
/// assert_eq!(node.node_id, "PH-001");
/// assert!(node.active);
/// ```
#[derive(Debug)]
pub struct PharmacyNode {
    /// Unique node identifier (e.g., "PH-001")
    pub node_id: String,
    /// Human-readable pharmacy name
    pub name: String,
    /// Free-text location label
    pub location: String,
    /// Whether the pharmacy is accepting orders
    pub active: bool,
    /// Current order backlog counter (atomic)
    pub load: AtomicU32,
    /// Number of distinct medicines this pharmacy stocks
    pub stock_count: u32,
    /// Latitude, if surveyed
    pub lat: Option<f64>,
    /// Longitude, if surveyed
    pub lng: Option<f64>,
    /// When the node was registered
    pub created_at: DateTime<Utc>,
    /// Last directory update
    pub updated_at: DateTime<Utc>,
}

impl PharmacyNode {
    /// Create a new active node with a zeroed load counter and no coordinates.
    pub fn new(node_id: String, name: String, location: String) -> Self {
        let now = Utc::now();
        Self {
            node_id,
            name,
            location,
            active: true,
            load: AtomicU32::new(0),
            stock_count: 0,
            lat: None,
            lng: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set geo-coordinates.
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Set the distinct-medicine stock count.
    pub fn with_stock_count(mut self, stock_count: u32) -> Self {
        self.stock_count = stock_count;
        self
    }
}

/// Serializable snapshot of a [`PharmacyNode`] (atomic load read out).
///
/// The scheduler evaluates against snapshots so that one optimization run
/// sees a consistent view of each node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub node_id: String,
    pub name: String,
    pub location: String,
    pub active: bool,
    pub load: u32,
    pub stock_count: u32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PharmacyNode> for NodeView {
    fn from(node: &PharmacyNode) -> Self {
        Self {
            node_id: node.node_id.clone(),
            name: node.name.clone(),
            location: node.location.clone(),
            active: node.active,
            load: node.load.load(Ordering::SeqCst),
            stock_count: node.stock_count,
            lat: node.lat,
            lng: node.lng,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}
