//! Static pharmacy definitions
//!
//! Pharmacies listed in the config file are seeded into the directory at
//! startup, before any routing traffic arrives.

use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// One `[[pharmacies]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyConfig {
    /// Unique node identifier (e.g., "PH-001")
    pub node_id: String,
    /// Human-readable pharmacy name
    pub name: String,
    /// Free-text location label
    pub location: String,
    /// Latitude; omitted coordinates fall back to the default location
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude
    #[serde(default)]
    pub lng: Option<f64>,
    /// Whether the pharmacy starts accepting orders
    #[serde(default = "default_active")]
    pub active: bool,
    /// Number of distinct medicines stocked
    #[serde(default)]
    pub stock_count: u32,
}
