//! Patient location index

use dashmap::DashMap;

use crate::scheduling::geo::GeoPoint;

/// Last-known patient coordinates, keyed by patient id.
///
/// Coordinates are optional in the upstream record; the scheduler falls back
/// to a configured default when no entry exists.
pub struct PatientIndex {
    locations: DashMap<u64, GeoPoint>,
}

impl PatientIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            locations: DashMap::new(),
        }
    }

    /// Record a patient's last-known coordinates.
    pub fn set_location(&self, patient_id: u64, location: GeoPoint) {
        self.locations.insert(patient_id, location);
    }

    /// Look up a patient's coordinates, if known.
    pub fn location(&self, patient_id: u64) -> Option<GeoPoint> {
        self.locations.get(&patient_id).map(|entry| *entry.value())
    }
}

impl Default for PatientIndex {
    fn default() -> Self {
        Self::new()
    }
}
