//! Error types for scheduling failures

use thiserror::Error;

/// Errors that can occur while constructing or configuring the scheduler.
///
/// The optimizer itself never fails: degenerate inputs (no pharmacies, no
/// qualifier) produce fallback decisions, not errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Scoring weights must sum to 1.0
    #[error("scoring weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },

    /// A tunable parameter is out of range
    #[error("invalid value for '{field}': {message}")]
    InvalidParameter { field: String, message: String },
}
