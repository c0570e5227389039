//! Tunable parameters for the grid scheduler

use crate::scheduling::error::ScheduleError;
use crate::scheduling::geo::GeoPoint;

/// Weights for the four scoring factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight for proximity to the patient
    pub proximity: f64,

    /// Weight for load headroom (backlog plus live queue)
    pub load: f64,

    /// Weight for stock health (coverage and depth)
    pub stock: f64,

    /// Weight for composite cost (logistics, SLA risk, load risk)
    pub cost: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            proximity: 0.30,
            load: 0.25,
            stock: 0.25,
            cost: 0.20,
        }
    }
}

impl ScoreWeights {
    /// Validate that weights sum to 1.0 (within float tolerance).
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let sum = self.proximity + self.load + self.stock + self.cost;
        if (sum - 1.0).abs() > 1e-6 {
            Err(ScheduleError::InvalidWeights { sum })
        } else {
            Ok(())
        }
    }
}

/// All gate ceilings, time model constants, and scoring baselines.
///
/// The defaults reproduce the production tuning; deployments override them
/// through the `[scheduling]` config section.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleParams {
    pub weights: ScoreWeights,

    /// Hard ceiling on the load counter; nodes at or above are disqualified
    pub max_load: u32,

    /// Delivery SLA ceiling in minutes
    pub sla_max_min: f64,

    /// Fixed base processing time in minutes
    pub base_processing_min: f64,

    /// Picking minutes per ordered item (a no-item order is charged one)
    pub pick_min_per_item: f64,

    /// Fixed packing time in minutes
    pub packing_min: f64,

    /// Fixed dispatch queue delay in minutes
    pub dispatch_delay_min: f64,

    /// Extra minutes per order already in the pharmacy's live queue
    pub queue_penalty_min: f64,

    /// Assumed average urban delivery speed in km/h
    pub avg_speed_kmh: f64,

    /// Logistics cost per kilometer (currency units)
    pub cost_per_km: f64,

    /// Distance at which the proximity score reaches zero
    pub proximity_radius_km: f64,

    /// Distinct-medicine count at which the depth ratio saturates
    pub depth_baseline: u32,

    /// Per-item available depth at which the depth bonus saturates
    pub depth_per_item: u32,

    /// Composite cost at which the cost score reaches zero
    pub cost_ceiling: f64,

    /// Used when a patient or pharmacy has no recorded coordinates
    pub default_location: GeoPoint,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            max_load: 80,
            sla_max_min: 120.0,
            base_processing_min: 10.0,
            pick_min_per_item: 2.0,
            packing_min: 5.0,
            dispatch_delay_min: 5.0,
            queue_penalty_min: 0.5,
            avg_speed_kmh: 25.0,
            cost_per_km: 8.0,
            proximity_radius_km: 30.0,
            depth_baseline: 52,
            depth_per_item: 50,
            cost_ceiling: 500.0,
            default_location: GeoPoint::new(19.0760, 72.8777),
        }
    }
}

impl ScheduleParams {
    /// Validate weights and range-check the parameters the formulas divide by.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.weights.validate()?;

        if self.avg_speed_kmh <= 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "avg_speed_kmh".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.max_load == 0 {
            return Err(ScheduleError::InvalidParameter {
                field: "max_load".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        if self.sla_max_min <= 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "sla_max_min".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.proximity_radius_km <= 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "proximity_radius_km".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.cost_ceiling <= 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "cost_ceiling".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}
