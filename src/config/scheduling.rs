//! Scheduling configuration
//!
//! Serde-facing mirror of [`ScheduleParams`]; every field is optional in the
//! TOML file and defaults to the production tuning.

use serde::{Deserialize, Serialize};

use crate::scheduling::{GeoPoint, ScheduleParams, ScoreWeights};

/// Scoring weights as they appear in the `[scheduling.weights]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeightsConfig {
    pub proximity: f64,
    pub load: f64,
    pub stock: f64,
    pub cost: f64,
}

impl Default for ScoreWeightsConfig {
    fn default() -> Self {
        let w = ScoreWeights::default();
        Self {
            proximity: w.proximity,
            load: w.load,
            stock: w.stock,
            cost: w.cost,
        }
    }
}

impl From<&ScoreWeightsConfig> for ScoreWeights {
    fn from(config: &ScoreWeightsConfig) -> Self {
        Self {
            proximity: config.proximity,
            load: config.load,
            stock: config.stock,
            cost: config.cost,
        }
    }
}

/// The `[scheduling]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub weights: ScoreWeightsConfig,
    pub max_load: u32,
    pub sla_max_min: f64,
    pub base_processing_min: f64,
    pub pick_min_per_item: f64,
    pub packing_min: f64,
    pub dispatch_delay_min: f64,
    pub queue_penalty_min: f64,
    pub avg_speed_kmh: f64,
    pub cost_per_km: f64,
    pub proximity_radius_km: f64,
    pub depth_baseline: u32,
    pub depth_per_item: u32,
    pub cost_ceiling: f64,
    pub default_lat: f64,
    pub default_lng: f64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        let p = ScheduleParams::default();
        Self {
            weights: ScoreWeightsConfig::default(),
            max_load: p.max_load,
            sla_max_min: p.sla_max_min,
            base_processing_min: p.base_processing_min,
            pick_min_per_item: p.pick_min_per_item,
            packing_min: p.packing_min,
            dispatch_delay_min: p.dispatch_delay_min,
            queue_penalty_min: p.queue_penalty_min,
            avg_speed_kmh: p.avg_speed_kmh,
            cost_per_km: p.cost_per_km,
            proximity_radius_km: p.proximity_radius_km,
            depth_baseline: p.depth_baseline,
            depth_per_item: p.depth_per_item,
            cost_ceiling: p.cost_ceiling,
            default_lat: p.default_location.lat,
            default_lng: p.default_location.lng,
        }
    }
}

impl From<&SchedulingConfig> for ScheduleParams {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            weights: ScoreWeights::from(&config.weights),
            max_load: config.max_load,
            sla_max_min: config.sla_max_min,
            base_processing_min: config.base_processing_min,
            pick_min_per_item: config.pick_min_per_item,
            packing_min: config.packing_min,
            dispatch_delay_min: config.dispatch_delay_min,
            queue_penalty_min: config.queue_penalty_min,
            avg_speed_kmh: config.avg_speed_kmh,
            cost_per_km: config.cost_per_km,
            proximity_radius_km: config.proximity_radius_km,
            depth_baseline: config.depth_baseline,
            depth_per_item: config.depth_per_item,
            cost_ceiling: config.cost_ceiling,
            default_location: GeoPoint::new(config.default_lat, config.default_lng),
        }
    }
}
