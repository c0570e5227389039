//! Grid scheduler for selecting the optimal fulfillment pharmacy.
//!
//! This module implements the routing logic that assigns each order to the
//! best pharmacy node based on hard eligibility gates (activity, load
//! ceiling, per-item stock, delivery SLA) and a weighted multi-factor score
//! (proximity, load headroom, stock health, composite cost).
//!
//! Selection pipeline per candidate:
//!
//! 1. gate: node active
//! 2. gate: load below ceiling
//! 3. gate: every ordered item fully stocked
//! 4. gate: ETA within the delivery SLA
//! 5. score: proximity, load, stock, cost (weighted sum, 0-100)
//!
//! Highest total wins; ties break by load, then distance, then node id.
//! When nothing qualifies, the least-loaded pharmacy is force-assigned so
//! an order never blocks on routing.

use std::sync::Arc;
use std::time::Instant;

pub mod decision;
pub mod error;
pub mod geo;
pub mod params;

pub use decision::{
    Decision, Disqualification, GateStage, GridRow, GridStatus, MissingItem, PharmacyEvaluation,
    RankEntry,
};
pub use error::ScheduleError;
pub use geo::GeoPoint;
pub use params::{ScheduleParams, ScoreWeights};

use crate::grid::{Grid, NodeView};
use decision::round_to;
use geo::{haversine_km, travel_minutes};

fn default_quantity() -> u32 {
    1
}

/// One line of an order: a medicine and the quantity requested.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderItem {
    pub medicine_id: u32,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Scheduler selects the best pharmacy node for each order.
pub struct Scheduler {
    /// Reference to the grid stores
    grid: Arc<Grid>,

    /// Gate ceilings, time model, and scoring weights
    params: ScheduleParams,
}

impl Scheduler {
    /// Create a scheduler over the given grid.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if the parameters fail validation (weights
    /// not summing to 1.0, non-positive speed or ceilings).
    pub fn new(grid: Arc<Grid>, params: ScheduleParams) -> Result<Self, ScheduleError> {
        params.validate()?;
        Ok(Self { grid, params })
    }

    /// The active parameter set.
    pub fn params(&self) -> &ScheduleParams {
        &self.params
    }

    /// Route an order for a patient to the best pharmacy.
    ///
    /// Resolves the patient's coordinates (falling back to the configured
    /// default), runs the optimizer, and stamps the elapsed decision time.
    /// With `dry_run` the full evaluation and ranking run but the winning
    /// node's load counter is left untouched.
    pub fn route_order(&self, patient_id: u64, items: &[OrderItem], dry_run: bool) -> Decision {
        let started = Instant::now();
        let patient = self.patient_location(patient_id);
        let mut decision = self.optimize(items, patient, dry_run);
        decision.decision_time_ms = started.elapsed().as_millis() as u64;

        metrics::histogram!("rxgrid_decision_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            winner = %decision.assigned_pharmacy,
            score = decision.winning_score,
            candidates = decision.total_candidates,
            qualified = decision.qualified,
            fallback = decision.fallback_used,
            dry_run,
            time_ms = decision.decision_time_ms,
            "Routing decision"
        );
        decision
    }

    /// Live grid report for operator dashboards: every node with its score
    /// or disqualification, plus the currently recommended node.
    ///
    /// Runs as a dry run with no order items, so the stock gate is skipped
    /// and no load counter moves.
    pub fn grid_status(&self, patient_id: u64) -> GridStatus {
        let decision = self.route_order(patient_id, &[], true);
        let nodes = self.grid.directory.all_nodes();

        let grid = nodes
            .iter()
            .map(|node| {
                let ev = decision
                    .evaluations
                    .iter()
                    .find(|e| e.node_id == node.node_id);
                GridRow {
                    node_id: node.node_id.clone(),
                    name: node.name.clone(),
                    location: node.location.clone(),
                    active: node.active,
                    load: node.load,
                    stock_count: node.stock_count,
                    score: ev.map(|e| round_to(e.total_score, 2)).unwrap_or(0.0),
                    distance_km: ev.map(|e| round_to(e.distance_km, 1)).unwrap_or(0.0),
                    eta_min: ev.map(|e| e.eta_min.round()).unwrap_or(0.0),
                    disqualified: ev.map(|e| e.disqualified).unwrap_or(false),
                    reasoning: ev.map(|e| e.reasoning.clone()).unwrap_or_default(),
                }
            })
            .collect::<Vec<_>>();

        GridStatus {
            total: grid.len(),
            active: grid.iter().filter(|row| row.active).count(),
            recommended: decision.assigned_pharmacy,
            grid,
        }
    }

    /// Select the best pharmacy for an order.
    ///
    /// Never fails: an empty grid or a fully disqualified field yields a
    /// fallback decision with score 0 rather than an error, so order
    /// placement is never blocked by routing.
    pub fn optimize(&self, items: &[OrderItem], patient: GeoPoint, dry_run: bool) -> Decision {
        let mut decision = Decision::new(patient, items.len());

        let nodes = self.grid.directory.all_nodes();
        if nodes.is_empty() {
            decision.fallback_used = true;
            decision.routing_reason = "No pharmacy nodes in grid.".to_string();
            metrics::counter!("rxgrid_decisions_total", "fallback" => "true").increment(1);
            return decision;
        }

        decision.total_candidates = nodes.len();
        let evals: Vec<PharmacyEvaluation> = nodes
            .iter()
            .map(|node| self.evaluate(node, items, patient))
            .collect();
        decision.evaluations = evals.clone();

        let mut qualified: Vec<PharmacyEvaluation> =
            evals.iter().filter(|e| !e.disqualified).cloned().collect();
        let rejected: Vec<&PharmacyEvaluation> =
            evals.iter().filter(|e| e.disqualified).collect();
        decision.qualified = qualified.len();
        decision.disqualified = rejected.len();
        decision.disqualification_log = rejected
            .iter()
            .map(|e| Disqualification {
                node_id: e.node_id.clone(),
                name: e.name.clone(),
                reason: e.dq_reason.clone(),
                // Disqualified evaluations always carry a stage
                stage: e.dq_stage.unwrap_or(GateStage::Active),
            })
            .collect();

        if qualified.is_empty() {
            return self.fallback(decision, &evals, dry_run);
        }

        // Highest score first; ties break by load, then distance, then node id
        qualified.sort_by(|a, b| {
            b.total_score
                .total_cmp(&a.total_score)
                .then(a.current_load.cmp(&b.current_load))
                .then(a.distance_km.total_cmp(&b.distance_km))
                .then(a.node_id.cmp(&b.node_id))
        });

        decision.ranking = qualified
            .iter()
            .enumerate()
            .map(|(i, e)| RankEntry {
                rank: i + 1,
                node_id: e.node_id.clone(),
                name: e.name.clone(),
                score: round_to(e.total_score, 2),
                distance_km: round_to(e.distance_km, 1),
                eta_min: e.eta_min.round(),
                load: e.current_load,
                queue: e.queue_depth,
                stock_coverage: format!("{:.0}%", e.stock_coverage * 100.0),
                fallback: false,
            })
            .collect();

        let winner = &qualified[0];
        if !dry_run {
            self.apply_assignment(&winner.node_id);
        }
        decision.assigned_pharmacy = winner.node_id.clone();
        decision.pharmacy_name = winner.name.clone();
        decision.pharmacy_location = winner.location.clone();
        decision.winning_score = winner.total_score;

        decision.routing_reason = if qualified.len() == 1 {
            format!(
                "Routed to {} ({}) - only qualifier. Score:{:.1}/100, ETA:{:.0}min, {:.1}km.",
                winner.node_id, winner.name, winner.total_score, winner.eta_min, winner.distance_km
            )
        } else {
            let runner_up = &qualified[1];
            let margin = winner.total_score - runner_up.total_score;
            format!(
                "Routed to {} ({}) - {:.1}/100, beat {} by {:.1}pts. \
                 ETA:{:.0}min, {:.1}km, load:{}/{}, coverage:{:.0}%.",
                winner.node_id,
                winner.name,
                winner.total_score,
                runner_up.node_id,
                margin,
                winner.eta_min,
                winner.distance_km,
                winner.current_load,
                self.params.max_load,
                winner.stock_coverage * 100.0
            )
        };

        metrics::counter!("rxgrid_decisions_total", "fallback" => "false").increment(1);
        decision
    }

    /// Score a single pharmacy node against a single order.
    ///
    /// Applies the four hard gates in order; the first failure disqualifies
    /// the node and no later gate or sub-score is computed. The stock gate
    /// is skipped entirely for item-less orders (grid status queries).
    pub fn evaluate(
        &self,
        node: &NodeView,
        items: &[OrderItem],
        patient: GeoPoint,
    ) -> PharmacyEvaluation {
        let p = &self.params;
        let coords = match (node.lat, node.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => p.default_location,
        };
        let mut ev = PharmacyEvaluation::from_node(node, coords);
        ev.queue_depth = self.grid.orders.queue_depth(&node.node_id);

        // Gate 1: activity
        if !node.active {
            ev.disqualify(GateStage::Active, "OFFLINE".to_string());
            tracing::debug!(pharmacy = %node.node_id, gate = "active", verdict = "REJECT");
            return ev;
        }

        // Gate 2: load ceiling
        if node.load >= p.max_load {
            ev.disqualify(
                GateStage::Load,
                format!("Load {} >= limit {}", node.load, p.max_load),
            );
            tracing::debug!(
                pharmacy = %node.node_id,
                gate = "load",
                verdict = "REJECT",
                load = node.load
            );
            return ev;
        }

        // Gate 3: per-pharmacy stock. Skipped when the order has no items.
        if !items.is_empty() {
            let wanted: Vec<u32> = items.iter().map(|item| item.medicine_id).collect();
            let on_hand = self.grid.stock.quantities(&node.node_id, &wanted);

            let mut missing = Vec::new();
            let mut depth: u32 = 0;
            for item in items {
                let have = on_hand.get(&item.medicine_id).copied().unwrap_or(0);
                depth += have;
                if have < item.quantity {
                    missing.push(MissingItem {
                        id: item.medicine_id,
                        name: item.name.clone(),
                        need: item.quantity,
                        have,
                    });
                }
            }

            ev.total_depth = depth;
            ev.stock_coverage = 1.0 - missing.len() as f64 / items.len() as f64;

            if !missing.is_empty() {
                ev.has_all_items = false;
                let names: Vec<&str> = missing.iter().map(|m| m.name.as_str()).collect();
                let reason = format!("Missing {}: {}", missing.len(), names.join(", "));
                ev.missing_items = missing;
                ev.disqualify(GateStage::Stock, reason);
                tracing::debug!(
                    pharmacy = %node.node_id,
                    gate = "stock",
                    verdict = "REJECT",
                    missing = ev.missing_items.len()
                );
                return ev;
            }
        }

        // Distance and ETA
        ev.distance_km = haversine_km(patient, coords);
        ev.travel_min = travel_minutes(ev.distance_km, p.avg_speed_kmh);
        let item_count = items.len().max(1) as f64;
        ev.process_min = p.base_processing_min
            + p.pick_min_per_item * item_count
            + p.packing_min
            + p.dispatch_delay_min
            + p.queue_penalty_min * ev.queue_depth as f64;
        ev.eta_min = ev.process_min + ev.travel_min;

        // Gate 4: delivery SLA
        if ev.eta_min > p.sla_max_min {
            ev.disqualify(
                GateStage::Sla,
                format!(
                    "ETA {:.0}min > SLA {:.0}min (proc:{:.0}+travel:{:.0})",
                    ev.eta_min, p.sla_max_min, ev.process_min, ev.travel_min
                ),
            );
            tracing::debug!(
                pharmacy = %node.node_id,
                gate = "sla",
                verdict = "REJECT",
                eta = ev.eta_min.round()
            );
            return ev;
        }

        // All gates passed: weighted sub-scores
        let w = &p.weights;

        ev.proximity_score =
            (1.0 - ev.distance_km / p.proximity_radius_km).max(0.0) * 100.0 * w.proximity;

        // Queue depth is double-counted so backlog hurts more than raw load
        let effective_load = node.load + ev.queue_depth * 2;
        let load_fraction = (effective_load as f64 / p.max_load as f64).min(1.0);
        ev.load_score = (1.0 - load_fraction) * 100.0 * w.load;

        let depth_ratio = (node.stock_count as f64 / p.depth_baseline as f64).min(1.0);
        let depth_bonus = if items.is_empty() {
            0.5
        } else {
            let target = (items.len() as f64 * p.depth_per_item as f64).max(1.0);
            (ev.total_depth as f64 / target).min(1.0)
        };
        ev.stock_score =
            (depth_ratio * 0.3 + ev.stock_coverage * 0.4 + depth_bonus * 0.3) * 100.0 * w.stock;

        ev.logistics_cost = ev.distance_km * p.cost_per_km;
        ev.sla_risk = ev.eta_min / p.sla_max_min * 100.0;
        ev.load_risk = load_fraction * 50.0;
        let total_cost = ev.logistics_cost + ev.sla_risk + ev.load_risk;
        ev.cost_score = (1.0 - total_cost / p.cost_ceiling).max(0.0) * 100.0 * w.cost;

        ev.total_score = ev.proximity_score + ev.load_score + ev.stock_score + ev.cost_score;

        ev.reasoning = format!(
            "{} ({}): {:.1}/100 - Prox:{:.1} Load:{:.1} Stock:{:.1} Cost:{:.1} | \
             Dist:{:.1}km ETA:{:.0}min Load:{} Queue:{} Coverage:{:.0}% Depth:{} Logistics:{:.0}",
            node.node_id,
            node.name,
            ev.total_score,
            ev.proximity_score,
            ev.load_score,
            ev.stock_score,
            ev.cost_score,
            ev.distance_km,
            ev.eta_min,
            node.load,
            ev.queue_depth,
            ev.stock_coverage * 100.0,
            ev.total_depth,
            ev.logistics_cost
        );

        tracing::debug!(
            pharmacy = %node.node_id,
            qualified = true,
            distance_km = round_to(ev.distance_km, 1),
            eta_min = ev.eta_min.round(),
            total = round_to(ev.total_score, 2),
            "Candidate scored"
        );
        ev
    }

    /// Force-assign the least-loaded pharmacy when nothing qualifies.
    ///
    /// Prefers active nodes; falls back to the full field if every node is
    /// offline. The decision carries score 0 and a single fallback ranking
    /// entry.
    fn fallback(
        &self,
        mut decision: Decision,
        evals: &[PharmacyEvaluation],
        dry_run: bool,
    ) -> Decision {
        decision.fallback_used = true;

        let active: Vec<&PharmacyEvaluation> = evals.iter().filter(|e| e.active).collect();
        let pool: Vec<&PharmacyEvaluation> = if active.is_empty() {
            evals.iter().collect()
        } else {
            active
        };
        // Pool is in node-id order, so min_by_key is deterministic on ties
        let chosen = match pool.iter().min_by_key(|e| e.current_load) {
            Some(e) => *e,
            None => {
                decision.routing_reason = "No pharmacy nodes in grid.".to_string();
                return decision;
            }
        };

        if !dry_run {
            self.apply_assignment(&chosen.node_id);
        }

        decision.assigned_pharmacy = chosen.node_id.clone();
        decision.pharmacy_name = chosen.name.clone();
        decision.pharmacy_location = chosen.location.clone();
        decision.winning_score = 0.0;
        decision.routing_reason = format!(
            "FALLBACK: All {} candidates disqualified. Assigned {} ({}) - lowest load.",
            decision.total_candidates, chosen.node_id, chosen.name
        );
        decision.ranking = vec![RankEntry {
            rank: 1,
            node_id: chosen.node_id.clone(),
            name: chosen.name.clone(),
            score: 0.0,
            distance_km: round_to(chosen.distance_km, 1),
            eta_min: chosen.eta_min.round(),
            load: chosen.current_load,
            queue: chosen.queue_depth,
            stock_coverage: format!("{:.0}%", chosen.stock_coverage * 100.0),
            fallback: true,
        }];

        metrics::counter!("rxgrid_decisions_total", "fallback" => "true").increment(1);
        metrics::counter!("rxgrid_fallbacks_total").increment(1);
        tracing::warn!(
            pharmacy = %decision.assigned_pharmacy,
            candidates = decision.total_candidates,
            "All candidates disqualified, forced fallback assignment"
        );
        decision
    }

    /// Bump the winner's load counter. The increment is atomic, so two
    /// concurrent decisions landing on the same node both count.
    fn apply_assignment(&self, node_id: &str) {
        match self.grid.directory.increment_load(node_id) {
            Ok(new_load) => {
                tracing::debug!(pharmacy = %node_id, new_load, "Load incremented");
            }
            Err(e) => {
                // Node removed between evaluation and assignment
                tracing::warn!(pharmacy = %node_id, error = %e, "Load increment failed");
            }
        }
    }

    fn patient_location(&self, patient_id: u64) -> GeoPoint {
        if patient_id != 0 {
            if let Some(location) = self.grid.patients.location(patient_id) {
                tracing::debug!(
                    src = "index",
                    lat = location.lat,
                    lng = location.lng,
                    "Resolved patient location"
                );
                return location;
            }
        }
        let fallback = self.params.default_location;
        tracing::debug!(
            src = "default",
            lat = fallback.lat,
            lng = fallback.lng,
            "Patient location unknown, using default"
        );
        fallback
    }
}

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::grid::PharmacyNode;

    pub fn item(medicine_id: u32, name: &str, quantity: u32) -> OrderItem {
        OrderItem {
            medicine_id,
            name: name.to_string(),
            quantity,
        }
    }

    pub fn add_node(grid: &Grid, node_id: &str, lat: f64, lng: f64, load: u32) {
        let node = PharmacyNode::new(
            node_id.to_string(),
            format!("Pharmacy {}", node_id),
            format!("{} Street", node_id),
        )
        .with_coordinates(lat, lng);
        node.load.store(load, std::sync::atomic::Ordering::SeqCst);
        grid.directory.add_node(node).unwrap();
    }

    pub fn scheduler(grid: Arc<Grid>) -> Scheduler {
        Scheduler::new(grid, ScheduleParams::default()).unwrap()
    }

    /// Give a node enough stock for the given items.
    pub fn stock_items(grid: &Grid, node_id: &str, items: &[OrderItem]) {
        for it in items {
            grid.stock.set(node_id, it.medicine_id, it.quantity);
        }
    }
}



#[cfg(test)]
mod optimize_tests {
    use super::test_support::*;
    use super::*;

    /// Patient at the equator origin; nodes placed north at known distances.
    /// One degree of latitude is about 111.19 km.
    fn grid_at_distances(distances_km: &[(&str, f64)]) -> Arc<Grid> {
        let grid = Arc::new(Grid::new());
        for (id, km) in distances_km {
            add_node(&grid, id, km / 111.19, 0.0, 0);
        }
        grid
    }

    #[test]
    fn nearest_node_wins_all_else_equal() {
        let grid = grid_at_distances(&[("PH-A", 2.0), ("PH-B", 10.0), ("PH-C", 25.0)]);
        let items = vec![item(1, "Amoxicillin", 1)];
        for id in ["PH-A", "PH-B", "PH-C"] {
            stock_items(&grid, id, &items);
        }

        let s = scheduler(grid);
        let decision = s.optimize(&items, GeoPoint::new(0.0, 0.0), true);

        assert!(!decision.fallback_used);
        assert_eq!(decision.qualified, 3);
        assert_eq!(decision.assigned_pharmacy, "PH-A");
        assert_eq!(decision.ranking[0].node_id, "PH-A");
        assert_eq!(decision.ranking[1].node_id, "PH-B");
        assert_eq!(decision.ranking[2].node_id, "PH-C");
    }

    #[test]
    fn increasing_distance_never_increases_score() {
        let grid = grid_at_distances(&[("PH-A", 2.0), ("PH-B", 10.0), ("PH-C", 25.0)]);

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(0.0, 0.0), true);

        let scores: Vec<f64> = decision.ranking.iter().map(|r| r.score).collect();
        assert!(scores[0] >= scores[1] && scores[1] >= scores[2]);
    }

    #[test]
    fn identical_nodes_break_tie_on_node_id() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-002", 19.0, 72.8, 0);
        add_node(&grid, "PH-001", 19.0, 72.8, 0);

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        assert_eq!(decision.assigned_pharmacy, "PH-001");
        assert_eq!(decision.ranking[1].node_id, "PH-002");
        assert_eq!(decision.ranking[0].score, decision.ranking[1].score);
    }

    #[test]
    fn equal_scores_break_tie_on_lower_load() {
        use crate::grid::OrderStatus;

        // Both nodes saturate the effective-load fraction (load + 2*queue >= 80),
        // zeroing the load sub-score and capping load risk for both, so the
        // totals are equal while raw loads differ.
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 79);
        add_node(&grid, "PH-B", 19.0, 72.8, 78);
        for _ in 0..10 {
            grid.orders.open("PH-A", OrderStatus::Pending);
            grid.orders.open("PH-B", OrderStatus::Pending);
        }

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        assert_eq!(decision.ranking[0].score, decision.ranking[1].score);
        assert_eq!(decision.assigned_pharmacy, "PH-B");
    }

    #[test]
    fn two_runs_produce_identical_rankings() {
        let grid = grid_at_distances(&[("PH-C", 12.0), ("PH-A", 3.0), ("PH-B", 7.0)]);
        let items = vec![item(1, "Amoxicillin", 2)];
        for id in ["PH-A", "PH-B", "PH-C"] {
            stock_items(&grid, id, &items);
        }

        let s = scheduler(grid);
        let first = s.optimize(&items, GeoPoint::new(0.0, 0.0), true);
        let second = s.optimize(&items, GeoPoint::new(0.0, 0.0), true);

        assert_eq!(
            serde_json::to_string(&first.ranking).unwrap(),
            serde_json::to_string(&second.ranking).unwrap()
        );
    }

    #[test]
    fn empty_grid_returns_degenerate_fallback() {
        let grid = Arc::new(Grid::new());
        let s = scheduler(grid);

        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), false);

        assert!(decision.fallback_used);
        assert_eq!(decision.winning_score, 0.0);
        assert_eq!(decision.assigned_pharmacy, "");
        assert_eq!(decision.total_candidates, 0);
        assert!(decision.ranking.is_empty());
    }

    #[test]
    fn all_disqualified_falls_back_to_least_loaded() {
        // Single item nobody stocks: every node fails the stock gate
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 30);
        add_node(&grid, "PH-B", 19.0, 72.8, 10);
        add_node(&grid, "PH-C", 19.0, 72.8, 20);
        let items = vec![item(99, "Insulin", 1)];

        let s = scheduler(grid.clone());
        let decision = s.optimize(&items, GeoPoint::new(19.0, 72.8), false);

        assert!(decision.fallback_used);
        assert_eq!(decision.winning_score, 0.0);
        assert_eq!(decision.assigned_pharmacy, "PH-B");
        assert_eq!(decision.ranking.len(), 1);
        assert!(decision.ranking[0].fallback);
        assert_eq!(decision.disqualification_log.len(), 3);
        // Fallback still takes the assignment side effect
        assert_eq!(grid.directory.get_node("PH-B").unwrap().load, 11);
    }

    #[test]
    fn fallback_prefers_active_nodes() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 0);
        add_node(&grid, "PH-B", 19.0, 72.8, 50);
        grid.directory.set_active("PH-A", false).unwrap();
        let items = vec![item(99, "Insulin", 1)];

        let s = scheduler(grid);
        let decision = s.optimize(&items, GeoPoint::new(19.0, 72.8), true);

        assert!(decision.fallback_used);
        // PH-A has the lower load but is offline; the active pool wins
        assert_eq!(decision.assigned_pharmacy, "PH-B");
    }

    #[test]
    fn fallback_iff_no_qualifier() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 0);
        let items = vec![item(1, "Amoxicillin", 1)];
        stock_items(&grid, "PH-A", &items);

        let s = scheduler(grid.clone());
        let qualified_run = s.optimize(&items, GeoPoint::new(19.0, 72.8), true);
        assert!(!qualified_run.fallback_used);
        assert!(qualified_run.winning_score > 0.0);

        grid.directory.set_active("PH-A", false).unwrap();
        let fallback_run = s.optimize(&items, GeoPoint::new(19.0, 72.8), true);
        assert!(fallback_run.fallback_used);
        assert_eq!(fallback_run.winning_score, 0.0);
    }

    #[test]
    fn winner_load_increments_once_per_decision() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 4);

        let s = scheduler(grid.clone());
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), false);

        assert_eq!(decision.assigned_pharmacy, "PH-A");
        assert_eq!(grid.directory.get_node("PH-A").unwrap().load, 5);
    }

    #[test]
    fn dry_run_leaves_load_untouched() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 4);

        let s = scheduler(grid.clone());
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        assert_eq!(decision.assigned_pharmacy, "PH-A");
        assert_eq!(grid.directory.get_node("PH-A").unwrap().load, 4);
    }

    #[test]
    fn sole_qualifier_reason_cites_only_qualifier() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 0);
        add_node(&grid, "PH-B", 19.0, 72.8, 0);
        grid.directory.set_active("PH-B", false).unwrap();

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        assert_eq!(decision.qualified, 1);
        assert!(decision.routing_reason.contains("only qualifier"));
    }

    #[test]
    fn multi_qualifier_reason_cites_margin() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.0, 72.8, 0);
        add_node(&grid, "PH-B", 19.1, 72.9, 0);

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        assert_eq!(decision.qualified, 2);
        assert!(decision.routing_reason.contains("beat PH-B by"));
    }

    #[test]
    fn ranking_rows_carry_rounded_facts() {
        let grid = Arc::new(Grid::new());
        add_node(&grid, "PH-A", 19.05, 72.85, 7);

        let s = scheduler(grid);
        let decision = s.optimize(&[], GeoPoint::new(19.0, 72.8), true);

        let row = &decision.ranking[0];
        assert_eq!(row.rank, 1);
        assert_eq!(row.load, 7);
        assert_eq!(row.stock_coverage, "100%");
        assert_eq!(row.score, round_to(decision.winning_score, 2));
    }
}
