//! Property-based tests for the scoring engine

use proptest::prelude::*;
use rxgrid::grid::{Grid, PharmacyNode};
use rxgrid::scheduling::{GeoPoint, OrderItem, ScheduleParams, Scheduler};
use std::sync::Arc;

fn pharmacy(node_id: &str, lat: f64, lng: f64, load: u32, stock_count: u32) -> PharmacyNode {
    let node = PharmacyNode::new(
        node_id.to_string(),
        format!("Pharmacy {}", node_id),
        format!("{}, Mumbai", node_id),
    )
    .with_coordinates(lat, lng)
    .with_stock_count(stock_count);
    node.load.store(load, std::sync::atomic::Ordering::SeqCst);
    node
}

fn scheduler_with(nodes: Vec<PharmacyNode>) -> (Arc<Grid>, Scheduler) {
    let grid = Arc::new(Grid::new());
    for node in nodes {
        grid.directory.add_node(node).unwrap();
    }
    let scheduler = Scheduler::new(grid.clone(), ScheduleParams::default()).unwrap();
    (grid, scheduler)
}

proptest! {
    /// Every qualified evaluation stays inside the weighted score bounds.
    #[test]
    fn prop_scores_bounded(
        lat in 18.8f64..19.3,
        lng in 72.7f64..73.0,
        load in 0u32..80,
        stock_count in 0u32..200,
        quantity in 1u32..20,
        on_hand in 0u32..200,
    ) {
        let (grid, scheduler) = scheduler_with(vec![
            pharmacy("PH-001", lat, lng, load, stock_count),
        ]);
        grid.stock.set("PH-001", 1, on_hand);
        let items = vec![OrderItem {
            medicine_id: 1,
            name: "Amoxicillin".to_string(),
            quantity,
        }];

        let node = grid.directory.get_node("PH-001").unwrap();
        let ev = scheduler.evaluate(&node, &items, GeoPoint::new(19.0760, 72.8777));

        if ev.disqualified {
            prop_assert_eq!(ev.total_score, 0.0);
        } else {
            prop_assert!((0.0..=30.0).contains(&ev.proximity_score));
            prop_assert!((0.0..=25.0).contains(&ev.load_score));
            prop_assert!((0.0..=25.0).contains(&ev.stock_score));
            prop_assert!((0.0..=20.0).contains(&ev.cost_score));
            prop_assert!((0.0..=100.0).contains(&ev.total_score));
            let sum = ev.proximity_score + ev.load_score + ev.stock_score + ev.cost_score;
            prop_assert!((ev.total_score - sum).abs() < 1e-9);
        }
    }

    /// Moving a pharmacy further away never raises its score.
    #[test]
    fn prop_distance_monotone(near_deg in 0.0f64..0.1, extra_deg in 0.0f64..0.1) {
        let (grid, scheduler) = scheduler_with(vec![
            pharmacy("PH-NEAR", near_deg, 0.0, 0, 52),
            pharmacy("PH-FAR", near_deg + extra_deg, 0.0, 0, 52),
        ]);

        let patient = GeoPoint::new(0.0, 0.0);
        let near = scheduler.evaluate(&grid.directory.get_node("PH-NEAR").unwrap(), &[], patient);
        let far = scheduler.evaluate(&grid.directory.get_node("PH-FAR").unwrap(), &[], patient);

        prop_assert!(!near.disqualified);
        prop_assert!(!far.disqualified);
        prop_assert!(near.total_score >= far.total_score - 1e-9);
    }

    /// Raising a pharmacy's load never raises its score.
    #[test]
    fn prop_load_monotone(load in 0u32..79, extra in 0u32..40) {
        let higher = (load + extra).min(79);
        let (grid, scheduler) = scheduler_with(vec![
            pharmacy("PH-LOW", 19.0760, 72.8777, load, 52),
            pharmacy("PH-HIGH", 19.0760, 72.8777, higher, 52),
        ]);

        let patient = GeoPoint::new(19.0760, 72.8777);
        let low = scheduler.evaluate(&grid.directory.get_node("PH-LOW").unwrap(), &[], patient);
        let high = scheduler.evaluate(&grid.directory.get_node("PH-HIGH").unwrap(), &[], patient);

        prop_assert!(low.total_score >= high.total_score - 1e-9);
    }

    /// The optimizer always yields an assignment when any node exists, and
    /// fallback is flagged exactly when nothing qualified.
    #[test]
    fn prop_decision_always_assigns(
        loads in proptest::collection::vec(0u32..120, 1..6),
        active_mask in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let grid = Arc::new(Grid::new());
        for (i, load) in loads.iter().enumerate() {
            let node = pharmacy(&format!("PH-{:03}", i), 19.0760, 72.8777, *load, 52);
            grid.directory.add_node(node).unwrap();
            if !active_mask[i] {
                grid.directory.set_active(&format!("PH-{:03}", i), false).unwrap();
            }
        }
        let scheduler = Scheduler::new(grid, ScheduleParams::default()).unwrap();

        let decision = scheduler.optimize(&[], GeoPoint::new(19.0760, 72.8777), true);

        prop_assert!(!decision.assigned_pharmacy.is_empty());
        prop_assert_eq!(decision.fallback_used, decision.qualified == 0);
        prop_assert_eq!(decision.qualified + decision.disqualified, loads.len());
        if decision.fallback_used {
            prop_assert_eq!(decision.winning_score, 0.0);
            prop_assert_eq!(decision.ranking.len(), 1);
        } else {
            prop_assert_eq!(decision.ranking.len(), decision.qualified);
        }
    }

    /// Dry runs never mutate any load counter.
    #[test]
    fn prop_dry_run_is_side_effect_free(loads in proptest::collection::vec(0u32..120, 1..6)) {
        let grid = Arc::new(Grid::new());
        for (i, load) in loads.iter().enumerate() {
            let node = pharmacy(&format!("PH-{:03}", i), 19.0760, 72.8777, *load, 52);
            grid.directory.add_node(node).unwrap();
        }
        let scheduler = Scheduler::new(grid.clone(), ScheduleParams::default()).unwrap();

        scheduler.optimize(&[], GeoPoint::new(19.0760, 72.8777), true);

        for (i, load) in loads.iter().enumerate() {
            let node = grid.directory.get_node(&format!("PH-{:03}", i)).unwrap();
            prop_assert_eq!(node.load, *load);
        }
    }
}
