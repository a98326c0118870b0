//! Tests for materiality selection
//!
//! These tests verify:
//! - The focus cap always binds
//! - Coverage is reached unless the cap or the candidates run out
//! - Output is a subset of the candidates, ranked by materiality score

use crate::analysis::{BudgetBasis, EntityMetrics, MetricSnapshot, select_material};
use crate::config::MaterialityPolicy;
use crate::model::EntityKey;

fn entity(name: &str, actual: f64, budget: Option<f64>, previous_year: Option<f64>) -> EntityMetrics {
    EntityMetrics {
        key: EntityKey::new(name),
        name: name.to_string(),
        volume: MetricSnapshot {
            actual,
            budget,
            previous_year,
            ..Default::default()
        },
        amount: None,
    }
}

fn totals(entities: &[EntityMetrics]) -> MetricSnapshot {
    MetricSnapshot {
        actual: entities.iter().map(|m| m.volume.actual).sum(),
        budget: Some(entities.iter().filter_map(|m| m.volume.budget).sum()),
        ..Default::default()
    }
}

#[test]
fn test_focus_cap_binds() {
    let entities: Vec<EntityMetrics> = (0..20)
        .map(|i| entity(&format!("Entity {i:02}"), 10.0, Some(10.0), None))
        .collect();
    let selection = select_material(&entities, &totals(&entities), &MaterialityPolicy::default());

    assert_eq!(selection.len(), 10);
    assert!((selection.coverage - 0.5).abs() < 1e-9);
}

#[test]
fn test_coverage_reached_then_small_tail_dropped() {
    let entities = vec![
        entity("E", 4.0, Some(4.0), None),
        entity("A", 50.0, Some(50.0), None),
        entity("C", 15.0, Some(15.0), None),
        entity("B", 25.0, Some(25.0), None),
        entity("D", 6.0, Some(6.0), None),
    ];
    let policy = MaterialityPolicy::default();
    let selection = select_material(&entities, &totals(&entities), &policy);

    // A, B reach 75%; C and D are still individually material; E is not
    let keys: Vec<&str> = selection.entities.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
    assert!(selection.coverage >= policy.coverage_target);
    assert!((selection.coverage - 0.96).abs() < 1e-9);
    assert_eq!(selection.basis, BudgetBasis::Period);
}

#[test]
fn test_candidates_exhausted_before_coverage() {
    let entities = vec![
        entity("A", 30.0, Some(30.0), None),
        entity("B", 20.0, Some(20.0), None),
    ];
    let policy = MaterialityPolicy {
        coverage_target: 0.7,
        max_focus_items: 10,
        min_share: 0.05,
    };
    let selection = select_material(&entities, &totals(&entities), &policy);
    assert_eq!(selection.len(), 2);
    assert!((selection.coverage - 1.0).abs() < 1e-9);
}

#[test]
fn test_inactive_entities_never_selected() {
    let entities = vec![
        entity("Live", 50.0, Some(50.0), None),
        entity("Dormant", 0.0, Some(0.0), Some(0.0)),
        entity("Lapsed", 0.0, None, Some(12.0)),
    ];
    let selection = select_material(&entities, &totals(&entities), &MaterialityPolicy::default());

    assert_eq!(selection.candidate_count, 2);
    assert!(
        selection
            .entities
            .iter()
            .all(|e| e.key != EntityKey::new("Dormant"))
    );
}

#[test]
fn test_reranked_by_materiality_score() {
    // Budget order: Planned, Delivered. Score order flips: Delivered sells far above plan.
    let entities = vec![
        entity("Planned", 10.0, Some(60.0), None),
        entity("Delivered", 90.0, Some(40.0), None),
    ];
    let selection = select_material(&entities, &totals(&entities), &MaterialityPolicy::default());

    assert_eq!(selection.entities[0].name, "Delivered");
    assert_eq!(selection.entities[1].name, "Planned");
    let top = &selection.entities[0];
    assert!((top.materiality_score - top.budget_share * top.actual_share).abs() < 1e-12);
}

#[test]
fn test_no_budget_ranks_by_actual_share() {
    let entities = vec![
        entity("Small", 10.0, None, None),
        entity("Large", 70.0, None, None),
        entity("Mid", 20.0, None, None),
    ];
    let total = MetricSnapshot {
        actual: 100.0,
        ..Default::default()
    };
    let selection = select_material(&entities, &total, &MaterialityPolicy::default());

    assert_eq!(selection.basis, BudgetBasis::Unavailable);
    assert_eq!(selection.coverage, 0.0);
    let names: Vec<&str> = selection.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Large", "Mid", "Small"]);
}

#[test]
fn test_full_year_budget_preferred_for_shares() {
    let mut a = entity("A", 10.0, Some(10.0), None);
    a.volume.fy_budget = Some(300.0);
    let mut b = entity("B", 10.0, Some(30.0), None);
    b.volume.fy_budget = Some(100.0);
    let entities = vec![a, b];

    let total = MetricSnapshot {
        actual: 20.0,
        budget: Some(40.0),
        fy_budget: Some(400.0),
        ..Default::default()
    };
    let selection = select_material(&entities, &total, &MaterialityPolicy::default());

    assert_eq!(selection.basis, BudgetBasis::FullYear);
    let a = selection
        .entities
        .iter()
        .find(|e| e.name == "A")
        .unwrap();
    assert!((a.budget_share - 0.75).abs() < 1e-12);
}
