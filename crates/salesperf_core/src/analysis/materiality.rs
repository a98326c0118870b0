//! Materiality selection: the bounded subset of entities worth naming.
//!
//! Entities are walked in budget-share order and admitted until either the
//! focus cap is hit, or the accumulated share reaches the coverage target and
//! the next entity is individually immaterial. The result is then re-ranked by
//! `budget_share * actual_share`, which is the order every downstream
//! "top issues" list uses.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::metrics::{EntityMetrics, MetricSnapshot};
use crate::config::MaterialityPolicy;
use crate::model::EntityKey;
use crate::safe_math::share;

/// An entity admitted to the focus list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntity {
    pub key: EntityKey,
    pub name: String,
    pub budget_share: f64,
    pub actual_share: f64,
    /// `budget_share * actual_share`
    pub materiality_score: f64,
    pub volume: MetricSnapshot,
    pub amount: Option<MetricSnapshot>,
}

/// Which budget column the shares were computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBasis {
    FullYear,
    Period,
    /// No positive portfolio budget; every budget share is 0
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialitySelection {
    /// Focus list, ranked by materiality score
    pub entities: Vec<MaterialEntity>,
    /// Cumulative budget share covered by the focus list
    pub coverage: f64,
    /// Entities eligible for selection (positive actual, budget or prior year)
    pub candidate_count: usize,
    pub basis: BudgetBasis,
}

impl MaterialitySelection {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

fn budget_for(snapshot: &MetricSnapshot, basis: BudgetBasis) -> f64 {
    match basis {
        BudgetBasis::FullYear => snapshot.fy_budget.unwrap_or(0.0),
        BudgetBasis::Period => snapshot.budget.unwrap_or(0.0),
        BudgetBasis::Unavailable => 0.0,
    }
}

fn is_candidate(metrics: &EntityMetrics) -> bool {
    let v = &metrics.volume;
    v.actual > 0.0
        || v.budget.is_some_and(|b| b > 0.0)
        || v.fy_budget.is_some_and(|b| b > 0.0)
        || v.previous_year.is_some_and(|py| py > 0.0)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Select the material entities of a portfolio
pub fn select_material(
    entities: &[EntityMetrics],
    totals: &MetricSnapshot,
    policy: &MaterialityPolicy,
) -> MaterialitySelection {
    let basis = if totals.fy_budget.is_some_and(|b| b > 0.0) {
        BudgetBasis::FullYear
    } else if totals.budget.is_some_and(|b| b > 0.0) {
        BudgetBasis::Period
    } else {
        BudgetBasis::Unavailable
    };
    let portfolio_budget = budget_for(totals, basis);

    let mut ranked: Vec<MaterialEntity> = entities
        .iter()
        .filter(|m| is_candidate(m))
        .map(|m| {
            let budget_share = share(budget_for(&m.volume, basis), portfolio_budget);
            let actual_share = share(m.volume.actual, totals.actual);
            MaterialEntity {
                key: m.key.clone(),
                name: m.name.clone(),
                budget_share,
                actual_share,
                materiality_score: budget_share * actual_share,
                volume: m.volume.clone(),
                amount: m.amount.clone(),
            }
        })
        .collect();
    let candidate_count = ranked.len();

    ranked.sort_by(|a, b| {
        descending(a.budget_share, b.budget_share)
            .then_with(|| descending(a.actual_share, b.actual_share))
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut selected = Vec::new();
    let mut coverage = 0.0;
    for entity in ranked {
        if selected.len() >= policy.max_focus_items {
            break;
        }
        if coverage >= policy.coverage_target && entity.budget_share < policy.min_share {
            break;
        }
        coverage += entity.budget_share;
        selected.push(entity);
    }

    selected.sort_by(|a, b| {
        descending(a.materiality_score, b.materiality_score)
            .then_with(|| descending(a.budget_share, b.budget_share))
    });

    tracing::debug!(
        candidates = candidate_count,
        selected = selected.len(),
        coverage,
        "materiality selection"
    );

    MaterialitySelection {
        entities: selected,
        coverage,
        candidate_count,
        basis,
    }
}
