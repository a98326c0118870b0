//! Retained / lost / new entities between the prior year and the base period.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::metrics::EntityMetrics;
use crate::config::RetentionPolicy;
use crate::model::{EntityKey, RiskLevel};
use crate::safe_math::safe_div;

/// Set comparison of two active-entity sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSetComparison {
    pub retained: Vec<EntityKey>,
    pub lost: Vec<EntityKey>,
    pub new: Vec<EntityKey>,
    pub previous_count: usize,
    pub current_count: usize,
}

impl ActiveSetComparison {
    /// `|retained| / |previous|`, 0 when there was no previous set
    pub fn retention_rate(&self) -> f64 {
        safe_div(self.retained.len() as f64, self.previous_count as f64).unwrap_or(0.0)
    }

    /// `|lost| / |previous|`, 0 when there was no previous set
    pub fn churn_rate(&self) -> f64 {
        safe_div(self.lost.len() as f64, self.previous_count as f64).unwrap_or(0.0)
    }
}

/// Compare two sets of active keys. Output lists are sorted by key.
pub fn compare_active_sets(
    previous: &FxHashSet<EntityKey>,
    current: &FxHashSet<EntityKey>,
) -> ActiveSetComparison {
    let sorted = |keys: Vec<&EntityKey>| {
        let mut keys: Vec<EntityKey> = keys.into_iter().cloned().collect();
        keys.sort();
        keys
    };

    ActiveSetComparison {
        retained: sorted(previous.intersection(current).collect()),
        lost: sorted(previous.difference(current).collect()),
        new: sorted(current.difference(previous).collect()),
        previous_count: previous.len(),
        current_count: current.len(),
    }
}

pub fn classify_churn(churn_rate: f64, policy: &RetentionPolicy) -> RiskLevel {
    if churn_rate >= policy.high_churn {
        RiskLevel::High
    } else if churn_rate >= policy.medium_churn {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSummary {
    /// False when nothing was active in the prior year (or there is no prior-year
    /// column). Rates are then 0 and mean "no data", not "no churn".
    pub has_baseline: bool,
    pub previous_active: usize,
    pub current_active: usize,
    pub retained: Vec<String>,
    pub lost: Vec<String>,
    pub new: Vec<String>,
    pub retention_rate: f64,
    pub churn_rate: f64,
    /// Prior-year volume of the lost entities
    pub lost_volume: f64,
    /// Base-period volume of the new entities
    pub new_volume: f64,
    pub risk: RiskLevel,
}

pub fn analyze_retention(entities: &[EntityMetrics], policy: &RetentionPolicy) -> RetentionSummary {
    let by_key: FxHashMap<&EntityKey, &EntityMetrics> =
        entities.iter().map(|m| (&m.key, m)).collect();

    let previous: FxHashSet<EntityKey> = entities
        .iter()
        .filter(|m| m.was_active())
        .map(|m| m.key.clone())
        .collect();
    let current: FxHashSet<EntityKey> = entities
        .iter()
        .filter(|m| m.is_active())
        .map(|m| m.key.clone())
        .collect();

    let comparison = compare_active_sets(&previous, &current);

    let names = |keys: &[EntityKey]| -> Vec<String> {
        keys.iter()
            .map(|k| by_key.get(k).map_or_else(|| k.to_string(), |m| m.name.clone()))
            .collect()
    };
    let lost_volume: f64 = comparison
        .lost
        .iter()
        .filter_map(|k| by_key.get(k))
        .map(|m| m.volume.previous_year.unwrap_or(0.0))
        .sum();
    let new_volume: f64 = comparison
        .new
        .iter()
        .filter_map(|k| by_key.get(k))
        .map(|m| m.volume.actual)
        .sum();

    let churn_rate = comparison.churn_rate();
    let has_baseline = comparison.previous_count > 0;

    RetentionSummary {
        has_baseline,
        previous_active: comparison.previous_count,
        current_active: comparison.current_count,
        retained: names(&comparison.retained),
        lost: names(&comparison.lost),
        new: names(&comparison.new),
        retention_rate: comparison.retention_rate(),
        churn_rate,
        lost_volume,
        new_volume,
        risk: if has_baseline {
            classify_churn(churn_rate, policy)
        } else {
            RiskLevel::Low
        },
    }
}
