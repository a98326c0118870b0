//! Per-metric snapshots at the resolved comparison columns.

use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityKey};
use crate::periods::ResolvedPeriods;
use crate::safe_math::{ratio_pct, sum_at, value_at};

/// One metric (volume or amount) read at every resolved column.
///
/// Comparison fields are `None` when the column does not exist in the schema,
/// which is distinct from a column that exists and holds 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub actual: f64,
    pub budget: Option<f64>,
    pub previous_year: Option<f64>,
    pub ytd: Option<f64>,
    pub ytd_previous: Option<f64>,
    pub fy_actual: Option<f64>,
    pub fy_previous: Option<f64>,
    pub fy_budget: Option<f64>,
    pub vs_budget_pct: Option<f64>,
    pub yoy_pct: Option<f64>,
    pub ytd_yoy_pct: Option<f64>,
}

impl MetricSnapshot {
    fn build(periods: &ResolvedPeriods, read: impl Fn(usize) -> f64) -> Self {
        let at = |index: Option<usize>| index.map(&read);

        let actual = read(periods.base);
        let budget = at(periods.budget);
        let previous_year = at(periods.previous_year);
        let ytd = at(periods.ytd_current);
        let ytd_previous = at(periods.ytd_previous);

        Self {
            actual,
            budget,
            previous_year,
            ytd,
            ytd_previous,
            fy_actual: at(periods.fy_current),
            fy_previous: at(periods.fy_previous),
            fy_budget: at(periods.fy_budget),
            vs_budget_pct: budget.and_then(|b| ratio_pct(actual, b)),
            yoy_pct: previous_year.and_then(|py| ratio_pct(actual, py)),
            ytd_yoy_pct: ytd.zip(ytd_previous).and_then(|(c, p)| ratio_pct(c, p)),
        }
    }

    /// Snapshot of a single entity's value row
    pub fn for_values(values: &[f64], periods: &ResolvedPeriods) -> Self {
        Self::build(periods, |i| value_at(values, Some(i)))
    }

    /// Snapshot of the column sums across `rows`
    pub fn for_portfolio(rows: &[&[f64]], periods: &ResolvedPeriods) -> Self {
        Self::build(periods, |i| sum_at(Some(i), rows.iter().copied()))
    }

    /// Full-year budget when present and positive, else the period budget
    pub fn target(&self) -> Option<f64> {
        self.fy_budget.filter(|fy| *fy > 0.0).or(self.budget)
    }

    /// Actual to measure against the target: YTD when available
    pub fn to_date(&self) -> f64 {
        self.ytd.unwrap_or(self.actual)
    }
}

/// Joined metrics for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub key: EntityKey,
    pub name: String,
    pub volume: MetricSnapshot,
    /// `None` when the subject has no Amount dataset at all
    pub amount: Option<MetricSnapshot>,
}

impl EntityMetrics {
    pub fn new(entity: &Entity, periods: &ResolvedPeriods, has_amount: bool) -> Self {
        Self {
            key: entity.key.clone(),
            name: entity.name.clone(),
            volume: MetricSnapshot::for_values(&entity.volume, periods),
            amount: has_amount.then(|| MetricSnapshot::for_values(&entity.amount, periods)),
        }
    }

    /// Active in the base period
    pub fn is_active(&self) -> bool {
        self.volume.actual > 0.0
    }

    /// Active in the previous-year column
    pub fn was_active(&self) -> bool {
        self.volume.previous_year.is_some_and(|py| py > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> ResolvedPeriods {
        ResolvedPeriods {
            base: 1,
            budget: Some(2),
            previous_year: Some(0),
            ytd_current: None,
            ytd_previous: None,
            fy_current: None,
            fy_previous: None,
            fy_budget: Some(3),
            is_fy_period: false,
        }
    }

    #[test]
    fn test_snapshot_reads_resolved_columns() {
        let snapshot = MetricSnapshot::for_values(&[100.0, 120.0, 150.0, 1_800.0], &periods());

        assert_eq!(snapshot.actual, 120.0);
        assert_eq!(snapshot.budget, Some(150.0));
        assert_eq!(snapshot.previous_year, Some(100.0));
        assert_eq!(snapshot.ytd, None);
        assert!((snapshot.yoy_pct.unwrap() - 20.0).abs() < 1e-9);
        assert!((snapshot.vs_budget_pct.unwrap() + 20.0).abs() < 1e-9);
        assert_eq!(snapshot.target(), Some(1_800.0));
        assert_eq!(snapshot.to_date(), 120.0);
    }

    #[test]
    fn test_zero_budget_column_gives_no_variance() {
        let snapshot = MetricSnapshot::for_values(&[0.0, 50.0, 0.0, 0.0], &periods());
        assert_eq!(snapshot.budget, Some(0.0));
        assert_eq!(snapshot.vs_budget_pct, None);
        assert_eq!(snapshot.yoy_pct, None);
        assert_eq!(snapshot.target(), Some(0.0));
    }

    #[test]
    fn test_portfolio_sums_short_rows_as_zero() {
        let a = [10.0, 20.0, 30.0, 40.0];
        let b = [1.0, 2.0];
        let snapshot = MetricSnapshot::for_portfolio(&[&a, &b], &periods());
        assert_eq!(snapshot.actual, 22.0);
        assert_eq!(snapshot.budget, Some(30.0));
        assert_eq!(snapshot.fy_budget, Some(40.0));
    }
}
