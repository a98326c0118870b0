//! Remaining gap to the annual target and the monthly pace needed to close it.

use serde::{Deserialize, Serialize};

use super::materiality::MaterialEntity;
use super::metrics::MetricSnapshot;
use crate::model::{EntityKey, PeriodKind};
use crate::safe_math::safe_div;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchUpPlan {
    /// FY budget when positive, else the period budget
    pub target: f64,
    /// YTD actual when available, else the period actual
    pub current: f64,
    /// `max(0, target - current)`
    pub gap: f64,
    /// Only defined for single-month base periods. `None` means "not applicable", not zero.
    pub months_remaining: Option<u8>,
    /// `gap / months_remaining`; 0 when no months remain
    pub per_month: Option<f64>,
    /// `current / target`
    pub run_rate: Option<f64>,
}

impl CatchUpPlan {
    pub fn is_behind(&self) -> bool {
        self.gap > 0.0
    }
}

/// Months left in the calendar year after the base month
pub fn months_remaining(kind: PeriodKind) -> Option<u8> {
    kind.month_number().map(|month| 12u8.saturating_sub(month))
}

/// Monthly amount needed to close `gap`
pub fn per_month(gap: f64, months_remaining: Option<u8>) -> Option<f64> {
    match months_remaining? {
        0 => Some(0.0),
        months => safe_div(gap, f64::from(months)),
    }
}

/// Plan for one metric; `None` when there is no budget to chase
pub fn plan_catch_up(snapshot: &MetricSnapshot, base_kind: PeriodKind) -> Option<CatchUpPlan> {
    let target = snapshot.target()?;
    let current = snapshot.to_date();
    let gap = (target - current).max(0.0);
    let months = months_remaining(base_kind);

    Some(CatchUpPlan {
        target,
        current,
        gap,
        months_remaining: months,
        per_month: per_month(gap, months),
        run_rate: safe_div(current, target),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCatchUp {
    pub key: EntityKey,
    pub name: String,
    pub volume: Option<CatchUpPlan>,
    pub amount: Option<CatchUpPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchUpSummary {
    pub volume: Option<CatchUpPlan>,
    pub amount: Option<CatchUpPlan>,
    /// Focus entities behind target on volume or amount, in materiality order
    pub entities: Vec<EntityCatchUp>,
}

pub fn plan_portfolio(
    volume_totals: &MetricSnapshot,
    amount_totals: Option<&MetricSnapshot>,
    focus: &[MaterialEntity],
    base_kind: PeriodKind,
) -> CatchUpSummary {
    let entities = focus
        .iter()
        .map(|entity| EntityCatchUp {
            key: entity.key.clone(),
            name: entity.name.clone(),
            volume: plan_catch_up(&entity.volume, base_kind),
            amount: entity
                .amount
                .as_ref()
                .and_then(|a| plan_catch_up(a, base_kind)),
        })
        .filter(|plan| {
            plan.volume.is_some_and(|p| p.is_behind()) || plan.amount.is_some_and(|p| p.is_behind())
        })
        .collect();

    CatchUpSummary {
        volume: plan_catch_up(volume_totals, base_kind),
        amount: amount_totals.and_then(|a| plan_catch_up(a, base_kind)),
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_remaining_only_for_months() {
        assert_eq!(months_remaining(PeriodKind::Month(3)), Some(9));
        assert_eq!(months_remaining(PeriodKind::Month(12)), Some(0));
        assert_eq!(months_remaining(PeriodKind::Quarter(2)), None);
        assert_eq!(months_remaining(PeriodKind::Half(1)), None);
        assert_eq!(months_remaining(PeriodKind::FullYear), None);
        assert_eq!(months_remaining(PeriodKind::Ytd), None);
    }

    #[test]
    fn test_per_month_boundaries() {
        assert_eq!(per_month(500.0, Some(0)), Some(0.0));
        assert_eq!(per_month(500.0, None), None);
        assert_eq!(per_month(600.0, Some(6)), Some(100.0));
    }

    #[test]
    fn test_plan_prefers_full_year_budget_and_ytd() {
        let snapshot = MetricSnapshot {
            actual: 100.0,
            budget: Some(120.0),
            ytd: Some(550.0),
            fy_budget: Some(1_200.0),
            ..Default::default()
        };
        let plan = plan_catch_up(&snapshot, PeriodKind::Month(6)).unwrap();
        assert_eq!(plan.target, 1_200.0);
        assert_eq!(plan.current, 550.0);
        assert_eq!(plan.gap, 650.0);
        assert_eq!(plan.months_remaining, Some(6));
        assert!((plan.per_month.unwrap() - 650.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ahead_of_target_has_no_gap() {
        let snapshot = MetricSnapshot {
            actual: 300.0,
            budget: Some(200.0),
            ..Default::default()
        };
        let plan = plan_catch_up(&snapshot, PeriodKind::Month(9)).unwrap();
        assert_eq!(plan.gap, 0.0);
        assert_eq!(plan.per_month, Some(0.0));
        assert!(!plan.is_behind());
    }

    #[test]
    fn test_no_budget_no_plan() {
        let snapshot = MetricSnapshot {
            actual: 300.0,
            ..Default::default()
        };
        assert_eq!(plan_catch_up(&snapshot, PeriodKind::Month(9)), None);
    }
}
