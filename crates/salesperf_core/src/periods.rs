//! Resolution of comparison columns relative to the base period
//!
//! Each comparison column is found by walking a fallback chain from the most
//! specific match to the least; the first hit wins. Previous-year has no
//! fallback on purpose: a missing prior year surfaces as "no YoY data".

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::{ColumnSchema, Period, PeriodKind, PeriodType};

/// Column indices resolved for one base period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriods {
    pub base: usize,
    pub budget: Option<usize>,
    pub previous_year: Option<usize>,
    pub ytd_current: Option<usize>,
    pub ytd_previous: Option<usize>,
    pub fy_current: Option<usize>,
    pub fy_previous: Option<usize>,
    pub fy_budget: Option<usize>,
    /// Base period is itself a full-year column (retrospective framing)
    pub is_fy_period: bool,
}

type Rule<'a> = Box<dyn Fn(&Period) -> bool + 'a>;

fn first_match(schema: &ColumnSchema, rules: &[Rule<'_>]) -> Option<usize> {
    rules.iter().find_map(|rule| schema.position(|p| rule(p)))
}

/// Resolve every comparison column for `base_index`
pub fn resolve_periods(
    schema: &ColumnSchema,
    base_index: usize,
) -> Result<ResolvedPeriods, AnalysisError> {
    if schema.is_empty() {
        return Err(AnalysisError::EmptySchema);
    }
    let base = *schema
        .get(base_index)
        .ok_or(AnalysisError::BaseIndexOutOfRange {
            index: base_index,
            len: schema.len(),
        })?;

    let year = base.year;
    // No prior year below the representable range
    let prior = year.checked_sub(1);

    let budget = first_match(
        schema,
        &[
            Box::new(|p: &Period| p.year == year && p.kind == base.kind && p.is_budget()),
            Box::new(|p: &Period| p.year == year && p.kind.is_full_year() && p.is_budget()),
            Box::new(|p: &Period| p.is_budget()),
        ],
    );

    let previous_year = prior.and_then(|y| schema.index_of(&Period::actual(y, base.kind)));

    let ytd_current = if base.kind == PeriodKind::Ytd && base.is_actual() {
        Some(base_index)
    } else {
        schema.index_of(&Period::actual(year, PeriodKind::Ytd))
    };
    let ytd_previous = prior.and_then(|y| schema.index_of(&Period::actual(y, PeriodKind::Ytd)));

    let fy_current = if base.kind.is_full_year() && base.is_actual() {
        Some(base_index)
    } else {
        schema.index_of(&Period::actual(year, PeriodKind::FullYear))
    };
    let fy_previous =
        prior.and_then(|y| schema.index_of(&Period::actual(y, PeriodKind::FullYear)));

    let fy_budget = first_match(
        schema,
        &[
            Box::new(|p: &Period| *p == Period::budget(year, PeriodKind::FullYear)),
            Box::new(|p: &Period| {
                *p == Period::new(year, PeriodKind::FullYear, PeriodType::Forecast)
            }),
        ],
    );

    Ok(ResolvedPeriods {
        base: base_index,
        budget,
        previous_year,
        ytd_current,
        ytd_previous,
        fy_current,
        fy_previous,
        fy_budget,
        is_fy_period: base.kind.is_full_year(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(periods: &[(i16, &str, &str)]) -> ColumnSchema {
        periods
            .iter()
            .map(|(year, month, kind)| Period::parse(*year, month, kind).unwrap())
            .collect()
    }

    #[test]
    fn test_exact_budget_preferred() {
        let schema = schema(&[
            (2024, "FY", "Budget"),
            (2023, "Jun", "Actual"),
            (2024, "Jun", "Actual"),
            (2024, "Jun", "Budget"),
        ]);
        let resolved = resolve_periods(&schema, 2).unwrap();
        assert_eq!(resolved.budget, Some(3));
        assert_eq!(resolved.previous_year, Some(1));
        assert_eq!(resolved.fy_budget, Some(0));
        assert!(!resolved.is_fy_period);
    }

    #[test]
    fn test_budget_falls_back_to_full_year_then_any() {
        let with_fy = schema(&[
            (2023, "Jun", "Budget"),
            (2024, "Jun", "Actual"),
            (2024, "Year", "Budget"),
        ]);
        assert_eq!(resolve_periods(&with_fy, 1).unwrap().budget, Some(2));

        let any_budget = schema(&[(2024, "Jun", "Actual"), (2022, "Q1", "Budget")]);
        assert_eq!(resolve_periods(&any_budget, 0).unwrap().budget, Some(1));

        let no_budget = schema(&[(2024, "Jun", "Actual")]);
        assert_eq!(resolve_periods(&no_budget, 0).unwrap().budget, None);
    }

    #[test]
    fn test_previous_year_has_no_fallback() {
        let schema = schema(&[
            (2023, "May", "Actual"),
            (2023, "FY", "Actual"),
            (2024, "Jun", "Actual"),
        ]);
        let resolved = resolve_periods(&schema, 2).unwrap();
        assert_eq!(resolved.previous_year, None);
        assert_eq!(resolved.fy_previous, Some(1));
    }

    #[test]
    fn test_ytd_and_full_year_columns() {
        let schema = schema(&[
            (2023, "YTD", "Actual"),
            (2024, "YTD", "Actual"),
            (2024, "Jun", "Actual"),
            (2024, "FY", "Forecast"),
        ]);
        let resolved = resolve_periods(&schema, 2).unwrap();
        assert_eq!(resolved.ytd_current, Some(1));
        assert_eq!(resolved.ytd_previous, Some(0));
        assert_eq!(resolved.fy_current, None);
        assert_eq!(resolved.fy_budget, Some(3));
    }

    #[test]
    fn test_full_year_base_switches_framing() {
        let schema = schema(&[
            (2023, "FY", "Actual"),
            (2024, "FY", "Actual"),
            (2024, "FY", "Budget"),
        ]);
        let resolved = resolve_periods(&schema, 1).unwrap();
        assert!(resolved.is_fy_period);
        assert_eq!(resolved.fy_current, Some(1));
        assert_eq!(resolved.previous_year, Some(0));
        assert_eq!(resolved.budget, Some(2));
    }

    #[test]
    fn test_invalid_base_index() {
        let schema = schema(&[(2024, "Jun", "Actual")]);
        assert_eq!(
            resolve_periods(&schema, 3),
            Err(AnalysisError::BaseIndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            resolve_periods(&ColumnSchema::default(), 0),
            Err(AnalysisError::EmptySchema)
        );
    }

    #[test]
    fn test_earliest_year_has_no_previous_year() {
        let schema: ColumnSchema = [
            Period::actual(i16::MIN, PeriodKind::Month(6)),
            Period::actual(i16::MIN, PeriodKind::Ytd),
        ]
        .into_iter()
        .collect();

        let resolved = resolve_periods(&schema, 0).unwrap();
        assert_eq!(resolved.previous_year, None);
        assert_eq!(resolved.ytd_current, Some(1));
        assert_eq!(resolved.ytd_previous, None);
    }
}
