//! The engine's output snapshot.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    CatchUpSummary, ConcentrationSummary, MaterialitySelection, MetricSnapshot, OutlierSummary,
    Performance, PvmSummary, RetentionSummary,
};
use crate::model::Period;
use crate::periods::ResolvedPeriods;

/// Which rendering surface a set of findings belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    ProductGroups,
    Customers,
}

impl Subject {
    pub fn label(self) -> &'static str {
        match self {
            Subject::ProductGroups => "product groups",
            Subject::Customers => "customers",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Volume,
    Amount,
}

/// A record whose value array does not match the schema length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMismatch {
    pub dataset: Dataset,
    pub entity: String,
    pub expected: usize,
    pub actual: usize,
}

/// What the input could support. Missing data never fails the analysis;
/// it shows up here and as `None` fields downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub has_budget: bool,
    pub has_previous_year: bool,
    pub has_ytd: bool,
    pub has_fy_budget: bool,
    pub has_amount: bool,
    pub schema_mismatches: Vec<SchemaMismatch>,
}

impl Availability {
    pub fn new(periods: &ResolvedPeriods, has_amount: bool) -> Self {
        Self {
            has_budget: periods.budget.is_some(),
            has_previous_year: periods.previous_year.is_some(),
            has_ytd: periods.ytd_current.is_some(),
            has_fy_budget: periods.fy_budget.is_some(),
            has_amount,
            schema_mismatches: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Joined entities, active or not
    pub entity_count: usize,
    pub volume: MetricSnapshot,
    pub amount: Option<MetricSnapshot>,
}

/// Immutable result of analyzing one subject at one base period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub subject: Subject,
    pub base_period: Period,
    /// Last calendar day the base period covers
    pub closing_date: Option<Date>,
    pub periods: ResolvedPeriods,
    pub availability: Availability,
    pub totals: PortfolioTotals,
    pub focus: MaterialitySelection,
    pub performance: Performance,
    pub pvm: PvmSummary,
    pub concentration: ConcentrationSummary,
    pub retention: RetentionSummary,
    pub outliers: OutlierSummary,
    pub catch_up: CatchUpSummary,
    pub summary: Vec<String>,
}

impl Findings {
    /// Base period is a full-year column
    pub fn is_full_year(&self) -> bool {
        self.periods.is_fy_period
    }
}
