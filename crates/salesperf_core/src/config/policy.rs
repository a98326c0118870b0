//! Business policy injected into the engine
//!
//! None of these numbers are algorithmic constants; they are the reporting
//! policy a business happens to use. Every field has a default so a policy file
//! only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Materiality selection: which entities deserve individual attention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialityPolicy {
    /// Entities below this budget share are only admitted until coverage is met
    pub min_share: f64,
    /// Cumulative budget share the focus list must reach
    pub coverage_target: f64,
    /// Hard cap on the focus list length
    pub max_focus_items: usize,
}

impl Default for MaterialityPolicy {
    fn default() -> Self {
        Self {
            min_share: 0.05,
            coverage_target: 0.70,
            max_focus_items: 10,
        }
    }
}

/// Variance bands (in percent) for mid-year categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformancePolicy {
    pub underperf_volume_pct: f64,
    pub underperf_amount_pct: f64,
    pub underperf_yoy_pct: f64,
    pub growth_volume_pct: f64,
    pub growth_amount_pct: f64,
    pub growth_yoy_pct: f64,
}

impl Default for PerformancePolicy {
    fn default() -> Self {
        Self {
            underperf_volume_pct: -15.0,
            underperf_amount_pct: -15.0,
            underperf_yoy_pct: -10.0,
            growth_volume_pct: 15.0,
            growth_amount_pct: 15.0,
            growth_yoy_pct: 10.0,
        }
    }
}

/// Full-year retrospective grading and next-year target recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullYearPolicy {
    /// Achievement ratio (actual / FY budget) at which an entity is a strong performer
    pub strong_achievement: f64,
    pub strong_growth_min: f64,
    pub strong_growth_max: f64,
    /// Upper bound on the growth recommended to an underperformer
    pub recovery_cap: f64,
    /// Achievement level an underperformer's recommendation aims back toward
    pub recovery_ceiling: f64,
}

impl Default for FullYearPolicy {
    fn default() -> Self {
        Self {
            strong_achievement: 0.95,
            strong_growth_min: 0.05,
            strong_growth_max: 0.10,
            recovery_cap: 0.15,
            recovery_ceiling: 1.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentrationPolicy {
    /// At or below this many active entities the portfolio is always HIGH risk
    pub min_active_entities: usize,
    pub high_top1_share: f64,
    pub medium_top1_share: f64,
    pub medium_top3_share: f64,
}

impl Default for ConcentrationPolicy {
    fn default() -> Self {
        Self {
            min_active_entities: 5,
            high_top1_share: 0.50,
            medium_top1_share: 0.30,
            medium_top3_share: 0.80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub high_churn: f64,
    pub medium_churn: f64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            high_churn: 0.30,
            medium_churn: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierPolicy {
    /// Absolute z-score at which a growth rate is flagged
    pub z_cutoff: f64,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        Self { z_cutoff: 2.0 }
    }
}

/// Everything the engine treats as configurable policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsPolicy {
    pub materiality: MaterialityPolicy,
    pub performance: PerformancePolicy,
    pub full_year: FullYearPolicy,
    pub concentration: ConcentrationPolicy,
    pub retention: RetentionPolicy,
    pub outliers: OutlierPolicy,
    /// Maximum entities named per line of the executive summary
    pub summary_list_items: usize,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            materiality: MaterialityPolicy::default(),
            performance: PerformancePolicy::default(),
            full_year: FullYearPolicy::default(),
            concentration: ConcentrationPolicy::default(),
            retention: RetentionPolicy::default(),
            outliers: OutlierPolicy::default(),
            summary_list_items: 3,
        }
    }
}

impl AnalyticsPolicy {
    /// Set the coverage target for the materiality selection
    #[must_use]
    pub fn with_coverage_target(mut self, coverage: f64) -> Self {
        self.materiality.coverage_target = coverage;
        self
    }

    #[must_use]
    pub fn with_max_focus_items(mut self, max: usize) -> Self {
        self.materiality.max_focus_items = max;
        self
    }

    #[must_use]
    pub fn with_min_share(mut self, min_share: f64) -> Self {
        self.materiality.min_share = min_share;
        self
    }

    /// Check that the policy describes something the engine can apply
    pub fn validate(&self) -> Result<(), PolicyError> {
        unit_range("materiality.coverage_target", self.materiality.coverage_target)?;
        unit_range("materiality.min_share", self.materiality.min_share)?;
        if self.materiality.max_focus_items == 0 {
            return Err(PolicyError::ZeroCount("materiality.max_focus_items"));
        }

        let perf = &self.performance;
        for (lower, upper, low, high) in [
            (
                "performance.underperf_volume_pct",
                "performance.growth_volume_pct",
                perf.underperf_volume_pct,
                perf.growth_volume_pct,
            ),
            (
                "performance.underperf_amount_pct",
                "performance.growth_amount_pct",
                perf.underperf_amount_pct,
                perf.growth_amount_pct,
            ),
            (
                "performance.underperf_yoy_pct",
                "performance.growth_yoy_pct",
                perf.underperf_yoy_pct,
                perf.growth_yoy_pct,
            ),
        ] {
            if low > high {
                return Err(PolicyError::Inverted { lower, upper });
            }
        }

        let fy = &self.full_year;
        positive("full_year.strong_achievement", fy.strong_achievement)?;
        positive("full_year.recovery_ceiling", fy.recovery_ceiling)?;
        if fy.strong_growth_min > fy.strong_growth_max {
            return Err(PolicyError::Inverted {
                lower: "full_year.strong_growth_min",
                upper: "full_year.strong_growth_max",
            });
        }

        let conc = &self.concentration;
        unit_range("concentration.high_top1_share", conc.high_top1_share)?;
        unit_range("concentration.medium_top1_share", conc.medium_top1_share)?;
        unit_range("concentration.medium_top3_share", conc.medium_top3_share)?;

        unit_range("retention.high_churn", self.retention.high_churn)?;
        unit_range("retention.medium_churn", self.retention.medium_churn)?;
        if self.retention.medium_churn > self.retention.high_churn {
            return Err(PolicyError::Inverted {
                lower: "retention.medium_churn",
                upper: "retention.high_churn",
            });
        }

        positive("outliers.z_cutoff", self.outliers.z_cutoff)?;

        if self.summary_list_items == 0 {
            return Err(PolicyError::ZeroCount("summary_list_items"));
        }
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), PolicyError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(PolicyError::OutOfUnitRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), PolicyError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PolicyError::NotPositive { field, value })
    }
}
