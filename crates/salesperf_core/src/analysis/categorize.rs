//! Performance categorization of the focus list
//!
//! Mid-year reports bucket entities by variance bands; full-year reports grade
//! achievement against the annual budget and recommend next year's growth.

use serde::{Deserialize, Serialize};

use super::materiality::MaterialEntity;
use crate::config::{FullYearPolicy, PerformancePolicy};
use crate::model::EntityKey;
use crate::safe_math::safe_div;

/// A single threshold an entity crossed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", content = "pct", rename_all = "snake_case")]
pub enum Breach {
    VolumeVsBudget(f64),
    AmountVsBudget(f64),
    YoyVolume(f64),
}

impl Breach {
    pub fn pct(self) -> f64 {
        match self {
            Breach::VolumeVsBudget(pct) | Breach::AmountVsBudget(pct) | Breach::YoyVolume(pct) => {
                pct
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Breach::VolumeVsBudget(_) => "volume vs budget",
            Breach::AmountVsBudget(_) => "amount vs budget",
            Breach::YoyVolume(_) => "volume YoY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedEntity {
    pub key: EntityKey,
    pub name: String,
    pub materiality_score: f64,
    /// Thresholds crossed; empty for stable entities
    pub breaches: Vec<Breach>,
}

/// Mid-year buckets, each in materiality order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCategories {
    pub growth_drivers: Vec<CategorizedEntity>,
    pub underperformers: Vec<CategorizedEntity>,
    pub stable: Vec<CategorizedEntity>,
}

fn variances(entity: &MaterialEntity) -> [(Option<f64>, fn(f64) -> Breach); 3] {
    [
        (entity.volume.vs_budget_pct, Breach::VolumeVsBudget),
        (
            entity.amount.as_ref().and_then(|a| a.vs_budget_pct),
            Breach::AmountVsBudget,
        ),
        (entity.volume.yoy_pct, Breach::YoyVolume),
    ]
}

/// Underperformance is checked first: an entity crossing both bands is an underperformer.
pub fn categorize(focus: &[MaterialEntity], policy: &PerformancePolicy) -> PerformanceCategories {
    let under = [
        policy.underperf_volume_pct,
        policy.underperf_amount_pct,
        policy.underperf_yoy_pct,
    ];
    let growth = [
        policy.growth_volume_pct,
        policy.growth_amount_pct,
        policy.growth_yoy_pct,
    ];

    let mut categories = PerformanceCategories::default();

    for entity in focus {
        let checks = variances(entity);

        let below: Vec<Breach> = checks
            .iter()
            .zip(under)
            .filter_map(|((value, breach), limit)| value.filter(|v| *v <= limit).map(breach))
            .collect();
        let above: Vec<Breach> = checks
            .iter()
            .zip(growth)
            .filter_map(|((value, breach), limit)| value.filter(|v| *v >= limit).map(breach))
            .collect();

        let categorized = |breaches| CategorizedEntity {
            key: entity.key.clone(),
            name: entity.name.clone(),
            materiality_score: entity.materiality_score,
            breaches,
        };

        if !below.is_empty() {
            categories.underperformers.push(categorized(below));
        } else if !above.is_empty() {
            categories.growth_drivers.push(categorized(above));
        } else {
            categories.stable.push(categorized(Vec::new()));
        }
    }

    categories
}

/// Recommended next-year growth, as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullYearAssessment {
    pub key: EntityKey,
    pub name: String,
    pub actual: f64,
    pub target: Option<f64>,
    /// `actual / target`
    pub achievement: Option<f64>,
    pub recommended_growth: Option<GrowthRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullYearReview {
    pub strong_performers: Vec<FullYearAssessment>,
    pub underperformers: Vec<FullYearAssessment>,
    /// No positive full-year or period budget to grade against
    pub unrated: Vec<FullYearAssessment>,
}

/// Grade the focus list against the annual budget
pub fn review_full_year(focus: &[MaterialEntity], policy: &FullYearPolicy) -> FullYearReview {
    let mut review = FullYearReview::default();

    for entity in focus {
        let actual = entity.volume.fy_actual.unwrap_or(entity.volume.actual);
        let target = entity.volume.target();
        let achievement = target.and_then(|t| safe_div(actual, t));

        let mut assessment = FullYearAssessment {
            key: entity.key.clone(),
            name: entity.name.clone(),
            actual,
            target,
            achievement,
            recommended_growth: None,
        };

        match achievement {
            Some(ratio) if ratio >= policy.strong_achievement => {
                assessment.recommended_growth = Some(GrowthRange {
                    min: policy.strong_growth_min,
                    max: policy.strong_growth_max,
                });
                review.strong_performers.push(assessment);
            }
            Some(ratio) => {
                let growth = policy
                    .recovery_cap
                    .min(policy.recovery_ceiling - ratio)
                    .max(0.0);
                assessment.recommended_growth = Some(GrowthRange {
                    min: growth,
                    max: growth,
                });
                review.underperformers.push(assessment);
            }
            None => review.unrated.push(assessment),
        }
    }

    review
}

/// Categorization in the framing that matches the base period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Performance {
    MidYear(PerformanceCategories),
    FullYear(FullYearReview),
}
