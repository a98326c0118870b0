//! Z-score outliers on the YoY volume growth distribution.

use serde::{Deserialize, Serialize};

use super::metrics::EntityMetrics;
use crate::config::OutlierPolicy;
use crate::model::EntityKey;
use crate::safe_math::safe_div;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierDirection {
    AboveMean,
    BelowMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub key: EntityKey,
    pub name: String,
    pub yoy_pct: f64,
    pub z_score: f64,
    pub direction: OutlierDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Entities with a finite YoY growth rate
    pub sample_size: usize,
    pub mean: Option<f64>,
    /// Population standard deviation
    pub std_dev: Option<f64>,
    pub outliers: Vec<Outlier>,
}

/// Relative tolerance under which a sample counts as having no spread
const SPREAD_EPSILON: f64 = 1e-9;

/// Mean and population standard deviation; `None` for an empty sample.
///
/// A sample whose values all sit within [`SPREAD_EPSILON`] of the mean
/// (relative to its magnitude) has a standard deviation of exactly 0, so
/// rounding in the mean never turns identical values into outliers.
pub fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len() as f64;
    let mean = safe_div(values.iter().sum(), n)?;

    let max_deviation = values
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0_f64, f64::max);
    if max_deviation <= SPREAD_EPSILON * mean.abs().max(1.0) {
        return Some((mean, 0.0));
    }

    let variance = safe_div(values.iter().map(|v| (v - mean).powi(2)).sum(), n)?;
    Some((mean, variance.sqrt()))
}

pub fn detect_outliers(entities: &[EntityMetrics], policy: &OutlierPolicy) -> OutlierSummary {
    let sample: Vec<(&EntityMetrics, f64)> = entities
        .iter()
        .filter_map(|m| m.volume.yoy_pct.map(|pct| (m, pct)))
        .collect();
    let values: Vec<f64> = sample.iter().map(|(_, pct)| *pct).collect();

    let Some((mean, std_dev)) = mean_and_std_dev(&values) else {
        return OutlierSummary::default();
    };

    // A zero spread flags nothing: safe_div rejects the zero denominator
    let outliers = sample
        .iter()
        .filter_map(|(m, pct)| {
            let z_score = safe_div(pct - mean, std_dev)?;
            (z_score.abs() >= policy.z_cutoff).then(|| Outlier {
                key: m.key.clone(),
                name: m.name.clone(),
                yoy_pct: *pct,
                z_score,
                direction: if z_score > 0.0 {
                    OutlierDirection::AboveMean
                } else {
                    OutlierDirection::BelowMean
                },
            })
        })
        .collect();

    OutlierSummary {
        sample_size: values.len(),
        mean: Some(mean),
        std_dev: Some(std_dev),
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std_dev() {
        let (mean, std) = mean_and_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
        assert_eq!(mean_and_std_dev(&[]), None);
    }

    #[test]
    fn test_identical_values_have_zero_spread() {
        let (mean, std) = mean_and_std_dev(&[12.5, 12.5, 12.5]).unwrap();
        assert_eq!(mean, 12.5);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn test_inexact_identical_values_have_zero_spread() {
        let third = 100.0 / 3.0;
        let (mean, std) = mean_and_std_dev(&[third; 7]).unwrap();
        assert!((mean - third).abs() < 1e-12);
        assert_eq!(std, 0.0);

        // Genuine spread well above the tolerance is kept
        let (_, std) = mean_and_std_dev(&[third, third + 1e-3]).unwrap();
        assert!(std > 0.0);
    }
}
