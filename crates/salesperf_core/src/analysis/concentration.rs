//! Top-N volume concentration among active entities.

use serde::{Deserialize, Serialize};

use super::metrics::EntityMetrics;
use crate::config::ConcentrationPolicy;
use crate::model::RiskLevel;
use crate::safe_math::{safe_div, share};

/// Number of leading entities named in the summary
const TOP_NAMED: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationSummary {
    /// Entities with positive base-period volume
    pub active_count: usize,
    pub total_volume: f64,
    pub top1_share: f64,
    pub top3_share: f64,
    pub top5_share: f64,
    /// Herfindahl index on a 0..=1 scale (informational, not used for the risk tier)
    pub hhi: f64,
    pub avg_volume_per_entity: Option<f64>,
    /// Active entities per 1,000 volume units
    pub entities_per_thousand: Option<f64>,
    /// Largest entities by volume, up to five
    pub top_entities: Vec<String>,
    pub risk: RiskLevel,
}

/// Risk tier, first matching rule wins
pub fn classify_concentration(
    active_count: usize,
    top1_share: f64,
    top3_share: f64,
    policy: &ConcentrationPolicy,
) -> RiskLevel {
    if active_count <= policy.min_active_entities || top1_share >= policy.high_top1_share {
        RiskLevel::High
    } else if top1_share >= policy.medium_top1_share || top3_share >= policy.medium_top3_share {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn analyze_concentration(
    entities: &[EntityMetrics],
    policy: &ConcentrationPolicy,
) -> ConcentrationSummary {
    let mut active: Vec<(&str, f64)> = entities
        .iter()
        .filter(|m| m.is_active())
        .map(|m| (m.name.as_str(), m.volume.actual))
        .collect();
    active.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total_volume: f64 = active.iter().map(|(_, v)| v).sum();
    let top_share = |n: usize| {
        let top: f64 = active.iter().take(n).map(|(_, v)| v).sum();
        share(top, total_volume)
    };

    let active_count = active.len();
    let top1_share = top_share(1);
    let top3_share = top_share(3);
    let top5_share = top_share(5);

    let hhi: f64 = active
        .iter()
        .map(|(_, v)| share(*v, total_volume).powi(2))
        .sum();

    ConcentrationSummary {
        active_count,
        total_volume,
        top1_share,
        top3_share,
        top5_share,
        hhi,
        avg_volume_per_entity: safe_div(total_volume, active_count as f64),
        entities_per_thousand: safe_div(active_count as f64 * 1_000.0, total_volume),
        top_entities: active
            .iter()
            .take(TOP_NAMED)
            .map(|(name, _)| (*name).to_string())
            .collect(),
        risk: classify_concentration(active_count, top1_share, top3_share, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_few_entities_always_high() {
        let policy = ConcentrationPolicy::default();
        for count in 0..=5 {
            assert_eq!(
                classify_concentration(count, 0.01, 0.02, &policy),
                RiskLevel::High
            );
        }
    }

    #[test]
    fn test_tiers_in_order() {
        let policy = ConcentrationPolicy::default();
        assert_eq!(classify_concentration(20, 0.55, 0.6, &policy), RiskLevel::High);
        assert_eq!(classify_concentration(20, 0.35, 0.6, &policy), RiskLevel::Medium);
        assert_eq!(classify_concentration(20, 0.20, 0.85, &policy), RiskLevel::Medium);
        assert_eq!(classify_concentration(20, 0.20, 0.50, &policy), RiskLevel::Low);
    }
}
