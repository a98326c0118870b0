//! Price-volume-mix decomposition of a revenue change
//!
//! ```text
//! price  = (Rc - Rp) * Vc
//! volume = (Vc - Vp) * Rp
//! mix    = (Ac - Ap) - (price + volume)
//! ```
//!
//! Mix is the residual, so `price + volume + mix == Ac - Ap` holds by
//! construction.

use serde::{Deserialize, Serialize};

use super::materiality::MaterialEntity;
use super::metrics::MetricSnapshot;
use crate::model::EntityKey;
use crate::safe_math::{ratio_pct, safe_div};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvmEffects {
    pub previous_rate: f64,
    pub current_rate: f64,
    pub rate_change_pct: Option<f64>,
    pub price_effect: f64,
    pub volume_effect: f64,
    pub mix_effect: f64,
    /// `current_amount - previous_amount`
    pub total_change: f64,
}

impl PvmEffects {
    /// Largest of the three effects by magnitude, with its label
    pub fn dominant(&self) -> (&'static str, f64) {
        [
            ("price", self.price_effect),
            ("volume", self.volume_effect),
            ("mix", self.mix_effect),
        ]
        .into_iter()
        .fold(("price", self.price_effect), |best, candidate| {
            if candidate.1.abs() > best.1.abs() {
                candidate
            } else {
                best
            }
        })
    }
}

/// Decompose an amount change. `None` when either period's volume is not
/// positive, since its average rate is undefined.
pub fn decompose(
    current_volume: f64,
    previous_volume: f64,
    current_amount: f64,
    previous_amount: f64,
) -> Option<PvmEffects> {
    let current_rate = safe_div(current_amount, current_volume)?;
    let previous_rate = safe_div(previous_amount, previous_volume)?;

    let total_change = current_amount - previous_amount;
    let price_effect = (current_rate - previous_rate) * current_volume;
    let volume_effect = (current_volume - previous_volume) * previous_rate;
    let mix_effect = total_change - (price_effect + volume_effect);

    Some(PvmEffects {
        previous_rate,
        current_rate,
        rate_change_pct: ratio_pct(current_rate, previous_rate),
        price_effect,
        volume_effect,
        mix_effect,
        total_change,
    })
}

fn decompose_snapshots(volume: &MetricSnapshot, amount: &MetricSnapshot) -> Option<PvmEffects> {
    decompose(
        volume.actual,
        volume.previous_year?,
        amount.actual,
        amount.previous_year?,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPvm {
    pub key: EntityKey,
    pub name: String,
    pub effects: PvmEffects,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PvmSummary {
    /// `None` without an Amount dataset, a prior-year column, or positive volumes
    pub portfolio: Option<PvmEffects>,
    /// Focus entities whose decomposition is defined, in materiality order
    pub entities: Vec<EntityPvm>,
}

/// Portfolio-level and per-focus-entity decomposition against the prior year
pub fn decompose_focus(
    volume_totals: &MetricSnapshot,
    amount_totals: Option<&MetricSnapshot>,
    focus: &[MaterialEntity],
) -> PvmSummary {
    let Some(amount_totals) = amount_totals else {
        return PvmSummary::default();
    };

    let entities = focus
        .iter()
        .filter_map(|entity| {
            let effects = decompose_snapshots(&entity.volume, entity.amount.as_ref()?)?;
            Some(EntityPvm {
                key: entity.key.clone(),
                name: entity.name.clone(),
                effects,
            })
        })
        .collect();

    PvmSummary {
        portfolio: decompose_snapshots(volume_totals, amount_totals),
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_only_change() {
        // Same volume, rate up from 10 to 12
        let effects = decompose(100.0, 100.0, 1_200.0, 1_000.0).unwrap();
        assert!((effects.price_effect - 200.0).abs() < 1e-9);
        assert!(effects.volume_effect.abs() < 1e-9);
        assert!(effects.mix_effect.abs() < 1e-9);
        assert_eq!(effects.dominant().0, "price");
    }

    #[test]
    fn test_volume_only_change() {
        let effects = decompose(150.0, 100.0, 1_500.0, 1_000.0).unwrap();
        assert!(effects.price_effect.abs() < 1e-9);
        assert!((effects.volume_effect - 500.0).abs() < 1e-9);
        assert_eq!(effects.dominant().0, "volume");
    }

    #[test]
    fn test_identity_holds() {
        let cases = [
            (120.0, 100.0, 1_500.0, 1_000.0),
            (80.0, 100.0, 950.0, 1_000.0),
            (3.5, 7.25, 41.0, 19.0),
            (1e6, 2.0, 3e7, 11.0),
        ];
        for (vc, vp, ac, ap) in cases {
            let e = decompose(vc, vp, ac, ap).unwrap();
            let sum = e.price_effect + e.volume_effect + e.mix_effect;
            let tolerance = 1e-9 * (ac - ap).abs().max(1.0);
            assert!(
                (sum - (ac - ap)).abs() <= tolerance,
                "identity broken for {vc},{vp},{ac},{ap}: {sum}"
            );
        }
    }

    #[test]
    fn test_zero_volume_is_unavailable() {
        assert_eq!(decompose(0.0, 100.0, 0.0, 1_000.0), None);
        assert_eq!(decompose(100.0, 0.0, 1_000.0, 0.0), None);
    }
}
