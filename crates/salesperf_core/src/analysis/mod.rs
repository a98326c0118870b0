//! Analyzers that turn resolved metrics into findings.
//!
//! Every analyzer is a pure function over borrowed inputs. The engine
//! composes them in a fixed order:
//!
//! ```ignore
//! let metrics: Vec<EntityMetrics> = entities.iter().map(|e| EntityMetrics::new(e, &periods, true)).collect();
//! let focus = select_material(&metrics, &totals, &policy.materiality);
//! let categories = categorize(&focus.entities, &policy.performance);
//! let pvm = decompose_focus(&totals, Some(&amount_totals), &focus.entities);
//! let concentration = analyze_concentration(&metrics, &policy.concentration);
//! let retention = analyze_retention(&metrics, &policy.retention);
//! ```
//!
//! Volume is the primary metric: shares, activity, concentration, retention
//! and outliers are all measured on volume. Amount feeds budget variance,
//! PVM and catch-up when the subject carries an Amount dataset.

mod catch_up;
mod categorize;
mod concentration;
mod materiality;
mod metrics;
mod outliers;
mod pvm;
mod retention;
mod summary;

pub use catch_up::*;
pub use categorize::*;
pub use concentration::*;
pub use materiality::*;
pub use metrics::*;
pub use outliers::*;
pub use pvm::*;
pub use retention::*;
pub use summary::*;
