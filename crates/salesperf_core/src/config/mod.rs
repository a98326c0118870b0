//! Engine configuration
//!
//! [`AnalyticsPolicy`] carries every business threshold the analyzers use.
//! All fields default, so a policy file only needs the values it overrides:
//!
//! ```yaml
//! materiality:
//!   coverage_target: 0.8
//! concentration:
//!   min_active_entities: 3
//! ```
//!
//! # Builder DSL
//!
//! [`ReportBuilder`] assembles a [`crate::engine::ReportInput`] fluently,
//! mostly for tests and benchmarks:
//!
//! ```ignore
//! let input = ReportBuilder::new()
//!     .actual(2023, PeriodKind::Month(6))
//!     .actual(2024, PeriodKind::Month(6))
//!     .base(1)
//!     .product("Widgets", [100.0, 120.0], [1_000.0, 1_320.0])
//!     .build();
//! ```

mod builder;
mod policy;

pub use builder::ReportBuilder;
pub use policy::{
    AnalyticsPolicy, ConcentrationPolicy, FullYearPolicy, MaterialityPolicy, OutlierPolicy,
    PerformancePolicy, RetentionPolicy,
};
