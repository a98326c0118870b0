//! Sales performance analytics library
//!
//! This crate turns period-indexed volume and amount tables into budget,
//! growth, concentration, retention and price-volume-mix findings for two
//! subjects: product groups and customers.
//! It supports:
//! - Period schemas mixing months, quarters, halves, full years and YTD columns
//! - Budget / prior-year / YTD / full-year comparison column resolution with fallbacks
//! - Materiality selection with a coverage target and a focus cap
//! - Mid-year categorization and full-year achievement review
//! - Price / volume / mix decomposition at portfolio and entity level
//! - Concentration, retention and outlier analysis
//! - Catch-up planning against the annual target
//!
//! Every analyzer is a pure function; [`engine::analyze`] composes them into
//! one immutable [`findings::Findings`] per subject.
//!
//! # Builder DSL
//!
//! ```ignore
//! use salesperf_core::{AnalyticsPolicy, ReportBuilder, analyze_report};
//! use salesperf_core::model::PeriodKind;
//!
//! let input = ReportBuilder::new()
//!     .actual(2023, PeriodKind::Month(6))
//!     .actual(2024, PeriodKind::Month(6))
//!     .budget(2024, PeriodKind::Month(6))
//!     .base(1)
//!     .product("Widgets", [100.0, 120.0, 110.0], [1_000.0, 1_320.0, 1_100.0])
//!     .customer("Acme", [100.0, 120.0, 110.0], [1_000.0, 1_320.0, 1_100.0])
//!     .build();
//!
//! let report = analyze_report(&input, &AnalyticsPolicy::default())?;
//! for line in &report.product_groups.summary {
//!     println!("{line}");
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod engine;
pub mod error;
pub mod findings;
pub mod merge;
pub mod periods;
pub mod safe_math;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{AnalyticsPolicy, ReportBuilder};
pub use engine::{Report, ReportInput, SubjectData, SubjectInput, analyze, analyze_report};
pub use error::{AnalysisError, PeriodParseError, PolicyError};
pub use findings::{Findings, Subject};
