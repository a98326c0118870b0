//! Command-line front-end for the sales performance engine
//!
//! Loads a report input file and an analytics policy, runs
//! [`salesperf_core::analyze_report`] for product groups and customers, and
//! writes the findings as YAML, JSON or a plain-text executive summary.

pub mod data;
pub mod logging;
pub mod report;
pub mod util;

pub use data::{DataDirectory, StorageError, load_report_input};
pub use logging::init_logging;
pub use report::{OutputFormat, SubjectFilter, render};
