use std::fmt;

/// Errors raised while turning raw period tokens into a [`crate::model::Period`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownMonthToken(String),
    UnknownPeriodType(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::UnknownMonthToken(token) => {
                write!(f, "unrecognized month token {token:?}")
            }
            PeriodParseError::UnknownPeriodType(token) => {
                write!(f, "unrecognized period type {token:?}")
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}

/// Contract violations that leave nothing meaningful to report on.
///
/// Missing data never produces one of these; it degrades to `None` fields and
/// availability flags on [`crate::findings::Findings`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    EmptySchema,
    BaseIndexOutOfRange { index: usize, len: usize },
    BasePeriodNotFound(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptySchema => write!(f, "column schema has no periods"),
            AnalysisError::BaseIndexOutOfRange { index, len } => {
                write!(
                    f,
                    "base period index {index} is outside the schema ({len} periods)"
                )
            }
            AnalysisError::BasePeriodNotFound(label) => {
                write!(f, "base period {label} is not part of the schema")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Rejected [`crate::config::AnalyticsPolicy`] values
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyError {
    OutOfUnitRange { field: &'static str, value: f64 },
    NotPositive { field: &'static str, value: f64 },
    ZeroCount(&'static str),
    Inverted {
        lower: &'static str,
        upper: &'static str,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::OutOfUnitRange { field, value } => {
                write!(f, "{field} must be within (0, 1], got {value}")
            }
            PolicyError::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            PolicyError::ZeroCount(field) => write!(f, "{field} must be at least 1"),
            PolicyError::Inverted { lower, upper } => {
                write!(f, "{lower} must not exceed {upper}")
            }
        }
    }
}

impl std::error::Error for PolicyError {}
