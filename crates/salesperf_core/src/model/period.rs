//! Period descriptors and the column schema
//!
//! A report's columns are an ordered list of [`Period`]s. Month tokens such as
//! `"Jun"`, `"Q2"`, `"HY1"`, `"FY"` or `"YTD"` are parsed exactly once, when the
//! schema is built, into a [`PeriodKind`]. Everything downstream matches on the
//! enum instead of re-comparing strings.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::PeriodParseError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Granularity of a period column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// Calendar month, 1..=12
    Month(u8),
    /// Quarter, 1..=4
    Quarter(u8),
    /// Half year, 1..=2
    Half(u8),
    FullYear,
    Ytd,
}

impl PeriodKind {
    /// Calendar month number, only for single-month periods
    #[must_use]
    pub fn month_number(self) -> Option<u8> {
        match self {
            PeriodKind::Month(month) => Some(month),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_full_year(self) -> bool {
        matches!(self, PeriodKind::FullYear)
    }

    /// Last calendar month covered by the period. YTD columns carry no fixed
    /// end; out-of-range payloads such as `Quarter(5)` have none either.
    #[must_use]
    pub fn closing_month(self) -> Option<u8> {
        let month = match self {
            PeriodKind::Month(month) => Some(month),
            PeriodKind::Quarter(quarter) => quarter.checked_mul(3),
            PeriodKind::Half(half) => half.checked_mul(6),
            PeriodKind::FullYear => Some(12),
            PeriodKind::Ytd => None,
        }?;
        (1..=12).contains(&month).then_some(month)
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Month(month) => {
                let label = MONTH_LABELS
                    .get(usize::from(*month).saturating_sub(1))
                    .copied()
                    .unwrap_or("?");
                f.write_str(label)
            }
            PeriodKind::Quarter(quarter) => write!(f, "Q{quarter}"),
            PeriodKind::Half(half) => write!(f, "HY{half}"),
            PeriodKind::FullYear => f.write_str("FY"),
            PeriodKind::Ytd => f.write_str("YTD"),
        }
    }
}

impl FromStr for PeriodKind {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();

        if let Some(month) = parse_month(&token) {
            return Ok(PeriodKind::Month(month));
        }

        match token.as_str() {
            "ytd" => return Ok(PeriodKind::Ytd),
            "year" | "fy" | "fullyear" | "full year" | "full-year" => {
                return Ok(PeriodKind::FullYear);
            }
            _ => {}
        }

        let numbered = |prefix: &str, max: u8| {
            token
                .strip_prefix(prefix)
                .and_then(|rest| rest.parse::<u8>().ok())
                .filter(|n| (1..=max).contains(n))
        };

        if let Some(half) = numbered("hy", 2).or_else(|| numbered("h", 2)) {
            return Ok(PeriodKind::Half(half));
        }
        if let Some(quarter) = numbered("q", 4) {
            return Ok(PeriodKind::Quarter(quarter));
        }

        Err(PeriodParseError::UnknownMonthToken(s.trim().to_string()))
    }
}

fn parse_month(token: &str) -> Option<u8> {
    if let Ok(number) = token.parse::<u8>() {
        return (1..=12).contains(&number).then_some(number);
    }
    MONTH_ABBREVIATIONS
        .iter()
        .zip(MONTH_NAMES.iter())
        .position(|(abbr, name)| token == *abbr || token == *name)
        .map(|i| i as u8 + 1)
}

/// Whether a column holds realized figures or a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodType {
    Actual,
    Budget,
    Forecast,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodType::Actual => "Actual",
            PeriodType::Budget => "Budget",
            PeriodType::Forecast => "Forecast",
        })
    }
}

impl FromStr for PeriodType {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "actual" | "act" | "a" => Ok(PeriodType::Actual),
            "budget" | "bud" | "b" => Ok(PeriodType::Budget),
            "forecast" | "fcst" | "f" => Ok(PeriodType::Forecast),
            _ => Err(PeriodParseError::UnknownPeriodType(s.trim().to_string())),
        }
    }
}

/// Serialized shape of a period: `{ year, month, type }`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPeriod {
    year: i16,
    month: String,
    #[serde(rename = "type")]
    period_type: String,
}

/// One column of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct Period {
    pub year: i16,
    pub kind: PeriodKind,
    pub period_type: PeriodType,
}

impl Period {
    #[must_use]
    pub fn new(year: i16, kind: PeriodKind, period_type: PeriodType) -> Self {
        Self {
            year,
            kind,
            period_type,
        }
    }

    pub fn actual(year: i16, kind: PeriodKind) -> Self {
        Self::new(year, kind, PeriodType::Actual)
    }

    pub fn budget(year: i16, kind: PeriodKind) -> Self {
        Self::new(year, kind, PeriodType::Budget)
    }

    /// Parse from raw `month` / `type` tokens
    pub fn parse(year: i16, month: &str, period_type: &str) -> Result<Self, PeriodParseError> {
        Ok(Self::new(year, month.parse()?, period_type.parse()?))
    }

    #[must_use]
    pub fn is_actual(&self) -> bool {
        self.period_type == PeriodType::Actual
    }

    #[must_use]
    pub fn is_budget(&self) -> bool {
        self.period_type == PeriodType::Budget
    }

    /// Last calendar day covered by this period, if it has a fixed end
    #[must_use]
    pub fn closing_date(&self) -> Option<Date> {
        let month = self.kind.closing_month()?;
        Date::new(self.year, month as i8, 1)
            .ok()
            .map(|first| first.last_of_month())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.year, self.period_type)
    }
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodParseError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Period::parse(raw.year, &raw.month, &raw.period_type)
    }
}

impl From<Period> for RawPeriod {
    fn from(period: Period) -> Self {
        RawPeriod {
            year: period.year,
            month: period.kind.to_string(),
            period_type: period.period_type.to_string(),
        }
    }
}

/// Ordered period columns shared by every entity's value array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSchema {
    periods: Vec<Period>,
}

impl ColumnSchema {
    #[must_use]
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Position of the first period matching `predicate`, in schema order
    pub fn position(&self, predicate: impl Fn(&Period) -> bool) -> Option<usize> {
        self.periods.iter().position(predicate)
    }

    /// Position of an exact period
    pub fn index_of(&self, period: &Period) -> Option<usize> {
        self.position(|p| p == period)
    }
}

impl FromIterator<Period> for ColumnSchema {
    fn from_iter<T: IntoIterator<Item = Period>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_tokens_are_normalized() {
        assert_eq!("Jun".parse::<PeriodKind>(), Ok(PeriodKind::Month(6)));
        assert_eq!(" JUNE ".parse::<PeriodKind>(), Ok(PeriodKind::Month(6)));
        assert_eq!("12".parse::<PeriodKind>(), Ok(PeriodKind::Month(12)));
        assert_eq!("q3".parse::<PeriodKind>(), Ok(PeriodKind::Quarter(3)));
        assert_eq!("HY2".parse::<PeriodKind>(), Ok(PeriodKind::Half(2)));
        assert_eq!("h1".parse::<PeriodKind>(), Ok(PeriodKind::Half(1)));
        assert_eq!("Year".parse::<PeriodKind>(), Ok(PeriodKind::FullYear));
        assert_eq!("Full Year".parse::<PeriodKind>(), Ok(PeriodKind::FullYear));
        assert_eq!("ytd".parse::<PeriodKind>(), Ok(PeriodKind::Ytd));
    }

    #[test]
    fn test_unknown_tokens_are_rejected() {
        assert_eq!(
            "Q5".parse::<PeriodKind>(),
            Err(PeriodParseError::UnknownMonthToken("Q5".to_string()))
        );
        assert!("13".parse::<PeriodKind>().is_err());
        assert_eq!(
            "plan".parse::<PeriodType>(),
            Err(PeriodParseError::UnknownPeriodType("plan".to_string()))
        );
    }

    #[test]
    fn test_period_equality_ignores_token_spelling() {
        let a = Period::parse(2024, "jun", "ACTUAL").unwrap();
        let b = Period::parse(2024, " June", "actual ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_closing_dates() {
        let june = Period::actual(2024, PeriodKind::Month(6));
        assert_eq!(june.closing_date(), Some(jiff::civil::date(2024, 6, 30)));

        let feb = Period::actual(2024, PeriodKind::Month(2));
        assert_eq!(feb.closing_date(), Some(jiff::civil::date(2024, 2, 29)));

        let q3 = Period::actual(2023, PeriodKind::Quarter(3));
        assert_eq!(q3.closing_date(), Some(jiff::civil::date(2023, 9, 30)));

        let fy = Period::budget(2023, PeriodKind::FullYear);
        assert_eq!(fy.closing_date(), Some(jiff::civil::date(2023, 12, 31)));

        let ytd = Period::actual(2023, PeriodKind::Ytd);
        assert_eq!(ytd.closing_date(), None);
    }

    #[test]
    fn test_out_of_range_payloads_have_no_closing_month() {
        assert_eq!(PeriodKind::Quarter(4).closing_month(), Some(12));
        assert_eq!(PeriodKind::Quarter(200).closing_month(), None);
        assert_eq!(PeriodKind::Quarter(5).closing_month(), None);
        assert_eq!(PeriodKind::Half(43).closing_month(), None);
        assert_eq!(PeriodKind::Month(0).closing_month(), None);
        assert_eq!(
            Period::actual(2024, PeriodKind::Half(200)).closing_date(),
            None
        );
    }

    #[test]
    fn test_period_serializes_with_canonical_tokens() {
        let period = Period::parse(2024, "september", "fcst").unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"year":2024,"month":"Sep","type":"Forecast"}"#);

        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn test_schema_lookup() {
        let schema: ColumnSchema = [
            Period::actual(2023, PeriodKind::Month(6)),
            Period::actual(2024, PeriodKind::Month(6)),
            Period::budget(2024, PeriodKind::FullYear),
        ]
        .into_iter()
        .collect();

        assert_eq!(schema.len(), 3);
        assert_eq!(
            schema.index_of(&Period::budget(2024, PeriodKind::FullYear)),
            Some(2)
        );
        assert_eq!(schema.position(|p| p.year == 2022), None);
    }
}
