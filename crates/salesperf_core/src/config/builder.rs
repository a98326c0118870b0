//! Report Builder
//!
//! The ReportBuilder provides a fluent API for assembling a [`ReportInput`]
//! column by column and entity by entity, without writing value arrays for
//! both datasets by hand.
//!
//! # Example
//!
//! ```ignore
//! use salesperf_core::config::ReportBuilder;
//! use salesperf_core::model::PeriodKind;
//!
//! let input = ReportBuilder::new()
//!     .actual(2023, PeriodKind::Month(6))
//!     .actual(2024, PeriodKind::Month(6))
//!     .budget(2024, PeriodKind::FullYear)
//!     .base(1)
//!     .product("Widgets", [100.0, 120.0, 300.0], [1_000.0, 1_320.0, 3_300.0])
//!     .customer_volume("Acme", [40.0, 55.0, 90.0])
//!     .build();
//! ```

use crate::engine::{ReportInput, SubjectData};
use crate::merge::MergeRule;
use crate::model::{EntityRecord, Period, PeriodKind, PeriodType};

/// Builder for report inputs
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    input: ReportInput,
}

fn push_row(data: &mut SubjectData, name: &str, volume: Vec<f64>, amount: Option<Vec<f64>>) {
    data.volume.push(EntityRecord::new(name, volume));
    if let Some(amount) = amount {
        data.amount.push(EntityRecord::new(name, amount));
    }
}

impl ReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Append a column
    #[must_use]
    pub fn period(mut self, period: Period) -> Self {
        let mut periods = self.input.schema.periods().to_vec();
        periods.push(period);
        self.input.schema = periods.into_iter().collect();
        self
    }

    #[must_use]
    pub fn actual(self, year: i16, kind: PeriodKind) -> Self {
        self.period(Period::new(year, kind, PeriodType::Actual))
    }

    #[must_use]
    pub fn budget(self, year: i16, kind: PeriodKind) -> Self {
        self.period(Period::new(year, kind, PeriodType::Budget))
    }

    #[must_use]
    pub fn forecast(self, year: i16, kind: PeriodKind) -> Self {
        self.period(Period::new(year, kind, PeriodType::Forecast))
    }

    /// Base column by index
    #[must_use]
    pub fn base(mut self, index: usize) -> Self {
        self.input.base_index = Some(index);
        self
    }

    /// Base column by period
    #[must_use]
    pub fn base_period(mut self, period: Period) -> Self {
        self.input.base_period = Some(period);
        self
    }

    // =========================================================================
    // Product groups
    // =========================================================================

    /// Add a product group with both volume and amount rows
    #[must_use]
    pub fn product(
        mut self,
        name: &str,
        volume: impl Into<Vec<f64>>,
        amount: impl Into<Vec<f64>>,
    ) -> Self {
        push_row(
            &mut self.input.product_groups,
            name,
            volume.into(),
            Some(amount.into()),
        );
        self
    }

    /// Add a product group with a volume row only
    #[must_use]
    pub fn product_volume(mut self, name: &str, volume: impl Into<Vec<f64>>) -> Self {
        push_row(&mut self.input.product_groups, name, volume.into(), None);
        self
    }

    #[must_use]
    pub fn product_merge(mut self, rule: MergeRule) -> Self {
        self.input.product_groups.merge_rules.push(rule);
        self
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Add a customer with both volume and amount rows
    #[must_use]
    pub fn customer(
        mut self,
        name: &str,
        volume: impl Into<Vec<f64>>,
        amount: impl Into<Vec<f64>>,
    ) -> Self {
        push_row(
            &mut self.input.customers,
            name,
            volume.into(),
            Some(amount.into()),
        );
        self
    }

    /// Add a customer with a volume row only
    #[must_use]
    pub fn customer_volume(mut self, name: &str, volume: impl Into<Vec<f64>>) -> Self {
        push_row(&mut self.input.customers, name, volume.into(), None);
        self
    }

    #[must_use]
    pub fn customer_merge(mut self, rule: MergeRule) -> Self {
        self.input.customers.merge_rules.push(rule);
        self
    }

    #[must_use]
    pub fn build(self) -> ReportInput {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_insertion_order() {
        let input = ReportBuilder::new()
            .actual(2023, PeriodKind::Month(6))
            .actual(2024, PeriodKind::Month(6))
            .budget(2024, PeriodKind::FullYear)
            .base(1)
            .build();

        assert_eq!(input.schema.len(), 3);
        assert_eq!(
            input.schema.get(2),
            Some(&Period::budget(2024, PeriodKind::FullYear))
        );
        assert_eq!(input.resolve_base(), Ok(1));
    }

    #[test]
    fn test_volume_only_rows_leave_amount_empty() {
        let input = ReportBuilder::new()
            .actual(2024, PeriodKind::Month(1))
            .product_volume("Widgets", [5.0])
            .customer("Acme", [1.0], [10.0])
            .build();

        assert_eq!(input.product_groups.volume.len(), 1);
        assert!(input.product_groups.amount.is_empty());
        assert_eq!(input.customers.amount.len(), 1);
    }
}
