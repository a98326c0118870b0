//! Engine entry points: one subject at a time, or a whole report.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{
    EntityMetrics, MetricSnapshot, Performance, SummaryInputs, analyze_concentration,
    analyze_retention, categorize, decompose_focus, detect_outliers, plan_portfolio,
    review_full_year, select_material, summarize,
};
use crate::config::AnalyticsPolicy;
use crate::error::AnalysisError;
use crate::findings::{Availability, Dataset, Findings, PortfolioTotals, SchemaMismatch, Subject};
use crate::merge::{MergeRule, apply_merge_rules};
use crate::model::{ColumnSchema, EntityRecord, Period, join_datasets};
use crate::periods::resolve_periods;

/// Borrowed inputs for analyzing one subject
#[derive(Debug, Clone, Copy)]
pub struct SubjectInput<'a> {
    pub subject: Subject,
    pub schema: &'a ColumnSchema,
    pub base_index: usize,
    pub volume: &'a [EntityRecord],
    /// Empty when the subject has no Amount dataset
    pub amount: &'a [EntityRecord],
}

fn schema_mismatches(
    dataset: Dataset,
    records: &[EntityRecord],
    expected: usize,
) -> Vec<SchemaMismatch> {
    records
        .iter()
        .filter(|r| r.values.len() != expected)
        .map(|r| {
            warn!(
                dataset = ?dataset,
                entity = %r.name,
                expected,
                actual = r.values.len(),
                "value row length does not match the column schema"
            );
            SchemaMismatch {
                dataset,
                entity: r.name.clone(),
                expected,
                actual: r.values.len(),
            }
        })
        .collect()
}

/// Analyze one subject at `input.base_index`.
///
/// Fails only when the schema is empty or the base index lies outside it.
pub fn analyze(
    input: &SubjectInput<'_>,
    policy: &AnalyticsPolicy,
) -> Result<Findings, AnalysisError> {
    let periods = resolve_periods(input.schema, input.base_index)?;
    let base_period = *input
        .schema
        .get(periods.base)
        .ok_or(AnalysisError::BaseIndexOutOfRange {
            index: periods.base,
            len: input.schema.len(),
        })?;

    let has_amount = !input.amount.is_empty();
    let mut availability = Availability::new(&periods, has_amount);
    let columns = input.schema.len();
    availability.schema_mismatches = schema_mismatches(Dataset::Volume, input.volume, columns);
    availability
        .schema_mismatches
        .extend(schema_mismatches(Dataset::Amount, input.amount, columns));

    let entities = join_datasets(input.volume, input.amount);
    let metrics: Vec<EntityMetrics> = entities
        .iter()
        .map(|e| EntityMetrics::new(e, &periods, has_amount))
        .collect();

    let volume_rows: Vec<&[f64]> = entities.iter().map(|e| e.volume.as_slice()).collect();
    let amount_rows: Vec<&[f64]> = entities.iter().map(|e| e.amount.as_slice()).collect();
    let totals = PortfolioTotals {
        entity_count: entities.len(),
        volume: MetricSnapshot::for_portfolio(&volume_rows, &periods),
        amount: has_amount.then(|| MetricSnapshot::for_portfolio(&amount_rows, &periods)),
    };

    let focus = select_material(&metrics, &totals.volume, &policy.materiality);
    debug!(
        subject = %input.subject,
        base = %base_period,
        entities = entities.len(),
        candidates = focus.candidate_count,
        focus = focus.len(),
        coverage = focus.coverage,
        "materiality selection"
    );

    let performance = if periods.is_fy_period {
        Performance::FullYear(review_full_year(&focus.entities, &policy.full_year))
    } else {
        Performance::MidYear(categorize(&focus.entities, &policy.performance))
    };
    let pvm = decompose_focus(&totals.volume, totals.amount.as_ref(), &focus.entities);
    let concentration = analyze_concentration(&metrics, &policy.concentration);
    let retention = analyze_retention(&metrics, &policy.retention);
    let outliers = detect_outliers(&metrics, &policy.outliers);
    let catch_up = plan_portfolio(
        &totals.volume,
        totals.amount.as_ref(),
        &focus.entities,
        base_period.kind,
    );

    let summary = summarize(&SummaryInputs {
        subject_label: input.subject.label(),
        base_period: &base_period,
        volume: &totals.volume,
        amount: totals.amount.as_ref(),
        performance: &performance,
        pvm: &pvm,
        concentration: &concentration,
        retention: &retention,
        outliers: &outliers,
        catch_up: &catch_up,
        list_items: policy.summary_list_items,
    });

    Ok(Findings {
        subject: input.subject,
        base_period,
        closing_date: base_period.closing_date(),
        periods,
        availability,
        totals,
        focus,
        performance,
        pvm,
        concentration,
        retention,
        outliers,
        catch_up,
        summary,
    })
}

// ============================================================================
// Report (both subjects)
// ============================================================================

/// Volume/Amount datasets for one subject, plus optional merge rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectData {
    #[serde(default)]
    pub volume: Vec<EntityRecord>,
    #[serde(default)]
    pub amount: Vec<EntityRecord>,
    #[serde(default)]
    pub merge_rules: Vec<MergeRule>,
}

impl SubjectData {
    pub fn new(volume: Vec<EntityRecord>, amount: Vec<EntityRecord>) -> Self {
        Self {
            volume,
            amount,
            merge_rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_merge_rule(mut self, rule: MergeRule) -> Self {
        self.merge_rules.push(rule);
        self
    }

    /// Datasets with merge rules applied to both
    fn merged(&self) -> (Vec<EntityRecord>, Vec<EntityRecord>) {
        (
            apply_merge_rules(&self.volume, &self.merge_rules),
            apply_merge_rules(&self.amount, &self.merge_rules),
        )
    }
}

/// Complete report input: one schema shared by both subjects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    pub schema: ColumnSchema,
    /// Explicit base column index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_index: Option<usize>,
    /// Base column by period; takes precedence over `base_index`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_period: Option<Period>,
    #[serde(default)]
    pub product_groups: SubjectData,
    #[serde(default)]
    pub customers: SubjectData,
}

impl ReportInput {
    /// Base column: `base_period` if set, else `base_index`, else the last Actual column
    pub fn resolve_base(&self) -> Result<usize, AnalysisError> {
        if self.schema.is_empty() {
            return Err(AnalysisError::EmptySchema);
        }
        if let Some(period) = &self.base_period {
            return self
                .schema
                .index_of(period)
                .ok_or_else(|| AnalysisError::BasePeriodNotFound(period.to_string()));
        }
        if let Some(index) = self.base_index {
            return Ok(index);
        }
        self.schema
            .periods()
            .iter()
            .rposition(Period::is_actual)
            .ok_or_else(|| AnalysisError::BasePeriodNotFound("latest actual".to_string()))
    }
}

/// Findings for both subjects of one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub product_groups: Findings,
    pub customers: Findings,
}

fn analyze_subject(
    subject: Subject,
    data: &SubjectData,
    schema: &ColumnSchema,
    base_index: usize,
    policy: &AnalyticsPolicy,
) -> Result<Findings, AnalysisError> {
    let (volume, amount) = data.merged();
    analyze(
        &SubjectInput {
            subject,
            schema,
            base_index,
            volume: &volume,
            amount: &amount,
        },
        policy,
    )
}

/// Analyze both subjects. They are independent and run in parallel when the
/// `parallel` feature is enabled.
pub fn analyze_report(
    input: &ReportInput,
    policy: &AnalyticsPolicy,
) -> Result<Report, AnalysisError> {
    let base_index = input.resolve_base()?;
    let run = |subject: Subject, data: &SubjectData| {
        analyze_subject(subject, data, &input.schema, base_index, policy)
    };

    #[cfg(feature = "parallel")]
    let (product_groups, customers) = rayon::join(
        || run(Subject::ProductGroups, &input.product_groups),
        || run(Subject::Customers, &input.customers),
    );

    #[cfg(not(feature = "parallel"))]
    let (product_groups, customers) = (
        run(Subject::ProductGroups, &input.product_groups),
        run(Subject::Customers, &input.customers),
    );

    Ok(Report {
        product_groups: product_groups?,
        customers: customers?,
    })
}
