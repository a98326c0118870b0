//! Executive-summary lines derived from the other analyzers' outputs.

use super::catch_up::{CatchUpPlan, CatchUpSummary};
use super::categorize::{CategorizedEntity, FullYearAssessment, Performance};
use super::concentration::ConcentrationSummary;
use super::metrics::MetricSnapshot;
use super::outliers::OutlierSummary;
use super::pvm::PvmSummary;
use super::retention::RetentionSummary;
use crate::model::Period;

/// Borrowed view over everything the summary reads
pub struct SummaryInputs<'a> {
    pub subject_label: &'a str,
    pub base_period: &'a Period,
    pub volume: &'a MetricSnapshot,
    pub amount: Option<&'a MetricSnapshot>,
    pub performance: &'a Performance,
    pub pvm: &'a PvmSummary,
    pub concentration: &'a ConcentrationSummary,
    pub retention: &'a RetentionSummary,
    pub outliers: &'a OutlierSummary,
    pub catch_up: &'a CatchUpSummary,
    pub list_items: usize,
}

fn join_names(names: impl Iterator<Item = String>, limit: usize, total: usize) -> String {
    let mut joined = names.take(limit).collect::<Vec<_>>().join(", ");
    if total > limit {
        joined.push_str(&format!(" and {} more", total - limit));
    }
    joined
}

fn describe_breaches(entity: &CategorizedEntity) -> String {
    let details = entity
        .breaches
        .iter()
        .map(|b| format!("{:+.1}% {}", b.pct(), b.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({details})", entity.name)
}

fn describe_assessment(assessment: &FullYearAssessment) -> String {
    let achieved = assessment
        .achievement
        .map_or_else(|| "n/a".to_string(), |a| format!("{:.0}%", a * 100.0));
    match assessment.recommended_growth {
        Some(range) if (range.max - range.min).abs() > f64::EPSILON => format!(
            "{} ({achieved} achieved, next-year target +{:.0}% to +{:.0}%)",
            assessment.name,
            range.min * 100.0,
            range.max * 100.0
        ),
        Some(range) => format!(
            "{} ({achieved} achieved, next-year target +{:.0}%)",
            assessment.name,
            range.min * 100.0
        ),
        None => format!("{} ({achieved} achieved)", assessment.name),
    }
}

fn variance_line(metric: &str, snapshot: &MetricSnapshot) -> Option<String> {
    let budget = snapshot.budget?;
    Some(match snapshot.vs_budget_pct {
        Some(pct) => format!(
            "{metric} is {pct:+.1}% vs budget ({:.0} actual against {budget:.0}).",
            snapshot.actual
        ),
        None => format!(
            "{metric} of {:.0} has no positive budget to compare against.",
            snapshot.actual
        ),
    })
}

fn catch_up_line(metric: &str, plan: Option<&CatchUpPlan>) -> Option<String> {
    let plan = plan?;
    if !plan.is_behind() {
        return Some(format!(
            "{metric} is at or above its annual target ({:.0} of {:.0}).",
            plan.current, plan.target
        ));
    }
    let pace = plan
        .run_rate
        .map_or_else(String::new, |r| format!(", {:.0}% achieved", r * 100.0));
    Some(match (plan.months_remaining, plan.per_month) {
        (Some(0), _) => format!(
            "{metric} gap of {:.0} must be closed now; no months remain{pace}.",
            plan.gap
        ),
        (Some(months), Some(per_month)) => format!(
            "{metric} needs {per_month:.0} per month over the remaining {months} months to close a gap of {:.0}{pace}.",
            plan.gap
        ),
        _ => format!(
            "{metric} is {:.0} short of its annual target{pace}.",
            plan.gap
        ),
    })
}

/// Ordered summary lines for one subject
pub fn summarize(inputs: &SummaryInputs<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let limit = inputs.list_items.max(1);

    match variance_line("Volume", inputs.volume) {
        Some(line) => lines.push(line),
        None => lines.push(format!(
            "No budget column is available for {}.",
            inputs.base_period
        )),
    }
    if let Some(line) = inputs.amount.and_then(|a| variance_line("Amount", a)) {
        lines.push(line);
    }

    match inputs.volume.yoy_pct {
        Some(pct) => lines.push(format!("Volume is {pct:+.1}% year over year.")),
        None if inputs.volume.previous_year.is_none() => {
            lines.push("No prior-year data for a year-over-year comparison.".to_string());
        }
        None => lines.push("Prior-year volume was zero; growth is not meaningful.".to_string()),
    }

    if let Some(pvm) = &inputs.pvm.portfolio {
        let (driver, _) = pvm.dominant();
        lines.push(format!(
            "Amount changed by {:+.0} year over year: price {:+.0}, volume {:+.0}, mix {:+.0} (mainly {driver}-driven).",
            pvm.total_change, pvm.price_effect, pvm.volume_effect, pvm.mix_effect
        ));
    }

    let conc = inputs.concentration;
    lines.push(format!(
        "Top 3 {} hold {:.1}% of volume across {} active; concentration risk {}.",
        inputs.subject_label,
        conc.top3_share * 100.0,
        conc.active_count,
        conc.risk.label()
    ));

    let ret = inputs.retention;
    if ret.has_baseline {
        lines.push(format!(
            "Retention {:.1}%, churn {:.1}% ({} lost, {} new); churn risk {}.",
            ret.retention_rate * 100.0,
            ret.churn_rate * 100.0,
            ret.lost.len(),
            ret.new.len(),
            ret.risk.label()
        ));
    } else {
        lines.push(format!(
            "No prior-year activity to measure {} retention against.",
            inputs.subject_label
        ));
    }

    match inputs.performance {
        Performance::MidYear(categories) => {
            if !categories.underperformers.is_empty() {
                lines.push(format!(
                    "Critical underperformers: {}.",
                    join_names(
                        categories.underperformers.iter().map(describe_breaches),
                        limit,
                        categories.underperformers.len()
                    )
                ));
            }
            if !categories.growth_drivers.is_empty() {
                lines.push(format!(
                    "Growth drivers: {}.",
                    join_names(
                        categories.growth_drivers.iter().map(describe_breaches),
                        limit,
                        categories.growth_drivers.len()
                    )
                ));
            }
        }
        Performance::FullYear(review) => {
            if !review.strong_performers.is_empty() {
                lines.push(format!(
                    "Strong performers: {}.",
                    join_names(
                        review.strong_performers.iter().map(describe_assessment),
                        limit,
                        review.strong_performers.len()
                    )
                ));
            }
            if !review.underperformers.is_empty() {
                lines.push(format!(
                    "Below annual target: {}.",
                    join_names(
                        review.underperformers.iter().map(describe_assessment),
                        limit,
                        review.underperformers.len()
                    )
                ));
            }
        }
    }

    if let Some(line) = catch_up_line("Volume", inputs.catch_up.volume.as_ref()) {
        lines.push(line);
    }
    if let Some(line) = catch_up_line("Amount", inputs.catch_up.amount.as_ref()) {
        lines.push(line);
    }

    let outliers = &inputs.outliers.outliers;
    if !outliers.is_empty() {
        lines.push(format!(
            "Unusual YoY growth: {}.",
            join_names(
                outliers
                    .iter()
                    .map(|o| format!("{} ({:+.1}%)", o.name, o.yoy_pct)),
                limit,
                outliers.len()
            )
        ));
    }

    lines
}
