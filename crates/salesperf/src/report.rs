//! Rendering findings for output
//!
//! YAML and JSON serialize the findings verbatim inside a small envelope that
//! records when the report was generated. The summary format is plain text:
//! a headline block per subject followed by its executive-summary lines.

use std::fmt::Write as _;

use clap::ValueEnum;
use jiff::Timestamp;
use salesperf_core::analysis::Performance;
use salesperf_core::{Findings, Report};
use serde::Serialize;

use crate::util::format::{format_change, format_compact, format_percentage, format_quantity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    Summary,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Summary => "txt",
        }
    }
}

/// Which subjects to include in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SubjectFilter {
    #[default]
    Both,
    ProductGroups,
    Customers,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_groups: Option<&'a Findings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customers: Option<&'a Findings>,
}

fn selected(report: &Report, filter: SubjectFilter) -> Vec<&Findings> {
    match filter {
        SubjectFilter::Both => vec![&report.product_groups, &report.customers],
        SubjectFilter::ProductGroups => vec![&report.product_groups],
        SubjectFilter::Customers => vec![&report.customers],
    }
}

pub fn render(
    report: &Report,
    format: OutputFormat,
    filter: SubjectFilter,
    generated_at: Timestamp,
) -> color_eyre::Result<String> {
    let include = |wanted: SubjectFilter| filter == SubjectFilter::Both || filter == wanted;
    let document = ReportDocument {
        generated_at,
        product_groups: include(SubjectFilter::ProductGroups).then_some(&report.product_groups),
        customers: include(SubjectFilter::Customers).then_some(&report.customers),
    };

    Ok(match format {
        OutputFormat::Yaml => serde_saphyr::to_string(&document)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&document)?;
            json.push('\n');
            json
        }
        OutputFormat::Summary => {
            let mut text = format!("Generated {generated_at}\n");
            for findings in selected(report, filter) {
                text.push('\n');
                text.push_str(&render_summary(findings));
            }
            text
        }
    })
}

/// Plain-text block for one subject
pub fn render_summary(findings: &Findings) -> String {
    let mut out = String::new();
    let title = format!(
        "{}: {}",
        capitalize(findings.subject.label()),
        findings.base_period
    );
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    let volume = &findings.totals.volume;
    let _ = writeln!(
        out,
        "Volume:      {:>12}  vs budget {:>8}  YoY {:>8}",
        format_quantity(volume.actual),
        format_change(volume.vs_budget_pct),
        format_change(volume.yoy_pct)
    );
    if let Some(amount) = &findings.totals.amount {
        let _ = writeln!(
            out,
            "Amount:      {:>12}  vs budget {:>8}  YoY {:>8}",
            format_compact(amount.actual),
            format_change(amount.vs_budget_pct),
            format_change(amount.yoy_pct)
        );
    }
    let _ = writeln!(
        out,
        "Focus:       {} of {} entities, {} of budget",
        findings.focus.len(),
        findings.totals.entity_count,
        format_percentage(findings.focus.coverage)
    );
    let mode = match findings.performance {
        Performance::MidYear(_) => "mid-year",
        Performance::FullYear(_) => "full-year review",
    };
    let _ = writeln!(out, "Framing:     {mode}");
    let _ = writeln!(out);

    for line in &findings.summary {
        let _ = writeln!(out, "- {line}");
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
