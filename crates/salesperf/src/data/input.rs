//! Report input files
//!
//! A report input is the column schema, the base period, and the Volume /
//! Amount datasets of both subjects. YAML is the primary format; files ending
//! in `.json` are read as JSON.

use std::fs;
use std::path::Path;

use salesperf_core::ReportInput;

use super::storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

pub fn parse_report_input(content: &str, format: InputFormat) -> Result<ReportInput, StorageError> {
    let input: ReportInput = match format {
        InputFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse YAML input: {e}")))?,
        InputFormat::Json => serde_json::from_str(content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse JSON input: {e}")))?,
    };

    tracing::debug!(
        columns = input.schema.len(),
        product_groups = input.product_groups.volume.len(),
        customers = input.customers.volume.len(),
        "parsed report input"
    );
    Ok(input)
}

pub fn load_report_input(path: &Path) -> Result<ReportInput, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    parse_report_input(&content, InputFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesperf_core::model::{Period, PeriodKind};
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
schema:
  - { year: 2023, month: june, type: actual }
  - { year: 2024, month: Jun, type: Actual }
  - { year: 2024, month: Full Year, type: bud }
base_period: { year: 2024, month: "6", type: A }
product_groups:
  volume:
    - { name: Widgets, values: [100, 120, 300] }
    - { name: Gadget A, values: [10, 12, 40] }
  amount:
    - { name: widgets, raw_values: [1000, 1320, 3300] }
  merge_rules:
    - { name: Gadgets, members: [Gadget A] }
customers:
  volume:
    - { name: Acme, values: [60, 70, 200] }
"#;

    #[test]
    fn test_parse_yaml_input() {
        let input = parse_report_input(SAMPLE, InputFormat::Yaml).unwrap();

        assert_eq!(input.schema.len(), 3);
        assert_eq!(
            input.schema.get(2),
            Some(&Period::budget(2024, PeriodKind::FullYear))
        );
        assert_eq!(input.resolve_base(), Ok(1));
        assert_eq!(input.product_groups.amount[0].values, vec![1000.0, 1320.0, 3300.0]);
        assert_eq!(input.product_groups.merge_rules[0].members, vec!["Gadget A"]);
        assert!(input.customers.amount.is_empty());
    }

    #[test]
    fn test_unknown_month_token_rejected() {
        let yaml = "schema:\n  - { year: 2024, month: Smarch, type: Actual }\n";
        let err = parse_report_input(yaml, InputFormat::Yaml).unwrap_err();
        assert!(matches!(err, StorageError::Parse(_)));
        assert!(err.to_string().contains("Smarch"));
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(
            &path,
            r#"{"schema":[{"year":2024,"month":"Q2","type":"Actual"}],"base_index":0}"#,
        )
        .unwrap();

        let input = load_report_input(&path).unwrap();
        assert_eq!(input.base_index, Some(0));
        assert_eq!(
            input.schema.get(0),
            Some(&Period::actual(2024, PeriodKind::Quarter(2)))
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("input")), InputFormat::Yaml);
    }
}
