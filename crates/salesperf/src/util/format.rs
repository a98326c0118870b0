fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a volume or amount rounded to whole units, with thousands separators
pub fn format_quantity(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(whole))
}

/// Format a quantity in compact form (e.g., 2.1M, 450K, 50)
pub fn format_compact(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}{:.1}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}{:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}{abs_value:.0}")
    }
}

/// Format a fraction as a percentage (0.25 -> "25.00%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a signed percentage change, "n/a" when undefined
pub fn format_change(pct: Option<f64>) -> String {
    pct.map_or_else(|| "n/a".to_string(), |p| format!("{p:+.1}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(999.4), "999");
        assert_eq!(format_quantity(1_234_567.8), "1,234,568");
        assert_eq!(format_quantity(-12_500.0), "-12,500");
        assert_eq!(format_quantity(-0.2), "0");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(2_100_000.0), "2.1M");
        assert_eq!(format_compact(450_000.0), "450K");
        assert_eq!(format_compact(-50.0), "-50");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(12.345)), "+12.3%");
        assert_eq!(format_change(Some(-4.0)), "-4.0%");
        assert_eq!(format_change(None), "n/a");
        assert_eq!(format_percentage(0.25), "25.00%");
    }
}
