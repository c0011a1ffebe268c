//! Groups parsed rows into a chart series.
//!
//! Aggregation never fails. A row without the group field is counted under
//! `"Unknown"`, and a value that is missing or not a number contributes `0`,
//! so a chart can always be produced from whatever the user uploaded.

use crate::services::files::parse::format_number;
use common::model::chart::ChartSeries;
use common::model::table::{CellValue, Row};
use std::collections::HashMap;

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Sums `value_field` per distinct `group_field`.
///
/// Labels come out in the order each key first appears in `rows`.
pub fn aggregate(rows: &[Row], group_field: &str, value_field: &str) -> ChartSeries {
    let mut series = ChartSeries::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let label = group_label(row.get(group_field));
        let value = numeric_value(row.get(value_field));

        match positions.get(&label) {
            Some(&idx) => series.values[idx] += value,
            None => {
                positions.insert(label.clone(), series.labels.len());
                series.labels.push(label);
                series.values.push(value);
            }
        }
    }

    series
}

fn group_label(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Text(text)) if !text.is_empty() => text.clone(),
        Some(CellValue::Number(n)) => format_number(*n),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// A cell's numeric contribution. Text is read like `parseFloat`: the longest
/// leading number wins and anything unreadable counts as zero. Non-finite
/// results also count as zero so stored series stay valid JSON.
pub fn numeric_value(cell: Option<&CellValue>) -> f64 {
    let value = match cell {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(text)) => parse_float_prefix(text).unwrap_or(0.0),
        Some(CellValue::Empty) | None => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parses the longest prefix of `text` (after leading whitespace) that forms
/// a decimal number with optional sign, fraction and exponent.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn monthly_sales_scenario() {
        let rows = vec![
            row(&[("month", text("Jan")), ("sales", text("10"))]),
            row(&[("month", text("Feb")), ("sales", text("20"))]),
            row(&[("month", text("Jan")), ("sales", text("5"))]),
        ];
        let series = aggregate(&rows, "month", "sales");
        assert_eq!(series.labels, vec!["Jan", "Feb"]);
        assert_eq!(series.values, vec![15.0, 20.0]);
    }

    #[test]
    fn labels_keep_first_seen_order() {
        let rows: Vec<Row> = ["B", "A", "B", "C", "A"]
            .iter()
            .map(|k| row(&[("k", text(k)), ("v", CellValue::Number(1.0))]))
            .collect();
        let series = aggregate(&rows, "k", "v");
        assert_eq!(series.labels, vec!["B", "A", "C"]);
        assert_eq!(series.values, vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn numeric_keys_are_not_reordered() {
        let rows: Vec<Row> = [30.0, 4.0, 30.0, 1.5]
            .iter()
            .map(|k| row(&[("k", CellValue::Number(*k)), ("v", CellValue::Number(2.0))]))
            .collect();
        let series = aggregate(&rows, "k", "v");
        assert_eq!(series.labels, vec!["30", "4", "1.5"]);
        assert_eq!(series.values, vec![4.0, 2.0, 2.0]);
    }

    #[test]
    fn missing_or_blank_group_is_unknown() {
        let rows = vec![
            row(&[("v", CellValue::Number(1.0))]),
            row(&[("k", text("")), ("v", CellValue::Number(2.0))]),
            row(&[("k", CellValue::Empty), ("v", CellValue::Number(3.0))]),
            row(&[("k", text("x")), ("v", CellValue::Number(4.0))]),
        ];
        let series = aggregate(&rows, "k", "v");
        assert_eq!(series.labels, vec![UNKNOWN_LABEL, "x"]);
        assert_eq!(series.values, vec![6.0, 4.0]);
    }

    #[test]
    fn fields_absent_everywhere_degrade_to_one_unknown_zero() {
        let rows = vec![row(&[("a", text("1"))]), row(&[("b", text("2"))])];
        let series = aggregate(&rows, "nope", "also-nope");
        assert_eq!(series.labels, vec![UNKNOWN_LABEL]);
        assert_eq!(series.values, vec![0.0]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = aggregate(&[], "x", "y");
        assert!(series.labels.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn totals_are_conserved() {
        let cells = [
            text("10"),
            text("abc"),
            CellValue::Number(2.5),
            text(" 7.5kg"),
            CellValue::Empty,
            text("-3"),
            CellValue::Number(f64::NAN),
        ];
        let rows: Vec<Row> = cells
            .iter()
            .enumerate()
            .map(|(i, v)| row(&[("k", text(&format!("g{}", i % 3))), ("v", v.clone())]))
            .collect();

        let series = aggregate(&rows, "k", "v");
        let emitted: f64 = series.values.iter().sum();
        let expected: f64 = rows.iter().map(|r| numeric_value(r.get("v"))).sum();
        assert_eq!(emitted, expected);
        assert_eq!(expected, 17.0);
    }

    #[rstest]
    #[case("42", Some(42.0))]
    #[case("  3.5", Some(3.5))]
    #[case("-0.25", Some(-0.25))]
    #[case("+7", Some(7.0))]
    #[case(".5", Some(0.5))]
    #[case("5.", Some(5.0))]
    #[case("12abc", Some(12.0))]
    #[case("1e3x", Some(1000.0))]
    #[case("2e", Some(2.0))]
    #[case("1.2.3", Some(1.2))]
    #[case("abc", None)]
    #[case("", None)]
    #[case("-", None)]
    #[case(".", None)]
    #[case("$5", None)]
    fn parse_float_prefix_cases(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_float_prefix(input), expected);
    }

    #[test]
    fn non_finite_values_count_as_zero() {
        assert_eq!(numeric_value(Some(&CellValue::Number(f64::INFINITY))), 0.0);
        assert_eq!(numeric_value(Some(&text("1e999"))), 0.0);
    }
}
