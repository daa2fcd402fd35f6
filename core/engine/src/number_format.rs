//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Number formatting utilities for displaying KPI values.
//! CONTEXT: This module handles the conversion of raw aggregate values to
//! display strings. Only the display string is rounded; callers keep the
//! full-precision value.

use serde::{Deserialize, Serialize};

/// How a KPI value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiKind {
    /// `$1,234.56`
    Currency,
    /// `1,234`
    Count,
    /// Ratio rendered as `12.34%`
    Percentage,
}

const CURRENCY_SYMBOL: &str = "$";
const DECIMAL_PLACES: u8 = 2;

/// Format a KPI value for display.
pub fn format_kpi(kind: KpiKind, value: f64) -> String {
    match kind {
        KpiKind::Currency => format_currency(value, DECIMAL_PLACES, CURRENCY_SYMBOL),
        KpiKind::Count => format_decimal(value, 0, true),
        KpiKind::Percentage => format_percentage(value, DECIMAL_PLACES),
    }
}

/// Format a number with specified decimal places and optional thousands separator.
fn format_decimal(value: f64, decimal_places: u8, use_thousands_separator: bool) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);

    if use_thousands_separator {
        add_thousands_separator(&rounded)
    } else {
        rounded
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let parts: Vec<&str> = s.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1);

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    // "-0" / "-0.00" after rounding is plain zero
    let is_zero = digits.chars().all(|c| c == '0')
        && decimal_part.map_or(true, |d| d.chars().all(|c| c == '0'));
    if negative && !is_zero {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Format a number as currency. Negative amounts put the sign before the symbol.
fn format_currency(value: f64, decimal_places: u8, symbol: &str) -> String {
    let formatted = add_thousands_separator(&format!(
        "{:.prec$}",
        value.abs(),
        prec = decimal_places as usize
    ));

    let is_zero = formatted.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        format!("-{}{}", symbol, formatted)
    } else {
        format!("{}{}", symbol, formatted)
    }
}

/// Format a ratio as percentage.
fn format_percentage(value: f64, decimal_places: u8) -> String {
    let percentage = value * 100.0;
    let formatted = format_decimal(percentage, decimal_places, false);
    let formatted = if formatted.starts_with('-') && formatted[1..].chars().all(|c| matches!(c, '0' | '.')) {
        formatted[1..].to_string()
    } else {
        formatted
    };
    format!("{}%", formatted)
}
