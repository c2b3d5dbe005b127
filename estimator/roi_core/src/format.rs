//! Display helpers for estimator values.

use crate::calculator::Payback;

/// Whole-unit dollar amount with thousands separators, e.g. `$12,345`.
#[must_use]
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs()))
}

/// Short dollar amount, e.g. `$1.2M` or `$45.0K`.
#[must_use]
pub fn compact_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{sign}${:.1}B", magnitude / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{sign}${:.1}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{sign}${:.1}K", magnitude / 1_000.0)
    } else {
        format!("{sign}${magnitude:.0}")
    }
}

/// Hour count, e.g. `120 hrs`.
#[must_use]
pub fn hours(value: f64) -> String {
    format!("{} hrs", group_thousands(value.round().max(0.0)))
}

/// Percentage from a 0-100 value, e.g. `48%`.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{value:.0}%")
}

/// Payback period for display; unreachable payback renders as `N/A`.
#[must_use]
pub fn payback(payback: Payback) -> String {
    match payback {
        Payback::NotApplicable => "Immediate".to_string(),
        Payback::Months(months) if months < 1.0 => "< 1 month".to_string(),
        Payback::Months(months) => format!("{months:.1} months"),
        Payback::NotAchievable => "N/A".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{value:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
