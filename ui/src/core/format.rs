//! Formatting helpers for presenting metrics.

pub const CURRENCY_SYMBOL: &str = "£";

/// Integer with thousands separators: `12,345`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Currency scaled to thousands / millions: `£950.00`, `£12.4K`, `-£1.25M`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    // Scale on the rounded figure so 999,960 reads £1.00M, not £1000.0K.
    let thousands = (magnitude / 100.0).round() / 10.0;
    let body = if magnitude >= 1_000_000.0 || thousands >= 1_000.0 {
        format!("{:.2}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{thousands:.1}K")
    } else {
        format!("{magnitude:.2}")
    };
    format!("{sign}{CURRENCY_SYMBOL}{body}")
}

/// Value already expressed in percent units: `12.5` -> `12.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}
