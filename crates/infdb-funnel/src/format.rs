//! Display formatting shared by every view.

use chrono::{DateTime, Utc};

/// Formats a count as `245.0K` / `1.2M`, or verbatim below one thousand.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Formats a count with comma thousands separators, e.g. `11,212`.
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a timestamp as `Oct 19, 2026, 03:04 PM` (UTC).
#[must_use]
pub fn display_datetime(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Avatar fallback: first letter of up to two words, uppercased.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[must_use]
pub fn percent(rate: f64) -> String {
    format!("{rate}%")
}
