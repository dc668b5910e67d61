//! Conversions between numbers and locale-formatted strings.

use crate::format::js::parse_float_prefix;
use crate::format::locale::{self, LocaleSettings};

/// Largest fraction-digit count honored when rendering.
pub const MAX_DECIMALS: usize = 20;

/// Render `value` with the locale's default conventions: grouping on and up to
/// three fraction digits, trailing zeros dropped.
pub fn to_locale_string(value: f64, locale: &str) -> String {
    render_grouped(value, 0, 3, locale::lookup(locale))
}

/// Decimal mark of `locale`, read from the rendering of `1.1`.
pub fn decimal_separator(locale: &str) -> char {
    to_locale_string(1.1, locale).chars().nth(1).unwrap_or('.')
}

/// Grouping mark of `locale`, read from the rendering of `1000`.
///
/// Locales that do not group four-digit numbers report the digit found at
/// that position.
pub fn thousands_separator(locale: &str) -> char {
    to_locale_string(1000.0, locale).chars().nth(1).unwrap_or(',')
}

/// Parse a locale-formatted numeric string.
///
/// For comma-decimal locales every `.` is dropped and the first `,` becomes
/// the decimal point; otherwise every `,` is dropped. A space-like grouping
/// mark of the locale is dropped as well. Unparsable input yields `NaN`.
pub fn parse_localized(s: &str, locale: &str) -> f64 {
    let decimal = decimal_separator(locale);
    let mut work = if decimal == ',' {
        s.replace('.', "").replacen(',', ".", 1)
    } else {
        s.replace(',', "")
    };

    let group = thousands_separator(locale);
    if !group.is_ascii_digit() && !matches!(group, '.' | ',') && group != decimal {
        work.retain(|c| c != group);
    }

    parse_float_prefix(&work)
}

/// Render `number` with exactly `decimals` fraction digits.
///
/// With `use_separator` and a locale, the output carries the locale's
/// grouping and decimal marks; otherwise it is a plain fixed-point string.
pub fn format(number: f64, decimals: usize, locale: Option<&str>, use_separator: bool) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    match locale {
        Some(tag) if use_separator && !tag.is_empty() => {
            let rounded = round_to(number, decimals);
            render_grouped(rounded, decimals, decimals, locale::lookup(tag))
        }
        _ => fixed_point(number, decimals),
    }
}

/// Round half away from zero to `decimals` fraction digits.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    let scaled = (value * factor).round() / factor;
    let rounded = if scaled.is_finite() { scaled } else { value };
    // Normalize negative zero so it never renders as "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn fixed_point(value: f64, decimals: usize) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_owned();
    }
    format!("{:.*}", decimals, round_to(value, decimals))
}

fn render_grouped(
    value: f64,
    min_frac: usize,
    max_frac: usize,
    settings: &LocaleSettings,
) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_owned();
    }

    let rounded = round_to(value, max_frac);
    let fixed = format!("{:.*}", max_frac, rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_owned();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::with_capacity(fixed.len() + 8);
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&settings.group_digits(int_part));
    if !frac.is_empty() {
        out.push(settings.decimal);
        out.push_str(&frac);
    }
    out
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/number.rs"]
mod tests;
