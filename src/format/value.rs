//! Extraction of a numeric magnitude and unit suffix from displayed text.

/// Numeric part and trailing suffix read from an element's text.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParsedValue {
    /// Digits, at most one leading `-`, and decimal marks, in source order.
    pub value: String,
    /// The final non-digit character, or empty.
    pub suffix: String,
}

/// Parse `text` using `.` as the decimal mark.
pub fn parse_value(text: &str) -> ParsedValue {
    parse_value_with(text, '.')
}

/// Parse `text`, keeping `decimal` as the decimal mark and dropping every
/// other non-digit character (grouping marks, currency signs, spaces).
pub fn parse_value_with(text: &str, decimal: char) -> ParsedValue {
    let trimmed = text.trim();
    let (body, suffix) = match trimmed.chars().next_back() {
        Some(last) if !last.is_ascii_digit() => {
            (&trimmed[..trimmed.len() - last.len_utf8()], last.to_string())
        }
        _ => (trimmed, String::new()),
    };

    let mut value = String::with_capacity(body.len());
    for ch in body.chars() {
        if ch.is_ascii_digit() || ch == decimal || (ch == '-' && value.is_empty()) {
            value.push(ch);
        }
    }

    ParsedValue { value, suffix }
}

/// Number of digits after the first `decimal` mark in `value`.
pub fn fraction_digits(value: &str, decimal: char) -> usize {
    value
        .split_once(decimal)
        .map(|(_, frac)| frac.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/format/value.rs"]
mod tests;
