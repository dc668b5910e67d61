use super::*;
use crate::format::locale::supported_locales;

#[test]
fn separators_are_read_from_reference_renderings() {
    assert_eq!(decimal_separator("en-US"), '.');
    assert_eq!(thousands_separator("en-US"), ',');
    assert_eq!(decimal_separator("de-DE"), ',');
    assert_eq!(thousands_separator("de-DE"), '.');
    assert_eq!(thousands_separator("fr-FR"), '\u{202f}');
    // es-ES does not group 1000, so the digit at that position is reported.
    assert_eq!(thousands_separator("es-ES"), '0');
}

#[test]
fn default_rendering_trims_fraction() {
    assert_eq!(to_locale_string(1.1, "en-US"), "1.1");
    assert_eq!(to_locale_string(1234.5678, "en-US"), "1,234.568");
    assert_eq!(to_locale_string(1000.0, "de-DE"), "1.000");
}

#[test]
fn parse_localized_period_decimal() {
    assert_eq!(parse_localized("1,234.5", "en-US"), 1234.5);
    assert_eq!(parse_localized("-42", "en-US"), -42.0);
}

#[test]
fn parse_localized_comma_decimal() {
    assert_eq!(parse_localized("1.234,5", "de-DE"), 1234.5);
    assert_eq!(parse_localized("1234,5", "de-DE"), 1234.5);
    assert_eq!(parse_localized("1\u{202f}234,5", "fr-FR"), 1234.5);
}

#[test]
fn parse_localized_passes_nan_through() {
    assert!(parse_localized("", "en-US").is_nan());
    assert!(parse_localized("abc", "de-DE").is_nan());
}

#[test]
fn format_with_separator_uses_locale_marks() {
    assert_eq!(format(1234.5, 2, Some("en-US"), true), "1,234.50");
    assert_eq!(format(1234.5, 2, Some("de-DE"), true), "1.234,50");
    assert_eq!(format(1234567.0, 0, Some("en-IN"), true), "12,34,567");
    assert_eq!(format(-1234.0, 0, Some("en-US"), true), "-1,234");
}

#[test]
fn format_without_separator_is_plain_fixed_point() {
    assert_eq!(format(1234.5, 2, Some("de-DE"), false), "1234.50");
    assert_eq!(format(1234.5, 1, None, true), "1234.5");
    assert_eq!(format(2.5, 0, None, false), "3");
}

#[test]
fn format_never_renders_negative_zero() {
    assert_eq!(format(-0.0001, 2, Some("en-US"), true), "0.00");
    assert_eq!(format(-0.0001, 0, None, false), "0");
}

#[test]
fn format_passes_non_finite_values_through() {
    assert_eq!(format(f64::NAN, 2, None, false), "NaN");
    assert_eq!(format(f64::NAN, 2, Some("en-US"), true), "NaN");
}

#[test]
fn localized_round_trip_holds_for_supported_locales() {
    let values = [
        0.0, 1.0, 7.25, 42.0, 999.999, 1000.0, 1234.5678, 98765.4321, -15432.1, 1234567.891,
    ];
    for l in supported_locales() {
        for d in 0..=6usize {
            for &n in &values {
                let text = format(n, d, Some(l.tag), true);
                let back = parse_localized(&text, l.tag);
                let expected = round_to(n, d);
                assert!(
                    (back - expected).abs() < 1e-6,
                    "{} d={d} n={n}: {text:?} -> {back}",
                    l.tag
                );
            }
        }
    }
}
