//! Per-element configuration and its resolution into animation options.

use crate::{
    config::record::OriginalValueRecord,
    foundation::core::ElementId,
    foundation::error::{CountUpError, CountUpResult},
    format::js::{parse_float_prefix, parse_int_prefix},
    format::locale::{self, DEFAULT_LOCALE},
    format::number::{decimal_separator, parse_localized},
    format::value::{ParsedValue, fraction_digits},
    host::Host,
};

/// Run time used when no usable duration is configured.
pub const DEFAULT_DURATION_MS: u64 = 3000;
/// Frame rate reported when no usable `fps` is configured.
pub const DEFAULT_FPS: u32 = 60;

/// Raw configuration attribute values of one element.
///
/// Values are kept as written; [`resolve`] interprets them.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// `data-speed`: run time in ms; wins over `duration` when non-empty.
    pub speed: Option<String>,
    /// `data-duration`: run time in ms.
    pub duration: Option<String>,
    /// `data-fps`: informational frame rate.
    pub fps: Option<String>,
    /// `data-start`: value the count starts from.
    pub start: Option<String>,
    /// `data-locale`: locale tag for separators.
    pub locale: Option<String>,
    /// `data-has-separator`: grouping stays on unless this is `"false"`.
    #[serde(alias = "hasSeparator", alias = "hasSeperator")]
    pub has_separator: Option<String>,
}

impl ElementConfig {
    /// Read the `data-*` configuration attributes of `element`.
    pub fn from_host(host: &dyn Host, element: ElementId) -> Self {
        let attr = |name: &str| host.attribute(element, name);
        Self {
            speed: attr("data-speed"),
            duration: attr("data-duration"),
            fps: attr("data-fps"),
            start: attr("data-start"),
            locale: attr("data-locale"),
            has_separator: attr("data-has-separator").or_else(|| attr("data-has-seperator")),
        }
    }
}

/// Caller-supplied values that win over element attributes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Run time in ms.
    pub duration_ms: Option<u64>,
    /// Reported frame rate.
    pub fps: Option<u32>,
    /// Value the count starts from.
    pub starting_number: Option<f64>,
    /// Value the count ends at, instead of the captured one.
    pub end_number: Option<f64>,
    /// Fraction digits, instead of those of the captured value.
    pub decimals: Option<usize>,
    /// Locale tag.
    pub locale: Option<String>,
    /// Whether to render grouping marks.
    pub has_separator: Option<bool>,
    /// Text appended to every rendered value.
    pub suffix: Option<String>,
}

/// Fully resolved options driving one animation run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedOptions {
    /// Run time in ms.
    pub duration_ms: u64,
    /// Informational; frames are paced by the host.
    pub fps: u32,
    /// Value shown on the first frame.
    pub starting_number: f64,
    /// Value shown on the last frame.
    pub end_number: f64,
    /// Fraction digits rendered on every frame.
    pub decimals: usize,
    /// Canonical locale tag.
    pub locale: String,
    /// Whether grouping marks are rendered.
    pub has_separator: bool,
    /// Text appended to every rendered value.
    pub suffix: String,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            fps: DEFAULT_FPS,
            starting_number: 0.0,
            end_number: 0.0,
            decimals: 0,
            locale: DEFAULT_LOCALE.to_owned(),
            has_separator: true,
            suffix: String::new(),
        }
    }
}

impl ResolvedOptions {
    /// Reject options that cannot produce a meaningful count.
    pub fn validate(&self) -> CountUpResult<()> {
        if !self.end_number.is_finite() {
            return Err(CountUpError::validation(format!(
                "end value is not a finite number ({})",
                self.end_number
            )));
        }
        if !self.starting_number.is_finite() {
            return Err(CountUpError::validation(format!(
                "start value is not a finite number ({})",
                self.starting_number
            )));
        }
        Ok(())
    }
}

/// Canonical locale tag for the configured locale, honoring overrides.
pub fn effective_locale(config: &ElementConfig, overrides: &Overrides) -> &'static str {
    let wanted = overrides
        .locale
        .as_deref()
        .or(config.locale.as_deref())
        .filter(|tag| !tag.trim().is_empty())
        .unwrap_or(DEFAULT_LOCALE);
    locale::lookup(wanted).tag
}

/// Merge element attributes, the captured original value and explicit
/// overrides into [`ResolvedOptions`].
///
/// `current` is the value parsed from the element's text right now; it is
/// only consulted when the record holds no value or suffix.
pub fn resolve(
    config: &ElementConfig,
    record: &OriginalValueRecord,
    current: &ParsedValue,
    overrides: &Overrides,
) -> ResolvedOptions {
    let locale = effective_locale(config, overrides);
    resolve_with_locale(config, locale, record, current, overrides)
}

/// [`resolve`] with the locale already chosen, for callers that parsed
/// `current` with that locale's decimal mark and must resolve with the same
/// one.
pub fn resolve_with_locale(
    config: &ElementConfig,
    locale: &str,
    record: &OriginalValueRecord,
    current: &ParsedValue,
    overrides: &Overrides,
) -> ResolvedOptions {
    let duration_attr = config
        .speed
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(config.duration.as_deref());
    let duration_ms = duration_attr
        .and_then(parse_int_prefix)
        .filter(|&ms| ms > 0)
        .map_or(DEFAULT_DURATION_MS, |ms| ms as u64);

    let fps = config
        .fps
        .as_deref()
        .and_then(parse_int_prefix)
        .filter(|&f| f > 0)
        .map_or(DEFAULT_FPS, |f| u32::try_from(f).unwrap_or(u32::MAX));

    let starting_number = config
        .start
        .as_deref()
        .map(parse_float_prefix)
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0);

    let original_value = if record.value.is_empty() {
        current.value.as_str()
    } else {
        record.value.as_str()
    };
    let suffix = if record.suffix.is_empty() {
        current.suffix.clone()
    } else {
        record.suffix.clone()
    };

    ResolvedOptions {
        duration_ms: overrides.duration_ms.unwrap_or(duration_ms),
        fps: overrides.fps.unwrap_or(fps),
        starting_number: overrides.starting_number.unwrap_or(starting_number),
        end_number: overrides
            .end_number
            .unwrap_or_else(|| parse_localized(original_value, locale)),
        decimals: overrides
            .decimals
            .unwrap_or_else(|| fraction_digits(original_value, decimal_separator(locale))),
        locale: locale.to_owned(),
        has_separator: overrides
            .has_separator
            .unwrap_or(config.has_separator.as_deref() != Some("false")),
        suffix: overrides.suffix.clone().unwrap_or(suffix),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
