//! Separator conventions for the locale tags counters may be configured with.
//!
//! Only what number rendering needs is modelled: the decimal mark, the
//! grouping mark, and how integer digits are grouped.

/// The tag used whenever a configured locale is missing or unknown.
pub const DEFAULT_LOCALE: &str = "en-US";

/// How integer digits are split into groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: `1,234,567`.
    Thousands,
    /// Last group of three, then pairs: `12,34,567`.
    Indian,
}

/// Number rendering conventions of one locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaleSettings {
    /// Canonical BCP 47 tag.
    pub tag: &'static str,
    /// Decimal mark.
    pub decimal: char,
    /// Grouping mark placed between integer digit groups.
    pub group: char,
    /// Grouping strategy.
    pub grouping: Grouping,
    /// Minimum number of digits in the leading group before grouping kicks in.
    pub min_grouping_digits: usize,
}

const fn settings(tag: &'static str, decimal: char, group: char) -> LocaleSettings {
    LocaleSettings {
        tag,
        decimal,
        group,
        grouping: Grouping::Thousands,
        min_grouping_digits: 1,
    }
}

static LOCALES: &[LocaleSettings] = &[
    settings("en-US", '.', ','),
    settings("en-GB", '.', ','),
    LocaleSettings {
        grouping: Grouping::Indian,
        ..settings("en-IN", '.', ',')
    },
    settings("de-DE", ',', '.'),
    settings("de-CH", '.', '\u{2019}'),
    settings("fr-FR", ',', '\u{202f}'),
    LocaleSettings {
        min_grouping_digits: 2,
        ..settings("es-ES", ',', '.')
    },
    settings("it-IT", ',', '.'),
    settings("nl-NL", ',', '.'),
    settings("pt-BR", ',', '.'),
    settings("ru-RU", ',', '\u{a0}'),
    settings("sv-SE", ',', '\u{a0}'),
    settings("ja-JP", '.', ','),
    settings("zh-CN", '.', ','),
];

/// Every locale with dedicated conventions.
pub fn supported_locales() -> impl Iterator<Item = &'static LocaleSettings> {
    LOCALES.iter()
}

/// Resolve a locale tag to its conventions.
///
/// Matching is case-insensitive and accepts `_` as subtag separator. A tag
/// without an exact entry falls back to the first entry sharing its language
/// subtag, and finally to [`DEFAULT_LOCALE`].
pub fn lookup(tag: &str) -> &'static LocaleSettings {
    let wanted = tag.trim().replace('_', "-");
    if let Some(found) = LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(&wanted)) {
        return found;
    }

    let language = wanted
        .split('-')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !language.is_empty()
        && let Some(found) = LOCALES
            .iter()
            .find(|l| l.tag.split('-').next() == Some(language.as_str()))
    {
        return found;
    }

    default_settings()
}

fn default_settings() -> &'static LocaleSettings {
    &LOCALES[0]
}

impl LocaleSettings {
    /// Insert grouping marks into a string of ASCII integer digits.
    pub fn group_digits(&self, digits: &str) -> String {
        let len = digits.len();
        if len < 3 + self.min_grouping_digits {
            return digits.to_owned();
        }

        // Group sizes from the right: always 3 first, then 3s or 2s.
        let tail = match self.grouping {
            Grouping::Thousands => 3,
            Grouping::Indian => 2,
        };
        let mut cuts = Vec::new();
        let mut pos = len - 3;
        while pos > 0 {
            cuts.push(pos);
            pos = pos.saturating_sub(tail);
        }

        let mut out = String::with_capacity(len + cuts.len() * 3);
        for (i, ch) in digits.char_indices() {
            if i > 0 && cuts.contains(&i) {
                out.push(self.group);
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/locale.rs"]
mod tests;
