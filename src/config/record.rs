use crate::{
    foundation::core::ElementId,
    format::value::ParsedValue,
    host::Host,
};

/// Attribute holding the original text content.
pub const ATTR_ORIGINAL_CONTENT: &str = "data-original-content";
/// Attribute holding the captured numeric string.
pub const ATTR_ORIGINAL_VALUE: &str = "data-original-value";
/// Attribute holding the captured suffix.
pub const ATTR_ORIGINAL_SUFFIX: &str = "data-original-suffix";

/// Snapshot of an element's text taken before its first animation.
///
/// The record is stored on the element itself so it survives controllers
/// being torn down and recreated (reset, re-insertion after a content swap).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct OriginalValueRecord {
    /// Exact text before the first count.
    pub content: String,
    /// Numeric string read from `content`.
    pub value: String,
    /// Trailing unit character, or empty.
    pub suffix: String,
}

impl OriginalValueRecord {
    /// Read a previously captured record. An empty captured content counts as
    /// no record.
    pub fn load(host: &dyn Host, element: ElementId) -> Option<Self> {
        let content = host
            .attribute(element, ATTR_ORIGINAL_CONTENT)
            .filter(|c| !c.is_empty())?;
        Some(Self {
            content,
            value: host
                .attribute(element, ATTR_ORIGINAL_VALUE)
                .unwrap_or_default(),
            suffix: host
                .attribute(element, ATTR_ORIGINAL_SUFFIX)
                .unwrap_or_default(),
        })
    }

    /// Return the existing record, or capture one from the element's current
    /// text. An existing record is never overwritten.
    pub fn load_or_capture(host: &mut dyn Host, element: ElementId, parsed: &ParsedValue) -> Self {
        if let Some(existing) = Self::load(host, element) {
            return existing;
        }
        let record = Self {
            content: host.text(element).unwrap_or_default(),
            value: parsed.value.clone(),
            suffix: parsed.suffix.clone(),
        };
        host.set_attribute(element, ATTR_ORIGINAL_CONTENT, &record.content);
        host.set_attribute(element, ATTR_ORIGINAL_VALUE, &record.value);
        host.set_attribute(element, ATTR_ORIGINAL_SUFFIX, &record.suffix);
        tracing::debug!(%element, content = %record.content, "captured original value");
        record
    }
}
