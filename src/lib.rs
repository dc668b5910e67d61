//! Count-up animations for numeric page content.
//!
//! An element whose text is a number (`"1,250+"`, `"98.6°"`, `"1.234,50 €"`)
//! counts from a start value to that number over a fixed duration the first
//! time it scrolls into view, rendering every frame with the element's
//! locale conventions and trailing unit.
//!
//! # Pieces
//!
//! - **Formatting** ([`parse_value`], [`parse_localized`], [`format_number`]):
//!   pure conversions between displayed text and numbers.
//! - **[`AnimationController`]**: one element's state machine
//!   (`Idle -> Armed -> Animating -> Completed`, plus `Destroyed`).
//! - **[`InstanceLifecycleManager`]**: the registry owning one controller per
//!   element, kept consistent with tree mutations, and the control surface
//!   (`reset_all`, `reset`, `destroy`, `destroy_all`, `get_instance`).
//! - **[`Host`]**: the document seam. [`Page`] is a headless in-memory host and
//!   [`Runtime`] drives it on a virtual clock.
//!
//! The crate never installs a `tracing` subscriber; the `countup` binary does.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod config;
mod format;
mod foundation;
mod host;
mod lifecycle;
mod runtime;

pub use animation::controller::{AnimationController, ControllerState, FrameOutcome};
pub use animation::progress::{Lerp, linear_progress};
pub use config::options::{
    DEFAULT_DURATION_MS, DEFAULT_FPS, ElementConfig, Overrides, ResolvedOptions, effective_locale,
    resolve, resolve_with_locale,
};
pub use config::record::OriginalValueRecord;
pub use config::shorthand::{counter_attributes, is_shorthand_href, query_params};
pub use format::js::{parse_float_prefix, parse_int_prefix};
pub use format::locale::{
    DEFAULT_LOCALE, Grouping, LocaleSettings, lookup as locale_settings, supported_locales,
};
pub use format::number::{
    MAX_DECIMALS, decimal_separator, format as format_number, parse_localized, round_to,
    thousands_separator, to_locale_string,
};
pub use format::value::{ParsedValue, fraction_digits, parse_value, parse_value_with};
pub use foundation::core::{ElementId, FrameHandle, ObserverId, Timestamp};
pub use foundation::error::{CountUpError, CountUpResult};
pub use host::page::{
    DispatchedEvent, FrameCallback, NodeSpec, Page, PageSpec, TextChange, VisibilityNotice,
};
pub use host::selector::{Matchable, Selector};
pub use host::{COMPLETE_EVENT, CountUpEvent, Host};
pub use lifecycle::manager::{
    ANCHOR_SELECTOR, COUNTER_SELECTOR, ControlHandle, InstanceLifecycleManager, LOADED_CLASS,
};
pub use lifecycle::mutation::MutationRecord;
pub use runtime::{DEFAULT_FRAME_INTERVAL_MS, Runtime};
