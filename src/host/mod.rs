//! The seam between counters and the document they decorate.
//!
//! Everything a controller or the lifecycle manager does to an element goes
//! through [`Host`]. Asynchronous host primitives (visibility observers and
//! per-frame callbacks) hand out tokens instead of taking closures; whoever
//! drives the host delivers the matching notifications back to the
//! [`InstanceLifecycleManager`](crate::InstanceLifecycleManager).

pub mod page;
pub mod selector;

use crate::foundation::core::{ElementId, FrameHandle, ObserverId, Timestamp};

/// Name of the notification dispatched when a counter reaches its end value.
pub const COMPLETE_EVENT: &str = "wmCountUpComplete";

/// A notification dispatched on an element.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CountUpEvent {
    /// Event type name.
    pub name: &'static str,
    /// Whether the event propagates to ancestors.
    pub bubbles: bool,
    /// Whether listeners may cancel it.
    pub cancelable: bool,
    /// Element the event is about (its `detail`).
    pub element: ElementId,
}

impl CountUpEvent {
    /// Completion notification for `element`: bubbling and cancelable.
    pub fn complete(element: ElementId) -> Self {
        Self {
            name: COMPLETE_EVENT,
            bubbles: true,
            cancelable: true,
            element,
        }
    }
}

/// Document operations used by counters.
///
/// Lookups on unknown elements return `None`/empty and mutations on them are
/// ignored, so a stale [`ElementId`] can never fault the host.
pub trait Host {
    /// Current clock reading.
    fn now(&self) -> Timestamp;

    /// Whether `element` exists in this host at all (attached or not).
    fn contains(&self, element: ElementId) -> bool;

    /// Whether `element` is attached to the live document tree.
    fn is_connected(&self, element: ElementId) -> bool;

    /// First attached element matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// All attached elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<ElementId>;

    /// `root` (if it matches) followed by its matching descendants.
    ///
    /// Works on detached subtrees, which is what removal handling needs.
    fn select_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Text content of `element` and its descendants.
    fn text(&self, element: ElementId) -> Option<String>;

    /// Replace the text content of `element`.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Attribute value of `element`, if set.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Set an attribute of `element`.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Whether `element` carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Add `class` to `element`; adding twice is a no-op.
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Remove `class` from `element`.
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Set an inline style property; an empty `value` removes it.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// Rendered width in px of `text` laid out with `element`'s font.
    fn measure_text(&self, element: ElementId, text: &str) -> f64;

    /// Start watching `element` for viewport intersection.
    fn observe_visibility(&mut self, element: ElementId) -> ObserverId;

    /// Stop a visibility subscription and drop its queued notices.
    fn disconnect_visibility(&mut self, observer: ObserverId);

    /// Ask for one callback before the next repaint.
    fn request_frame(&mut self, element: ElementId) -> FrameHandle;

    /// Revoke a pending frame callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Dispatch `event` on its element; returns `false` if a listener cancelled it.
    fn dispatch(&mut self, event: &CountUpEvent) -> bool;

    /// Replace a shorthand anchor with a canonical counter element carrying
    /// `attributes` and `text`. Returns the new element.
    fn replace_with_counter(
        &mut self,
        anchor: ElementId,
        attributes: &[(String, String)],
        text: &str,
    ) -> Option<ElementId>;

    /// Block whose text is auto-scaled and must be re-measured when the
    /// counter's text width changes. Hosts without text scaling have none.
    fn scaled_text_container(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    /// Recompute the scale of a container returned by
    /// [`Host::scaled_text_container`].
    fn rescale_text(&mut self, _container: ElementId) {}
}
