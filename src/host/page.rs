//! An in-memory, headless document implementing [`Host`].
//!
//! `Page` keeps a node arena, a virtual clock, and queues for the
//! asynchronous primitives (visibility notices, frame callbacks, mutation
//! batches). It never delivers anything by itself: a driver such as
//! [`Runtime`](crate::Runtime) drains the queues and routes them to the
//! lifecycle manager. Frame callbacks follow animation-frame rules: every
//! callback pending when the queue is drained runs in that frame, callbacks
//! requested while it runs wait for the next one.

use std::collections::BTreeMap;

use crate::{
    foundation::core::{ElementId, FrameHandle, ObserverId, Timestamp},
    foundation::error::{CountUpError, CountUpResult},
    host::selector::{Matchable, Selector},
    host::{CountUpEvent, Host},
    lifecycle::mutation::MutationRecord,
};

/// Class marking a block whose text is auto-scaled.
pub const SCALED_BLOCK_CLASS: &str = "sqs-block";
/// Class of the scaled text inside such a block.
pub const SCALED_TEXT_CLASS: &str = "sqsrte-scaled-text";

const DEFAULT_CHAR_WIDTH_PX: f64 = 10.0;

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    intersecting: bool,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            intersecting: false,
        }
    }
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCallback {
    /// Token returned by [`Host::request_frame`].
    pub handle: FrameHandle,
    /// Element the frame was requested for.
    pub element: ElementId,
}

/// A queued intersection change for one observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityNotice {
    /// Subscription the notice belongs to.
    pub observer: ObserverId,
    /// Observed element.
    pub element: ElementId,
    /// Whether the element now intersects the viewport.
    pub intersecting: bool,
}

/// One text write, as recorded by the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextChange {
    /// Clock reading of the write.
    pub at: Timestamp,
    /// Element written to.
    pub element: ElementId,
    /// Text written.
    pub text: String,
}

/// One dispatched event, as recorded by the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DispatchedEvent {
    /// Clock reading of the dispatch.
    pub at: Timestamp,
    /// The dispatched event.
    pub event: CountUpEvent,
}

/// Serializable description of a page, used to build a [`Page`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    /// Width of one character in px, used for text measurement.
    #[serde(default = "default_char_width")]
    pub char_width_px: f64,
    /// Children of the document body.
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            char_width_px: DEFAULT_CHAR_WIDTH_PX,
            body: Vec::new(),
        }
    }
}

fn default_char_width() -> f64 {
    DEFAULT_CHAR_WIDTH_PX
}

fn default_tag() -> String {
    "span".to_owned()
}

/// Serializable description of one element and its subtree.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    /// Element name, `span` by default.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Value of the `id` attribute.
    #[serde(default)]
    pub id: Option<String>,
    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Other attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Own text, placed before the children's text.
    #[serde(default)]
    pub text: String,
    /// Child elements in order.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
    /// Virtual time at which the element scrolls into view.
    #[serde(default)]
    pub visible_at_ms: Option<f64>,
    /// Virtual time at which the element scrolls out of view again.
    #[serde(default)]
    pub hidden_at_ms: Option<f64>,
}

/// In-memory document. See the module docs.
#[derive(Clone, Debug)]
pub struct Page {
    nodes: Vec<Node>,
    root: ElementId,
    clock: Timestamp,
    char_width_px: f64,
    observers: BTreeMap<ObserverId, ElementId>,
    next_observer: u64,
    frames: Vec<FrameCallback>,
    next_frame: u64,
    visibility_queue: Vec<VisibilityNotice>,
    visibility_schedule: Vec<(Timestamp, ElementId, bool)>,
    mutations: Vec<MutationRecord>,
    events: Vec<DispatchedEvent>,
    text_log: Vec<TextChange>,
    rescales: BTreeMap<ElementId, usize>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body")],
            root: ElementId(0),
            clock: Timestamp::ZERO,
            char_width_px: DEFAULT_CHAR_WIDTH_PX,
            observers: BTreeMap::new(),
            next_observer: 0,
            frames: Vec::new(),
            next_frame: 0,
            visibility_queue: Vec::new(),
            visibility_schedule: Vec::new(),
            mutations: Vec::new(),
            events: Vec::new(),
            text_log: Vec::new(),
            rescales: BTreeMap::new(),
        }
    }

    /// Build a page from a JSON [`PageSpec`].
    pub fn from_json_str(json: &str) -> CountUpResult<Self> {
        let spec: PageSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec)
    }

    /// Build a page from `spec`, rejecting non-positive character widths,
    /// empty tags and non-finite visibility times.
    #[tracing::instrument(skip(spec))]
    pub fn from_spec(spec: &PageSpec) -> CountUpResult<Self> {
        if !(spec.char_width_px.is_finite() && spec.char_width_px > 0.0) {
            return Err(CountUpError::config("char_width_px must be a positive number"));
        }
        let mut page = Self::new();
        page.char_width_px = spec.char_width_px;
        let root = page.root;
        for child in &spec.body {
            page.build(root, child)?;
        }
        // The initial tree is picked up by discovery, not by mutation handling.
        page.mutations.clear();
        Ok(page)
    }

    fn build(&mut self, parent: ElementId, spec: &NodeSpec) -> CountUpResult<ElementId> {
        if spec.tag.trim().is_empty() {
            return Err(CountUpError::config("node tag must not be empty"));
        }
        let id = self.create_element(&spec.tag);
        {
            let node = &mut self.nodes[id.0 as usize];
            node.attrs = spec.attrs.clone();
            if let Some(html_id) = &spec.id {
                node.attrs.insert("id".to_owned(), html_id.clone());
            }
            node.classes = spec.classes.clone();
            node.text = spec.text.clone();
        }
        for (at, visible) in [(spec.visible_at_ms, true), (spec.hidden_at_ms, false)] {
            if let Some(ms) = at {
                if !ms.is_finite() {
                    return Err(CountUpError::config("visibility times must be finite"));
                }
                self.schedule_visibility(Timestamp(ms), id, visible);
            }
        }
        self.append_child(parent, id);
        for child in &spec.children {
            self.build(id, child)?;
        }
        Ok(id)
    }

    /// The `body` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node::new(tag));
        id
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Element name of `id`.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    /// Parent of `id`, or `None` when detached.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Inline style `property` of `id`.
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, mut id: ElementId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    /// Attach `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.node(parent).is_none()
            || self.node(child).is_none()
            || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        self.remove(child);
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
        if self.is_connected(parent) {
            self.mutations.push(MutationRecord::added(child));
        }
        true
    }

    /// Detach `id` (and its subtree) from its parent.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let was_connected = self.is_connected(id);
        self.nodes[parent.0 as usize].children.retain(|&c| c != id);
        self.nodes[id.0 as usize].parent = None;
        if was_connected {
            self.mutations.push(MutationRecord::removed(id));
        }
        true
    }

    /// Put `new` where `old` is, reporting both changes in one batch.
    pub fn replace_child(&mut self, old: ElementId, new: ElementId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        if self.node(new).is_none() || self.is_ancestor_or_self(new, parent) {
            return false;
        }
        if self.parent(new).is_some() {
            self.remove(new);
        }
        let was_connected = self.is_connected(old);
        let siblings = &mut self.nodes[parent.0 as usize].children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        self.nodes[old.0 as usize].parent = None;
        self.nodes[new.0 as usize].parent = Some(parent);
        if was_connected {
            self.mutations.push(MutationRecord {
                added: vec![new],
                removed: vec![old],
            });
        }
        true
    }

    /// Change whether `id` intersects the viewport, notifying its observers.
    pub fn set_intersecting(&mut self, id: ElementId, intersecting: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.intersecting == intersecting {
            return;
        }
        node.intersecting = intersecting;
        let watching: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, el)| **el == id)
            .map(|(obs, _)| *obs)
            .collect();
        for observer in watching {
            self.visibility_queue.push(VisibilityNotice {
                observer,
                element: id,
                intersecting,
            });
        }
    }

    /// Change intersection of `id` once the clock reaches `at`.
    pub fn schedule_visibility(&mut self, at: Timestamp, id: ElementId, intersecting: bool) {
        self.visibility_schedule.push((at, id, intersecting));
        self.visibility_schedule
            .sort_by(|a, b| a.0.as_millis().total_cmp(&b.0.as_millis()));
    }

    /// Whether scheduled visibility changes are still pending.
    pub fn has_scheduled_visibility(&self) -> bool {
        !self.visibility_schedule.is_empty()
    }

    /// Move the clock forward to `t` (never backwards) and apply scheduled
    /// visibility changes that are due.
    pub fn set_time(&mut self, t: Timestamp) {
        if t > self.clock {
            self.clock = t;
        }
        let due = self
            .visibility_schedule
            .iter()
            .take_while(|(at, _, _)| *at <= self.clock)
            .count();
        let applied: Vec<_> = self.visibility_schedule.drain(..due).collect();
        for (_, id, intersecting) in applied {
            self.set_intersecting(id, intersecting);
        }
    }

    /// Drain the frame callbacks requested so far.
    pub fn take_frames(&mut self) -> Vec<FrameCallback> {
        std::mem::take(&mut self.frames)
    }

    /// Drain the queued visibility notices.
    pub fn take_visibility_notices(&mut self) -> Vec<VisibilityNotice> {
        std::mem::take(&mut self.visibility_queue)
    }

    /// Drain the recorded mutation batches.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    /// Number of frame callbacks waiting to run.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of live visibility subscriptions.
    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    /// Every event dispatched so far.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Every text write so far.
    pub fn text_log(&self) -> &[TextChange] {
        &self.text_log
    }

    /// How often `container` has been asked to rescale.
    pub fn rescale_count(&self, container: ElementId) -> usize {
        self.rescales.get(&container).copied().unwrap_or(0)
    }

    fn collect_matches(&self, from: ElementId, selector: &Selector, out: &mut Vec<ElementId>) {
        let Some(node) = self.node(from) else {
            return;
        };
        if selector.matches(node) {
            out.push(from);
        }
        for &child in &node.children {
            self.collect_matches(child, selector, out);
        }
    }

    fn select(&self, from: ElementId, selector: &str) -> Vec<ElementId> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(%err, "ignoring unsupported selector");
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        self.collect_matches(from, &selector, &mut out);
        out
    }

    fn subtree_has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id).is_some_and(|n| {
            n.has_class(class)
                || n.children
                    .iter()
                    .any(|&c| self.subtree_has_class(c, class))
        })
    }
}

impl Host for Page {
    fn now(&self) -> Timestamp {
        self.clock
    }

    fn contains(&self, element: ElementId) -> bool {
        self.node(element).is_some()
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.contains(element) && self.is_ancestor_or_self(self.root, element)
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        self.select(self.root, selector)
    }

    fn select_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        self.select(root, selector)
    }

    fn text(&self, element: ElementId) -> Option<String> {
        let node = self.node(element)?;
        let mut out = node.text.clone();
        for &child in &node.children {
            if let Some(t) = self.text(child) {
                out.push_str(&t);
            }
        }
        Some(out)
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.text = text.to_owned();
        let children = std::mem::take(&mut node.children);
        for &child in &children {
            self.nodes[child.0 as usize].parent = None;
        }
        if !children.is_empty() && self.is_connected(element) {
            self.mutations.push(MutationRecord {
                added: Vec::new(),
                removed: children,
            });
        }
        self.text_log.push(TextChange {
            at: self.clock,
            element,
            text: text.to_owned(),
        });
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.node(element)?;
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_owned).collect();
        } else {
            node.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element).is_some_and(|n| n.has_class(class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element)
            && !node.has_class(class)
        {
            node.classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_owned(), value.to_owned());
        }
    }

    fn measure_text(&self, _element: ElementId, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width_px
    }

    fn observe_visibility(&mut self, element: ElementId) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, element);
        // Observers report the current state once right after observing.
        if self.node(element).is_some_and(|n| n.intersecting) {
            self.visibility_queue.push(VisibilityNotice {
                observer: id,
                element,
                intersecting: true,
            });
        }
        id
    }

    fn disconnect_visibility(&mut self, observer: ObserverId) {
        self.observers.remove(&observer);
        self.visibility_queue.retain(|n| n.observer != observer);
    }

    fn request_frame(&mut self, element: ElementId) -> FrameHandle {
        let handle = FrameHandle(self.next_frame);
        self.next_frame += 1;
        self.frames.push(FrameCallback { handle, element });
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|f| f.handle != handle);
    }

    fn dispatch(&mut self, event: &CountUpEvent) -> bool {
        self.events.push(DispatchedEvent {
            at: self.clock,
            event: event.clone(),
        });
        true
    }

    fn replace_with_counter(
        &mut self,
        anchor: ElementId,
        attributes: &[(String, String)],
        text: &str,
    ) -> Option<ElementId> {
        self.parent(anchor)?;
        let span = self.create_element("span");
        {
            let node = &mut self.nodes[span.0 as usize];
            node.attrs
                .insert("data-wm-plugin".to_owned(), "countup".to_owned());
            for (name, value) in attributes {
                node.attrs.insert(name.clone(), value.clone());
            }
            node.text = text.to_owned();
        }
        self.replace_child(anchor, span).then_some(span)
    }

    fn scaled_text_container(&self, element: ElementId) -> Option<ElementId> {
        let mut cur = Some(element);
        while let Some(id) = cur {
            if self.has_class(id, SCALED_BLOCK_CLASS) && self.subtree_has_class(id, SCALED_TEXT_CLASS)
            {
                return Some(id);
            }
            cur = self.parent(id);
        }
        None
    }

    fn rescale_text(&mut self, container: ElementId) {
        *self.rescales.entry(container).or_default() += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/page.rs"]
mod tests;
