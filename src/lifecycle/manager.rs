//! Ownership of every live [`AnimationController`], keyed by element.

use std::collections::BTreeMap;

use crate::{
    animation::controller::{AnimationController, FrameOutcome},
    config::options::Overrides,
    config::shorthand,
    foundation::core::{ElementId, FrameHandle, ObserverId, Timestamp},
    foundation::error::CountUpResult,
    host::Host,
    lifecycle::mutation::MutationRecord,
};

/// Canonical counter elements.
pub const COUNTER_SELECTOR: &str = r#"[data-wm-plugin="countup"]"#;
/// Shorthand counter links awaiting normalization.
pub const ANCHOR_SELECTOR: &str = r##"a[href*="#wm-countup"], a[href*="#wmcountup"]"##;
/// Marker class of elements that already have a controller.
pub const LOADED_CLASS: &str = "loaded";

/// Per-element control surface handed out when a controller is created.
///
/// The handle holds no reference to the controller; each call looks it up in
/// the manager, so a handle outliving its controller is harmless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlHandle {
    element: ElementId,
}

impl ControlHandle {
    /// Element the handle controls.
    pub fn element(self) -> ElementId {
        self.element
    }

    /// Stop the element's render loop.
    pub fn stop(self, manager: &mut InstanceLifecycleManager, host: &mut dyn Host) {
        if let Some(ctrl) = manager.instances.get_mut(&self.element) {
            ctrl.stop(host);
        }
    }

    /// Restore the element's text and count again.
    pub fn reset(
        self,
        manager: &mut InstanceLifecycleManager,
        host: &mut dyn Host,
    ) -> CountUpResult<()> {
        match manager.instances.get_mut(&self.element) {
            Some(ctrl) => ctrl.reset(host),
            None => Ok(()),
        }
    }

    /// Destroy the controller, unregister it and clear the element's marker.
    pub fn destroy(self, manager: &mut InstanceLifecycleManager, host: &mut dyn Host) -> bool {
        manager.destroy_element(host, self.element)
    }
}

/// Registry of controllers: at most one per element, and every registered
/// element carries the [`LOADED_CLASS`] marker.
#[derive(Debug, Default)]
pub struct InstanceLifecycleManager {
    instances: BTreeMap<ElementId, AnimationController>,
}

impl InstanceLifecycleManager {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live controllers.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no controller is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Managed elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.instances.keys().copied()
    }

    /// Controller of `element`, if managed.
    pub fn get_instance(&self, element: ElementId) -> Option<&AnimationController> {
        self.instances.get(&element)
    }

    /// Control handle for `element`, if managed.
    pub fn handle(&self, element: ElementId) -> Option<ControlHandle> {
        self.instances
            .contains_key(&element)
            .then_some(ControlHandle { element })
    }

    /// Normalize shorthand links, then create controllers for every counter
    /// element not yet marked as loaded.
    #[tracing::instrument(skip_all)]
    pub fn discover(&mut self, host: &mut dyn Host) -> Vec<ControlHandle> {
        for anchor in host.query_selector_all(ANCHOR_SELECTOR) {
            if host.has_class(anchor, LOADED_CLASS) {
                continue;
            }
            let href = host.attribute(anchor, "href").unwrap_or_default();
            let attributes = shorthand::counter_attributes(&href, |name| {
                host.attribute(anchor, name)
            });
            let text = host.text(anchor).unwrap_or_default();
            if host.replace_with_counter(anchor, &attributes, &text).is_none() {
                tracing::warn!(%anchor, "could not replace shorthand link");
            }
        }

        let mut handles = Vec::new();
        for element in host.query_selector_all(COUNTER_SELECTOR) {
            if host.has_class(element, LOADED_CLASS) {
                continue;
            }
            if let Some(handle) = self.try_create(host, element) {
                handles.push(handle);
            }
        }
        tracing::debug!(count = handles.len(), "discovered counters");
        handles
    }

    /// Create (or recreate) the controller for `element` with default overrides.
    pub fn create_instance(
        &mut self,
        host: &mut dyn Host,
        element: ElementId,
    ) -> CountUpResult<ControlHandle> {
        self.create_instance_with(host, element, Overrides::default())
    }

    /// Create the controller for `element`, destroying any existing one first.
    pub fn create_instance_with(
        &mut self,
        host: &mut dyn Host,
        element: ElementId,
        overrides: Overrides,
    ) -> CountUpResult<ControlHandle> {
        if let Some(mut old) = self.instances.remove(&element) {
            old.destroy(host);
            host.remove_class(element, LOADED_CLASS);
        }
        let controller = AnimationController::new(host, element, overrides)?;
        self.instances.insert(element, controller);
        host.add_class(element, LOADED_CLASS);
        Ok(ControlHandle { element })
    }

    fn try_create(&mut self, host: &mut dyn Host, element: ElementId) -> Option<ControlHandle> {
        match self.create_instance(host, element) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(%element, %err, "counter left static");
                None
            }
        }
    }

    /// Apply one batch of tree changes: tear down counters inside removed
    /// subtrees, then start counters inside added subtrees.
    #[tracing::instrument(skip_all, fields(added = record.added.len(), removed = record.removed.len()))]
    pub fn on_mutation(&mut self, host: &mut dyn Host, record: &MutationRecord) {
        for &root in &record.removed {
            for element in host.select_within(root, COUNTER_SELECTOR) {
                if let Some(mut ctrl) = self.instances.remove(&element) {
                    ctrl.destroy(host);
                    host.remove_class(element, LOADED_CLASS);
                    tracing::debug!(%element, "counter removed from document");
                }
            }
        }

        for &root in &record.added {
            if !host.is_connected(root) {
                continue;
            }
            for element in host.select_within(root, COUNTER_SELECTOR) {
                if !host.has_class(element, LOADED_CLASS) {
                    self.try_create(host, element);
                }
            }
        }
    }

    /// Route a visibility notice to the controller of `element`.
    pub fn on_visibility(
        &mut self,
        host: &mut dyn Host,
        element: ElementId,
        observer: ObserverId,
        intersecting: bool,
    ) -> bool {
        self.instances
            .get_mut(&element)
            .is_some_and(|ctrl| ctrl.on_visibility(host, observer, intersecting))
    }

    /// Route a frame callback to the controller of `element`.
    pub fn on_frame(
        &mut self,
        host: &mut dyn Host,
        element: ElementId,
        handle: FrameHandle,
        now: Timestamp,
    ) -> FrameOutcome {
        match self.instances.get_mut(&element) {
            Some(ctrl) => ctrl.on_frame(host, handle, now),
            None => FrameOutcome::Ignored,
        }
    }

    /// Reset every managed counter; failures are logged and skipped.
    pub fn reset_all(&mut self, host: &mut dyn Host) {
        for (element, ctrl) in &mut self.instances {
            if let Err(err) = ctrl.reset(host) {
                tracing::warn!(%element, %err, "reset failed");
            }
        }
    }

    /// Reset the counter found by `selector`, if it is managed.
    pub fn reset(&mut self, host: &mut dyn Host, selector: &str) -> CountUpResult<bool> {
        let Some(element) = host.query_selector(selector) else {
            return Ok(false);
        };
        match self.instances.get_mut(&element) {
            Some(ctrl) => ctrl.reset(host).map(|()| true),
            None => Ok(false),
        }
    }

    /// Destroy the counter found by `selector`, if it is managed.
    pub fn destroy(&mut self, host: &mut dyn Host, selector: &str) -> bool {
        match host.query_selector(selector) {
            Some(element) => self.destroy_element(host, element),
            None => false,
        }
    }

    /// Destroy and unregister the controller of `element` and clear its
    /// marker. Returns whether one existed.
    pub fn destroy_element(&mut self, host: &mut dyn Host, element: ElementId) -> bool {
        let Some(mut ctrl) = self.instances.remove(&element) else {
            return false;
        };
        ctrl.destroy(host);
        host.remove_class(element, LOADED_CLASS);
        true
    }

    /// Destroy every controller and clear every marker.
    pub fn destroy_all(&mut self, host: &mut dyn Host) {
        for (element, mut ctrl) in std::mem::take(&mut self.instances) {
            ctrl.destroy(host);
            host.remove_class(element, LOADED_CLASS);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/manager.rs"]
mod tests;
