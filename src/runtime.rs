//! Event-loop driver for a [`Page`].
//!
//! Each step moves the virtual clock, then delivers what became due in the
//! order a browser would: tree mutations, visibility notices, then one round
//! of frame callbacks.

use crate::{
    foundation::core::Timestamp,
    host::Host,
    host::page::Page,
    lifecycle::manager::{ControlHandle, InstanceLifecycleManager},
};

/// Default spacing between frames, roughly one 60 Hz refresh.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

// Mutation handling can itself detach nodes (text replacement); bound the
// number of follow-up batches processed in one step.
const MAX_MUTATION_ROUNDS: usize = 16;

/// A [`Page`] together with the manager of its counters.
#[derive(Debug, Default)]
pub struct Runtime {
    page: Page,
    manager: InstanceLifecycleManager,
}

impl Runtime {
    /// Runtime over `page` with an empty manager.
    pub fn new(page: Page) -> Self {
        Self {
            page,
            manager: InstanceLifecycleManager::new(),
        }
    }

    /// The driven page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable page access, e.g. to swap content between steps.
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// The counter registry.
    pub fn manager(&self) -> &InstanceLifecycleManager {
        &self.manager
    }

    /// Mutable access to both halves, for calling manager operations that
    /// need the host.
    pub fn parts_mut(&mut self) -> (&mut InstanceLifecycleManager, &mut Page) {
        (&mut self.manager, &mut self.page)
    }

    /// Discover counters on the page and deliver anything already due.
    pub fn start(&mut self) -> Vec<ControlHandle> {
        let now = self.page.now();
        self.page.set_time(now);
        let handles = self.manager.discover(&mut self.page);
        // Shorthand replacement reports mutations for nodes discovery already
        // handled; they are marked loaded and therefore skipped.
        self.flush();
        handles
    }

    /// Deliver pending notifications without moving the clock.
    pub fn flush(&mut self) {
        self.deliver_mutations();
        for notice in self.page.take_visibility_notices() {
            self.manager.on_visibility(
                &mut self.page,
                notice.element,
                notice.observer,
                notice.intersecting,
            );
        }
        self.deliver_mutations();

        let now = self.page.now();
        for frame in self.page.take_frames() {
            self.manager
                .on_frame(&mut self.page, frame.element, frame.handle, now);
        }
        self.deliver_mutations();
    }

    fn deliver_mutations(&mut self) {
        for _ in 0..MAX_MUTATION_ROUNDS {
            let batch = self.page.take_mutations();
            if batch.is_empty() {
                return;
            }
            for record in &batch {
                self.manager.on_mutation(&mut self.page, record);
            }
        }
        tracing::warn!("mutation delivery did not settle");
    }

    /// Move the clock to `t` and deliver everything due.
    pub fn advance_to(&mut self, t: Timestamp) {
        self.page.set_time(t);
        self.flush();
    }

    /// Step the clock in `interval_ms` increments for `total_ms`.
    ///
    /// An interval that is not a positive finite number is replaced by
    /// [`DEFAULT_FRAME_INTERVAL_MS`]; a non-finite `total_ms` runs nothing.
    pub fn run_for(&mut self, total_ms: f64, interval_ms: f64) {
        let interval = frame_interval(interval_ms);
        let total = if total_ms.is_finite() { total_ms.max(0.0) } else { 0.0 };
        let end = self.page.now().offset(total);
        let mut t = self.page.now();
        while t < end {
            let next = t.offset(interval);
            // Too small a step for the clock's magnitude.
            if next <= t {
                tracing::warn!(
                    interval,
                    at = t.as_millis(),
                    "frame interval does not advance the clock"
                );
                break;
            }
            t = if next > end { end } else { next };
            self.advance_to(t);
        }
    }

    /// Whether anything is still scheduled to happen.
    pub fn is_idle(&self) -> bool {
        self.page.pending_frames() == 0 && !self.page.has_scheduled_visibility()
    }

    /// Step until nothing is scheduled or `limit_ms` has passed; returns the
    /// clock reading at which stepping stopped.
    pub fn run_until_idle(&mut self, interval_ms: f64, limit_ms: f64) -> Timestamp {
        let interval = frame_interval(interval_ms);
        let limit = if limit_ms.is_finite() { limit_ms.max(0.0) } else { 0.0 };
        let end = self.page.now().offset(limit);
        while !self.is_idle() && self.page.now() < end {
            let now = self.page.now();
            let next = now.offset(interval);
            if next <= now {
                tracing::warn!(
                    interval,
                    at = now.as_millis(),
                    "frame interval does not advance the clock"
                );
                break;
            }
            self.advance_to(if next > end { end } else { next });
        }
        self.page.now()
    }
}

fn frame_interval(interval_ms: f64) -> f64 {
    if interval_ms.is_finite() && interval_ms > 0.0 {
        interval_ms
    } else {
        DEFAULT_FRAME_INTERVAL_MS
    }
}
