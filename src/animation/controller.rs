//! The per-element count-up state machine.
//!
//! ```text
//! Idle --arm--> Armed --visible--> Animating --progress==1--> Completed
//!                                    |   ^                       |
//!                                  stop  +-------- reset --------+
//!                                    v
//!                                   Idle
//! any state --destroy--> Destroyed
//! ```
//!
//! A controller never holds a borrow of its host; every operation receives
//! the host explicitly and host callbacks come back as tokens
//! ([`ObserverId`], [`FrameHandle`]) that must match the controller's single
//! outstanding subscription before anything is touched.

use crate::{
    animation::progress::{Lerp, linear_progress},
    config::options::{
        ElementConfig, Overrides, ResolvedOptions, effective_locale, resolve_with_locale,
    },
    config::record::OriginalValueRecord,
    foundation::core::{ElementId, FrameHandle, ObserverId, Timestamp},
    foundation::error::{CountUpError, CountUpResult},
    format::number::{decimal_separator, format},
    format::value::parse_value_with,
    host::{CountUpEvent, Host},
};

/// Lifecycle state of an [`AnimationController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ControllerState {
    /// Constructed, or stopped mid-run; nothing scheduled.
    Idle,
    /// Waiting for the element to enter the viewport.
    Armed,
    /// Render loop running.
    Animating,
    /// End value displayed and completion dispatched.
    Completed,
    /// Torn down; every operation is a no-op.
    Destroyed,
}

/// What a delivered frame callback did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The callback was stale or the controller is not animating.
    Ignored,
    /// A frame was rendered and the next one scheduled.
    Rendered {
        /// Fraction of the duration elapsed at this frame.
        progress: f64,
    },
    /// The final frame was rendered.
    Completed,
}

/// Drives the count-up animation of one element.
#[derive(Debug)]
pub struct AnimationController {
    element: ElementId,
    state: ControllerState,
    options: ResolvedOptions,
    overrides: Overrides,
    record: OriginalValueRecord,
    observer: Option<ObserverId>,
    pending_frame: Option<FrameHandle>,
    started_at: Timestamp,
    width_reserved: bool,
}

impl AnimationController {
    /// Capture the element's original value, resolve options, reserve the
    /// element's width and arm the visibility trigger.
    ///
    /// Fails without touching presentation when the element is unknown to
    /// the host or its value cannot be counted to.
    #[tracing::instrument(skip(host, overrides))]
    pub fn new(
        host: &mut dyn Host,
        element: ElementId,
        overrides: Overrides,
    ) -> CountUpResult<Self> {
        if !host.contains(element) {
            return Err(CountUpError::host(format!("{element} does not exist")));
        }

        let (config, locale) = read_config(host, element, &overrides);
        let text = host.text(element).unwrap_or_default();
        let current = parse_value_with(&text, decimal_separator(locale));
        let record = OriginalValueRecord::load_or_capture(host, element, &current);

        let options = resolve_with_locale(&config, locale, &record, &current, &overrides);
        options.validate()?;

        let mut controller = Self {
            element,
            state: ControllerState::Idle,
            options,
            overrides,
            record,
            observer: None,
            pending_frame: None,
            started_at: Timestamp::ZERO,
            width_reserved: false,
        };
        controller.setup_presentation(host);
        controller.arm(host);
        Ok(controller)
    }

    /// Element this controller drives.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Options of the current (or next) run.
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Original value captured from the element.
    pub fn record(&self) -> &OriginalValueRecord {
        &self.record
    }

    /// Whether the render loop is running.
    pub fn is_animating(&self) -> bool {
        self.state == ControllerState::Animating
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.state == ControllerState::Destroyed
    }

    /// Text shown for `value` with the resolved formatting options.
    pub fn render_text(&self, value: f64) -> String {
        let o = &self.options;
        let mut text = format(value, o.decimals, Some(&o.locale), o.has_separator);
        text.push_str(&o.suffix);
        text
    }

    fn setup_presentation(&mut self, host: &mut dyn Host) {
        let end_text = self.render_text(self.options.end_number);
        let width = host.measure_text(self.element, &end_text);
        host.set_style(self.element, "font-variant-numeric", "tabular-nums");
        host.set_style(self.element, "display", "inline-block");
        host.set_style(self.element, "min-width", &format!("{width}px"));
        host.set_style(self.element, "text-align", "right");
        self.width_reserved = true;
    }

    fn release_width(&mut self, host: &mut dyn Host) {
        if std::mem::take(&mut self.width_reserved) {
            host.set_style(self.element, "min-width", "");
        }
    }

    fn arm(&mut self, host: &mut dyn Host) {
        self.observer = Some(host.observe_visibility(self.element));
        self.state = ControllerState::Armed;
        tracing::debug!(element = %self.element, "armed");
    }

    fn disarm(&mut self, host: &mut dyn Host) {
        if let Some(observer) = self.observer.take() {
            host.disconnect_visibility(observer);
        }
    }

    /// Handle a visibility notice. Starts the run the first time the element
    /// intersects the viewport; returns whether it did.
    pub fn on_visibility(
        &mut self,
        host: &mut dyn Host,
        observer: ObserverId,
        intersecting: bool,
    ) -> bool {
        if self.state != ControllerState::Armed || self.observer != Some(observer) || !intersecting
        {
            return false;
        }
        self.disarm(host);
        self.start_loop(host);
        true
    }

    fn start_loop(&mut self, host: &mut dyn Host) {
        self.state = ControllerState::Animating;
        self.started_at = host.now();
        self.pending_frame = Some(host.request_frame(self.element));
        tracing::debug!(
            element = %self.element,
            from = self.options.starting_number,
            to = self.options.end_number,
            duration_ms = self.options.duration_ms,
            "count started"
        );
    }

    /// Handle a frame callback delivered at `now`.
    ///
    /// Only the controller's current pending handle is honored, so callbacks
    /// that raced with [`stop`](Self::stop) or [`destroy`](Self::destroy)
    /// are ignored.
    pub fn on_frame(
        &mut self,
        host: &mut dyn Host,
        handle: FrameHandle,
        now: Timestamp,
    ) -> FrameOutcome {
        if self.state != ControllerState::Animating || self.pending_frame != Some(handle) {
            return FrameOutcome::Ignored;
        }
        self.pending_frame = None;

        let progress = linear_progress(now.since(self.started_at), self.options.duration_ms);
        let value = f64::lerp(
            &self.options.starting_number,
            &self.options.end_number,
            progress,
        );
        host.set_text(self.element, &self.render_text(value));
        if let Some(container) = host.scaled_text_container(self.element) {
            host.rescale_text(container);
        }

        if progress < 1.0 {
            self.pending_frame = Some(host.request_frame(self.element));
            return FrameOutcome::Rendered { progress };
        }

        self.state = ControllerState::Completed;
        host.dispatch(&CountUpEvent::complete(self.element));
        self.release_width(host);
        tracing::debug!(element = %self.element, "count complete");
        FrameOutcome::Completed
    }

    /// Cancel the render loop, keeping whatever text is displayed.
    pub fn stop(&mut self, host: &mut dyn Host) {
        if let Some(handle) = self.pending_frame.take() {
            host.cancel_frame(handle);
        }
        if self.state == ControllerState::Animating {
            self.state = ControllerState::Idle;
            tracing::debug!(element = %self.element, "stopped");
        }
    }

    /// Restore the original text, re-read configuration and count again from
    /// the start value right away.
    ///
    /// If the re-read configuration is no longer countable, the original text
    /// stays in place, the controller idles and the error is returned.
    #[tracing::instrument(skip(self, host), fields(element = %self.element))]
    pub fn reset(&mut self, host: &mut dyn Host) -> CountUpResult<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.stop(host);
        self.disarm(host);
        host.set_text(self.element, &self.record.content);

        let (config, locale) = read_config(host, self.element, &self.overrides);
        let current = parse_value_with(&self.record.content, decimal_separator(locale));
        let options =
            resolve_with_locale(&config, locale, &self.record, &current, &self.overrides);
        if let Err(err) = options.validate() {
            self.state = ControllerState::Idle;
            self.release_width(host);
            return Err(err);
        }
        self.options = options;

        self.setup_presentation(host);
        self.start_loop(host);
        Ok(())
    }

    /// Stop, disconnect the visibility trigger and go dormant for good.
    pub fn destroy(&mut self, host: &mut dyn Host) {
        if self.is_destroyed() {
            return;
        }
        self.stop(host);
        self.disarm(host);
        self.release_width(host);
        self.state = ControllerState::Destroyed;
        tracing::debug!(element = %self.element, "destroyed");
    }
}

// The locale is chosen once so text parsing and option resolution agree.
fn read_config(
    host: &dyn Host,
    element: ElementId,
    overrides: &Overrides,
) -> (ElementConfig, &'static str) {
    let config = ElementConfig::from_host(host, element);
    let locale = effective_locale(&config, overrides);
    (config, locale)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/controller.rs"]
mod tests;
