//! Per-element correction control.
//!
//! A [`Control`] owns the trigger button and tooltip of one tracked element,
//! its correction state, its in-flight request and its timers. It never calls
//! the provider itself: submissions come back as [`CorrectionRequest`]s for the
//! dispatcher to spawn, and results come in through [`Control::on_settled`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use proofmark_config::OverlayConfig;
use proofmark_protocols::{
    ButtonView, DiffSegment, EditableSurface, ElementId, ElementKind, HitTarget, Icon, OverlayFrame, Page,
    ProviderError, Rect, SessionId, Size, TooltipContent, TooltipView,
};

use crate::correction::{CorrectionRequest, RequestId};
use crate::diff::{diff, word_count};
use crate::events::CorrectionSettled;
use crate::position::{PlacementConfig, button_placement, place, tooltip_placement};
use crate::timers::{TimerKind, TimerRegistry};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const UNAVAILABLE_MESSAGE: &str = "Grammar correction is not available. Check the provider settings.";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Why the last request did not produce a correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFailure {
    /// The provider's readiness check failed. Persistent.
    Unavailable,
    /// The request itself failed. Reverts after the reset delay.
    RequestFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionState {
    Idle,
    Loading,
    Wrong(Vec<DiffSegment>),
    Correct,
    Error(ControlFailure),
}

impl CorrectionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Wrong(_) => "wrong",
            Self::Correct => "correct",
            Self::Error(ControlFailure::Unavailable) => "unavailable",
            Self::Error(ControlFailure::RequestFailed(_)) => "failed",
        }
    }

    fn icon(&self) -> Icon {
        match self {
            Self::Idle => Icon::Info,
            Self::Loading => Icon::Loading,
            Self::Wrong(_) => Icon::Warning,
            Self::Correct => Icon::Check,
            Self::Error(_) => Icon::Power,
        }
    }

    /// States whose tooltip has something to say.
    fn has_tooltip(&self) -> bool {
        matches!(self, Self::Loading | Self::Wrong(_) | Self::Error(_))
    }
}

#[derive(Debug)]
struct InFlight {
    id: RequestId,
    text: String,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct Control {
    session: SessionId,
    target: ElementId,
    kind: ElementKind,
    config: OverlayConfig,
    button_layout: PlacementConfig,
    tooltip_layout: PlacementConfig,

    state: CorrectionState,
    icon: Icon,
    /// Latest text read from the target.
    text: String,
    /// Corrected text of the latest settled request.
    result: Option<String>,
    in_flight: Option<InFlight>,
    next_request: u64,

    /// Set by the first submission; the button stays hidden before that.
    engaged: bool,
    focus_within: bool,
    pinned: bool,
    button_peek: bool,
    tooltip_hover: bool,
    /// A failed request's tooltip was dismissed by the reset timer.
    faded: bool,

    timers: TimerRegistry,
    last_frame: Option<OverlayFrame>,
}

impl Control {
    pub fn new(session: SessionId, target: ElementId, kind: ElementKind, config: OverlayConfig) -> Self {
        Self {
            session,
            target,
            kind,
            button_layout: button_placement(&config),
            tooltip_layout: tooltip_placement(&config),
            config,
            state: CorrectionState::Idle,
            icon: Icon::Info,
            text: String::new(),
            result: None,
            in_flight: None,
            next_request: 0,
            engaged: false,
            focus_within: false,
            pinned: false,
            button_peek: false,
            tooltip_hover: false,
            faded: false,
            timers: TimerRegistry::new(),
            last_frame: None,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn state(&self) -> &CorrectionState {
        &self.state
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    pub fn has_focus(&self) -> bool {
        self.focus_within
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn last_frame(&self) -> Option<&OverlayFrame> {
        self.last_frame.as_ref()
    }

    pub fn button_visible(&self) -> bool {
        self.engaged && self.focus_within
    }

    pub fn tooltip_visible(&self) -> bool {
        self.button_visible()
            && !self.faded
            && self.state.has_tooltip()
            && (self.pinned || self.button_peek || self.tooltip_hover)
    }

    fn owns(&self, target: HitTarget) -> bool {
        target.is_overlay() || target == HitTarget::Element(self.target)
    }

    pub fn on_focus_in(&mut self, target: HitTarget) {
        if !self.owns(target) {
            return;
        }
        self.focus_within = true;
        if target == HitTarget::Button {
            self.button_peek = true;
        }
    }

    /// Focus leaving `target`. Moving between the target, the button and the
    /// tooltip keeps focus within the control.
    pub fn on_focus_out(&mut self, target: HitTarget, related: Option<HitTarget>) {
        if !self.owns(target) {
            return;
        }
        if target == HitTarget::Button {
            self.button_peek = false;
        }
        if related.is_some_and(|r| self.owns(r)) {
            return;
        }
        self.focus_within = false;
        self.pinned = false;
        self.button_peek = false;
        self.tooltip_hover = false;
    }

    pub fn on_hover(&mut self, target: HitTarget, entered: bool) {
        match target {
            HitTarget::Button => self.button_peek = entered,
            HitTarget::Tooltip => self.tooltip_hover = entered,
            _ => {}
        }
    }

    pub fn on_click_outside(&mut self) {
        self.pinned = false;
        self.button_peek = false;
        self.tooltip_hover = false;
    }

    /// Read the target's text and submit it when it passes the word gate.
    pub fn on_input<S: EditableSurface + ?Sized>(&mut self, page: &S, now: Duration) -> Option<CorrectionRequest> {
        let text = page.text(self.target)?;
        self.text = text;

        if word_count(&self.text) < self.config.min_words {
            self.below_gate(now);
            return None;
        }
        Some(self.submit(now))
    }

    fn below_gate(&mut self, now: Duration) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!("{} {} dropped below word gate", self.session, in_flight.id);
            in_flight.cancel.cancel();
        }
        if matches!(self.state, CorrectionState::Loading | CorrectionState::Wrong(_)) {
            self.result = None;
            self.enter(CorrectionState::Idle, now);
        }
    }

    fn submit(&mut self, now: Duration) -> CorrectionRequest {
        if let Some(previous) = self.in_flight.take() {
            debug!("{} {} superseded", self.session, previous.id);
            previous.cancel.cancel();
        }

        self.next_request += 1;
        let id = RequestId::new(self.next_request);
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            id,
            text: self.text.clone(),
            cancel: cancel.clone(),
        });
        self.result = None;

        if !self.engaged {
            self.engaged = true;
            self.timers
                .repeating(TimerKind::PositionRefresh, now, self.config.position_refresh());
        }
        self.enter(CorrectionState::Loading, now);
        debug!("{} submitting {} ({} chars)", self.session, id, self.text.len());

        CorrectionRequest {
            session: self.session,
            request: id,
            text: self.text.clone(),
            cancel,
        }
    }

    /// Apply a provider outcome. Returns whether it was accepted.
    pub fn on_settled(&mut self, settled: CorrectionSettled, now: Duration) -> bool {
        let Some(in_flight) = self.in_flight.as_ref() else {
            debug!("{} ignoring {}: nothing in flight", self.session, settled.request);
            return false;
        };
        if in_flight.id != settled.request {
            debug!(
                "{} ignoring stale {} (latest {})",
                self.session, settled.request, in_flight.id
            );
            return false;
        }
        if matches!(settled.outcome, Err(ProviderError::Cancelled)) {
            debug!("{} {} cancelled by provider", self.session, settled.request);
            self.in_flight = None;
            if self.state == CorrectionState::Loading {
                self.enter(CorrectionState::Idle, now);
            }
            return false;
        }

        let submitted = match self.in_flight.take() {
            Some(in_flight) => in_flight.text,
            None => return false,
        };
        if submitted != self.text {
            debug!("{} ignoring {}: text changed", self.session, settled.request);
            return false;
        }

        match settled.outcome {
            Ok(corrected) if corrected == submitted => {
                self.result = Some(corrected);
                self.enter(CorrectionState::Correct, now);
            }
            Ok(corrected) => {
                let segments = diff(&submitted, &corrected);
                self.result = Some(corrected);
                self.enter(CorrectionState::Wrong(segments), now);
            }
            Err(err) if err.is_unavailable() => {
                warn!("{} provider unavailable: {}", self.session, err);
                self.enter(CorrectionState::Error(ControlFailure::Unavailable), now);
            }
            Err(err) => {
                warn!("{} correction failed: {}", self.session, err);
                self.enter(CorrectionState::Error(ControlFailure::RequestFailed(err.to_string())), now);
            }
        }
        true
    }

    /// Button activation.
    pub fn activate<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) -> Option<CorrectionRequest> {
        match self.state {
            CorrectionState::Loading => {
                self.pinned = true;
                None
            }
            CorrectionState::Wrong(_) => {
                if self.kind.supports_replacement() {
                    self.apply(page, now);
                } else {
                    self.pinned = !self.pinned;
                }
                None
            }
            CorrectionState::Correct => None,
            CorrectionState::Idle | CorrectionState::Error(_) => {
                if self.tooltip_visible() {
                    self.pinned = false;
                    self.button_peek = false;
                    self.tooltip_hover = false;
                    return None;
                }
                self.on_input(&*page, now)
            }
        }
    }

    /// Tooltip activation: hand the correction to the page.
    pub fn activate_tooltip<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) {
        if matches!(self.state, CorrectionState::Wrong(_)) {
            self.apply(page, now);
        }
    }

    fn apply<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) {
        let Some(corrected) = self.result.clone() else {
            return;
        };

        let applied = if self.kind.supports_replacement() {
            page.set_text(self.target, &corrected)
        } else {
            page.write_clipboard(&corrected)
        };

        match applied {
            Ok(()) => {
                if self.kind.supports_replacement() {
                    self.text = corrected;
                } else {
                    info!("{} correction copied to clipboard", self.session);
                }
                self.enter(CorrectionState::Correct, now);
            }
            Err(err) => warn!("{} could not apply correction: {}", self.session, err),
        }
    }

    /// Fire due timers. Returns whether any fired.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        let due = self.timers.take_due(now);
        for kind in &due {
            match kind {
                TimerKind::IconReset => self.reset_icon(now),
                TimerKind::PositionRefresh => {}
            }
        }
        !due.is_empty()
    }

    fn reset_icon(&mut self, now: Duration) {
        match self.state {
            CorrectionState::Correct => self.enter(CorrectionState::Idle, now),
            CorrectionState::Error(ControlFailure::RequestFailed(_)) => {
                self.faded = true;
                self.pinned = false;
                self.icon = Icon::Info;
                debug!("{} failure faded", self.session);
            }
            _ => {}
        }
    }

    fn enter(&mut self, state: CorrectionState, now: Duration) {
        self.timers.cancel(TimerKind::IconReset);
        self.faded = false;
        self.icon = state.icon();

        if matches!(
            state,
            CorrectionState::Correct | CorrectionState::Error(ControlFailure::RequestFailed(_))
        ) {
            self.timers.once(TimerKind::IconReset, now, self.config.reset_delay());
        }
        if matches!(state, CorrectionState::Idle | CorrectionState::Correct) {
            self.pinned = false;
        }

        debug!("{} {} -> {}", self.session, self.state.name(), state.name());
        self.state = state;
    }

    fn tooltip_content(&self) -> TooltipContent {
        match &self.state {
            CorrectionState::Loading => TooltipContent::Message(LOADING_MESSAGE.to_string()),
            CorrectionState::Wrong(segments) => TooltipContent::Diff(segments.clone()),
            CorrectionState::Error(ControlFailure::Unavailable) => {
                TooltipContent::Message(UNAVAILABLE_MESSAGE.to_string())
            }
            CorrectionState::Error(ControlFailure::RequestFailed(_)) => {
                TooltipContent::Message(FAILURE_MESSAGE.to_string())
            }
            CorrectionState::Idle | CorrectionState::Correct => TooltipContent::Message(String::new()),
        }
    }

    /// Compute the current frame and present it if it changed.
    pub fn render<P: Page + ?Sized>(&mut self, page: &mut P) {
        let Some(reference) = page.bounding_box(self.target) else {
            return;
        };
        let viewport = page.viewport();
        let scroll = page.scroll_offset();

        let button_size = Size::new(self.config.button_size, self.config.button_size);
        let button = place(reference, button_size, viewport, &self.button_layout);
        let button_rect = Rect::from_origin_size(button.point(), button_size);

        let content = self.tooltip_content();
        let max = Size::new(self.config.tooltip_max_width, self.config.tooltip_max_height);
        let tooltip_size = page.measure_tooltip(&content, max);
        let tooltip = place(button_rect, tooltip_size, viewport, &self.tooltip_layout);

        let frame = OverlayFrame {
            session: self.session,
            target: self.target,
            button: ButtonView {
                icon: self.icon,
                visible: self.button_visible(),
                position: button.to_document(scroll),
                z_index: self.config.z_index,
            },
            tooltip: TooltipView {
                visible: self.tooltip_visible(),
                content,
                position: tooltip.to_document(scroll),
                z_index: self.config.z_index.saturating_add(1),
            },
        };

        if self.last_frame.as_ref() != Some(&frame) {
            page.present(&frame);
            self.last_frame = Some(frame);
        }
    }

    /// Cancel everything and remove the overlay.
    pub fn teardown<P: Page + ?Sized>(mut self, page: &mut P) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
        let cancelled = self.timers.cancel_all();
        page.dismiss(self.session);
        info!(
            "{} detached from {} ({} timers cancelled)",
            self.session, self.target, cancelled
        );
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
