//! Page watcher and event loop.
//!
//! The [`Dispatcher`] owns the host page, the candidate set and at most one
//! [`Control`]. Every state change happens inside [`Dispatcher::handle`],
//! called either directly by a host or from [`Dispatcher::run`] as events
//! arrive on the queue.
//!
//! Submissions spawn tokio tasks, so `handle` must be called from within a
//! tokio runtime.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use proofmark_config::OverlayConfig;
use proofmark_protocols::{ElementId, GrammarProvider, HitTarget, Page, SessionId};

use crate::clock::Clock;
use crate::control::Control;
use crate::correction::{CorrectionRequest, spawn_correction};
use crate::error::{DispatchError, DispatchResult};
use crate::events::{CorrectionSettled, PageEvent};

/// Cloneable handle for posting events to a dispatcher.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl EventSender {
    pub fn send(&self, event: impl Into<PageEvent>) -> DispatchResult<()> {
        self.tx.send(event.into()).map_err(|_| DispatchError::QueueClosed)
    }
}

pub struct Dispatcher<P: Page> {
    page: P,
    provider: Arc<dyn GrammarProvider>,
    clock: Arc<dyn Clock>,
    config: OverlayConfig,
    control: Option<Control>,
    candidates: BTreeSet<ElementId>,
    next_session: u64,
    tx: mpsc::UnboundedSender<PageEvent>,
    rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl<P: Page> Dispatcher<P> {
    pub fn new(page: P, provider: Arc<dyn GrammarProvider>, clock: Arc<dyn Clock>, config: OverlayConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let candidates: BTreeSet<ElementId> = page
            .elements()
            .into_iter()
            .filter(|id| page.is_trackable(*id))
            .collect();
        debug!("Initial scan found {} trackable elements", candidates.len());

        Self {
            page,
            provider,
            clock,
            config,
            control: None,
            candidates,
            next_session: 0,
            tx,
            rx,
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(mut self) -> P {
        self.shutdown();
        self.page
    }

    pub fn control(&self) -> Option<&Control> {
        self.control.as_ref()
    }

    pub fn candidates(&self) -> &BTreeSet<ElementId> {
        &self.candidates
    }

    /// Earliest pending timer deadline of the live control.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.control.as_ref().and_then(Control::next_deadline)
    }

    /// Apply one event.
    pub fn handle(&mut self, event: PageEvent) {
        let now = self.clock.now();

        match event {
            PageEvent::FocusIn { target } => {
                if let HitTarget::Element(id) = target {
                    self.track(id);
                }
                if let Some(control) = self.control.as_mut() {
                    control.on_focus_in(target);
                }
            }
            PageEvent::FocusOut { target, related } => {
                if let Some(control) = self.control.as_mut() {
                    control.on_focus_out(target, related);
                }
            }
            PageEvent::Input { target } => {
                self.track(target);
                let focused = self.page.active_element() == Some(target);
                let request = match self.control.as_mut() {
                    Some(control) if control.target() == target => {
                        if focused {
                            control.on_focus_in(HitTarget::Element(target));
                        }
                        control.on_input(&self.page, now)
                    }
                    _ => None,
                };
                self.submit(request);
            }
            PageEvent::SubtreeChanged { added, removed } => self.on_subtree_changed(&added, &removed),
            PageEvent::LayoutChanged => {}
            PageEvent::Click { target } => self.on_click(target, now),
            PageEvent::Hover { target, entered } => {
                if let Some(control) = self.control.as_mut() {
                    control.on_hover(target, entered);
                }
            }
            PageEvent::CorrectionSettled(settled) => self.on_settled(settled, now),
        }

        self.render();
    }

    fn on_click(&mut self, target: HitTarget, now: Duration) {
        let Some(control) = self.control.as_mut() else {
            return;
        };
        match target {
            HitTarget::Button => {
                let request = control.activate(&mut self.page, now);
                self.submit(request);
            }
            HitTarget::Tooltip => control.activate_tooltip(&mut self.page, now),
            HitTarget::Element(id) if id == control.target() => {}
            HitTarget::Element(_) | HitTarget::Elsewhere => control.on_click_outside(),
        }
    }

    fn on_settled(&mut self, settled: CorrectionSettled, now: Duration) {
        match self.control.as_mut() {
            Some(control) if control.session() == settled.session => {
                control.on_settled(settled, now);
            }
            _ => debug!("Dropping result for ended {}", settled.session),
        }
    }

    fn on_subtree_changed(&mut self, added: &[ElementId], removed: &[ElementId]) {
        for id in removed {
            self.candidates.remove(id);
        }
        self.candidates.retain(|id| self.page.is_connected(*id));
        for id in added {
            if self.page.is_trackable(*id) {
                self.candidates.insert(*id);
            }
        }

        let disconnected = self
            .control
            .as_ref()
            .is_some_and(|control| !self.page.is_connected(control.target()));
        if disconnected {
            info!("Tracked element left the document");
            self.detach();
        }

        if let Some(active) = self.page.active_element() {
            if added.contains(&active) && self.page.is_trackable(active) {
                self.track(active);
                if let Some(control) = self.control.as_mut() {
                    control.on_focus_in(HitTarget::Element(active));
                }
            }
        }
    }

    /// Make `id` the tracked element, replacing any other control.
    fn track(&mut self, id: ElementId) {
        if self.control.as_ref().is_some_and(|c| c.target() == id) {
            return;
        }
        let Some(kind) = self.page.kind(id).filter(|_| self.page.is_trackable(id)) else {
            return;
        };

        self.detach();
        self.candidates.insert(id);
        self.next_session += 1;
        let session = SessionId::new(self.next_session);
        info!("{} attached to {} ({:?})", session, id, kind);
        self.control = Some(Control::new(session, id, kind, self.config.clone()));
    }

    fn detach(&mut self) {
        if let Some(control) = self.control.take() {
            control.teardown(&mut self.page);
        }
    }

    fn submit(&self, request: Option<CorrectionRequest>) {
        if let Some(request) = request {
            spawn_correction(self.provider.clone(), request, self.tx.clone());
        }
    }

    fn render(&mut self) {
        if let Some(control) = self.control.as_mut() {
            control.render(&mut self.page);
        }
    }

    /// Fire timers due at the clock's current time. Returns whether any fired.
    pub fn advance(&mut self) -> bool {
        let now = self.clock.now();
        let fired = self
            .control
            .as_mut()
            .is_some_and(|control| control.fire_due(now));
        if fired {
            self.render();
        }
        fired
    }

    /// Handle every event already queued, without waiting. Returns how many.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Handle queued events until the live control has no request in flight.
    pub async fn settle(&mut self) {
        while self
            .control
            .as_ref()
            .is_some_and(|control| control.in_flight_request().is_some())
        {
            match self.rx.recv().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }
    }

    /// Event loop: queue events and timer deadlines until `shutdown` fires.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("Dispatcher started");
        loop {
            let wait = self
                .next_deadline()
                .map(|deadline| deadline.saturating_sub(self.clock.now()));

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = self.rx.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = sleep_or_pending(wait) => {
                    self.advance();
                }
            }
        }
        self.shutdown();
        info!("Dispatcher stopped");
    }

    /// Tear down the live control.
    pub fn shutdown(&mut self) {
        self.detach();
    }
}

async fn sleep_or_pending(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
