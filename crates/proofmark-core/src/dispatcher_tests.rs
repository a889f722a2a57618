use super::*;
use crate::clock::ManualClock;
use crate::control::CorrectionState;
use crate::memory_page::{MemoryElement, MemoryPage};
use async_trait::async_trait;
use proofmark_protocols::{EditableSurface, ProviderError, Rect};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replaces "has" with "have"; everything else is already correct.
struct FixingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl GrammarProvider for FixingProvider {
    fn id(&self) -> &str {
        "fixing"
    }

    async fn is_supported(&self) -> bool {
        true
    }

    async fn fix_grammar(&self, text: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.replace(" has ", " have "))
    }
}

struct Fixture {
    dispatcher: Dispatcher<MemoryPage>,
    provider: Arc<FixingProvider>,
    first: ElementId,
    second: ElementId,
}

fn fixture() -> Fixture {
    let mut page = MemoryPage::default();
    let first = page.insert(MemoryElement::textarea(Rect::new(100.0, 100.0, 400.0, 200.0)));
    let second = page.insert(MemoryElement::content_editable(Rect::new(100.0, 400.0, 400.0, 200.0)));
    page.insert(MemoryElement::textarea(Rect::new(0.0, 0.0, 10.0, 10.0)).with_spellcheck(false));

    let provider = Arc::new(FixingProvider {
        calls: AtomicUsize::new(0),
    });
    let dispatcher = Dispatcher::new(
        page,
        provider.clone(),
        Arc::new(ManualClock::new()),
        OverlayConfig::default(),
    );
    Fixture {
        dispatcher,
        provider,
        first,
        second,
    }
}

fn type_into(dispatcher: &mut Dispatcher<MemoryPage>, id: ElementId, text: &str) {
    dispatcher.page_mut().type_text(id, text);
    dispatcher.handle(PageEvent::Input { target: id });
}

#[test]
fn test_initial_scan_collects_trackable_elements() {
    let f = fixture();
    assert_eq!(
        f.dispatcher.candidates().iter().copied().collect::<Vec<_>>(),
        vec![f.first, f.second]
    );
    assert!(f.dispatcher.control().is_none());
}

#[tokio::test]
async fn test_focus_attaches_control() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });

    let control = f.dispatcher.control().unwrap();
    assert_eq!(control.target(), f.first);
    assert!(control.has_focus());
    assert_eq!(control.session(), SessionId::new(1));
}

#[tokio::test]
async fn test_focus_on_untrackable_element_is_ignored() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(ElementId::new(3)),
    });
    assert!(f.dispatcher.control().is_none());
}

#[tokio::test]
async fn test_input_round_trip_through_provider() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    type_into(&mut f.dispatcher, f.first, "I has a apple");
    assert_eq!(f.dispatcher.control().unwrap().state(), &CorrectionState::Loading);

    f.dispatcher.settle().await;

    let control = f.dispatcher.control().unwrap();
    assert!(matches!(control.state(), CorrectionState::Wrong(_)));
    assert_eq!(control.result(), Some("I have a apple"));
    assert_eq!(f.provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_input_on_already_focused_element_shows_button() {
    let mut page = MemoryPage::default();
    let id = page.insert(MemoryElement::textarea(Rect::new(100.0, 100.0, 400.0, 200.0)));
    page.focus(Some(id));
    let provider = Arc::new(FixingProvider {
        calls: AtomicUsize::new(0),
    });
    let mut dispatcher = Dispatcher::new(page, provider, Arc::new(ManualClock::new()), OverlayConfig::default());

    type_into(&mut dispatcher, id, "I has a apple");
    dispatcher.settle().await;

    let control = dispatcher.control().unwrap();
    assert!(control.has_focus());
    assert!(matches!(control.state(), CorrectionState::Wrong(_)));
    assert!(dispatcher.page().last_frame().unwrap().button.visible);
}

#[tokio::test]
async fn test_switching_elements_tears_down_previous_control() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    type_into(&mut f.dispatcher, f.first, "I has a apple");
    f.dispatcher.settle().await;

    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.second),
    });

    let control = f.dispatcher.control().unwrap();
    assert_eq!(control.target(), f.second);
    assert_eq!(control.session(), SessionId::new(2));
    assert_eq!(f.dispatcher.page().dismissed(), &[SessionId::new(1)]);
}

#[tokio::test]
async fn test_result_for_ended_session_is_dropped() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    type_into(&mut f.dispatcher, f.first, "I has a apple");
    let stale_request = f.dispatcher.control().unwrap().in_flight_request().unwrap();

    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.second),
    });
    f.dispatcher.handle(PageEvent::CorrectionSettled(CorrectionSettled {
        session: SessionId::new(1),
        request: stale_request,
        outcome: Ok("I have an apple".to_string()),
    }));

    let control = f.dispatcher.control().unwrap();
    assert_eq!(control.session(), SessionId::new(2));
    assert_eq!(control.state(), &CorrectionState::Idle);
}

#[tokio::test]
async fn test_removing_tracked_element_destroys_control() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    type_into(&mut f.dispatcher, f.first, "I has a apple");
    let frames_before = f.dispatcher.page().frames().len();

    f.dispatcher.page_mut().remove(f.first);
    f.dispatcher.handle(PageEvent::SubtreeChanged {
        added: vec![],
        removed: vec![f.first],
    });

    assert!(f.dispatcher.control().is_none());
    assert!(!f.dispatcher.candidates().contains(&f.first));
    assert_eq!(f.dispatcher.page().dismissed(), &[SessionId::new(1)]);

    // The cancelled request never reports back and nothing else is drawn.
    f.dispatcher.drain();
    assert_eq!(f.dispatcher.page().frames().len(), frames_before);
}

#[tokio::test]
async fn test_added_active_element_is_attached() {
    let mut f = fixture();
    let added = f
        .dispatcher
        .page_mut()
        .insert(MemoryElement::textarea(Rect::new(0.0, 0.0, 300.0, 100.0)));
    f.dispatcher.page_mut().focus(Some(added));

    f.dispatcher.handle(PageEvent::SubtreeChanged {
        added: vec![added],
        removed: vec![],
    });

    assert!(f.dispatcher.candidates().contains(&added));
    let control = f.dispatcher.control().unwrap();
    assert_eq!(control.target(), added);
    assert!(control.has_focus());
}

#[tokio::test]
async fn test_added_inactive_element_is_only_a_candidate() {
    let mut f = fixture();
    let added = f
        .dispatcher
        .page_mut()
        .insert(MemoryElement::content_editable(Rect::new(0.0, 0.0, 300.0, 100.0)));

    f.dispatcher.handle(PageEvent::SubtreeChanged {
        added: vec![added],
        removed: vec![],
    });

    assert!(f.dispatcher.candidates().contains(&added));
    assert!(f.dispatcher.control().is_none());
}

#[tokio::test]
async fn test_click_routing() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.second),
    });
    type_into(&mut f.dispatcher, f.second, "I has a apple");
    f.dispatcher.settle().await;

    f.dispatcher.handle(PageEvent::Click {
        target: HitTarget::Button,
    });
    assert!(f.dispatcher.control().unwrap().tooltip_visible());

    f.dispatcher.handle(PageEvent::Click {
        target: HitTarget::Element(f.second),
    });
    assert!(f.dispatcher.control().unwrap().tooltip_visible());

    f.dispatcher.handle(PageEvent::Click {
        target: HitTarget::Elsewhere,
    });
    assert!(!f.dispatcher.control().unwrap().tooltip_visible());

    f.dispatcher.handle(PageEvent::Click {
        target: HitTarget::Button,
    });
    f.dispatcher.handle(PageEvent::Click {
        target: HitTarget::Tooltip,
    });
    assert_eq!(f.dispatcher.page().clipboard(), Some("I have a apple"));
    assert_eq!(f.dispatcher.control().unwrap().state(), &CorrectionState::Correct);
}

#[tokio::test]
async fn test_layout_change_repositions() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    type_into(&mut f.dispatcher, f.first, "I has a apple");
    let before = f.dispatcher.page().last_frame().unwrap().button.position;

    f.dispatcher
        .page_mut()
        .set_rect(f.first, Rect::new(100.0, 150.0, 400.0, 200.0));
    f.dispatcher.handle(PageEvent::LayoutChanged);

    let after = f.dispatcher.page().last_frame().unwrap().button.position;
    assert_eq!(after.y - before.y, 50.0);
    assert_eq!(after.x, before.x);
}

#[tokio::test]
async fn test_sender_posts_to_queue() {
    let mut f = fixture();
    let sender = f.dispatcher.sender();
    sender
        .send(PageEvent::FocusIn {
            target: HitTarget::Element(f.first),
        })
        .unwrap();

    assert_eq!(f.dispatcher.drain(), 1);
    assert_eq!(f.dispatcher.control().unwrap().target(), f.first);
}

#[tokio::test]
async fn test_shutdown_dismisses_overlay() {
    let mut f = fixture();
    f.dispatcher.handle(PageEvent::FocusIn {
        target: HitTarget::Element(f.first),
    });
    let page = f.dispatcher.into_page();
    assert_eq!(page.dismissed(), &[SessionId::new(1)]);
    assert!(page.is_connected(f.first));
}
