//! Events consumed by the dispatcher.

use proofmark_protocols::{ElementId, HitTarget, ProviderError, SessionId};

use crate::correction::RequestId;

/// Everything the dispatcher reacts to, from the host page or from its own
/// correction tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    FocusIn {
        target: HitTarget,
    },
    FocusOut {
        target: HitTarget,
        /// Where focus is going, when the host knows.
        related: Option<HitTarget>,
    },
    Input {
        target: ElementId,
    },
    SubtreeChanged {
        added: Vec<ElementId>,
        removed: Vec<ElementId>,
    },
    /// Scroll, resize or anything else that can move the tracked element.
    LayoutChanged,
    Click {
        target: HitTarget,
    },
    Hover {
        target: HitTarget,
        entered: bool,
    },
    CorrectionSettled(CorrectionSettled),
}

/// Result of one provider call, tagged with the session and request it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionSettled {
    pub session: SessionId,
    pub request: RequestId,
    pub outcome: Result<String, ProviderError>,
}

impl From<CorrectionSettled> for PageEvent {
    fn from(settled: CorrectionSettled) -> Self {
        Self::CorrectionSettled(settled)
    }
}
