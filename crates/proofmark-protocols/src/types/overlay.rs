//! Overlay view state pushed to the host page.

use serde::{Deserialize, Serialize};

use super::{DiffSegment, ElementId, Point};

/// Identity of one control's lifetime. A new session starts every time the
/// tracked element changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Icon shown on the trigger button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Idle / ready to check.
    Info,
    /// Request in flight.
    Loading,
    /// Corrections available.
    Warning,
    /// Text is correct.
    Check,
    /// Provider failed or is unavailable.
    Power,
}

/// Tooltip body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TooltipContent {
    Message(String),
    Diff(Vec<DiffSegment>),
}

impl TooltipContent {
    /// Text length used for size estimation.
    pub fn char_len(&self) -> usize {
        match self {
            Self::Message(text) => text.chars().count(),
            Self::Diff(segments) => segments.iter().map(|s| s.text.chars().count()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonView {
    pub icon: Icon,
    pub visible: bool,
    /// Document coordinates of the top-left corner.
    pub position: Point,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipView {
    pub visible: bool,
    pub content: TooltipContent,
    /// Document coordinates of the top-left corner.
    pub position: Point,
    pub z_index: i32,
}

/// Complete visible state of one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub session: SessionId,
    pub target: ElementId,
    pub button: ButtonView,
    pub tooltip: TooltipView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_content_char_len() {
        let message = TooltipContent::Message("Loading...".to_string());
        assert_eq!(message.char_len(), 10);

        let diff = TooltipContent::Diff(vec![
            DiffSegment::unchanged("I "),
            DiffSegment::deleted("has"),
            DiffSegment::inserted("have"),
        ]);
        assert_eq!(diff.char_len(), 9);
    }

    #[test]
    fn test_session_id_display() {
        assert_eq!(SessionId::new(4).to_string(), "session-4");
    }
}
