//! Word diff segments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// A labeled span of text in a diff between original and corrected text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl DiffSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn unchanged(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Unchanged, text)
    }

    pub fn inserted(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Inserted, text)
    }

    pub fn deleted(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Deleted, text)
    }

    /// Part of the original text.
    pub fn in_original(&self) -> bool {
        matches!(self.kind, SegmentKind::Unchanged | SegmentKind::Deleted)
    }

    /// Part of the corrected text.
    pub fn in_corrected(&self) -> bool {
        matches!(self.kind, SegmentKind::Unchanged | SegmentKind::Inserted)
    }
}
