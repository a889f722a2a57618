//! Element handles.

use serde::{Deserialize, Serialize};

/// Opaque handle to an element of the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of editable widget an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Native multi-line text input; supports direct value assignment.
    TextArea,
    /// Content-editable rich-text region; corrections go to the clipboard.
    ContentEditable,
    /// Anything else.
    Other,
}

impl ElementKind {
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::TextArea | Self::ContentEditable)
    }

    pub fn supports_replacement(&self) -> bool {
        matches!(self, Self::TextArea)
    }
}

/// Something that can hold focus or receive a click: a page element or one of
/// the overlay's own floating elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum HitTarget {
    Element(ElementId),
    Button,
    Tooltip,
    /// Page background or anything the host does not identify.
    Elsewhere,
}

impl HitTarget {
    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::Button | Self::Tooltip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_capabilities() {
        assert!(ElementKind::TextArea.is_editable());
        assert!(ElementKind::TextArea.supports_replacement());
        assert!(ElementKind::ContentEditable.is_editable());
        assert!(!ElementKind::ContentEditable.supports_replacement());
        assert!(!ElementKind::Other.is_editable());
    }

    #[test]
    fn test_hit_target_serde() {
        let json = serde_json::to_value(HitTarget::Element(ElementId::new(3))).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["id"], 3);

        let parsed: HitTarget = serde_json::from_str(r#"{"type":"button"}"#).unwrap();
        assert_eq!(parsed, HitTarget::Button);
        assert!(parsed.is_overlay());
    }
}
