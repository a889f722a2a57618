//! Host page capabilities.
//!
//! The core never touches a concrete UI toolkit. A host (browser bridge,
//! test double, replay harness) implements these traits over its own element
//! model and addresses elements through [`ElementId`] handles.

use crate::error::SurfaceError;
use crate::types::{ElementId, ElementKind, OverlayFrame, Point, Rect, SessionId, Size, TooltipContent};

/// Read/write access to the page's editable elements.
pub trait EditableSurface {
    /// Every element currently in the document.
    fn elements(&self) -> Vec<ElementId>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self, id: ElementId) -> bool;

    fn kind(&self, id: ElementId) -> Option<ElementKind>;

    /// Whether spellchecking is enabled on the element.
    fn spellcheck(&self, id: ElementId) -> bool;

    /// Current plain text of the element.
    fn text(&self, id: ElementId) -> Option<String>;

    /// Replace the element's text. Only native text inputs support this.
    fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), SurfaceError>;

    /// Bounding box in viewport coordinates.
    fn bounding_box(&self, id: ElementId) -> Option<Rect>;

    /// Element that currently holds input focus, if it is a page element.
    fn active_element(&self) -> Option<ElementId>;

    /// Visible viewport in viewport coordinates.
    fn viewport(&self) -> Rect;

    /// Offset added to viewport coordinates to obtain document coordinates.
    fn scroll_offset(&self) -> Point {
        Point::default()
    }

    /// Trackable: an editable widget with spellchecking enabled.
    fn is_trackable(&self, id: ElementId) -> bool {
        self.kind(id).is_some_and(|kind| kind.is_editable()) && self.spellcheck(id)
    }
}

/// Presentation of floating overlay elements on the page.
pub trait OverlayHost {
    /// Create or update the overlay elements for a session.
    fn present(&mut self, frame: &OverlayFrame);

    /// Remove the overlay elements of a session.
    fn dismiss(&mut self, session: SessionId);

    /// Write plain text to the clipboard.
    fn write_clipboard(&mut self, text: &str) -> Result<(), SurfaceError>;

    /// Rendered size of a tooltip with the given content, bounded by
    /// `max`. The default estimates from character count.
    fn measure_tooltip(&self, content: &TooltipContent, max: Size) -> Size {
        const CHAR_WIDTH: f64 = 8.0;
        const LINE_HEIGHT: f64 = 22.0;
        const PADDING: f64 = 16.0;

        let text_width = content.char_len() as f64 * CHAR_WIDTH;
        let width = (text_width + PADDING).min(max.width);
        let lines = (text_width / (max.width - PADDING).max(1.0)).ceil().max(1.0);
        let height = (lines * LINE_HEIGHT + PADDING).min(max.height);
        Size::new(width, height)
    }
}

/// A host page: both capabilities.
pub trait Page: EditableSurface + OverlayHost {}

impl<T: EditableSurface + OverlayHost> Page for T {}
