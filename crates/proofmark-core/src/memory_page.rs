//! In-memory host page.
//!
//! Implements both host capabilities over a map of elements and records
//! everything the overlay does to it. Used by the replay command and tests.

use std::collections::BTreeMap;

use proofmark_protocols::{
    EditableSurface, ElementId, ElementKind, OverlayFrame, OverlayHost, Point, Rect, SessionId, SurfaceError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub kind: ElementKind,
    pub spellcheck: bool,
    pub text: String,
    /// Bounding box in viewport coordinates.
    pub rect: Rect,
}

impl MemoryElement {
    pub fn new(kind: ElementKind, rect: Rect) -> Self {
        Self {
            kind,
            spellcheck: true,
            text: String::new(),
            rect,
        }
    }

    pub fn textarea(rect: Rect) -> Self {
        Self::new(ElementKind::TextArea, rect)
    }

    pub fn content_editable(rect: Rect) -> Self {
        Self::new(ElementKind::ContentEditable, rect)
    }

    pub fn with_spellcheck(mut self, spellcheck: bool) -> Self {
        self.spellcheck = spellcheck;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

#[derive(Debug)]
pub struct MemoryPage {
    elements: BTreeMap<ElementId, MemoryElement>,
    next_id: u64,
    active: Option<ElementId>,
    viewport: Rect,
    scroll: Point,
    frames: Vec<OverlayFrame>,
    dismissed: Vec<SessionId>,
    clipboard: Option<String>,
    clipboard_fails: bool,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 1280.0, 800.0))
    }
}

impl MemoryPage {
    pub fn new(viewport: Rect) -> Self {
        Self {
            elements: BTreeMap::new(),
            next_id: 1,
            active: None,
            viewport,
            scroll: Point::default(),
            frames: Vec::new(),
            dismissed: Vec::new(),
            clipboard: None,
            clipboard_fails: false,
        }
    }

    /// Add an element under a fresh id.
    pub fn insert(&mut self, element: MemoryElement) -> ElementId {
        while self.elements.contains_key(&ElementId::new(self.next_id)) {
            self.next_id += 1;
        }
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    /// Add or replace an element under a caller-chosen id.
    pub fn insert_at(&mut self, id: ElementId, element: MemoryElement) {
        self.elements.insert(id, element);
    }

    /// Detach an element. Clears focus if it was active.
    pub fn remove(&mut self, id: ElementId) -> Option<MemoryElement> {
        if self.active == Some(id) {
            self.active = None;
        }
        self.elements.remove(&id)
    }

    /// Replace an element's text as if the user typed it.
    pub fn type_text(&mut self, id: ElementId, text: impl Into<String>) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn focus(&mut self, id: Option<ElementId>) {
        self.active = id.filter(|id| self.elements.contains_key(id));
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Scroll the document. Element rectangles are viewport-relative, so they
    /// move the opposite way.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll = Point::new(self.scroll.x + dx, self.scroll.y + dy);
        for element in self.elements.values_mut() {
            element.rect = element.rect.translate(-dx, -dy);
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.elements.get(&id)
    }

    /// Every frame presented so far, oldest first.
    pub fn frames(&self) -> &[OverlayFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&OverlayFrame> {
        self.frames.last()
    }

    pub fn take_frames(&mut self) -> Vec<OverlayFrame> {
        std::mem::take(&mut self.frames)
    }

    pub fn dismissed(&self) -> &[SessionId] {
        &self.dismissed
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Make subsequent clipboard writes fail.
    pub fn fail_clipboard(&mut self, fail: bool) {
        self.clipboard_fails = fail;
    }
}

impl EditableSurface for MemoryPage {
    fn elements(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    fn is_connected(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.elements.get(&id).map(|e| e.kind)
    }

    fn spellcheck(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| e.spellcheck)
    }

    fn text(&self, id: ElementId) -> Option<String> {
        self.elements.get(&id).map(|e| e.text.clone())
    }

    fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), SurfaceError> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(SurfaceError::ElementNotFound(id))?;
        if !element.kind.supports_replacement() {
            return Err(SurfaceError::ReplacementUnsupported(id));
        }
        element.text = text.to_string();
        Ok(())
    }

    fn bounding_box(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(&id).map(|e| e.rect)
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}

impl OverlayHost for MemoryPage {
    fn present(&mut self, frame: &OverlayFrame) {
        self.frames.push(frame.clone());
    }

    fn dismiss(&mut self, session: SessionId) {
        self.dismissed.push(session);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), SurfaceError> {
        if self.clipboard_fails {
            return Err(SurfaceError::Clipboard("write rejected".to_string()));
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}
