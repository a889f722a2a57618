//! Host page errors.

use thiserror::Error;

use crate::types::ElementId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element {0} does not support direct text replacement")]
    ReplacementUnsupported(ElementId),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_display() {
        let err = SurfaceError::ReplacementUnsupported(ElementId::new(7));
        assert!(err.to_string().contains("#7"));
        assert!(err.to_string().contains("direct text replacement"));

        let err = SurfaceError::Clipboard("permission denied".to_string());
        assert!(err.to_string().contains("permission denied"));
    }
}
