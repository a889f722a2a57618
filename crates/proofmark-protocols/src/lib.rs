//! # Proofmark Protocols
//!
//! Core protocol definitions (traits) for Proofmark.
//! Contains only interface definitions and plain data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`GrammarProvider`] - Trait for correction service implementations
//! - [`EditableSurface`] - Read/write access to the host page's editable elements
//! - [`OverlayHost`] - Presentation of floating overlay frames on the host page
//! - [`Page`] - Both host capabilities together

pub mod error;
pub mod provider;
pub mod surface;
pub mod types;

// Re-export core traits
pub use error::{ProviderError, SurfaceError};
pub use provider::GrammarProvider;
pub use surface::{EditableSurface, OverlayHost, Page};
pub use types::*;
