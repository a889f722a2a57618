//! Common types used across protocols.

mod diff;
mod element;
mod geometry;
mod overlay;

pub use diff::*;
pub use element::*;
pub use geometry::*;
pub use overlay::*;
