//! Error types for the Proofmark protocol layer.

mod provider;
mod surface;

pub use provider::*;
pub use surface::*;
