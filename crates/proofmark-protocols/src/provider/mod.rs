//! Correction provider protocol definitions.

mod traits;

pub use traits::*;
