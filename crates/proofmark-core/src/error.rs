//! Dispatcher error types.

use thiserror::Error;

/// Errors surfaced by the dispatcher's public API.
///
/// Provider and surface failures never appear here: they are absorbed into
/// control state and logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Event queue closed")]
    QueueClosed,
}

pub type DispatchResult<T> = Result<T, DispatchError>;
