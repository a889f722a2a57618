//! Grammar provider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Core trait for correction services.
///
/// Implementations do not need to handle cancellation themselves: callers
/// race the returned future against a cancellation token and drop it when a
/// newer request supersedes it.
#[async_trait]
pub trait GrammarProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Cheap readiness probe. Must not fail; any failure means "unsupported".
    async fn is_supported(&self) -> bool;

    /// Request a correction for `text`.
    async fn fix_grammar(&self, text: &str) -> Result<String, ProviderError>;
}
