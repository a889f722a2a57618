//! Provider construction from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use proofmark_config::ProviderConfig;
use proofmark_protocols::GrammarProvider;
use proofmark_provider_http::HttpGrammarProvider;

/// Build the HTTP correction provider described by `config`.
pub(crate) fn build_provider(config: &ProviderConfig) -> Arc<dyn GrammarProvider> {
    let mut provider = HttpGrammarProvider::new(config.endpoint.clone())
        .with_model(config.model.clone())
        .with_instruction(config.instruction.clone())
        .with_timeout(config.timeout_seconds);

    match &config.api_key {
        Some(key) if !key.is_empty() => provider = provider.with_api_key(key.clone()),
        _ => warn!("No API key configured, sending unauthenticated requests"),
    }
    if let Some(url) = &config.readiness_url {
        provider = provider.with_readiness_url(url.clone());
    }

    info!("Using correction endpoint {} (model {})", config.endpoint, config.model);
    Arc::new(provider)
}
