//! Provider calls for one control.
//!
//! Each request runs as its own tokio task and reports back to the
//! dispatcher queue as a [`CorrectionSettled`] event. The request's
//! [`CancellationToken`] is raced against the provider, so a superseded
//! request stops without reporting anything.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use proofmark_protocols::{GrammarProvider, ProviderError, SessionId};

use crate::events::{CorrectionSettled, PageEvent};

/// Per-control request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A submission ready to be sent to the provider.
#[derive(Debug, Clone)]
pub struct CorrectionRequest {
    pub session: SessionId,
    pub request: RequestId,
    /// Text captured at submission time.
    pub text: String,
    pub cancel: CancellationToken,
}

/// Run `request` on the tokio runtime and post the outcome to `events`.
pub fn spawn_correction(
    provider: Arc<dyn GrammarProvider>,
    request: CorrectionRequest,
    events: mpsc::UnboundedSender<PageEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let CorrectionRequest {
            session,
            request,
            text,
            cancel,
        } = request;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("{} {} cancelled", session, request);
                return;
            }
            outcome = correct(provider.as_ref(), &text) => outcome,
        };

        let settled = CorrectionSettled {
            session,
            request,
            outcome,
        };
        if events.send(settled.into()).is_err() {
            debug!("Dispatcher gone, dropping result of {} {}", session, request);
        }
    })
}

/// Readiness check followed by the correction itself.
pub async fn correct(provider: &dyn GrammarProvider, text: &str) -> Result<String, ProviderError> {
    if !provider.is_supported().await {
        return Err(ProviderError::Unavailable(format!(
            "provider '{}' is not ready",
            provider.id()
        )));
    }
    let corrected = provider.fix_grammar(text).await?;
    Ok(keep_padding(text, &corrected))
}

/// Trim the provider's output and re-apply the surrounding whitespace of the
/// submitted text, so unchanged text compares equal.
fn keep_padding(original: &str, corrected: &str) -> String {
    let core = corrected.trim();
    if core.is_empty() {
        return original.to_string();
    }
    let leading = &original[..original.len() - original.trim_start().len()];
    let trailing = &original[original.trim_end().len()..];
    format!("{}{}{}", leading, core, trailing)
}
