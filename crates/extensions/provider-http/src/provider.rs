//! HTTP correction provider implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

use proofmark_protocols::{GrammarProvider, ProviderError};

use crate::api::{ApiMessage, ApiRequest};
use crate::parser::StreamAssembler;

const DEFAULT_MODEL: &str = "default";
const DEFAULT_INSTRUCTION: &str = "correct grammar, output only corrected text:";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Correction provider backed by a remote streaming chat endpoint.
pub struct HttpGrammarProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    instruction: String,
    readiness_url: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
    /// Cleared on the first failed readiness probe and never set again.
    supported: AtomicBool,
}

impl HttpGrammarProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            instruction: DEFAULT_INSTRUCTION.to_string(),
            readiness_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client: build_client(DEFAULT_TIMEOUT_SECS),
            supported: AtomicBool::new(true),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_readiness_url(mut self, url: impl Into<String>) -> Self {
        self.readiness_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self.client = build_client(seconds);
        self
    }

    fn build_request(&self, text: &str) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(format!("{}{}", self.instruction, text))],
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(api_request);
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message: text });
        }

        Ok(response)
    }

    fn map_transport(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Network(error.to_string())
        }
    }

    async fn probe(&self) -> bool {
        if reqwest::Url::parse(&self.endpoint).is_err() {
            warn!("Correction endpoint is not a valid URL: {}", self.endpoint);
            return false;
        }
        let Some(ref url) = self.readiness_url else {
            return true;
        };
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Readiness probe returned {}", response.status());
                false
            }
            Err(e) => {
                warn!("Readiness probe failed: {}", e);
                false
            }
        }
    }
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with {}s timeout, using defaults: {}", timeout_secs, e);
            reqwest::Client::new()
        })
}

#[async_trait]
impl GrammarProvider for HttpGrammarProvider {
    fn id(&self) -> &str {
        "http"
    }

    async fn is_supported(&self) -> bool {
        if !self.supported.load(Ordering::SeqCst) {
            return false;
        }
        let supported = self.probe().await;
        if !supported {
            self.supported.store(false, Ordering::SeqCst);
        }
        supported
    }

    async fn fix_grammar(&self, text: &str) -> Result<String, ProviderError> {
        let api_request = self.build_request(text);
        let response = self.send_request(&api_request).await?;

        let mut stream = response.bytes_stream();
        let mut assembler = StreamAssembler::new();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| ProviderError::StreamError(e.to_string()))?;
            assembler.push(&bytes)?;
            if assembler.is_finished() {
                break;
            }
        }

        let corrected = assembler.finish()?;
        debug!("Received correction of {} chars", corrected.len());
        Ok(corrected)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
