//! Runs one generation against the configured provider
//!
//! Fragments are pushed into a bounded channel as they arrive. The whole
//! call is bounded by a deadline, and it stops early once the receiving
//! side of the channel goes away.

use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::LlmConfig;
use super::provider::{FragmentStream, LlmProvider, StreamError};
use crate::prompt::Message;
use crate::routes::metrics;

/// Invokes the provider and forwards its fragments
#[derive(Clone)]
pub struct LlmInvoker {
    provider: Arc<dyn LlmProvider>,
    deadline: Duration,
}

impl LlmInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    /// Stream one generation into `fragments`.
    ///
    /// Returns the number of fragments delivered. Empty fragments are
    /// dropped. The first provider error ends the call.
    pub async fn invoke(
        &self,
        config: &LlmConfig,
        messages: &[Message],
        fragments: mpsc::Sender<String>,
    ) -> Result<usize, StreamError> {
        let started = Instant::now();

        let result = match tokio::time::timeout(self.deadline, self.pump(config, messages, &fragments)).await {
            Ok(result) => result,
            Err(_) => Err(StreamError::Timeout(self.deadline)),
        };

        let elapsed = started.elapsed();
        let provider = config.provider_type.as_str();
        match &result {
            Ok(count) => {
                info!(
                    provider = provider,
                    model = %config.model,
                    fragments = count,
                    duration_ms = elapsed.as_millis() as u64,
                    "Generation completed"
                );
                metrics::record_fragments(provider, *count as u64);
                metrics::record_generation(provider, "success", elapsed.as_secs_f64());
            }
            Err(StreamError::ClientDisconnected) => {
                info!(provider = provider, "Client went away, generation abandoned");
                metrics::record_generation(provider, "disconnected", elapsed.as_secs_f64());
            }
            Err(e) => {
                warn!(
                    provider = provider,
                    model = %config.model,
                    error = %e,
                    duration_ms = elapsed.as_millis() as u64,
                    "Generation failed"
                );
                metrics::record_generation(provider, e.kind(), elapsed.as_secs_f64());
            }
        }

        result
    }

    async fn pump(
        &self,
        config: &LlmConfig,
        messages: &[Message],
        fragments: &mpsc::Sender<String>,
    ) -> Result<usize, StreamError> {
        let mut stream: FragmentStream = tokio::select! {
            opened = self.provider.stream_chat(config, messages) => opened?,
            _ = fragments.closed() => return Err(StreamError::ClientDisconnected),
        };

        debug!(provider = self.provider.name(), "Upstream stream open");

        let mut delivered = 0;
        loop {
            let next = tokio::select! {
                next = stream.next() => next,
                _ = fragments.closed() => return Err(StreamError::ClientDisconnected),
            };

            match next {
                Some(Ok(text)) if text.is_empty() => continue,
                Some(Ok(text)) => {
                    fragments
                        .send(text)
                        .await
                        .map_err(|_| StreamError::ClientDisconnected)?;
                    delivered += 1;
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(delivered),
            }
        }
    }
}
