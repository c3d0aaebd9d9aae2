//! Sketchgen - Streaming diagram generation relay
//!
//! This library provides the core functionality for the Sketchgen server.
//! It resolves which LLM endpoint to use, builds the diagram prompt, and
//! relays the model's output to clients as Server-Sent Events.

pub mod codec;
pub mod config;
pub mod docs;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod routes;
pub mod streaming;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::llm::{ConfigResolver, LlmInvoker, LlmProvider, ProviderRouter};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Chooses between the environment config and a client config
    pub resolver: ConfigResolver,
    /// Runs generations against the resolved endpoint
    pub invoker: LlmInvoker,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling. No overall timeout:
        // generations are bounded by the invoker's deadline instead.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(config.connect_timeout())
            .build()?;

        let provider: Arc<dyn LlmProvider> = Arc::new(ProviderRouter::new(http_client));
        Self::with_provider(config, provider)
    }

    /// Create an application state around a specific provider
    pub fn with_provider(config: Config, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let resolver = ConfigResolver::from_environment(&config.llm_env)?;
        let invoker = LlmInvoker::new(provider, config.generation_timeout());

        Ok(Self {
            config,
            start_time: Instant::now(),
            resolver,
            invoker,
        })
    }
}
