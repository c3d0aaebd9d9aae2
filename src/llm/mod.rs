//! LLM configuration and invocation
//!
//! Holds the configuration model, the per-request resolver, the provider
//! clients for each supported wire protocol, and the invoker that streams
//! one generation under a deadline.

pub mod anthropic;
pub mod config;
pub mod headers;
pub mod invoker;
pub mod openai;
pub mod provider;
pub mod resolver;

pub use config::{ClientLlmConfig, LlmConfig, ProviderKind};
pub use invoker::LlmInvoker;
pub use provider::{FragmentStream, LlmProvider, ProviderRouter, StreamError};
pub use resolver::{ConfigResolver, ConfigSummary};
