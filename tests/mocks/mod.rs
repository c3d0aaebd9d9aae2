//! Mock infrastructure for testing external services
//!
//! This module provides mock servers for the LLM endpoints the server talks
//! to. The mocks serve real SSE bodies in each provider's format and record
//! every request for inspection.

pub mod llm_upstream;

pub use llm_upstream::*;
