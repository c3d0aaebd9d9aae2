//! Integration tests for Sketchgen
//!
//! These tests drive the real router with `axum-test` while `wiremock`
//! plays the LLM provider, covering configuration resolution, prompt
//! delivery and the SSE relay end to end.

mod config_check;
mod health;
