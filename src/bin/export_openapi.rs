//! Export OpenAPI specification to static JSON file
//!
//! Usage: cargo run --bin export_openapi
//!
//! Generates docs/openapi.json for client generation and API linting.

use anyhow::{Context, Result};
use sketchgen::docs::ApiDoc;
use std::fs;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI spec")?;

    fs::create_dir_all("docs").context("Failed to create docs directory")?;
    fs::write("docs/openapi.json", json).context("Failed to write openapi.json")?;

    println!("Exported OpenAPI spec to docs/openapi.json");
    Ok(())
}
