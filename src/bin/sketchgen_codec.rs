//! Obscure or reveal the credentials of a stored LLM configuration
//!
//! Usage: sketchgen-codec <obscure|reveal> < config.json
//!
//! Reads one JSON configuration (`{name, type, baseUrl, apiKey, model}`)
//! from stdin and writes it back with `apiKey` and `baseUrl` transformed.

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use sketchgen::codec;
use sketchgen::llm::ClientLlmConfig;

fn main() -> Result<()> {
    let mode = std::env::args().nth(1).unwrap_or_default();
    let transform: fn(ClientLlmConfig) -> ClientLlmConfig = match mode.as_str() {
        "obscure" => codec::obscure_config,
        "reveal" => codec::reveal_config,
        _ => bail!("usage: sketchgen-codec <obscure|reveal> < config.json"),
    };

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read configuration from stdin")?;

    let config: ClientLlmConfig =
        serde_json::from_str(&input).context("Input is not a valid LLM configuration")?;

    let output = serde_json::to_string_pretty(&transform(config))
        .context("Failed to serialize configuration")?;
    println!("{}", output);
    Ok(())
}
