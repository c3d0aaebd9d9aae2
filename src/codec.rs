//! Credential obscuring for configurations stored outside the server
//!
//! Clients keep their LLM configuration in browser-side storage. Before it is
//! written there, `apiKey` and `baseUrl` are run through [`obscure`]; they are
//! turned back into plaintext with [`reveal`] before use.
//!
//! # Security
//!
//! The key is derived from a secret compiled into this binary, so anyone with
//! the binary (or this source) can reveal stored values. This deters casual
//! inspection of stored settings and nothing more. Do not treat obscured
//! values as confidential.
//!
//! Format: `base64(nonce || ciphertext || tag)` using AES-256-GCM with a
//! random 96-bit nonce per call and a key of SHA-256 over the shared secret.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, NONCE_LEN};
use sha2::{Digest, Sha256};
use tracing::{trace, warn};

use crate::llm::ClientLlmConfig;

/// Shared secret every deployment embeds
const SHARED_SECRET: &str = "sketchgen-shared-config-secret-2025";

/// Obscured values shorter than this are not reported by [`looks_obscured`]
const MIN_OBSCURED_LEN: usize = 50;

/// AES-256 key derived from the shared secret
static KEY_BYTES: Lazy<[u8; 32]> = Lazy::new(|| Sha256::digest(SHARED_SECRET.as_bytes()).into());

/// Standard base64 alphabet including padding
static BASE64_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").unwrap());

fn cipher_key() -> Result<LessSafeKey, ring::error::Unspecified> {
    let unbound = UnboundKey::new(&aead::AES_256_GCM, KEY_BYTES.as_slice())?;
    Ok(LessSafeKey::new(unbound))
}

fn seal(plaintext: &[u8]) -> Result<Vec<u8>, ring::error::Unspecified> {
    let key = cipher_key()?;
    let nonce_bytes: [u8; NONCE_LEN] = rand::random();

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

fn open(sealed: &[u8]) -> Result<Vec<u8>, ring::error::Unspecified> {
    if sealed.len() < NONCE_LEN {
        return Err(ring::error::Unspecified);
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)?;

    let key = cipher_key()?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key.open_in_place(nonce, Aad::empty(), &mut in_out)?;
    Ok(plaintext.to_vec())
}

/// Obscure `plain` for storage.
///
/// Empty input is returned unchanged. Output differs between calls for the
/// same input because every call uses a fresh nonce.
pub fn obscure(plain: &str) -> String {
    if plain.is_empty() {
        return plain.to_string();
    }

    match seal(plain.as_bytes()) {
        Ok(sealed) => STANDARD.encode(sealed),
        Err(_) => {
            warn!("Failed to obscure value, keeping plaintext");
            plain.to_string()
        }
    }
}

/// Turn an obscured value back into plaintext.
///
/// Never fails: empty input, input that is not valid base64, input that does
/// not authenticate under the shared key, and input that opens to an empty
/// or non-UTF-8 value are all returned unchanged. Callers therefore cannot
/// tell "was already plaintext" from "could not be revealed".
pub fn reveal(obscured: &str) -> String {
    if obscured.is_empty() {
        return obscured.to_string();
    }

    let revealed = STANDARD
        .decode(obscured)
        .ok()
        .and_then(|sealed| open(&sealed).ok())
        .and_then(|plain| String::from_utf8(plain).ok())
        .filter(|plain| !plain.is_empty());

    match revealed {
        Some(plain) => plain,
        None => {
            trace!(len = obscured.len(), "Value did not reveal, returning it unchanged");
            obscured.to_string()
        }
    }
}

/// Heuristic: longer than 50 characters and made only of base64 characters.
///
/// False positives (a long plaintext key of base64 characters) and false
/// negatives (a very short obscured value) are both possible.
pub fn looks_obscured(text: &str) -> bool {
    text.len() > MIN_OBSCURED_LEN && BASE64_PATTERN.is_match(text)
}

fn map_secret_fields(mut config: ClientLlmConfig, f: impl Fn(&str) -> String) -> ClientLlmConfig {
    config.api_key = config.api_key.map(|value| f(&value));
    config.base_url = config.base_url.map(|value| f(&value));
    config
}

/// Obscure `apiKey` and `baseUrl`; all other fields stay plaintext
pub fn obscure_config(config: ClientLlmConfig) -> ClientLlmConfig {
    map_secret_fields(config, obscure)
}

/// Reveal `apiKey` and `baseUrl`; all other fields stay as they are
pub fn reveal_config(config: ClientLlmConfig) -> ClientLlmConfig {
    map_secret_fields(config, reveal)
}

/// Reveal only the secret fields that look obscured.
///
/// Used on configs arriving from clients, which normally reveal before
/// sending but may forward stored values untouched.
pub fn reveal_obscured_fields(config: ClientLlmConfig) -> ClientLlmConfig {
    map_secret_fields(config, |value| {
        if looks_obscured(value) {
            reveal(value)
        } else {
            value.to_string()
        }
    })
}
