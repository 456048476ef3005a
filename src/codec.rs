//! Byte encoding of containers.
//!
//! # Format
//!
//! ```text
//! Magic bytes: "CHMP" (4 bytes)
//! Format version: 1 (1 byte)
//! Body: postcard-serialized container
//! ```
//!
//! Decoding rejects a bad header, a truncated body and trailing bytes, and
//! never returns a partially built container.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Magic bytes opening every encoded container.
const MAGIC: &[u8; 4] = b"CHMP";

/// Current format version.
const VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;

/// Encodes `value` as header + postcard body.
///
/// # Errors
///
/// Returns [`Error::Postcard`] if an element fails to serialize.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let span = tracing::debug_span!("champ_encode", bytes = tracing::field::Empty);
    let _guard = span.enter();

    let mut data = Vec::with_capacity(HEADER_LEN);
    data.extend_from_slice(MAGIC);
    data.push(VERSION);
    let data = postcard::to_extend(value, data)?;

    span.record("bytes", data.len());
    Ok(data)
}

/// Decodes a container produced by [`to_bytes`].
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] for a missing or wrong header or
/// trailing bytes, [`Error::UnsupportedVersion`] for a newer format and
/// [`Error::Postcard`] for a malformed or truncated body.
pub fn from_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    let span = tracing::debug_span!("champ_decode", bytes = data.len());
    let _guard = span.enter();

    if data.len() < HEADER_LEN {
        return Err(Error::InvalidFormat("data too short for header".to_string()));
    }
    let (header, body) = data.split_at(HEADER_LEN);
    if &header[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidFormat(
            "invalid magic bytes (expected CHMP)".to_string(),
        ));
    }
    let version = header[MAGIC.len()];
    if version > VERSION {
        return Err(Error::UnsupportedVersion {
            version,
            max_supported: VERSION,
        });
    }

    let (value, rest) = postcard::take_from_bytes(body)?;
    if !rest.is_empty() {
        return Err(Error::InvalidFormat(format!(
            "{} trailing bytes after body",
            rest.len()
        )));
    }
    Ok(value)
}
