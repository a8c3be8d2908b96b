//! Wire format for the persisted cart record.
//!
//! The cart is stored as one UTF-8 JSON blob under a single key. The current
//! form is a versioned envelope:
//!
//! ```json
//! {"version": 1, "updated_at": "2026-08-27T12:00:00Z", "items": [...]}
//! ```
//!
//! Earlier deployments stored a bare JSON array of items with no version
//! field; decoding tolerates that legacy form so existing carts survive the
//! upgrade. Encoding always writes the envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LineItem;

/// Current envelope version. Bump when the item schema changes shape.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur when decoding a stored cart payload.
///
/// The store treats all of these as "record absent": a malformed payload
/// hydrates to an empty cart with a warning rather than a crash.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload is not valid JSON or does not match the item schema.
    #[error("malformed cart payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload is a valid envelope from a newer, unknown format version.
    #[error("unsupported cart format version {0}")]
    UnsupportedVersion(u32),
}

/// Versioned storage envelope.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    updated_at: DateTime<Utc>,
    items: Vec<LineItem>,
}

/// Either the current envelope or the legacy bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCart {
    Versioned(Envelope),
    Legacy(Vec<LineItem>),
}

/// Serialize the full item list into the versioned envelope.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] if JSON serialization fails, which for
/// these types indicates a bug rather than bad data.
pub fn encode(items: &[LineItem]) -> Result<String, CodecError> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        updated_at: Utc::now(),
        items: items.to_vec(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Deserialize a stored payload into the item list.
///
/// Accepts both the versioned envelope and the legacy unversioned array.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for invalid JSON or schema violations
/// (including a zero quantity or empty id on any item), and
/// [`CodecError::UnsupportedVersion`] for envelopes written by a newer
/// format.
pub fn decode(payload: &str) -> Result<Vec<LineItem>, CodecError> {
    match serde_json::from_str::<StoredCart>(payload)? {
        StoredCart::Versioned(envelope) => {
            if envelope.version != FORMAT_VERSION {
                return Err(CodecError::UnsupportedVersion(envelope.version));
            }
            Ok(envelope.items)
        }
        StoredCart::Legacy(items) => Ok(items),
    }
}
