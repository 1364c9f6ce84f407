//! Body decoding policy shared by request and response capture
//!
//! Payload bytes are first decoded as JSON. Anything that is not valid JSON is
//! kept verbatim as text under a `value` key, so the dump never loses data.

use serde::Serialize;
use serde_json::Value;

use crate::error::CaptureError;

/// A captured payload, exactly one of three shapes
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DecodedBody {
    /// The payload parsed as JSON (object, array or scalar)
    Structured(Value),

    /// The payload was not JSON; holds the original bytes as text
    Raw { value: String },

    /// The payload could not be read at all
    Error { error: String },
}

impl DecodedBody {
    /// Decode raw payload bytes, falling back to text when they are not JSON
    pub fn decode(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => DecodedBody::Structured(value),
            Err(err) => {
                tracing::debug!(len = bytes.len(), %err, "body is not JSON, keeping raw text");
                DecodedBody::Raw {
                    value: String::from_utf8_lossy(bytes).into_owned(),
                }
            }
        }
    }

    /// Error record carrying the failure's message
    pub fn from_error(err: &CaptureError) -> Self {
        DecodedBody::Error {
            error: err.to_string(),
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            DecodedBody::Structured(value) => Some(value),
            _ => None,
        }
    }
}

/// Whether a response with this status may carry a body (RFC 7230, section 3.3)
///
/// Informational (1xx), 204 No Content and 304 Not Modified never do.
pub fn body_allowed_for_status(status: u16) -> bool {
    !matches!(status, 100..=199 | 204 | 304)
}
