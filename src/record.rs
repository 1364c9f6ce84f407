//! Captured request/response record
//!
//! One `CaptureRecord` is built per request, handed to the emitter, and then
//! dropped. Field order in the serialized form is fixed: request before
//! response, and within each the order the fields are declared here.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::body::DecodedBody;
use crate::error::CaptureError;

/// Ordered multimap used for headers and query parameters
///
/// Keys are sorted, values keep their arrival order.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// Everything captured for a single request/response exchange
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CaptureRecord {
    pub request: RequestFacts,
    pub response: ResponseFacts,
}

/// Request half of a record
///
/// Fields whose capture toggle is disabled keep their empty value.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RequestFacts {
    pub headers: MultiMap,
    pub body: Option<DecodedBody>,
    pub path: String,
    pub method: String,
    pub query: MultiMap,
}

/// Response half of a record
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseFacts {
    pub headers: MultiMap,
    pub body: Option<DecodedBody>,
    pub status: u16,
}

impl CaptureRecord {
    pub fn new(request: RequestFacts, response: ResponseFacts) -> Self {
        Self { request, response }
    }

    /// Serialize as JSON, compact or indented
    pub fn try_to_json(&self, pretty: bool) -> Result<String, CaptureError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Compact JSON; a formatting failure yields its message instead
    pub fn to_json_string(&self) -> String {
        self.try_to_json(false).unwrap_or_else(|err| err.to_string())
    }

    /// Indented JSON; a formatting failure yields its message instead
    pub fn to_json_pretty_string(&self) -> String {
        self.try_to_json(true).unwrap_or_else(|err| err.to_string())
    }
}
