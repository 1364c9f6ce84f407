//! Capture configuration
//!
//! `CaptureFields` is the matrix of what gets recorded; `CaptureOptions` pairs
//! it with the emitter that receives the finished records. Options are built
//! once and shared read-only by every worker and request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::emitter::{Emitter, StdoutEmitter};
use crate::record::CaptureRecord;

/// Which parts of a request/response exchange are recorded
///
/// Deserializes from a partial document: fields that are not named stay
/// enabled.
///
/// ```rust
/// use jsondump_actix::CaptureFields;
///
/// let fields: CaptureFields = serde_json::from_str(r#"{"request_headers": false}"#).unwrap();
/// assert!(!fields.request_headers);
/// assert!(fields.response_body);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureFields {
    /// Decoded request payload
    pub request_body: bool,
    /// Decoded response payload
    pub response_body: bool,
    pub request_headers: bool,
    pub response_headers: bool,
    pub response_status: bool,
    pub request_path: bool,
    pub request_method: bool,
    pub request_query: bool,
}

impl CaptureFields {
    pub const fn all() -> Self {
        Self {
            request_body: true,
            response_body: true,
            request_headers: true,
            response_headers: true,
            response_status: true,
            request_path: true,
            request_method: true,
            request_query: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            request_body: false,
            response_body: false,
            request_headers: false,
            response_headers: false,
            response_status: false,
            request_path: false,
            request_method: false,
            request_query: false,
        }
    }
}

impl Default for CaptureFields {
    fn default() -> Self {
        Self::all()
    }
}

/// Field matrix plus the emitter that receives each record
///
/// ```rust
/// use jsondump_actix::{CaptureOptions, TracingEmitter};
///
/// let options = CaptureOptions::new()
///     .capture_request_headers(false)
///     .emitter(TracingEmitter);
/// assert!(!options.fields().request_headers);
/// ```
#[derive(Clone)]
pub struct CaptureOptions {
    fields: CaptureFields,
    emitter: Arc<dyn Emitter>,
}

impl CaptureOptions {
    /// Everything enabled, records printed to stdout
    pub fn new() -> Self {
        Self::with_fields(CaptureFields::all(), StdoutEmitter)
    }

    /// Explicit field matrix and emitter
    pub fn with_fields(fields: CaptureFields, emitter: impl Emitter + 'static) -> Self {
        Self {
            fields,
            emitter: Arc::new(emitter),
        }
    }

    pub fn fields(&self) -> &CaptureFields {
        &self.fields
    }

    pub fn emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.emitter = Arc::new(emitter);
        self
    }

    pub fn capture_request_body(mut self, enabled: bool) -> Self {
        self.fields.request_body = enabled;
        self
    }

    pub fn capture_response_body(mut self, enabled: bool) -> Self {
        self.fields.response_body = enabled;
        self
    }

    pub fn capture_request_headers(mut self, enabled: bool) -> Self {
        self.fields.request_headers = enabled;
        self
    }

    pub fn capture_response_headers(mut self, enabled: bool) -> Self {
        self.fields.response_headers = enabled;
        self
    }

    pub fn capture_response_status(mut self, enabled: bool) -> Self {
        self.fields.response_status = enabled;
        self
    }

    pub fn capture_request_path(mut self, enabled: bool) -> Self {
        self.fields.request_path = enabled;
        self
    }

    pub fn capture_request_method(mut self, enabled: bool) -> Self {
        self.fields.request_method = enabled;
        self
    }

    pub fn capture_request_query(mut self, enabled: bool) -> Self {
        self.fields.request_query = enabled;
        self
    }

    /// Hand a finished record to the emitter
    ///
    /// A panicking emitter is contained here; the response is already on its
    /// way to the client and must not be affected.
    pub(crate) fn emit(&self, record: CaptureRecord) {
        let emitter = &self.emitter;
        if catch_unwind(AssertUnwindSafe(|| emitter.emit(record))).is_err() {
            tracing::error!("capture emitter panicked, record dropped");
        }
    }

    /// Wrap options in Arc for sharing across workers
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CaptureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureOptions")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
