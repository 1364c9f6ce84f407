//! Error types for the capture stage
//!
//! None of these ever reach the host application. They are turned into
//! `{"error": ...}` body records or into the text returned by the record
//! serializers.

use thiserror::Error;

/// Failures observed while capturing a request/response exchange
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The inbound request payload could not be read to the end
    #[error("{0}")]
    BodyRead(String),

    /// The downstream response body stream yielded an error mid-flight
    #[error("response body stream failed after {captured} bytes")]
    ResponseStream { captured: usize },

    /// An error response carried a streaming body that cannot be read synchronously
    #[error("error response body is streamed and cannot be captured")]
    StreamedErrorBody,

    /// The record could not be formatted as JSON
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
