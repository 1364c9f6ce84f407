//! Response half of the capture
//!
//! Starts once the downstream service has returned a response. Status and
//! headers are final at that point; the body may still be streaming, so the
//! record is held by a `ResponseCapture` until the body has been fully
//! duplicated (or abandoned) and only then handed to the emitter.

use actix_web::{
    body::{BodySize, BoxBody, MessageBody},
    dev::{ResponseHead, ServiceResponse},
    web::BytesMut,
    Error,
};
use std::sync::Arc;

use crate::body::{body_allowed_for_status, DecodedBody};
use crate::config::CaptureOptions;
use crate::error::CaptureError;
use crate::record::CaptureRecord;
use crate::tee::TeeBody;
use crate::utils::header_multimap;

/// A record waiting for its response body
///
/// The record is emitted exactly once: by `finish`, or on drop if the body
/// never reached its end.
pub struct ResponseCapture {
    buffer: BytesMut,
    capture_body: bool,
    failure: Option<CaptureError>,
    pending: Option<(CaptureRecord, Arc<CaptureOptions>)>,
}

impl ResponseCapture {
    /// Record status and headers from the final response head
    pub fn begin(mut record: CaptureRecord, options: Arc<CaptureOptions>, head: &ResponseHead) -> Self {
        let fields = options.fields();
        let status = head.status.as_u16();

        if fields.response_headers {
            record.response.headers = header_multimap(head.headers());
        }
        if fields.response_status {
            record.response.status = status;
        }

        let capture_body = fields.response_body && body_allowed_for_status(status);

        Self {
            buffer: BytesMut::new(),
            capture_body,
            failure: None,
            pending: Some((record, options)),
        }
    }

    /// Whether the response body is recorded at all
    pub fn wants_body(&self) -> bool {
        self.capture_body
    }

    /// Bytes duplicated so far, still readable after the record is emitted
    pub fn captured(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn write(&mut self, chunk: &[u8]) {
        if self.capture_body && self.pending.is_some() {
            self.buffer.extend_from_slice(chunk);
        }
    }

    pub(crate) fn fail(&mut self, err: CaptureError) {
        tracing::warn!(%err, "response body stream failed");
        self.failure = Some(err);
    }

    /// Decode the buffered body and emit the record; later calls are no-ops
    pub(crate) fn finish(&mut self) {
        let Some((mut record, options)) = self.pending.take() else {
            return;
        };

        if self.capture_body {
            record.response.body = Some(match self.failure.take() {
                Some(err) => DecodedBody::from_error(&err),
                None => DecodedBody::decode(&self.buffer),
            });
        }

        options.emit(record);
    }
}

impl Drop for ResponseCapture {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Attach the capture to a successful downstream response
///
/// Bodies already held in memory are copied in one step and the record is
/// emitted immediately; anything else is wrapped in a `TeeBody` that emits
/// once the stream has been consumed.
pub fn capture_response<B>(
    res: ServiceResponse<B>,
    record: CaptureRecord,
    options: Arc<CaptureOptions>,
) -> ServiceResponse<BoxBody>
where
    B: MessageBody + 'static,
{
    res.map_body(move |head, body| {
        let mut capture = ResponseCapture::begin(record, options, head);

        if !capture.wants_body() {
            capture.finish();
            return body.boxed();
        }

        if let BodySize::Sized(_) = body.size() {
            match body.try_into_bytes() {
                Ok(bytes) => {
                    capture.write(&bytes);
                    capture.finish();
                    BoxBody::new(bytes)
                }
                Err(body) => TeeBody::new(body, capture).boxed(),
            }
        } else {
            TeeBody::new(body, capture).boxed()
        }
    })
}

/// Record the response the host will render for a downstream error, then emit
///
/// The error itself is left for the caller to return unchanged.
pub fn capture_error_response(err: &Error, mut record: CaptureRecord, options: &CaptureOptions) {
    let fields = options.fields();
    let response = err.error_response();
    let status = response.status().as_u16();

    if fields.response_headers {
        record.response.headers = header_multimap(response.headers());
    }
    if fields.response_status {
        record.response.status = status;
    }
    if fields.response_body && body_allowed_for_status(status) {
        record.response.body = Some(match response.into_body().try_into_bytes() {
            Ok(bytes) => DecodedBody::decode(&bytes),
            Err(_) => DecodedBody::from_error(&CaptureError::StreamedErrorBody),
        });
    }

    options.emit(record);
}
