//! Request half of the capture
//!
//! Runs before the downstream handlers. The payload is read in full and then
//! put back into the request, so handlers still see exactly the bytes the
//! client sent (and the same read failure, if there was one).
//!
//! Upgrade requests (`Connection: upgrade`, e.g. WebSocket handshakes) are not
//! buffered: their payload stays open for the lifetime of the connection, so it
//! is left untouched and the body is recorded as empty text.

use actix_web::{
    dev::{Payload, ServiceRequest},
    error::PayloadError,
    web::{Bytes, BytesMut},
    HttpMessage,
};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::body::DecodedBody;
use crate::config::CaptureFields;
use crate::error::CaptureError;
use crate::record::RequestFacts;
use crate::utils::{header_multimap, is_upgrade_request, query_multimap};

/// Populate the request facts enabled in `fields`
pub async fn capture_request(req: &mut ServiceRequest, fields: &CaptureFields) -> RequestFacts {
    let mut facts = RequestFacts::default();

    if fields.request_headers {
        facts.headers = header_multimap(req.headers());
    }

    if fields.request_body {
        facts.body = Some(if req.head().upgrade() || is_upgrade_request(req.headers()) {
            tracing::debug!(path = %req.path(), "upgrade request, payload not buffered");
            DecodedBody::Raw {
                value: String::new(),
            }
        } else {
            match read_and_restore_body(req).await {
                Ok(bytes) => DecodedBody::decode(&bytes),
                Err(err) => DecodedBody::from_error(&err),
            }
        });
    }

    if fields.request_path {
        facts.path = req.path().to_string();
    }

    if fields.request_method {
        facts.method = req.method().to_string();
    }

    if fields.request_query {
        facts.query = query_multimap(req.query_string());
    }

    facts
}

/// Drain the request payload and replace it with a replay of what was read
///
/// A failed read is replayed too: downstream gets the bytes that arrived
/// followed by the original error.
async fn read_and_restore_body(req: &mut ServiceRequest) -> Result<Bytes, CaptureError> {
    let mut payload = req.take_payload();
    let mut buffer = BytesMut::new();
    let mut failure = None;

    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) => buffer.extend_from_slice(&chunk),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let bytes = buffer.freeze();
    let message = failure.as_ref().map(ToString::to_string);

    let mut replay = Vec::with_capacity(2);
    if !bytes.is_empty() {
        replay.push(Ok(bytes.clone()));
    }
    if let Some(err) = failure {
        replay.push(Err(err));
    }

    let replay: Pin<Box<dyn Stream<Item = Result<Bytes, PayloadError>>>> =
        Box::pin(stream::iter(replay));
    req.set_payload(Payload::Stream { payload: replay });

    match message {
        Some(message) => {
            tracing::warn!(%message, read = bytes.len(), "failed to read request body");
            Err(CaptureError::BodyRead(message))
        }
        None => Ok(bytes),
    }
}
