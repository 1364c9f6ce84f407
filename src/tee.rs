//! Response body tee
//!
//! `TeeBody` sits between the downstream body and the client. Every chunk the
//! inner body yields is copied into the capture buffer and then passed on
//! untouched: same bytes, same chunk boundaries, same size hint, same errors.

use actix_web::{
    body::{BodySize, MessageBody},
    web::Bytes,
};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::CaptureError;
use crate::response_capture::ResponseCapture;

pin_project! {
    /// Body wrapper that duplicates streamed chunks into a `ResponseCapture`
    pub struct TeeBody<B> {
        #[pin]
        body: B,
        capture: ResponseCapture,
    }
}

impl<B> TeeBody<B> {
    pub fn new(body: B, capture: ResponseCapture) -> Self {
        Self { body, capture }
    }

    /// Bytes passed through so far
    pub fn captured(&self) -> &[u8] {
        self.capture.captured()
    }
}

impl<B> MessageBody for TeeBody<B>
where
    B: MessageBody,
{
    type Error = B::Error;

    fn size(&self) -> BodySize {
        self.body.size()
    }

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Bytes, Self::Error>>> {
        let this = self.project();

        match this.body.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.capture.write(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                let captured = this.capture.captured().len();
                this.capture.fail(CaptureError::ResponseStream { captured });
                this.capture.finish();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.capture.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::DecodedBody;
    use crate::config::{CaptureFields, CaptureOptions};
    use crate::emitter::ChannelEmitter;
    use crate::record::CaptureRecord;
    use actix_web::{
        body::BodyStream,
        dev::ResponseHead,
        http::StatusCode,
    };
    use futures::{future::poll_fn, stream};
    use serde_json::json;
    use std::io;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn tee<B>(body: B) -> (TeeBody<B>, UnboundedReceiver<CaptureRecord>) {
        let (emitter, rx) = ChannelEmitter::new();
        let options = CaptureOptions::with_fields(CaptureFields::all(), emitter).into_arc();
        let capture = ResponseCapture::begin(
            CaptureRecord::default(),
            options,
            &ResponseHead::new(StatusCode::OK),
        );
        (TeeBody::new(body, capture), rx)
    }

    async fn next_chunk<B: MessageBody>(
        body: &mut Pin<&mut TeeBody<B>>,
    ) -> Option<Result<Bytes, B::Error>> {
        poll_fn(|cx| body.as_mut().poll_next(cx)).await
    }

    #[actix_rt::test]
    async fn test_chunks_pass_through_unchanged() {
        let chunks = vec![
            Bytes::from_static(br#"{"ok":"#),
            Bytes::from_static(b"true,"),
            Bytes::from_static(br#""data":"x"}"#),
        ];
        let source = BodyStream::new(stream::iter(
            chunks.clone().into_iter().map(Ok::<_, io::Error>),
        ));
        let (body, mut rx) = tee(source);
        assert_eq!(body.size(), BodySize::Stream);

        let mut body = std::pin::pin!(body);
        let mut delivered = Vec::new();
        while let Some(chunk) = next_chunk(&mut body).await {
            delivered.push(chunk.unwrap());
            assert!(rx.try_recv().is_err(), "emitted before the body ended");
        }

        assert_eq!(delivered, chunks);
        assert_eq!(body.captured(), br#"{"ok":true,"data":"x"}"#);

        let record = rx.try_recv().expect("record emitted at end of stream");
        assert_eq!(
            record.response.body,
            Some(DecodedBody::Structured(json!({"ok": true, "data": "x"})))
        );
    }

    #[actix_rt::test]
    async fn test_zero_writes() {
        let source = BodyStream::new(stream::iter(Vec::<Result<Bytes, io::Error>>::new()));
        let (body, mut rx) = tee(source);

        let mut body = std::pin::pin!(body);
        assert!(next_chunk(&mut body).await.is_none());

        let record = rx.try_recv().unwrap();
        assert_eq!(
            record.response.body,
            Some(DecodedBody::Raw {
                value: String::new()
            })
        );
    }

    #[actix_rt::test]
    async fn test_inner_error_is_forwarded() {
        let source = BodyStream::new(stream::iter(vec![
            Ok(Bytes::from_static(b"half")),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream gone")),
        ]));
        let (body, mut rx) = tee(source);

        let mut body = std::pin::pin!(body);
        assert_eq!(next_chunk(&mut body).await.unwrap().unwrap(), "half");
        let err = next_chunk(&mut body).await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let record = rx.try_recv().unwrap();
        assert_eq!(
            record.response.body,
            Some(DecodedBody::Error {
                error: "response body stream failed after 4 bytes".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[actix_rt::test]
    async fn test_abandoned_body_emits_partial_once() {
        let source = BodyStream::new(stream::iter(vec![
            Ok::<_, io::Error>(Bytes::from_static(b"first")),
            Ok(Bytes::from_static(b"second")),
        ]));
        let (body, mut rx) = tee(source);

        {
            let mut body = std::pin::pin!(body);
            next_chunk(&mut body).await.unwrap().unwrap();
        }

        let record = rx.try_recv().expect("record emitted on drop");
        assert_eq!(
            record.response.body,
            Some(DecodedBody::Raw {
                value: "first".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
    }
}
