//! # jsondump-actix
//!
//! Request/response capture middleware for Actix-Web applications.
//!
//! For every request the middleware records a configurable selection of
//! request and response facts (headers, bodies, path, method, query, status)
//! and hands the finished record to an emitter. Bodies that parse as JSON are
//! recorded as JSON; anything else is kept as text.
//!
//! - **Transparent**: handlers see the exact request body the client sent,
//!   clients see the exact response bytes the handlers produced
//! - **Best-effort**: read failures, non-JSON payloads and emitter panics end
//!   up in the record or the log, never in the response
//! - **Synchronous**: the emitter runs on the request's own task, once, after
//!   the response body has been produced
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpResponse, HttpServer};
//! use jsondump_actix::CaptureMiddleware;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(CaptureMiddleware::new())
//!             .service(web::resource("/").to(|| async {
//!                 HttpResponse::Ok().json(serde_json::json!({"ok": true}))
//!             }))
//!     })
//!     .bind("0.0.0.0:8080")?
//!     .run()
//!     .await
//! }
//! ```
//!
//! Each request then prints a record like:
//!
//! ```text
//! {
//!   "Request": { "Headers": {...}, "Body": {"value": ""}, "Path": "/", "Method": "GET", "Query": {} },
//!   "Response": { "Headers": {...}, "Body": {"ok": true}, "Status": 200 }
//! }
//! ```
//!
//! ## Configuration
//!
//! `CaptureMiddleware::with_options` takes a `CaptureOptions`: the field
//! matrix (`CaptureFields`) plus an `Emitter`. Emitters shipped with the crate:
//!
//! - `StdoutEmitter`: indented JSON on stdout (the default)
//! - `TracingEmitter`: one `tracing` INFO event per record
//! - `ChannelEmitter`: records sent to a tokio channel for a background consumer
//!
//! Any `Fn(CaptureRecord) + Send + Sync` closure is an emitter too.
//!
//! ## Architecture
//!
//! - `middleware`: Actix-Web `Transform`/`Service` implementation
//! - `request_capture`: request facts, body read and restore
//! - `response_capture`: response facts and deferred emission
//! - `tee`: response body wrapper duplicating streamed chunks
//! - `body`: JSON-or-text decoding policy
//! - `record`: the captured record and its JSON forms
//! - `emitter`: record sinks
//! - `config`: field matrix and options
//! - `error`: internal error type
//! - `utils`: header and query conversion

pub mod body;
pub mod config;
pub mod emitter;
pub mod error;
pub mod middleware;
pub mod prelude;
pub mod record;
pub mod request_capture;
pub mod response_capture;
pub mod tee;
pub mod utils;

pub use body::DecodedBody;
pub use config::{CaptureFields, CaptureOptions};
pub use emitter::{ChannelEmitter, Emitter, StdoutEmitter, TracingEmitter};
pub use error::CaptureError;
pub use middleware::CaptureMiddleware;
pub use record::{CaptureRecord, RequestFacts, ResponseFacts};
