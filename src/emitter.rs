//! Record sinks
//!
//! An emitter receives each completed `CaptureRecord` exactly once, on the
//! request's own task, after the downstream handlers have finished. Emitters
//! must not block; anything slow belongs behind a `ChannelEmitter`.

use tokio::sync::mpsc;

use crate::record::CaptureRecord;

/// Accepts completed capture records
///
/// Implemented for any `Fn(CaptureRecord) + Send + Sync` closure, so a one-off
/// sink needs no dedicated type:
///
/// ```rust
/// use jsondump_actix::{CaptureOptions, CaptureRecord};
///
/// let options = CaptureOptions::new().emitter(|record: CaptureRecord| {
///     eprintln!("{} {}", record.request.method, record.response.status);
/// });
/// # let _ = options;
/// ```
pub trait Emitter: Send + Sync {
    fn emit(&self, record: CaptureRecord);
}

impl<F> Emitter for F
where
    F: Fn(CaptureRecord) + Send + Sync,
{
    fn emit(&self, record: CaptureRecord) {
        self(record)
    }
}

/// Prints every record to stdout as indented JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEmitter;

impl Emitter for StdoutEmitter {
    fn emit(&self, record: CaptureRecord) {
        println!("{}", record.to_json_pretty_string());
    }
}

/// Logs every record as one `tracing` event at INFO level
///
/// The compact JSON goes into the `record` field so log shippers can pick it
/// up without re-parsing the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl Emitter for TracingEmitter {
    fn emit(&self, record: CaptureRecord) {
        tracing::info!(
            method = %record.request.method,
            path = %record.request.path,
            status = record.response.status,
            record = %record.to_json_string(),
            "request captured"
        );
    }
}

/// Forwards records to an unbounded channel for out-of-band processing
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<CaptureRecord>,
}

impl ChannelEmitter {
    /// Create an emitter together with the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CaptureRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Emitter for ChannelEmitter {
    fn emit(&self, record: CaptureRecord) {
        if self.tx.send(record).is_err() {
            tracing::warn!("capture receiver closed, dropping record");
        }
    }
}
