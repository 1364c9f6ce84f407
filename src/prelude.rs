//! Convenience re-exports for easy importing
//!
//! Import everything you need with:
//! ```rust
//! use jsondump_actix::prelude::*;
//! ```

pub use crate::body::DecodedBody;
pub use crate::config::{CaptureFields, CaptureOptions};
pub use crate::emitter::{ChannelEmitter, Emitter, StdoutEmitter, TracingEmitter};
pub use crate::middleware::CaptureMiddleware;
pub use crate::record::CaptureRecord;
