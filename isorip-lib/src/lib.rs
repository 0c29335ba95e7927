//! Extraction and conversion engine on top of `isorip-core`.
//!
//! [`ImageSession`] owns an open disc image and exposes listing and
//! extraction; [`convert_to_iso`] turns raw dumps back into plain
//! 2048-byte images. Both are synchronous and cancellable through a
//! shared [`CancelToken`], so callers that want a responsive UI run
//! them on their own worker thread and keep a token clone.

pub mod cancel;
pub mod convert;
pub mod error;
pub mod progress;
pub mod session;
pub mod sink;

pub use cancel::CancelToken;
pub use convert::convert_to_iso;
pub use error::ExtractError;
pub use progress::{ConvertEvent, ExtractEvent};
pub use session::{ImageSession, Outcome};
pub use sink::{ExtractSink, LocalSink};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod support;
