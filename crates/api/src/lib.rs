//! Request/response surface for QuickStats
//!
//! Translates gateway-style events into engine requests and engine results
//! into status + JSON responses. The handler is stateless; the engine and
//! its store are built once by the composition root and injected.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handler;
pub mod wire;

pub use handler::{Event, Handler, Response};
pub use wire::{ErrorReply, UpdateBody, UpdateReply};
