//! Command-batch recording layer: draw commands are recorded into a [`Batch`]
//! inside a strictly scoped acquire/submit window, then handed to a pluggable
//! execution backend.
//!
//! Recording is synchronous; execution is the backend's business and may be
//! deferred or asynchronous. Nothing in this crate talks to a real GPU.

pub mod batch;
pub mod context;
pub mod pipeline;

pub use batch::{Batch, Command};
pub use context::{BatchBackend, GpuContext, NullBackend, RecordingBackend};
pub use pipeline::Pipeline;
