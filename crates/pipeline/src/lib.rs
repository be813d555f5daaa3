//! Batch upload pipeline.
//!
//! This crate implements the **business logic** for pushing an upload batch
//! to the REST backend. It is a library crate with no HTTP dependency — the
//! application provides a [`FileTransport`] implementation that bridges to
//! the actual client (see `filedrop-http` for the reqwest one).
//!
//! # Pipeline
//!
//! One [`UploadPipeline::run`] drives a batch through four phases, every
//! transport call sequential and awaited:
//!
//! 1. **Delete** — files marked for removal
//! 2. **Small files** — new files at or below the 2 MiB threshold
//! 3. **Large files** — new files above it, split into 2 MiB chunks
//! 4. **Pass-through** — files already stored, re-listed without traffic
//!
//! All requests of one run share a random correlation key so the backend can
//! group them under one logical submission. Any transport failure in phases
//! 1–3 aborts the whole run; there is no partial success.

pub mod error;
pub mod events;
pub mod pipeline;
pub mod planner;
pub mod transport;

// Re-export primary types for convenience.
pub use error::{AbortReason, UploadError, UploadPhase};
pub use events::{Destination, UploadEvent, UploadOutcome};
pub use pipeline::UploadPipeline;
pub use planner::plan;
pub use transport::{FileTransport, TransportError};
