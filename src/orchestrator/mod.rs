//! Orchestration layer
//!
//! ## Responsibility
//!
//! The batch lives here and nowhere else: the layer owns the client,
//! gathers the batch input, drives the strictly sequential conversion
//! loop and produces the final tally.
//!
//! ## Layering
//!
//! ```text
//! orchestrator::App          (startup, gates, upload, selection)
//!     ↓
//! orchestrator::run_batch    (one remote call per file, in order)
//!     ↓
//! services                   (capabilities: convert / settings / upload / selection)
//!     ↓
//! clients::FrappeClient      (transport)
//! ```
//!
//! ## Principles
//!
//! 1. Services never see the batch; the batch never sees reqwest.
//! 2. The progress surface is passed in as an explicit handle, created
//!    per batch and dropped with it.
//! 3. The loop awaits every call before issuing the next one; nothing in
//!    this layer spawns tasks.

pub mod batch_processor;

pub use batch_processor::{run_batch, App};
