//! Core types and traits for the reader-affinity engine.
//!
//! Query results are plain value objects so the service layer can hand them to any caller
//! (JSON output, text reports) without touching the graph.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
