//! Graph owner for the reader-affinity engine.
//!
//! Loads readers from a [`ReaderSource`], builds the [`AffinityGraph`], and shares it across
//! tasks behind a readers-writer lock.

mod config;
mod service;
mod source;

pub use affinity_graph::AffinityGraph;
pub use affinity_types::*;
pub use config::AffinityConfig;
pub use service::AffinityService;
pub use source::{InMemoryReaderSource, JsonFileReaderSource};
