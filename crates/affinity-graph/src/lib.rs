//! Weighted, undirected reader-affinity graph.
//!
//! Edge weights serve two readings: a traversal cost for [`AffinityGraph::shortest_path`]
//! (lower is closer) and a ranking score for [`AffinityGraph::find_friends_of_friends`] and
//! [`AffinityGraph::top_connections`] (higher is closer). Neither is inverted into the other.

mod cluster;
mod graph;
mod path;
mod ranking;
mod traversal;

pub use affinity_types::{
    DegreeEntry, GraphError, GraphStats, HopSuggestion, ReaderId, ScoredReader, WeightedPath,
    DEFAULT_FRIENDSHIP_WEIGHT,
};
pub use graph::AffinityGraph;
