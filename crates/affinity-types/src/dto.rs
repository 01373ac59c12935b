//! Reader records and query result value objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a reader in the system of record.
pub type ReaderId = String;

/// Weight given to a declared friendship when the graph is built from reader records.
pub const DEFAULT_FRIENDSHIP_WEIGHT: f64 = 1.0;

/// A reader as held by the system of record. The graph only uses `id` and `connections`;
/// `username` is for decorating query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderRecord {
    pub id: ReaderId,
    pub username: String,
    /// Declared friendships (reader ids). May be declared from either side.
    #[serde(default)]
    pub connections: Vec<ReaderId>,
}

impl ReaderRecord {
    /// New reader with a freshly generated id and no connections.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            connections: Vec::new(),
        }
    }

    pub fn with_id(id: impl Into<ReaderId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            connections: Vec::new(),
        }
    }

    /// Builder-style: declare friendships with the given readers.
    pub fn with_connections<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ReaderId>,
    {
        self.connections.extend(ids.into_iter().map(Into::into));
        self
    }

    /// `(id, related ids)` pair in the shape the graph's bulk build expects.
    pub fn relations(&self) -> (ReaderId, Vec<ReaderId>) {
        (self.id.clone(), self.connections.clone())
    }
}

/// A path through the graph with its cumulative edge weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPath<Id = ReaderId> {
    /// Source to target inclusive.
    pub node_ids: Vec<Id>,
    pub total_weight: f64,
}

impl<Id> WeightedPath<Id> {
    /// Number of edges on the path.
    pub fn hops(&self) -> usize {
        self.node_ids.len().saturating_sub(1)
    }
}

/// A friend suggestion paired with its exact hop distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopSuggestion<Id = ReaderId> {
    pub id: Id,
    pub hops: usize,
}

/// A reader with a ranking score (edge weight or two-hop affinity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReader<Id = ReaderId> {
    pub id: Id,
    pub score: f64,
}

/// A reader with its number of direct connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeEntry<Id = ReaderId> {
    pub id: Id,
    pub degree: usize,
}

/// Summary counts for the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub user_count: usize,
    /// Undirected edges (each pair counted once).
    pub connection_count: usize,
    pub cluster_count: usize,
    /// Readers with no connections.
    pub isolated_count: usize,
}

/// Result of rebuilding the graph from the reader source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub user_count: usize,
    pub connection_count: usize,
    /// RFC 3339 timestamp.
    pub refreshed_at: String,
}

/// One reader on a decorated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub id: ReaderId,
    pub username: String,
}

/// Degrees-of-separation report between two readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathReport {
    pub connected: bool,
    pub source_user: String,
    pub target_user: String,
    /// Edges on the path; `None` when not connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
    #[serde(default)]
    pub path: Vec<PathStep>,
}

impl std::fmt::Display for PathReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SHORTEST CONNECTION PATH")?;
        writeln!(f, "========================================")?;
        writeln!(f)?;
        if !self.connected {
            return writeln!(f, "No connection path exists between these users");
        }
        writeln!(f, "From: {}", self.source_user)?;
        writeln!(f, "To: {}", self.target_user)?;
        writeln!(f, "Degrees of separation: {}", self.degrees.unwrap_or(0))?;
        writeln!(f)?;
        writeln!(f, "CONNECTION PATH:")?;
        writeln!(f, "----------------------------------------")?;
        for (i, step) in self.path.iter().enumerate() {
            write!(f, "{}. {}", i + 1, step.username)?;
            let last = i + 1 == self.path.len();
            if !last {
                write!(f, " → ")?;
                // three readers per line
                if (i + 1) % 3 == 0 {
                    write!(f, "\n   ")?;
                }
            }
        }
        writeln!(f)
    }
}

/// A reader ranked by number of direct connections, decorated with its username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedReader {
    pub id: ReaderId,
    pub username: String,
    pub friend_count: usize,
}

/// Readers with the most friends, best first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MostConnectedReport {
    pub readers: Vec<ConnectedReader>,
}

impl std::fmt::Display for MostConnectedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "READERS WITH MOST FRIENDS")?;
        writeln!(f, "========================================")?;
        writeln!(f)?;
        if self.readers.is_empty() {
            return writeln!(f, "No readers found.");
        }
        for (rank, reader) in self.readers.iter().enumerate() {
            writeln!(f, "{}. {}", rank + 1, reader.username)?;
            writeln!(f, "   Friend count: {}", reader.friend_count)?;
            writeln!(f, "----------------------------------------")?;
        }
        Ok(())
    }
}
