//! Adjacency storage and mutation.

use crate::{GraphError, GraphStats, ReaderId, DEFAULT_FRIENDSHIP_WEIGHT};
use std::collections::HashMap;
use std::hash::Hash;

type Adjacency<Id> = HashMap<Id, HashMap<Id, f64>>;

/// In-memory affinity graph over reader identifiers.
///
/// Invariants, enforced by the mutation methods below:
/// - the adjacency map is symmetric (`u -> v` with `w` implies `v -> u` with `w`);
/// - no self-loops;
/// - at most one edge per pair (re-adding overwrites the weight);
/// - every weight is finite and non-negative.
///
/// Unknown identifiers are never an error: mutations become no-ops and queries return empty
/// results. The graph is a cache of the reader source, so missing ids are expected.
#[derive(Debug, Clone)]
pub struct AffinityGraph<Id = ReaderId> {
    /// vertex -> (neighbor -> weight).
    pub(crate) adjacency: Adjacency<Id>,
}

impl<Id> Default for AffinityGraph<Id> {
    fn default() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }
}

impl<Id> AffinityGraph<Id>
where
    Id: Clone + Eq + Hash + Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_weight(weight: f64) -> Result<(), GraphError> {
        if weight.is_finite() && weight >= 0.0 {
            Ok(())
        } else {
            Err(GraphError::InvalidWeight(weight))
        }
    }

    /// Sets the edge symmetrically. Caller has validated the weight.
    fn link(&mut self, u: &Id, v: &Id, weight: f64) {
        if u == v {
            return;
        }
        self.adjacency
            .entry(u.clone())
            .or_default()
            .insert(v.clone(), weight);
        self.adjacency
            .entry(v.clone())
            .or_default()
            .insert(u.clone(), weight);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert a vertex with no neighbors. No-op if already present.
    pub fn add_user(&mut self, id: Id) {
        self.adjacency.entry(id).or_default();
    }

    /// Create or overwrite the connection between `u` and `v`, materializing both.
    ///
    /// A self-connection (`u == v`) is a no-op. The weight is checked first, so an invalid
    /// weight is reported even for a self-connection.
    pub fn add_connection(&mut self, u: Id, v: Id, weight: f64) -> Result<(), GraphError> {
        Self::validate_weight(weight)?;
        self.link(&u, &v, weight);
        Ok(())
    }

    /// Remove the connection in both directions. No-op if absent.
    pub fn remove_connection(&mut self, u: &Id, v: &Id) {
        if let Some(neighbors) = self.adjacency.get_mut(u) {
            neighbors.remove(v);
        }
        if let Some(neighbors) = self.adjacency.get_mut(v) {
            neighbors.remove(u);
        }
    }

    /// Remove a vertex and every edge incident to it. No-op if unknown.
    pub fn remove_user(&mut self, id: &Id) {
        let Some(neighbors) = self.adjacency.remove(id) else {
            return;
        };
        for neighbor in neighbors.keys() {
            if let Some(back) = self.adjacency.get_mut(neighbor) {
                back.remove(id);
            }
        }
    }

    /// Additive bulk build: ensure every listed reader exists, then connect each declared
    /// relation with [`DEFAULT_FRIENDSHIP_WEIGHT`]. Prior vertices and edges are kept.
    ///
    /// Relations may be duplicated or declared from both ends; they converge to one edge.
    /// Relations to ids not listed materialize those ids. Self-relations are skipped.
    pub fn build_from_users<I, R>(&mut self, readers: I)
    where
        I: IntoIterator<Item = (Id, R)>,
        R: IntoIterator<Item = Id>,
    {
        let readers: Vec<(Id, Vec<Id>)> = readers
            .into_iter()
            .map(|(id, related)| (id, related.into_iter().collect()))
            .collect();
        for (id, _) in &readers {
            self.add_user(id.clone());
        }
        for (id, related) in &readers {
            for other in related {
                self.link(id, other, DEFAULT_FRIENDSHIP_WEIGHT);
            }
        }
        tracing::debug!(
            readers = readers.len(),
            users = self.user_count(),
            connections = self.total_connections(),
            "affinity graph built"
        );
    }

    /// Clear-then-build: same as [`Self::build_from_users`] on an empty graph, so relations
    /// dropped from the source disappear.
    pub fn rebuild_from_users<I, R>(&mut self, readers: I)
    where
        I: IntoIterator<Item = (Id, R)>,
        R: IntoIterator<Item = Id>,
    {
        self.clear();
        self.build_from_users(readers);
    }

    /// Drop all vertices and edges.
    pub fn clear(&mut self) {
        self.adjacency.clear();
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    pub fn contains_user(&self, id: &Id) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn user_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All known vertices, in arbitrary order.
    pub fn users(&self) -> impl Iterator<Item = &Id> + '_ {
        self.adjacency.keys()
    }

    /// All known vertices, ascending.
    pub fn sorted_users(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.adjacency.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Weight of the direct connection, if any.
    pub fn connection_weight(&self, u: &Id, v: &Id) -> Option<f64> {
        self.adjacency.get(u)?.get(v).copied()
    }

    pub fn are_connected(&self, u: &Id, v: &Id) -> bool {
        self.connection_weight(u, v).is_some()
    }

    /// Copy of the neighbor map, sorted by neighbor id. Empty when unknown.
    pub fn connections(&self, id: &Id) -> Vec<(Id, f64)> {
        let mut out: Vec<(Id, f64)> = self
            .adjacency
            .get(id)
            .map(|n| n.iter().map(|(k, w)| (k.clone(), *w)).collect())
            .unwrap_or_default();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Direct neighbors, ascending.
    pub fn direct_friends(&self, id: &Id) -> Vec<Id> {
        self.connections(id).into_iter().map(|(k, _)| k).collect()
    }

    /// Degree of a vertex; 0 when unknown.
    pub fn connection_count(&self, id: &Id) -> usize {
        self.adjacency.get(id).map(HashMap::len).unwrap_or(0)
    }

    /// Undirected edge count.
    pub fn total_connections(&self) -> usize {
        self.adjacency.values().map(HashMap::len).sum::<usize>() / 2
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            user_count: self.user_count(),
            connection_count: self.total_connections(),
            cluster_count: self.detect_clusters().len(),
            isolated_count: self.adjacency.values().filter(|n| n.is_empty()).count(),
        }
    }
}

#[cfg(test)]
pub(crate) fn graph_from_edges(
    edges: &[(&'static str, &'static str, f64)],
) -> AffinityGraph<&'static str> {
    let mut g = AffinityGraph::new();
    for (u, v, w) in edges {
        g.add_connection(*u, *v, *w).unwrap();
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric(g: &AffinityGraph<&'static str>) {
        for (u, neighbors) in &g.adjacency {
            assert!(!neighbors.contains_key(u), "self-loop at {}", u);
            for (v, w) in neighbors {
                assert_eq!(g.connection_weight(v, u), Some(*w), "{} -> {} not mirrored", u, v);
            }
        }
    }

    #[test]
    fn add_user_is_idempotent() {
        let mut g = graph_from_edges(&[("a", "b", 2.0)]);
        g.add_user("a");
        g.add_user("z");
        g.add_user("z");
        assert_eq!(g.user_count(), 3);
        assert_eq!(g.connection_weight(&"a", &"b"), Some(2.0));
        assert_eq!(g.connection_count(&"z"), 0);
    }

    #[test]
    fn add_connection_materializes_and_overwrites() {
        let mut g = AffinityGraph::new();
        g.add_connection("u", "v", 1.0).unwrap();
        g.add_connection("v", "u", 4.5).unwrap();
        assert_eq!(g.user_count(), 2);
        assert_eq!(g.total_connections(), 1);
        assert_eq!(g.connection_weight(&"u", &"v"), Some(4.5));
        assert_symmetric(&g);
    }

    #[test]
    fn self_connection_is_noop() {
        let mut g = AffinityGraph::new();
        g.add_connection("a", "a", 1.0).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.connection_weight(&"a", &"a"), None);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut g = AffinityGraph::new();
        assert_eq!(
            g.add_connection("a", "b", -0.5),
            Err(GraphError::InvalidWeight(-0.5))
        );
        assert!(g.add_connection("a", "b", f64::NAN).is_err());
        assert!(g.add_connection("a", "b", f64::INFINITY).is_err());
        assert!(g.add_connection("a", "a", -1.0).is_err());
        assert!(g.is_empty());
        g.add_connection("a", "b", 0.0).unwrap();
        assert_eq!(g.connection_weight(&"a", &"b"), Some(0.0));
    }

    #[test]
    fn remove_connection_keeps_symmetry() {
        let mut g = graph_from_edges(&[("a", "b", 1.0), ("b", "c", 1.0)]);
        g.remove_connection(&"b", &"a");
        assert_eq!(g.connection_weight(&"a", &"b"), None);
        assert_eq!(g.connection_weight(&"b", &"a"), None);
        assert!(g.contains_user(&"a"));
        assert_symmetric(&g);

        g.remove_connection(&"a", &"c");
        g.remove_connection(&"x", &"y");
        assert_eq!(g.total_connections(), 1);
    }

    #[test]
    fn remove_user_drops_incident_edges() {
        let mut g = graph_from_edges(&[("a", "b", 1.0), ("a", "c", 2.0), ("b", "c", 3.0)]);
        g.remove_user(&"a");
        assert!(!g.contains_user(&"a"));
        assert!(g.connections(&"b").iter().all(|(k, _)| *k != "a"));
        assert!(g.connections(&"c").iter().all(|(k, _)| *k != "a"));
        assert_eq!(g.total_connections(), 1);
        assert_symmetric(&g);

        g.remove_user(&"missing");
        assert_eq!(g.user_count(), 2);
    }

    #[test]
    fn build_from_users_converges_duplicate_relations() {
        let mut g = AffinityGraph::new();
        g.build_from_users(vec![
            ("a", vec!["b", "b", "a"]),
            ("b", vec!["a", "c"]),
            ("d", vec![]),
        ]);
        assert_eq!(g.sorted_users(), vec!["a", "b", "c", "d"]);
        assert_eq!(g.total_connections(), 2);
        assert_eq!(g.connection_weight(&"a", &"b"), Some(DEFAULT_FRIENDSHIP_WEIGHT));
        assert_symmetric(&g);
    }

    #[test]
    fn build_is_additive_and_rebuild_clears() {
        let mut g = graph_from_edges(&[("x", "y", 0.3)]);
        g.build_from_users(vec![("a", vec!["b"])]);
        assert!(g.are_connected(&"x", &"y"));
        assert!(g.are_connected(&"a", &"b"));

        g.rebuild_from_users(vec![("a", vec!["b"])]);
        assert!(!g.contains_user(&"x"));
        assert_eq!(g.sorted_users(), vec!["a", "b"]);
    }

    #[test]
    fn accessors_are_sorted() {
        let g = graph_from_edges(&[("m", "c", 1.0), ("m", "a", 2.0), ("m", "b", 3.0)]);
        assert_eq!(g.direct_friends(&"m"), vec!["a", "b", "c"]);
        assert_eq!(g.connections(&"m")[0], ("a", 2.0));
        assert!(g.connections(&"unknown").is_empty());
        assert_eq!(g.connection_count(&"m"), 3);
    }

    #[test]
    fn stats_counts_clusters_and_isolated() {
        let mut g = graph_from_edges(&[("a", "b", 1.0), ("c", "d", 1.0)]);
        g.add_user("e");
        let stats = g.stats();
        assert_eq!(stats.user_count, 5);
        assert_eq!(stats.connection_count, 2);
        assert_eq!(stats.cluster_count, 3);
        assert_eq!(stats.isolated_count, 1);
    }
}
