//! AffinityService: owns the graph, rebuilds it from the reader source, serializes access.

use crate::AffinityConfig;
use affinity_graph::AffinityGraph;
use affinity_types::{
    AffinityError, ConnectedReader, DegreeEntry, GraphStats, HopSuggestion, MostConnectedReport,
    PathReport, PathStep, ReaderId, ReaderRecord, ReaderSource, RefreshSummary, ScoredReader,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

/// Graph owner. Queries share a read lock; mutations and refresh take the write lock, so no
/// query can observe a half-applied mutation.
///
/// `refresh_lock` is held by every refresh from the source load through the swap, and by
/// point mutations, so rebuilds and edits apply in the order they were issued.
pub struct AffinityService<S> {
    source: S,
    graph: RwLock<AffinityGraph>,
    refresh_lock: Mutex<()>,
    config: AffinityConfig,
}

impl<S> AffinityService<S>
where
    S: ReaderSource,
{
    /// Service with an empty graph. Call [`Self::refresh`] to load readers.
    pub fn new(source: S, config: AffinityConfig) -> Self {
        Self {
            source,
            graph: RwLock::new(AffinityGraph::new()),
            refresh_lock: Mutex::new(()),
            config,
        }
    }

    /// Service with the graph already built from the source.
    pub async fn connect(source: S, config: AffinityConfig) -> Result<Self, AffinityError> {
        let service = Self::new(source, config);
        service.refresh().await?;
        Ok(service)
    }

    pub fn config(&self) -> &AffinityConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `f` against the graph under the read lock.
    pub async fn with_graph<R>(&self, f: impl FnOnce(&AffinityGraph) -> R) -> R {
        let guard = self.graph.read().await;
        f(&guard)
    }

    /// Clear-then-build from the source. The new graph is built before the write lock is
    /// taken, then swapped in whole. A failed load leaves the current graph untouched.
    pub async fn refresh(&self) -> Result<RefreshSummary, AffinityError> {
        let _rebuild = self.refresh_lock.lock().await;
        let readers = self.source.load_readers().await?;
        Ok(self.install(&readers).await)
    }

    /// Swap in a graph built from `readers`. Caller holds `refresh_lock`.
    async fn install(&self, readers: &[ReaderRecord]) -> RefreshSummary {
        let mut fresh = AffinityGraph::new();
        fresh.build_from_users(readers.iter().map(ReaderRecord::relations));

        let summary = RefreshSummary {
            user_count: fresh.user_count(),
            connection_count: fresh.total_connections(),
            refreshed_at: Utc::now().to_rfc3339(),
        };
        *self.graph.write().await = fresh;
        tracing::info!(
            users = summary.user_count,
            connections = summary.connection_count,
            "affinity graph refreshed"
        );
        summary
    }

    /// Load the reader snapshot once, keyed by id. With `rebuild` the graph is also rebuilt
    /// from that same snapshot.
    async fn snapshot(
        &self,
        rebuild: bool,
    ) -> Result<HashMap<ReaderId, ReaderRecord>, AffinityError> {
        let readers = if rebuild {
            let _rebuild = self.refresh_lock.lock().await;
            let readers = self.source.load_readers().await?;
            self.install(&readers).await;
            readers
        } else {
            self.source.load_readers().await?
        };
        Ok(readers.into_iter().map(|r| (r.id.clone(), r)).collect())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn add_user(&self, id: &str) {
        let _rebuild = self.refresh_lock.lock().await;
        self.graph.write().await.add_user(id.to_string());
    }

    pub async fn add_connection(&self, u: &str, v: &str, weight: f64) -> Result<(), AffinityError> {
        let _rebuild = self.refresh_lock.lock().await;
        let result = self
            .graph
            .write()
            .await
            .add_connection(u.to_string(), v.to_string(), weight);
        if let Err(ref e) = result {
            tracing::warn!(from = u, to = v, error = %e, "connection rejected");
        }
        Ok(result?)
    }

    pub async fn remove_connection(&self, u: &str, v: &str) {
        let _rebuild = self.refresh_lock.lock().await;
        self.graph
            .write()
            .await
            .remove_connection(&u.to_string(), &v.to_string());
    }

    pub async fn remove_user(&self, id: &str) {
        let _rebuild = self.refresh_lock.lock().await;
        self.graph.write().await.remove_user(&id.to_string());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn shortest_path(&self, from: &str, to: &str) -> Vec<ReaderId> {
        let (from, to) = (from.to_string(), to.to_string());
        self.with_graph(|g| g.shortest_path(&from, &to)).await
    }

    pub async fn users_within_distance(&self, start: &str, max_hops: usize) -> HashSet<ReaderId> {
        let start = start.to_string();
        self.with_graph(|g| g.users_within_distance(&start, max_hops))
            .await
    }

    pub async fn suggest_potential_friends(
        &self,
        user: &str,
        max_hops: usize,
    ) -> Vec<HopSuggestion> {
        let user = user.to_string();
        self.with_graph(|g| g.suggest_potential_friends(&user, max_hops))
            .await
    }

    pub async fn find_friends_of_friends(&self, user: &str, limit: usize) -> Vec<ScoredReader> {
        let user = user.to_string();
        self.with_graph(|g| g.find_friends_of_friends(&user, limit))
            .await
    }

    pub async fn top_connections(&self, user: &str, limit: usize) -> Vec<ScoredReader> {
        let user = user.to_string();
        self.with_graph(|g| g.top_connections(&user, limit)).await
    }

    pub async fn users_with_most_connections(&self, limit: usize) -> Vec<DegreeEntry> {
        self.with_graph(|g| g.users_with_most_connections(limit))
            .await
    }

    pub async fn detect_clusters(&self) -> Vec<BTreeSet<ReaderId>> {
        self.with_graph(|g| g.detect_clusters()).await
    }

    pub async fn stats(&self) -> GraphStats {
        self.with_graph(|g| g.stats()).await
    }

    /// Readers with the most direct connections, decorated with usernames. Readers the
    /// source does not know keep their id as username.
    pub async fn most_connected_report(
        &self,
        limit: usize,
    ) -> Result<MostConnectedReport, AffinityError> {
        let ranked = self.users_with_most_connections(limit).await;
        let readers = self.snapshot(false).await?;
        let readers = ranked
            .into_iter()
            .map(|entry| ConnectedReader {
                username: username_of(&readers, &entry.id),
                id: entry.id,
                friend_count: entry.degree,
            })
            .collect();
        Ok(MostConnectedReport { readers })
    }

    /// Degrees-of-separation report between two readers, decorated with usernames.
    ///
    /// Both readers must exist in the source. When `refresh_before_path` is set the graph is
    /// rebuilt first so the report reflects the latest friendships. The source is read once.
    pub async fn connection_path(&self, from: &str, to: &str) -> Result<PathReport, AffinityError> {
        let readers = self.snapshot(self.config.refresh_before_path).await?;
        let source = require_reader(&readers, from)?;
        let target = require_reader(&readers, to)?;

        let found = self
            .with_graph(|g| g.shortest_path_with_cost(&source.id, &target.id))
            .await;
        let Some(found) = found else {
            return Ok(PathReport {
                connected: false,
                source_user: source.username.clone(),
                target_user: target.username.clone(),
                degrees: None,
                total_weight: None,
                path: Vec::new(),
            });
        };

        let path = found
            .node_ids
            .iter()
            .map(|id| PathStep {
                id: id.clone(),
                username: username_of(&readers, id),
            })
            .collect();

        Ok(PathReport {
            connected: true,
            source_user: source.username.clone(),
            target_user: target.username.clone(),
            degrees: Some(found.hops()),
            total_weight: Some(found.total_weight),
            path,
        })
    }
}

fn require_reader<'a>(
    readers: &'a HashMap<ReaderId, ReaderRecord>,
    id: &str,
) -> Result<&'a ReaderRecord, AffinityError> {
    readers
        .get(id)
        .ok_or_else(|| AffinityError::ReaderNotFound(id.to_string()))
}

fn username_of(readers: &HashMap<ReaderId, ReaderRecord>, id: &str) -> String {
    readers
        .get(id)
        .map(|r| r.username.clone())
        .unwrap_or_else(|| id.to_string())
}
