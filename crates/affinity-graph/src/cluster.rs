//! Connected components.

use crate::AffinityGraph;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

impl<Id> AffinityGraph<Id>
where
    Id: Clone + Eq + Hash + Ord,
{
    /// Partition every vertex into its connected component. Isolated vertices form singleton
    /// clusters. Clusters are ordered by their smallest member.
    pub fn detect_clusters(&self) -> Vec<BTreeSet<Id>> {
        let mut roots: Vec<&Id> = self.adjacency.keys().collect();
        roots.sort();

        let mut visited: HashSet<&Id> = HashSet::with_capacity(roots.len());
        let mut clusters = Vec::new();

        for root in roots {
            if !visited.insert(root) {
                continue;
            }
            let mut cluster = BTreeSet::new();
            let mut queue: VecDeque<&Id> = VecDeque::from([root]);
            while let Some(current) = queue.pop_front() {
                cluster.insert(current.clone());
                let Some(neighbors) = self.adjacency.get(current) else {
                    continue;
                };
                for next in neighbors.keys() {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            clusters.push(cluster);
        }
        clusters
    }
}
