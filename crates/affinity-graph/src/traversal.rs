//! Hop-count neighborhoods (breadth-first, weights ignored).

use crate::{AffinityGraph, HopSuggestion};
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

impl<Id> AffinityGraph<Id>
where
    Id: Clone + Eq + Hash + Ord,
{
    /// Hop distance of every vertex within `max_hops` of `start`, including `start` at 0.
    /// First discovery is final; vertices at depth `max_hops` are not expanded.
    fn hop_distances(&self, start: &Id, max_hops: usize) -> HashMap<&Id, usize> {
        let mut depth: HashMap<&Id, usize> = HashMap::new();
        let Some((start, _)) = self.adjacency.get_key_value(start) else {
            return depth;
        };

        let mut queue: VecDeque<&Id> = VecDeque::new();
        depth.insert(start, 0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let d = depth[current];
            if d >= max_hops {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(current) else {
                continue;
            };
            for next in neighbors.keys() {
                if !depth.contains_key(next) {
                    depth.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        depth
    }

    /// Every vertex reachable from `start` in at most `max_hops` edges, excluding `start`.
    /// Empty for an unknown start or `max_hops == 0`.
    pub fn users_within_distance(&self, start: &Id, max_hops: usize) -> HashSet<Id> {
        self.hop_distances(start, max_hops)
            .into_iter()
            .filter(|(_, d)| *d > 0)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Indirect candidates for `user`: vertices 2..=`max_hops` hops away, nearest first
    /// (ties by id). Direct connections are already known and never suggested.
    pub fn suggest_potential_friends(&self, user: &Id, max_hops: usize) -> Vec<HopSuggestion<Id>> {
        let mut out: Vec<HopSuggestion<Id>> = self
            .hop_distances(user, max_hops)
            .into_iter()
            .filter(|(_, d)| *d > 1)
            .map(|(id, hops)| HopSuggestion {
                id: id.clone(),
                hops,
            })
            .collect();
        out.sort_by(|a, b| a.hops.cmp(&b.hops).then_with(|| a.id.cmp(&b.id)));
        out
    }
}
