//! Weighted shortest path (Dijkstra over a binary heap).
//!
//! Edge weight is read as traversal cost here. `O((V + E) log V)`.

use crate::{AffinityGraph, WeightedPath};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Heap entry keyed by tentative distance. Ordering is reversed so `BinaryHeap` pops the
/// smallest distance first; equal distances pop in ascending id order.
struct QueueEntry<'a, Id> {
    distance: f64,
    id: &'a Id,
}

impl<Id: Ord> PartialEq for QueueEntry<'_, Id> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<Id: Ord> Eq for QueueEntry<'_, Id> {}

impl<Id: Ord> PartialOrd for QueueEntry<'_, Id> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Id: Ord> Ord for QueueEntry<'_, Id> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.id.cmp(self.id))
    }
}

impl<Id> AffinityGraph<Id>
where
    Id: Clone + Eq + Hash + Ord,
{
    /// Lowest-cost path from `source` to `target`, inclusive. Empty when either is unknown
    /// or they are in different components. `shortest_path(u, u) == [u]` for a known `u`.
    pub fn shortest_path(&self, source: &Id, target: &Id) -> Vec<Id> {
        self.shortest_path_with_cost(source, target)
            .map(|p| p.node_ids)
            .unwrap_or_default()
    }

    /// Like [`Self::shortest_path`], also reporting the summed edge weight.
    pub fn shortest_path_with_cost(&self, source: &Id, target: &Id) -> Option<WeightedPath<Id>> {
        let (source, _) = self.adjacency.get_key_value(source)?;
        if !self.adjacency.contains_key(target) {
            return None;
        }
        if source == target {
            return Some(WeightedPath {
                node_ids: vec![source.clone()],
                total_weight: 0.0,
            });
        }

        let mut dist: HashMap<&Id, f64> = HashMap::new();
        let mut prev: HashMap<&Id, &Id> = HashMap::new();
        let mut heap = BinaryHeap::new();

        dist.insert(source, 0.0);
        heap.push(QueueEntry {
            distance: 0.0,
            id: source,
        });

        while let Some(QueueEntry { distance, id }) = heap.pop() {
            if id == target {
                break;
            }
            // Stale entry: a shorter distance was recorded after this one was pushed.
            if dist.get(id).is_some_and(|best| distance > *best) {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(id) else {
                continue;
            };
            for (next, weight) in neighbors {
                let candidate = distance + weight;
                let improves = dist.get(next).map_or(true, |best| candidate < *best);
                if improves {
                    dist.insert(next, candidate);
                    prev.insert(next, id);
                    heap.push(QueueEntry {
                        distance: candidate,
                        id: next,
                    });
                }
            }
        }

        let total_weight = *dist.get(target)?;
        let mut node_ids = vec![target.clone()];
        let mut cursor = target;
        while cursor != source {
            cursor = *prev.get(cursor)?;
            node_ids.push(cursor.clone());
        }
        node_ids.reverse();
        Some(WeightedPath {
            node_ids,
            total_weight,
        })
    }
}
