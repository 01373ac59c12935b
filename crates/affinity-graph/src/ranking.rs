//! Ranking queries. Edge weight is read as an affinity score (higher is closer).

use crate::{AffinityGraph, DegreeEntry, ScoredReader};
use std::collections::HashMap;
use std::hash::Hash;

fn sort_by_score_desc<Id: Ord>(scored: &mut [ScoredReader<Id>]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
}

impl<Id> AffinityGraph<Id>
where
    Id: Clone + Eq + Hash + Ord,
{
    /// Readers two hops from `user` through some direct neighbor, best first.
    ///
    /// Through intermediary `f`, candidate `g` scores `w(user, f) * w(f, g)`. When several
    /// intermediaries reach `g` the maximum is kept, not the sum. `user` and its direct
    /// neighbors are never returned. Ties are ordered by id; at most `limit` entries.
    pub fn find_friends_of_friends(&self, user: &Id, limit: usize) -> Vec<ScoredReader<Id>> {
        if limit == 0 {
            return Vec::new();
        }
        let Some(direct) = self.adjacency.get(user) else {
            return Vec::new();
        };

        let mut best: HashMap<&Id, f64> = HashMap::new();
        for (friend, w1) in direct {
            let Some(second) = self.adjacency.get(friend) else {
                continue;
            };
            for (candidate, w2) in second {
                if candidate == user || direct.contains_key(candidate) {
                    continue;
                }
                let score = w1 * w2;
                best.entry(candidate)
                    .and_modify(|s| *s = s.max(score))
                    .or_insert(score);
            }
        }

        let mut scored: Vec<ScoredReader<Id>> = best
            .into_iter()
            .map(|(id, score)| ScoredReader {
                id: id.clone(),
                score,
            })
            .collect();
        sort_by_score_desc(&mut scored);
        scored.truncate(limit);
        scored
    }

    /// Direct neighbors of `user` ranked by edge weight, highest first.
    pub fn top_connections(&self, user: &Id, limit: usize) -> Vec<ScoredReader<Id>> {
        let mut scored: Vec<ScoredReader<Id>> = self
            .connections(user)
            .into_iter()
            .map(|(id, score)| ScoredReader { id, score })
            .collect();
        sort_by_score_desc(&mut scored);
        scored.truncate(limit);
        scored
    }

    /// Readers with the most direct connections (ties by id).
    pub fn users_with_most_connections(&self, limit: usize) -> Vec<DegreeEntry<Id>> {
        let mut ranked: Vec<DegreeEntry<Id>> = self
            .adjacency
            .iter()
            .map(|(id, neighbors)| DegreeEntry {
                id: id.clone(),
                degree: neighbors.len(),
            })
            .collect();
        ranked.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(limit);
        ranked
    }
}
