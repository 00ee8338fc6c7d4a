//! Occurrence counting and deterministic ranking.

use crate::model::Listen;
use std::collections::HashMap;
use std::hash::Hash;

/// One entry in a ranked list: a grouping key and its listen count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<K> {
    pub key: K,
    pub count: usize,
}

/// Count occurrences per grouping key and produce a deterministically
/// ordered ranked list.
///
/// `key_fn` extracts the grouping key for a record, or `None` to exclude
/// the record from the ranking (this is how scoping like "songs for the
/// selected artist" is expressed).
///
/// Ordering is a two-phase sort: the distinct keys are sorted
/// ascending first, then stably re-sorted by descending count. Net
/// effect: descending count, ascending key among equal counts. The
/// stable second phase is what makes tie ordering deterministic; a
/// single count-only comparator would not.
pub fn rank<K, F>(listens: &[Listen], key_fn: F) -> Vec<Ranked<K>>
where
    K: Ord + Hash + Clone,
    F: Fn(&Listen) -> Option<K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for listen in listens {
        if let Some(key) = key_fn(listen) {
            *counts.entry(key).or_default() += 1;
        }
    }

    let mut keys: Vec<K> = counts.keys().cloned().collect();
    keys.sort();

    let mut ranked: Vec<Ranked<K>> = keys
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            Ranked { key, count }
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}
