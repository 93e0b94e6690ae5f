//! Keyed enter/update/exit diffing of rendered positions.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use lineup_model::RowId;

/// A key rendered for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct Entered<K> {
    pub key: K,
    /// Index in the new sequence.
    pub index: usize,
    pub position: f64,
}

/// A key rendered before and now.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<K> {
    pub key: K,
    pub index: usize,
    pub previous: f64,
    pub position: f64,
}

impl<K> Updated<K> {
    pub fn moved(&self) -> bool {
        self.previous != self.position
    }
}

/// A key no longer rendered, with the position it was last seen at.
#[derive(Debug, Clone, PartialEq)]
pub struct Exited<K> {
    pub key: K,
    pub previous: f64,
}

/// Changes between two keyed sequences of positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff<K> {
    /// In new-sequence order.
    pub enter: Vec<Entered<K>>,
    /// In new-sequence order.
    pub update: Vec<Updated<K>>,
    /// In previous-sequence order.
    pub exit: Vec<Exited<K>>,
}

impl<K> Default for Diff<K> {
    fn default() -> Self {
        Self {
            enter: Vec::new(),
            update: Vec::new(),
            exit: Vec::new(),
        }
    }
}

impl<K> Diff<K> {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty() && self.update.iter().all(|u| !u.moved())
    }
}

/// Row-level diff of one ranking.
pub type OrderDiff = Diff<RowId>;

/// Classifies every key of `next` as entered or updated against `previous`,
/// and every key of `previous` missing from `next` as exited.
///
/// Keys are assumed unique within each sequence.
pub fn diff_positions<K>(previous: &[(K, f64)], next: &[(K, f64)]) -> Diff<K>
where
    K: Clone + Eq + Hash,
{
    let before: HashMap<&K, f64> = previous.iter().map(|(k, y)| (k, *y)).collect();
    let mut diff = Diff::default();
    let mut seen = HashSet::with_capacity(next.len());

    for (index, (key, position)) in next.iter().enumerate() {
        seen.insert(key);
        match before.get(key) {
            Some(&last) => diff.update.push(Updated {
                key: key.clone(),
                index,
                previous: last,
                position: *position,
            }),
            None => diff.enter.push(Entered {
                key: key.clone(),
                index,
                position: *position,
            }),
        }
    }
    for (key, last) in previous {
        if !seen.contains(key) {
            diff.exit.push(Exited {
                key: key.clone(),
                previous: *last,
            });
        }
    }
    diff
}

/// A row as placed in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub row: RowId,
    pub y: f64,
    /// Where the row was in the previous frame; `None` if it was not
    /// rendered.
    pub prev_y: Option<f64>,
}

/// Last rendered positions per ranking, advanced once per frame. Keyed by
/// ranking id, so ids must be unique among the rankings it tracks.
#[derive(Debug, Clone, Default)]
pub struct OrderDiffState {
    previous: HashMap<String, Vec<(RowId, f64)>>,
}

impl OrderDiffState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `next` against the last positions of `ranking` and stores
    /// `next` as the new baseline.
    pub fn advance(&mut self, ranking: &str, next: Vec<(RowId, f64)>) -> OrderDiff {
        let empty = Vec::new();
        let previous = self.previous.get(ranking).unwrap_or(&empty);
        let diff = diff_positions(previous, &next);
        log::trace!(
            "ranking {}: {} entered, {} updated, {} exited",
            ranking,
            diff.enter.len(),
            diff.update.len(),
            diff.exit.len()
        );
        self.previous.insert(ranking.to_string(), next);
        diff
    }

    /// Placements of a diff in new-sequence order.
    pub fn placements(diff: &OrderDiff) -> Vec<Placement> {
        let mut placed: Vec<(usize, Placement)> = diff
            .enter
            .iter()
            .map(|e| {
                (
                    e.index,
                    Placement {
                        row: e.key,
                        y: e.position,
                        prev_y: None,
                    },
                )
            })
            .chain(diff.update.iter().map(|u| {
                (
                    u.index,
                    Placement {
                        row: u.key,
                        y: u.position,
                        prev_y: Some(u.previous),
                    },
                )
            }))
            .collect();
        placed.sort_by_key(|(index, _)| *index);
        placed.into_iter().map(|(_, p)| p).collect()
    }

    /// Forgets rankings not in `live`.
    pub fn retain(&mut self, live: &[&str]) {
        self.previous.retain(|id, _| live.contains(&id.as_str()));
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}
