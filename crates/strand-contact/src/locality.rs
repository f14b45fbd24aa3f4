//! Collision locality tracking.
//!
//! For every node in contact we remember the window of neighbour indices
//! around it, and keep the de-duplicated union of all windows. When a
//! node leaves contact the union is rebuilt from the remaining windows and
//! the indices no longer covered are reported, so the host can react
//! locally (e.g. relax stiffness around a released contact).
//!
//! Nothing here moves nodes.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strand_types::{StrandError, StrandResult};

/// Neighbour window of one colliding node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityEntry {
    /// Node index in contact.
    pub colliding_index: usize,
    /// Indices within `±extra_range`, clamped to the cable.
    pub neighbours: Vec<usize>,
}

/// Changes produced by one [`CollisionLocalityTracker::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityUpdate {
    /// Nodes that started colliding.
    pub entered: Vec<usize>,
    /// Nodes that stopped colliding.
    pub exited: Vec<usize>,
    /// Indices that dropped out of the neighbour union.
    pub released: Vec<usize>,
}

impl LocalityUpdate {
    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty() && self.released.is_empty()
    }
}

/// Incremental bookkeeping of colliding nodes and their neighbourhoods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionLocalityTracker {
    extra_range: usize,
    node_count: usize,
    entries: BTreeMap<usize, LocalityEntry>,
    union: BTreeSet<usize>,
}

impl CollisionLocalityTracker {
    /// Creates an empty tracker for a cable of `node_count` nodes.
    pub fn new(node_count: usize, extra_range: usize) -> Self {
        Self {
            extra_range,
            node_count,
            entries: BTreeMap::new(),
            union: BTreeSet::new(),
        }
    }

    /// Window `[index - extra_range, index + extra_range]` clamped to the cable.
    pub fn window(&self, index: usize) -> RangeInclusive<usize> {
        let lo = index.saturating_sub(self.extra_range);
        let hi = (index + self.extra_range).min(self.node_count.saturating_sub(1));
        lo..=hi
    }

    /// Starts tracking `index`. Returns `false` if it was already tracked.
    pub fn add_collision(&mut self, index: usize) -> StrandResult<bool> {
        if index >= self.node_count {
            return Err(StrandError::NodeOutOfRange { index, count: self.node_count });
        }
        if self.entries.contains_key(&index) {
            return Ok(false);
        }

        let neighbours: Vec<usize> = self.window(index).collect();
        self.union.extend(neighbours.iter().copied());
        self.entries.insert(index, LocalityEntry { colliding_index: index, neighbours });
        Ok(true)
    }

    /// Stops tracking `index` and returns the indices no remaining window
    /// covers. Untracked indices return an empty list.
    pub fn remove_collision(&mut self, index: usize) -> Vec<usize> {
        if self.entries.remove(&index).is_none() {
            return Vec::new();
        }

        let remaining: BTreeSet<usize> = self
            .entries
            .values()
            .flat_map(|e| e.neighbours.iter().copied())
            .collect();

        let released: Vec<usize> = self.union.difference(&remaining).copied().collect();
        self.union = remaining;
        released
    }

    /// Reconciles the tracker with this tick's per-node contact flags.
    ///
    /// `colliding.len()` must equal the node count.
    pub fn update(&mut self, colliding: &[bool]) -> StrandResult<LocalityUpdate> {
        if colliding.len() != self.node_count {
            return Err(StrandError::InvalidConfig(format!(
                "contact flags length ({}) != node count ({})",
                colliding.len(),
                self.node_count
            )));
        }

        let mut update = LocalityUpdate::default();

        for (index, &hit) in colliding.iter().enumerate() {
            if hit && self.add_collision(index)? {
                update.entered.push(index);
            }
        }

        let stale: Vec<usize> = self
            .entries
            .keys()
            .copied()
            .filter(|&i| !colliding[i])
            .collect();
        for index in stale {
            update.released.extend(self.remove_collision(index));
            update.exited.push(index);
        }

        update.released.sort_unstable();
        update.released.dedup();

        if !update.released.is_empty() {
            tracing::debug!(released = ?update.released, "locality window released");
        }
        Ok(update)
    }

    /// Forgets every entry and adopts a new node count.
    pub fn reset(&mut self, node_count: usize) {
        self.node_count = node_count;
        self.entries.clear();
        self.union.clear();
    }

    /// The de-duplicated union of all neighbour windows.
    pub fn neighbours(&self) -> &BTreeSet<usize> {
        &self.union
    }

    /// Union as an ordered list.
    pub fn neighbour_list(&self) -> Vec<usize> {
        self.union.iter().copied().collect()
    }

    /// Current entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = &LocalityEntry> {
        self.entries.values()
    }

    /// Number of colliding nodes.
    pub fn colliding_count(&self) -> usize {
        self.entries.len()
    }

    /// Window half-width.
    pub fn extra_range(&self) -> usize {
        self.extra_range
    }
}
