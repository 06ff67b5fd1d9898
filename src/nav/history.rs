//! Navigation log: an append/truncate list of hashes with a cursor
//!
//! Behaves like a single-branch undo stack: moving back keeps the entries
//! after the cursor as forward history, and recording a new navigation
//! from the middle throws that forward history away.

use serde::{Deserialize, Serialize};

use super::hash::Hash;

/// Smallest capacity that still allows one step back
pub const MIN_CAPACITY: usize = 2;

/// Ordered record of visited hashes with a current position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationLog {
    entries: Vec<Hash>,
    /// Index of the current entry, `None` while empty
    position: Option<usize>,
    /// Upper bound on `entries.len()`, `None` for unbounded
    capacity: Option<usize>,
}

impl NavigationLog {
    /// Create an empty, unbounded log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log holding at most `capacity` entries (0 = unbounded)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            position: None,
            capacity: (capacity > 0).then(|| capacity.max(MIN_CAPACITY)),
        }
    }

    pub fn entries(&self) -> &[Hash] {
        &self.entries
    }

    /// Cursor as an index, `-1` when empty
    pub fn position(&self) -> isize {
        self.position.map_or(-1, |p| p as isize)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&Hash> {
        self.position.and_then(|p| self.entries.get(p))
    }

    pub fn last(&self) -> Option<&Hash> {
        self.entries.last()
    }

    /// True when there is an entry before the cursor
    pub fn can_go_back(&self) -> bool {
        self.position.is_some_and(|p| p > 0)
    }

    /// Number of entries after the cursor
    pub fn forward_len(&self) -> usize {
        match self.position {
            Some(p) => self.entries.len() - p - 1,
            None => 0,
        }
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = None;
    }

    /// Reset, then seed `["", initial]` if the page was opened on a hash
    pub fn seed(&mut self, initial: &Hash) {
        self.clear();
        if !initial.is_top() {
            self.entries.push(Hash::top());
            self.entries.push(initial.clone());
            self.position = Some(1);
        }
    }

    /// Record a navigation from `from` to `to`.
    ///
    /// Returns `false` (and leaves the log untouched) when `to` is already the
    /// last entry or the navigation doesn't change the hash.
    pub fn record(&mut self, from: &Hash, to: &Hash) -> bool {
        if from == to || self.entries.last() == Some(to) {
            return false;
        }

        // Branching off mid-history discards the forward entries
        if let Some(p) = self.position {
            self.entries.truncate(p + 1);
        }

        if self.entries.last() != Some(from) {
            self.entries.push(from.clone());
        }
        self.entries.push(to.clone());

        self.enforce_capacity();
        self.position = Some(self.entries.len() - 1);
        true
    }

    /// Move the cursor back one entry and return the hash it lands on
    pub fn back(&mut self) -> Option<Hash> {
        match self.position {
            Some(p) if p > 0 => {
                self.position = Some(p - 1);
                Some(self.entries[p - 1].clone())
            }
            _ => None,
        }
    }

    fn enforce_capacity(&mut self) {
        if let Some(cap) = self.capacity {
            if self.entries.len() > cap {
                let overflow = self.entries.len() - cap;
                self.entries.drain(..overflow);
                log::trace!("Navigation log full, dropped {} oldest entries", overflow);
            }
        }
    }
}
