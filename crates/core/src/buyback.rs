//! Bounded buyback history
//!
//! Sold items are remembered so they can be bought back. The history is a
//! FIFO with a fixed capacity: recording into a full history evicts the
//! oldest entry.

use std::collections::VecDeque;

/// Default number of remembered sales
pub const DEFAULT_BUYBACK_CAPACITY: usize = 20;

/// Capacity-bounded, insertion-ordered history. Index 0 is the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BuybackCache<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> Default for BuybackCache<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BUYBACK_CAPACITY)
    }
}

impl<T> BuybackCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Adopt an existing history, keeping only its newest `capacity` entries
    pub fn from_entries(entries: impl IntoIterator<Item = T>, capacity: usize) -> Self {
        let mut cache = Self::with_capacity(capacity);
        for entry in entries {
            cache.record(entry);
        }
        cache
    }

    /// Append an entry. Returns the evicted entry when the history was full.
    pub fn record(&mut self, entry: T) -> Option<T> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn entries(&self) -> &VecDeque<T> {
        &self.entries
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries.into()
    }
}
