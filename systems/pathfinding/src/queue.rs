use std::{cmp::Reverse, collections::BinaryHeap};

/// Min-priority queue over `(priority, item)` pairs.
///
/// Items may be inserted more than once; a better priority for an item that
/// is already queued is pushed as a new entry rather than updated in place, so
/// consumers must tolerate stale duplicates. Entries with equal priorities are
/// ordered by the item itself, which keeps the pop order deterministic.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T, P = u32> {
    elements: BinaryHeap<Reverse<(P, T)>>,
}

impl<T: Ord, P: Ord> PriorityQueue<T, P> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: BinaryHeap::new(),
        }
    }

    /// Inserts an item with the provided priority.
    pub fn put(&mut self, item: T, priority: P) {
        self.elements.push(Reverse((priority, item)));
    }

    /// Removes and returns the item with the smallest priority.
    pub fn get(&mut self) -> Option<T> {
        self.elements.pop().map(|Reverse((_, item))| item)
    }

    /// Reports whether any entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of queued entries, stale duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Drops every queued entry while keeping the allocation.
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl<T: Ord, P: Ord> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
