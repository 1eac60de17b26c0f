//! Linear undo/redo history over immutable snapshots.

use std::collections::VecDeque;

/// A linear history of snapshots with a cursor.
///
/// The cursor always points at the current snapshot. Committing after an undo
/// discards every snapshot past the cursor, so the history never branches.
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: VecDeque<T>,
    index: usize,
    capacity: Option<usize>,
}

impl<T: Clone> History<T> {
    /// Start a history at `initial` with no capacity bound.
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: VecDeque::from([initial]),
            index: 0,
            capacity: None,
        }
    }

    /// Start a history that keeps at most `capacity` snapshots, evicting the oldest.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new(initial)
        }
    }

    /// Append `snapshot` after the cursor and make it current.
    pub fn commit(&mut self, snapshot: T) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(snapshot);

        if let Some(capacity) = self.capacity {
            while self.snapshots.len() > capacity {
                self.snapshots.pop_front();
            }
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns the restored snapshot.
    pub fn undo(&mut self) -> Option<&T> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one snapshot. Returns the restored snapshot.
    pub fn redo(&mut self) -> Option<&T> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> Option<&T> {
        self.snapshots.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop everything and restart at `initial`.
    pub fn reset(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.index = 0;
    }
}

impl<T: Clone + PartialEq> History<T> {
    /// Commit only when `snapshot` differs from the current one.
    /// Returns true if a snapshot was appended.
    pub fn commit_if_changed(&mut self, snapshot: T) -> bool {
        if self.current() == Some(&snapshot) {
            return false;
        }
        self.commit(snapshot);
        true
    }
}
