//! The authoritative shape store of one board.

use crate::board::BoardState;
use crate::history::History;
use crate::shapes::Shape;

/// Holds the visible board state and its undo history.
///
/// All mutation goes through [`ShapeStore::commit`]. Non-committing updates
/// replace the visible state without touching history, so a multi-frame
/// gesture produces one entry when it finally commits.
#[derive(Debug, Clone)]
pub struct ShapeStore {
    state: BoardState,
    history: History<BoardState>,
    /// Bumped on every commit, undo and redo.
    revision: u64,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new(BoardState::default())
    }
}

impl ShapeStore {
    /// Create a store whose history starts at `initial`.
    pub fn new(initial: BoardState) -> Self {
        Self {
            history: History::new(initial.clone()),
            state: initial,
            revision: 0,
        }
    }

    /// Create a store with a bounded history.
    pub fn with_capacity(initial: BoardState, capacity: Option<usize>) -> Self {
        let history = match capacity {
            Some(capacity) => History::with_capacity(initial.clone(), capacity),
            None => History::new(initial.clone()),
        };
        Self {
            state: initial,
            history,
            revision: 0,
        }
    }

    /// Current visible state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Current shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.state.shapes
    }

    /// Replace the visible state, optionally recording it as a history entry.
    pub fn commit(&mut self, state: BoardState, push_history: bool) {
        if push_history {
            log::debug!(
                "history commit: {} shapes, {} edges",
                state.shapes.len(),
                state.edges.len()
            );
            self.history.commit(state.clone());
            self.revision += 1;
        } else {
            log::trace!("visible state replaced without history");
        }
        self.state = state;
    }

    /// Clone the state, let `f` edit it, and commit when `f` reports a change.
    pub fn update<F>(&mut self, push_history: bool, f: F) -> bool
    where
        F: FnOnce(&mut BoardState) -> bool,
    {
        let mut next = self.state.clone();
        if !f(&mut next) {
            return false;
        }
        self.commit(next, push_history);
        true
    }

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.state = snapshot.clone();
                self.revision += 1;
                log::debug!("undo to history index {}", self.history.index());
                true
            }
            None => false,
        }
    }

    /// Re-apply the next snapshot. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.state = snapshot.clone();
                self.revision += 1;
                log::debug!("redo to history index {}", self.history.index());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots held, including the initial one.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Counter of committed changes, including undo and redo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the visible state differs from the last committed snapshot.
    pub fn has_uncommitted_changes(&self) -> bool {
        self.history.current() != Some(&self.state)
    }
}
