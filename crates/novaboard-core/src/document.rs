//! Undo history for the rich document editor of a note or sheet.

use crate::config::TEXT_HISTORY_CAPACITY;
use crate::history::History;
use crate::session::BoardSession;
use crate::shapes::ShapeId;

/// Text history of one open document editor.
///
/// The editor records debounced snapshots; the board only sees the text when
/// [`DocumentSession::save_into`] is called.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    shape_id: ShapeId,
    history: History<String>,
}

impl DocumentSession {
    /// Open a session on `shape_id` starting from `text`.
    pub fn new(shape_id: ShapeId, text: impl Into<String>) -> Self {
        Self::with_capacity(shape_id, text, TEXT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(shape_id: ShapeId, text: impl Into<String>, capacity: usize) -> Self {
        Self {
            shape_id,
            history: History::with_capacity(text.into(), capacity),
        }
    }

    /// Open an editor on a shape of `board`, using the configured capacity.
    pub fn open(board: &BoardSession, shape_id: &ShapeId) -> Option<Self> {
        let shape = board.shape(shape_id)?;
        Some(Self::with_capacity(
            shape_id.clone(),
            shape.text.clone(),
            board.config().text_history_capacity,
        ))
    }

    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    /// Current text.
    pub fn text(&self) -> &str {
        self.history.current().map(String::as_str).unwrap_or_default()
    }

    /// Record a snapshot. Returns false when it equals the current text.
    pub fn record(&mut self, text: impl Into<String>) -> bool {
        self.history.commit_if_changed(text.into())
    }

    pub fn undo(&mut self) -> Option<&str> {
        self.history.undo().map(String::as_str)
    }

    pub fn redo(&mut self) -> Option<&str> {
        self.history.redo().map(String::as_str)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Write the current text into the shape as one board commit.
    pub fn save_into(&self, board: &mut BoardSession) -> bool {
        let text = self.text().to_string();
        board.set_text(&self.shape_id, text)
    }
}
