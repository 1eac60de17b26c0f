//! In-memory board storage.

use super::{BoardSnapshot, BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps saved boards in a map. Used for ephemeral boards and as the test backend.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, BoardSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of boards held.
    pub fn len(&self) -> usize {
        self.boards.read().map(|boards| boards.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("board map poisoned: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, board: &BoardSnapshot) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let board = board.clone();
        Box::pin(async move {
            self.boards.write().map_err(poisoned)?.insert(id, board);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<BoardSnapshot>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(poisoned)?;
            match boards.get(&id) {
                Some(board) => Ok(board.clone()),
                None => Err(StorageError::NotFound(id)),
            }
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.boards.write().map_err(poisoned)?.remove(&id);
            Ok(())
        })
    }

    /// Most recently modified first; ties by id.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(poisoned)?;
            let mut entries: Vec<(&String, i64)> =
                boards.iter().map(|(id, board)| (id, board.last_modified)).collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            Ok(entries.into_iter().map(|(id, _)| id.clone()).collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.boards.read().map_err(poisoned)?.contains_key(&id)) })
    }
}
