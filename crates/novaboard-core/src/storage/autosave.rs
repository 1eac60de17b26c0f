//! Scheduled persistence of one open board.
//!
//! The manager never observes the session directly. The host calls
//! [`AutoSaveManager::maybe_save`] on a timer or idle signal with the current
//! [`ShapeStore`]; a save happens only when the store has committed changes
//! since the last save, no gesture is in flight and the interval has elapsed.

use super::{BoardSnapshot, Storage, StorageResult};
use crate::config::BoardConfig;
use crate::session::BoardSession;
use crate::store::ShapeStore;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default minimum time between two automatic saves.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(1500);

/// Saves a board through a [`Storage`] backend at commit points.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    board_id: String,
    title: String,
    interval: Duration,
    last_save: Option<Instant>,
    /// Store revision written by the last save or load.
    saved_revision: Option<u64>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>, board_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            storage,
            board_id: board_id.into(),
            title: title.into(),
            interval: DEFAULT_AUTOSAVE_INTERVAL,
            last_save: None,
            saved_revision: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        // A rename must reach storage even without a board change.
        self.saved_revision = None;
    }

    /// Whether `store` holds commits that have not been saved.
    pub fn is_dirty(&self, store: &ShapeStore) -> bool {
        self.saved_revision != Some(store.revision())
    }

    /// Dirty, settled (no drag or resize mid-flight) and past the interval.
    pub fn should_save(&self, store: &ShapeStore) -> bool {
        if !self.is_dirty(store) || store.has_uncommitted_changes() {
            return false;
        }
        self.last_save
            .is_none_or(|last| last.elapsed() >= self.interval)
    }

    /// Save when [`AutoSaveManager::should_save`]. `now` is epoch milliseconds.
    pub async fn maybe_save(&mut self, store: &ShapeStore, now: i64) -> StorageResult<bool> {
        if !self.should_save(store) {
            return Ok(false);
        }
        self.save(store, now).await?;
        Ok(true)
    }

    /// Export and save the last committed state of `store` now.
    pub async fn save(&mut self, store: &ShapeStore, now: i64) -> StorageResult<()> {
        let snapshot = BoardSnapshot::export(store, self.board_id.clone(), self.title.clone(), now);
        self.storage.save(&self.board_id, &snapshot).await?;
        self.saved_revision = Some(store.revision());
        self.last_save = Some(Instant::now());
        log::info!(
            "saved board {} at revision {} ({} shapes)",
            self.board_id,
            store.revision(),
            snapshot.shapes.len()
        );
        Ok(())
    }

    /// Load the board and open a session on it. The fresh session counts as saved.
    pub async fn open(&mut self, config: BoardConfig) -> StorageResult<BoardSession> {
        let snapshot = self.storage.load(&self.board_id).await?;
        self.title = snapshot.title.clone();
        let session = BoardSession::from_snapshot(&snapshot, config);
        self.saved_revision = Some(session.store().revision());
        self.last_save = Some(Instant::now());
        log::info!("opened board {} ({} shapes)", self.board_id, snapshot.shapes.len());
        Ok(session)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
