//! Board persistence: the snapshot format, the storage seam hosts implement,
//! and an autosave scheduler driven by store commits.

mod autosave;
mod memory;
mod snapshot;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL};
pub use memory::MemoryStorage;
pub use snapshot::{BoardSnapshot, ShapeRecord};

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Where saved boards live. Hosts provide the real backend (files, IndexedDB,
/// a server); the core only ships [`MemoryStorage`].
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a board.
    fn save(&self, id: &str, board: &BoardSnapshot) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<BoardSnapshot>>;

    /// Delete a board.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all board ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a board exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for board storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, id: &str, board: &BoardSnapshot) -> BoxFuture<'_, StorageResult<()>>;
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<BoardSnapshot>>;
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
