//! NovaBoard Core Library
//!
//! Platform-agnostic canvas interaction and geometry core for the NovaBoard
//! visual workspace: shapes and connections, undo history, selection,
//! pointer and keyboard interaction, connection routing and persistence.

pub mod board;
pub mod camera;
pub mod config;
pub mod document;
pub mod generation;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod routing;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod store;
pub mod subtasks;
pub mod tools;

pub use board::BoardState;
pub use camera::Camera;
pub use config::BoardConfig;
pub use document::DocumentSession;
pub use generation::{
    GenerationError, GenerationMode, GenerationOutput, GenerationRequest, GenerationResult, TextGenerator,
    generate_all,
};
pub use geometry::Side;
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerTarget};
pub use interaction::{Action, InteractionMode, InteractionState};
pub use routing::{Route, RouteEnd, route};
pub use selection::{ConnectionSelection, Marquee, ResizeHandle, Selection};
pub use session::BoardSession;
pub use shapes::{
    Attachment, AttachmentKind, Connection, ConnectionStyle, Edge, EdgeKey, Shape, ShapeId, ShapeKind, Subtask,
    TaskStatus,
};
pub use shortcuts::{Shortcut, ShortcutCommand, ShortcutRegistry};
pub use snap::{GRID_SIZE, SnapResult, snap_to_grid};
pub use storage::{AutoSaveManager, BoardSnapshot, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::ShapeStore;
pub use tools::{ToolKind, ToolManager};
