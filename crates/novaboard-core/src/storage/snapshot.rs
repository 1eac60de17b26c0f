//! The persisted board document.

use crate::board::BoardState;
use crate::config::BoardConfig;
use crate::session::BoardSession;
use crate::shapes::{Connection, Edge, Shape};
use crate::store::ShapeStore;
use serde::{Deserialize, Serialize};

/// A shape as persisted: its own fields plus its outgoing connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A saved board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub id: String,
    pub title: String,
    pub shapes: Vec<ShapeRecord>,
    /// Epoch milliseconds.
    pub last_modified: i64,
}

impl BoardSnapshot {
    /// Project the current state of `store` into a snapshot.
    pub fn export(store: &ShapeStore, id: impl Into<String>, title: impl Into<String>, now: i64) -> Self {
        let state = store.state();
        Self {
            id: id.into(),
            title: title.into(),
            shapes: state
                .shapes
                .iter()
                .map(|shape| ShapeRecord {
                    shape: shape.clone(),
                    connections: state.connections_of(&shape.id),
                })
                .collect(),
            last_modified: now,
        }
    }

    /// Rebuild the board state. The first connection per (source, target)
    /// wins; self-loops and connections to missing shapes are dropped.
    pub fn to_state(&self) -> BoardState {
        let mut state = BoardState::from_shapes(self.shapes.iter().map(|r| r.shape.clone()).collect());
        let mut dropped = 0;
        for record in &self.shapes {
            for connection in &record.connections {
                if !state.connect(Edge::from_connection(record.shape.id.clone(), connection)) {
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            log::warn!("board {}: dropped {} invalid connections", self.id, dropped);
        }
        state
    }

    /// Rebuild a store with a single initial history entry.
    pub fn import(&self) -> ShapeStore {
        ShapeStore::new(self.to_state())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl BoardSession {
    /// Export the current board. `now` is the modification time in epoch milliseconds.
    pub fn export_snapshot(&self, id: impl Into<String>, title: impl Into<String>, now: i64) -> BoardSnapshot {
        BoardSnapshot::export(&self.store, id, title, now)
    }

    /// Open a session on a saved board.
    pub fn from_snapshot(snapshot: &BoardSnapshot, config: BoardConfig) -> Self {
        let state = snapshot.to_state();
        Self::with_state(state, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;
    use crate::shapes::{ConnectionStyle, EdgeKey, ShapeId, ShapeKind};

    fn shape(id: &str) -> Shape {
        let mut s = Shape::new(ShapeKind::Task, 0.0, 0.0, 200.0, 120.0);
        s.id = ShapeId::from(id);
        s
    }

    #[test]
    fn test_export_projects_connections() {
        let mut state = BoardState::from_shapes(vec![shape("a"), shape("b")]);
        state.connect(
            Edge::new(ShapeId::from("a"), ShapeId::from("b"), ConnectionStyle::Dashed)
                .with_sides(Some(Side::Right), None),
        );
        let store = ShapeStore::new(state);
        let snapshot = BoardSnapshot::export(&store, "board-1", "Roadmap", 1_700_000_000_000);
        assert_eq!(snapshot.shapes.len(), 2);
        assert_eq!(snapshot.shapes[0].connections.len(), 1);
        assert!(snapshot.shapes[1].connections.is_empty());

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"lastModified\": 1700000000000"));
        assert!(json.contains("\"targetId\": \"b\""));
        assert!(json.contains("\"type\": \"TASK\""));
        assert!(json.contains("\"sourceSide\": \"right\""));
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = BoardState::from_shapes(vec![shape("a"), shape("b")]);
        state.connect(Edge::new(ShapeId::from("b"), ShapeId::from("a"), ConnectionStyle::Solid));
        let store = ShapeStore::new(state.clone());
        let snapshot = BoardSnapshot::export(&store, "x", "t", 0);
        let restored = BoardSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.import().state(), &state);
    }

    #[test]
    fn test_import_drops_duplicates_and_self_loops() {
        let json = r#"{
            "id": "b1",
            "title": "Legacy",
            "lastModified": 5,
            "shapes": [
                {"id": "a", "type": "IDEA", "x": 0, "y": 0, "width": 10, "height": 10,
                 "connections": [
                    {"targetId": "b", "style": "dotted"},
                    {"targetId": "b", "style": "double"},
                    {"targetId": "a"},
                    {"targetId": "ghost"}
                 ]},
                {"id": "b", "type": "NOTE", "x": 50, "y": 0, "width": 10, "height": 10}
            ]
        }"#;
        let snapshot = BoardSnapshot::from_json(json).unwrap();
        let store = snapshot.import();
        assert_eq!(store.state().edges.len(), 1);
        let edge = store
            .state()
            .edge(&EdgeKey::new(ShapeId::from("a"), ShapeId::from("b")))
            .unwrap();
        assert_eq!(edge.style, ConnectionStyle::Dotted);
        assert_eq!(store.history_len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_session_export_and_reopen() {
        let mut session = BoardSession::default();
        let (id, _) = session.place_shape(ShapeKind::Idea, Some(kurbo::Point::new(0.0, 0.0)));
        session.set_text(&id, "hello");
        let snapshot = session.export_snapshot("b", "Board", 42);
        let reopened = BoardSession::from_snapshot(&snapshot, BoardConfig::default());
        assert_eq!(reopened.shape(&id).unwrap().text, "hello");
        assert!(!reopened.store().can_undo());
    }
}
