//! Directed connections between shapes.

use super::ShapeId;
use crate::geometry::Side;
use serde::{Deserialize, Serialize};

/// Stroke style of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl ConnectionStyle {
    /// Cycle to the next style.
    pub fn next(self) -> Self {
        match self {
            ConnectionStyle::Solid => ConnectionStyle::Dashed,
            ConnectionStyle::Dashed => ConnectionStyle::Dotted,
            ConnectionStyle::Dotted => ConnectionStyle::Double,
            ConnectionStyle::Double => ConnectionStyle::Solid,
        }
    }
}

/// A connection as persisted on its source shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub target_id: ShapeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_side: Option<Side>,
    #[serde(default)]
    pub style: ConnectionStyle,
}

/// Identifies one edge of the board graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: ShapeId,
    pub target: ShapeId,
}

impl EdgeKey {
    pub fn new(source: ShapeId, target: ShapeId) -> Self {
        Self { source, target }
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: &ShapeId) -> bool {
        &self.source == id || &self.target == id
    }
}

/// An edge of the board graph, keyed by `(source, target)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub key: EdgeKey,
    pub source_side: Option<Side>,
    pub target_side: Option<Side>,
    pub style: ConnectionStyle,
}

impl Edge {
    /// An edge with no pinned sides.
    pub fn new(source: ShapeId, target: ShapeId, style: ConnectionStyle) -> Self {
        Self {
            key: EdgeKey::new(source, target),
            source_side: None,
            target_side: None,
            style,
        }
    }

    /// Pin both anchor sides.
    pub fn with_sides(mut self, source_side: Option<Side>, target_side: Option<Side>) -> Self {
        self.source_side = source_side;
        self.target_side = target_side;
        self
    }

    pub fn source(&self) -> &ShapeId {
        &self.key.source
    }

    pub fn target(&self) -> &ShapeId {
        &self.key.target
    }

    /// Rebuild an edge from a persisted connection.
    pub fn from_connection(source: ShapeId, connection: &Connection) -> Self {
        Self {
            key: EdgeKey::new(source, connection.target_id.clone()),
            source_side: connection.source_side,
            target_side: connection.target_side,
            style: connection.style,
        }
    }

    /// Project onto the per-shape persisted form.
    pub fn to_connection(&self) -> Connection {
        Connection {
            target_id: self.key.target.clone(),
            source_side: self.source_side,
            target_side: self.target_side,
            style: self.style,
        }
    }
}
