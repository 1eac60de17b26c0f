//! Tool system for the board.

use crate::shapes::{ConnectionStyle, ShapeKind};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Hand,
    Connector,
    /// Places a shape of the given kind.
    Create(ShapeKind),
}

impl ToolKind {
    /// Whether this tool places shapes.
    pub fn creation_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Create(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_creation(self) -> bool {
        self.creation_kind().is_some()
    }
}

/// Manages the current tool and tool-scoped settings.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    current_tool: ToolKind,
    /// Tool to restore when a temporary override (space-held pan) ends.
    suspended_tool: Option<ToolKind>,
    /// Keep the connector tool after a connection is made.
    pub sticky_connector: bool,
    /// Style given to new connections.
    pub connection_style: ConnectionStyle,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolKind {
        self.current_tool
    }

    /// Set the current tool, dropping any temporary override.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.suspended_tool = None;
    }

    /// Force the hand tool until [`ToolManager::end_temporary_pan`].
    pub fn begin_temporary_pan(&mut self) {
        if self.suspended_tool.is_none() && self.current_tool != ToolKind::Hand {
            self.suspended_tool = Some(self.current_tool);
            self.current_tool = ToolKind::Hand;
        }
    }

    /// Restore the tool that was active before the temporary pan.
    pub fn end_temporary_pan(&mut self) {
        if let Some(tool) = self.suspended_tool.take() {
            self.current_tool = tool;
        }
    }

    pub fn is_temporary_pan(&self) -> bool {
        self.suspended_tool.is_some()
    }

    /// Called after a connector draft ends.
    pub fn finish_connector(&mut self) {
        if self.current_tool == ToolKind::Connector && !self.sticky_connector {
            self.current_tool = ToolKind::Select;
        }
    }

    /// Called after a creation tool placed its shape.
    pub fn finish_placement(&mut self) {
        if self.current_tool.is_creation() {
            self.current_tool = ToolKind::Select;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_pan_restores_tool() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Connector);
        tools.begin_temporary_pan();
        assert_eq!(tools.current(), ToolKind::Hand);
        tools.begin_temporary_pan();
        tools.end_temporary_pan();
        assert_eq!(tools.current(), ToolKind::Connector);
    }

    #[test]
    fn test_temporary_pan_with_hand_is_noop() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Hand);
        tools.begin_temporary_pan();
        assert!(!tools.is_temporary_pan());
        tools.end_temporary_pan();
        assert_eq!(tools.current(), ToolKind::Hand);
    }

    #[test]
    fn test_connector_is_one_shot_unless_sticky() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Connector);
        tools.finish_connector();
        assert_eq!(tools.current(), ToolKind::Select);

        tools.sticky_connector = true;
        tools.set_tool(ToolKind::Connector);
        tools.finish_connector();
        assert_eq!(tools.current(), ToolKind::Connector);
    }

    #[test]
    fn test_finish_placement() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Create(ShapeKind::Note));
        assert_eq!(tools.current().creation_kind(), Some(ShapeKind::Note));
        tools.finish_placement();
        assert_eq!(tools.current(), ToolKind::Select);
    }
}
