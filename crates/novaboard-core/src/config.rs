//! Tunable constants for a board session.

use serde::{Deserialize, Serialize};

/// Grid size used when snapping dragged shapes.
pub const GRID_SIZE: f64 = 24.0;

/// Smallest width or height a resize gesture may produce.
pub const MIN_SHAPE_SIZE: f64 = 40.0;

/// Capacity of a per-document text history.
pub const TEXT_HISTORY_CAPACITY: usize = 50;

/// Board-level configuration.
///
/// Every field has a default, so a host may load a partial JSON object
/// and only override what it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Grid size for drag snapping, in canvas units.
    pub grid_size: f64,
    /// Minimum width/height enforced while resizing.
    pub min_shape_size: f64,
    /// Lower scale bound.
    pub min_scale: f64,
    /// Upper scale bound.
    pub max_scale: f64,
    /// Multiplier applied by zoom in / zoom out.
    pub zoom_step: f64,
    /// Padding around content for fit-to-content, in canvas units.
    pub fit_padding: f64,
    /// Offset applied to duplicated and copied shapes.
    pub duplicate_offset: f64,
    /// Maximum absolute random offset applied per axis on paste.
    pub paste_jitter: f64,
    /// Horizontal gap between a parent's right edge and its expanded subtasks.
    pub subtask_column_gap: f64,
    /// Vertical distance between expanded subtask nodes.
    pub subtask_row_spacing: f64,
    /// Optional bound on the board undo history.
    pub history_capacity: Option<usize>,
    /// Bound on a document's text history.
    pub text_history_capacity: usize,
    /// Hit radius for resize handles, in screen pixels.
    pub handle_hit_tolerance: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            min_shape_size: MIN_SHAPE_SIZE,
            min_scale: 0.1,
            max_scale: 5.0,
            zoom_step: 1.2,
            fit_padding: 100.0,
            duplicate_offset: 20.0,
            paste_jitter: 25.0,
            subtask_column_gap: 100.0,
            subtask_row_spacing: 140.0,
            history_capacity: None,
            text_history_capacity: TEXT_HISTORY_CAPACITY,
            handle_hit_tolerance: 10.0,
        }
    }
}

impl BoardConfig {
    /// Load configuration overrides from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert!((config.grid_size - 24.0).abs() < f64::EPSILON);
        assert!((config.min_shape_size - 40.0).abs() < f64::EPSILON);
        assert!((config.max_scale - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, None);
        assert_eq!(config.text_history_capacity, 50);
    }

    #[test]
    fn test_partial_override() {
        let config = BoardConfig::from_json(r#"{"gridSize": 10, "historyCapacity": 20}"#).unwrap();
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, Some(20));
        assert!((config.zoom_step - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = BoardConfig {
            paste_jitter: 5.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }
}
