//! Grid snapping for dragged shapes.

use kurbo::Point;

pub use crate::config::GRID_SIZE;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate moved.
    pub snapped_x: bool,
    /// Whether the Y coordinate moved.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round a single coordinate to the nearest multiple of `grid_size`.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the grid, rounding each axis independently.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    let snapped = Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size));
    SnapResult {
        point: snapped,
        snapped_x: (snapped.x - point.x).abs() > f64::EPSILON,
        snapped_y: (snapped.y - point.y).abs() > f64::EPSILON,
    }
}
