//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform of one board session.
///
/// `screen = canvas * scale + pan`, where screen coordinates are relative to the
/// board container. Pointer positions arrive in client coordinates, so the
/// container origin is subtracted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Translation applied after scaling, in screen pixels.
    pub pan: Vec2,
    /// Current scale factor.
    pub scale: f64,
    /// Minimum allowed scale.
    pub min_scale: f64,
    /// Maximum allowed scale.
    pub max_scale: f64,
    /// Container origin in client coordinates.
    pub container_origin: Point,
    /// Container size in screen pixels.
    pub container_size: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 5.0,
            container_origin: Point::ZERO,
            container_size: Size::ZERO,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom scale bounds.
    pub fn with_bounds(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    /// Record where the board container sits on screen.
    pub fn set_container(&mut self, origin: Point, size: Size) {
        self.container_origin = origin;
        self.container_size = size;
    }

    /// Affine map from canvas to container-relative screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Convert a client point to canvas coordinates.
    pub fn to_canvas(&self, client: Point) -> Point {
        let local = client - self.container_origin.to_vec2();
        Point::new(
            (local.x - self.pan.x) / self.scale,
            (local.y - self.pan.y) / self.scale,
        )
    }

    /// Convert a canvas point to client coordinates.
    pub fn to_client(&self, canvas: Point) -> Point {
        self.transform() * canvas + self.container_origin.to_vec2()
    }

    /// Convert a screen-space delta to a canvas-space delta.
    pub fn delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Canvas point currently shown at the container center.
    pub fn viewport_center(&self) -> Point {
        let center = self.container_origin
            + Vec2::new(self.container_size.width / 2.0, self.container_size.height / 2.0);
        self.to_canvas(center)
    }

    /// Pan by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Multiply the scale by `step`, clamped to the bounds.
    pub fn zoom_in(&mut self, step: f64) {
        self.scale = (self.scale * step).clamp(self.min_scale, self.max_scale);
    }

    /// Divide the scale by `step`, clamped to the bounds.
    pub fn zoom_out(&mut self, step: f64) {
        self.scale = (self.scale / step).clamp(self.min_scale, self.max_scale);
    }

    /// Zoom, keeping the given client point fixed.
    pub fn zoom_at(&mut self, client: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.to_canvas(client);
        self.scale = new_scale;

        // Adjust pan so the anchor stays under the cursor
        let moved = self.to_client(anchor);
        self.pan += client - moved;
    }

    /// Reset to scale 1 and no pan.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Fit `bounds` plus `padding` on each side into the container.
    ///
    /// Never zooms in beyond 1. With no bounds the view is reset.
    pub fn fit_to_content(&mut self, bounds: Option<Rect>, padding: f64) {
        let Some(bounds) = bounds else {
            self.reset();
            return;
        };

        let padded = bounds.inflate(padding, padding);
        if padded.width() <= 0.0 || padded.height() <= 0.0 {
            self.reset();
            return;
        }

        let scale_x = self.container_size.width / padded.width();
        let scale_y = self.container_size.height / padded.height();
        let scale = scale_x.min(scale_y).min(1.0);
        self.scale = scale.clamp(self.min_scale, self.max_scale);

        let center = padded.center();
        self.pan = Vec2::new(
            self.container_size.width / 2.0 - center.x * self.scale,
            self.container_size.height / 2.0 - center.y * self.scale,
        );
    }
}
