//! Pure geometry helpers: anchor sides, bezier evaluation and content size estimation.

use kurbo::{CubicBez, ParamCurve, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An attachment edge of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides, in nearest-side tie-breaking order.
    pub const PRIORITY: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// The side facing this one.
    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Unit vector pointing away from the rectangle through this side.
    pub fn outward_normal(self) -> Vec2 {
        match self {
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Right => Vec2::new(1.0, 0.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
            Side::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Midpoint of the given side of a rectangle.
pub fn anchor_point(rect: Rect, side: Side) -> Point {
    let center = rect.center();
    match side {
        Side::Top => Point::new(center.x, rect.y0),
        Side::Bottom => Point::new(center.x, rect.y1),
        Side::Left => Point::new(rect.x0, center.y),
        Side::Right => Point::new(rect.x1, center.y),
    }
}

/// Side of `rect` whose edge line is closest to `point`.
///
/// Ties resolve in the order top, bottom, left, right.
pub fn nearest_side(rect: Rect, point: Point) -> Side {
    let distance = |side: Side| match side {
        Side::Top => (point.y - rect.y0).abs(),
        Side::Bottom => (point.y - rect.y1).abs(),
        Side::Left => (point.x - rect.x0).abs(),
        Side::Right => (point.x - rect.x1).abs(),
    };

    let mut best = Side::PRIORITY[0];
    let mut best_distance = distance(best);
    for side in Side::PRIORITY.into_iter().skip(1) {
        let d = distance(side);
        if d < best_distance {
            best = side;
            best_distance = d;
        }
    }
    best
}

/// Evaluate a cubic bezier at t = 0.5.
pub fn bezier_midpoint(p0: Point, c0: Point, c1: Point, p1: Point) -> Point {
    CubicBez::new(p0, c0, c1, p1).eval(0.5)
}

/// Axis-aligned overlap test with strict inequalities, so touching edges do not count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Inclusive containment test.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Union of a sequence of rectangles, or `None` when empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Layout constants used by the card auto-size estimate.
const HEADER_HEIGHT: f64 = 50.0;
const FOOTER_PADDING: f64 = 30.0;
const SUBTASK_ROW_HEIGHT: f64 = 28.0;
const SUBTASK_BLOCK_PADDING: f64 = 20.0;
const ATTACHMENT_HEIGHT: f64 = 90.0;
const MIN_CARD_HEIGHT: f64 = 100.0;
const LINE_HEIGHT: f64 = 20.0;
const MIN_TEXT_HEIGHT: f64 = 40.0;
const CHARS_PER_LINE: usize = 35;

/// Inputs to the content-driven height estimate.
#[derive(Debug, Clone, Copy)]
pub struct CardContent<'a> {
    pub text: &'a str,
    pub subtask_count: usize,
    pub subtasks_hidden: bool,
    pub has_attachments: bool,
}

/// Estimate the height a card needs to show its content.
pub fn estimate_card_height(content: CardContent<'_>) -> f64 {
    let line_count = content.text.split('\n').count();
    let wrapped = content.text.chars().count().div_ceil(CHARS_PER_LINE);
    let text_height = MIN_TEXT_HEIGHT.max(line_count.max(wrapped) as f64 * LINE_HEIGHT);

    let mut height = HEADER_HEIGHT + text_height + FOOTER_PADDING;
    if content.has_attachments {
        height += ATTACHMENT_HEIGHT;
    }
    if content.subtask_count > 0 && !content.subtasks_hidden {
        height += content.subtask_count as f64 * SUBTASK_ROW_HEIGHT + SUBTASK_BLOCK_PADDING;
    }
    height.max(MIN_CARD_HEIGHT)
}

/// New height for a card, or `None` when the change would be under the jitter threshold.
pub fn auto_height(current_height: f64, content: CardContent<'_>) -> Option<f64> {
    let estimate = estimate_card_height(content);
    ((estimate - current_height).abs() > 10.0).then_some(estimate)
}
