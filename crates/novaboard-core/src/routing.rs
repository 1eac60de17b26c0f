//! Smart bezier routing for connections.

use crate::geometry::{Side, anchor_point, bezier_midpoint};
use kurbo::{BezPath, CubicBez, Point, Rect};

/// Lower and upper bound for the control-point offset.
const MIN_CURVE_POWER: f64 = 50.0;
const MAX_CURVE_POWER: f64 = 200.0;
/// Fraction of the center distance used as control-point offset.
const CURVE_FACTOR: f64 = 0.4;

/// Far end of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteEnd {
    /// Another shape's rectangle.
    Shape(Rect),
    /// A free point, e.g. the cursor while drafting a connector.
    Point(Point),
}

/// A computed connection curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub start_side: Side,
    pub end_side: Side,
    pub curve: CubicBez,
}

impl Route {
    pub fn start(&self) -> Point {
        self.curve.p0
    }

    pub fn end(&self) -> Point {
        self.curve.p3
    }

    /// Curve point at t = 0.5, used to anchor floating menus.
    pub fn midpoint(&self) -> Point {
        bezier_midpoint(self.curve.p0, self.curve.p1, self.curve.p2, self.curve.p3)
    }

    /// The curve as a path for renderers.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.curve.p0);
        path.curve_to(self.curve.p1, self.curve.p2, self.curve.p3);
        path
    }

    /// SVG path data (`M .. C ..`).
    pub fn to_svg(&self) -> String {
        self.to_path().to_svg()
    }
}

/// Side pair picked from the dominant axis of the center-to-center delta.
///
/// Horizontal dominance must be strict; an exact diagonal routes vertically.
fn heuristic_sides(dx: f64, dy: f64) -> (Side, Side) {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        }
    } else if dy > 0.0 {
        (Side::Bottom, Side::Top)
    } else {
        (Side::Top, Side::Bottom)
    }
}

/// Route a connection from `source` to `end`, honouring any pinned sides.
pub fn route(
    source: Rect,
    end: RouteEnd,
    preferred_source_side: Option<Side>,
    preferred_target_side: Option<Side>,
) -> Route {
    let source_center = source.center();
    let target_center = match end {
        RouteEnd::Shape(rect) => rect.center(),
        RouteEnd::Point(point) => point,
    };
    let delta = target_center - source_center;

    let (heuristic_start, heuristic_end) = heuristic_sides(delta.x, delta.y);
    let start_side = preferred_source_side.unwrap_or(heuristic_start);
    let end_side = preferred_target_side.unwrap_or(heuristic_end);

    let p0 = anchor_point(source, start_side);
    let p3 = match end {
        RouteEnd::Shape(rect) => anchor_point(rect, end_side),
        RouteEnd::Point(point) => point,
    };

    let power = (delta.hypot() * CURVE_FACTOR).clamp(MIN_CURVE_POWER, MAX_CURVE_POWER);
    let start_offset = start_side.outward_normal() * power;
    let end_offset = match end {
        RouteEnd::Shape(_) => end_side.outward_normal() * power,
        RouteEnd::Point(_) => -start_offset,
    };

    Route {
        start_side,
        end_side,
        curve: CubicBez::new(p0, p0 + start_offset, p3 + end_offset, p3),
    }
}
