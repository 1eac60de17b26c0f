//! Selection state, group expansion, marquee hit testing and resize handles.

use crate::board::BoardState;
use crate::shapes::{EdgeKey, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// A selected connection plus the point its floating menu anchors to.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSelection {
    pub key: EdgeKey,
    pub mid_point: Option<Point>,
}

/// Current selection of one board session.
///
/// Shape selection and connection selection are mutually exclusive: setting
/// one clears the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    shapes: HashSet<ShapeId>,
    connection: Option<ConnectionSelection>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &HashSet<ShapeId> {
        &self.shapes
    }

    pub fn connection(&self) -> Option<&ConnectionSelection> {
        self.connection.as_ref()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.connection.is_none()
    }

    /// The only selected shape, if exactly one is selected.
    pub fn single(&self) -> Option<&ShapeId> {
        if self.shapes.len() == 1 {
            self.shapes.iter().next()
        } else {
            None
        }
    }

    /// Replace the shape selection.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.shapes = ids.into_iter().collect();
        self.connection = None;
    }

    /// Add ids to the shape selection.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.shapes.extend(ids);
        self.connection = None;
    }

    /// Toggle each id: selected ids are removed, the rest are added.
    pub fn toggle(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        for id in ids {
            if !self.shapes.remove(&id) {
                self.shapes.insert(id);
            }
        }
        self.connection = None;
    }

    pub fn remove(&mut self, id: &ShapeId) -> bool {
        self.shapes.remove(id)
    }

    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
    }

    pub fn clear_connection(&mut self) {
        self.connection = None;
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.connection = None;
    }

    /// Select a single connection, clearing the shape selection.
    pub fn select_connection(&mut self, key: EdgeKey, mid_point: Option<Point>) {
        self.shapes.clear();
        self.connection = Some(ConnectionSelection { key, mid_point });
    }

    /// Drop ids and connection references that no longer exist on `board`.
    pub fn retain_existing(&mut self, board: &BoardState) {
        self.shapes.retain(|id| board.contains(id));
        if let Some(selected) = &self.connection {
            if board.edge(&selected.key).is_none() {
                self.connection = None;
            }
        }
    }
}

/// Ids a pointer press on `id` should act on: the whole group, or the shape alone.
pub fn effective_target(board: &BoardState, id: &ShapeId) -> Vec<ShapeId> {
    board.group_members(id)
}

/// Rubber-band selection rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Normalized rectangle between both corners.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

/// Shapes overlapping `rect`, each expanded to its full group.
pub fn marquee_hits(board: &BoardState, rect: Rect) -> HashSet<ShapeId> {
    board
        .shapes_in_rect(rect)
        .iter()
        .flat_map(|id| board.group_members(id))
        .collect()
}

/// Resize handle, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

/// Edges a handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleEdges {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    pub fn edges(self) -> HandleEdges {
        let (north, south, east, west) = match self {
            ResizeHandle::N => (true, false, false, false),
            ResizeHandle::S => (false, true, false, false),
            ResizeHandle::E => (false, false, true, false),
            ResizeHandle::W => (false, false, false, true),
            ResizeHandle::Ne => (true, false, true, false),
            ResizeHandle::Nw => (true, false, false, true),
            ResizeHandle::Se => (false, true, true, false),
            ResizeHandle::Sw => (false, true, false, true),
        };
        HandleEdges {
            north,
            south,
            east,
            west,
        }
    }

    /// Handle position on a rectangle.
    pub fn position(self, rect: Rect) -> Point {
        let center = rect.center();
        let edges = self.edges();
        let x = if edges.east {
            rect.x1
        } else if edges.west {
            rect.x0
        } else {
            center.x
        };
        let y = if edges.north {
            rect.y0
        } else if edges.south {
            rect.y1
        } else {
            center.y
        };
        Point::new(x, y)
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(ResizeHandle::N),
            "s" => Ok(ResizeHandle::S),
            "e" => Ok(ResizeHandle::E),
            "w" => Ok(ResizeHandle::W),
            "ne" => Ok(ResizeHandle::Ne),
            "nw" => Ok(ResizeHandle::Nw),
            "se" => Ok(ResizeHandle::Se),
            "sw" => Ok(ResizeHandle::Sw),
            other => Err(format!("unknown resize handle: {other}")),
        }
    }
}

/// Handle under `point` on `rect`, if any. `tolerance` is in canvas units.
pub fn handle_at(rect: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL
        .into_iter()
        .find(|handle| (handle.position(rect) - point).hypot() <= tolerance)
}

/// Resize `initial` by dragging `handle` by `delta` (canvas units).
///
/// Width and height never drop below `min_size`. Moving a north or west edge
/// keeps the opposite edge fixed.
pub fn apply_resize(initial: Rect, handle: ResizeHandle, delta: Vec2, min_size: f64) -> Rect {
    let edges = handle.edges();
    let mut x = initial.x0;
    let mut y = initial.y0;
    let mut width = initial.width();
    let mut height = initial.height();

    if edges.east {
        width = (initial.width() + delta.x).max(min_size);
    }
    if edges.south {
        height = (initial.height() + delta.y).max(min_size);
    }
    if edges.west {
        width = (initial.width() - delta.x).max(min_size);
        x = initial.x1 - width;
    }
    if edges.north {
        height = (initial.height() - delta.y).max(min_size);
        y = initial.y1 - height;
    }

    Rect::new(x, y, x + width, y + height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Shape, ShapeKind};

    fn shape(id: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
        let mut s = Shape::new(ShapeKind::Task, x, y, w, h);
        s.id = ShapeId::from(id);
        s
    }

    #[test]
    fn test_toggle_is_xor() {
        let mut selection = Selection::new();
        selection.replace([ShapeId::from("a"), ShapeId::from("b")]);
        selection.toggle([ShapeId::from("b"), ShapeId::from("c")]);
        assert!(selection.contains(&ShapeId::from("a")));
        assert!(!selection.contains(&ShapeId::from("b")));
        assert!(selection.contains(&ShapeId::from("c")));
    }

    #[test]
    fn test_connection_and_shapes_exclusive() {
        let mut selection = Selection::new();
        selection.replace([ShapeId::from("a")]);
        selection.select_connection(EdgeKey::new(ShapeId::from("a"), ShapeId::from("b")), None);
        assert_eq!(selection.len(), 0);
        assert!(selection.connection().is_some());
        selection.extend([ShapeId::from("c")]);
        assert!(selection.connection().is_none());
    }

    #[test]
    fn test_retain_existing() {
        let board = BoardState::from_shapes(vec![shape("a", 0.0, 0.0, 50.0, 50.0)]);
        let mut selection = Selection::new();
        selection.replace([ShapeId::from("a"), ShapeId::from("gone")]);
        selection.retain_existing(&board);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_marquee_selects_overlapping_only() {
        let board = BoardState::from_shapes(vec![
            shape("near", 10.0, 10.0, 50.0, 50.0),
            shape("far", 400.0, 400.0, 50.0, 50.0),
        ]);
        let marquee = Marquee {
            start: Point::new(0.0, 0.0),
            current: Point::new(300.0, 300.0),
        };
        let hits = marquee_hits(&board, marquee.rect());
        assert_eq!(hits.len(), 1);
        assert!(hits.contains(&ShapeId::from("near")));
    }

    #[test]
    fn test_marquee_expands_groups() {
        let mut board = BoardState::from_shapes(vec![
            shape("a", 10.0, 10.0, 50.0, 50.0),
            shape("b", 900.0, 900.0, 50.0, 50.0),
        ]);
        let ids: HashSet<ShapeId> = [ShapeId::from("a"), ShapeId::from("b")].into_iter().collect();
        board.group_shapes(&ids);
        let hits = marquee_hits(&board, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(hits, ids);
    }

    #[test]
    fn test_marquee_rect_normalized() {
        let marquee = Marquee {
            start: Point::new(300.0, 300.0),
            current: Point::new(0.0, 100.0),
        };
        assert_eq!(marquee.rect(), Rect::new(0.0, 100.0, 300.0, 300.0));
    }

    #[test]
    fn test_resize_east_south() {
        let r = apply_resize(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::Se, Vec2::new(30.0, -20.0), 40.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 130.0, 80.0));
    }

    #[test]
    fn test_resize_north_west_keeps_opposite_edge() {
        let r = apply_resize(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::Nw, Vec2::new(20.0, -10.0), 40.0);
        assert_eq!(r, Rect::new(20.0, -10.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_clamps_past_opposite_edge() {
        let initial = Rect::new(0.0, 0.0, 100.0, 100.0);
        let west = apply_resize(initial, ResizeHandle::W, Vec2::new(500.0, 0.0), 40.0);
        assert!((west.width() - 40.0).abs() < f64::EPSILON);
        assert!((west.x1 - 100.0).abs() < f64::EPSILON);

        let south = apply_resize(initial, ResizeHandle::S, Vec2::new(0.0, -500.0), 40.0);
        assert!((south.height() - 40.0).abs() < f64::EPSILON);
        assert!(south.y0.abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_handle_only_moves_one_axis() {
        let r = apply_resize(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::N, Vec2::new(50.0, 25.0), 40.0);
        assert_eq!(r, Rect::new(0.0, 25.0, 100.0, 100.0));
    }

    #[test]
    fn test_handle_parsing_and_hit() {
        assert_eq!("sw".parse::<ResizeHandle>(), Ok(ResizeHandle::Sw));
        assert!("x".parse::<ResizeHandle>().is_err());
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(handle_at(rect, Point::new(101.0, 99.0), 5.0), Some(ResizeHandle::Se));
        assert_eq!(handle_at(rect, Point::new(50.0, 2.0), 5.0), Some(ResizeHandle::N));
        assert_eq!(handle_at(rect, Point::new(50.0, 50.0), 5.0), None);
    }
}
