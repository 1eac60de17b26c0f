//! Board contents: shapes in paint order plus the connection edge set.

use crate::geometry::{rect_contains, rects_overlap, union_bounds};
use crate::shapes::{Connection, Edge, EdgeKey, Shape, ShapeId, new_token};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One immutable board state: the unit stored in history snapshots.
///
/// `shapes` is in paint order (back to front). `edges` holds at most one edge
/// per `(source, target)` pair when created through [`BoardState::connect`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardState {
    pub shapes: Vec<Shape>,
    pub edges: Vec<Edge>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in paint order.
    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|s| s.id.clone()).collect()
    }

    /// Add a shape. Containers go to the back, everything else to the front.
    pub fn add_shape(&mut self, shape: Shape) {
        if shape.capabilities().container {
            self.shapes.insert(0, shape);
        } else {
            self.shapes.push(shape);
        }
    }

    /// Add a batch of shapes with [`BoardState::add_shape`] placement, keeping
    /// the batch's relative order among the containers sent to the back.
    pub fn add_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        let (containers, rest): (Vec<Shape>, Vec<Shape>) =
            shapes.into_iter().partition(|s| s.capabilities().container);
        self.shapes.splice(0..0, containers);
        self.shapes.extend(rest);
    }

    /// Remove every shape in `ids` and prune every edge touching them.
    /// Returns the number of shapes removed.
    pub fn remove_shapes(&mut self, ids: &HashSet<ShapeId>) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !ids.contains(&s.id));
        self.edges
            .retain(|e| !ids.contains(e.source()) && !ids.contains(e.target()));
        before - self.shapes.len()
    }

    /// Drop edges whose source or target no longer exists.
    pub fn prune_dangling_edges(&mut self) -> usize {
        let ids: HashSet<&ShapeId> = self.shapes.iter().map(|s| &s.id).collect();
        let before = self.edges.len();
        self.edges
            .retain(|e| ids.contains(e.source()) && ids.contains(e.target()));
        before - self.edges.len()
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.key == key)
    }

    pub fn edge_mut(&mut self, key: &EdgeKey) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.key == key)
    }

    pub fn has_edge(&self, source: &ShapeId, target: &ShapeId) -> bool {
        self.edges
            .iter()
            .any(|e| e.source() == source && e.target() == target)
    }

    /// Add an edge. Rejected when it would duplicate an existing
    /// `(source, target)` pair, loop onto itself, or reference a missing shape.
    pub fn connect(&mut self, edge: Edge) -> bool {
        if edge.source() == edge.target()
            || self.has_edge(edge.source(), edge.target())
            || !self.contains(edge.source())
            || !self.contains(edge.target())
        {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn disconnect(&mut self, key: &EdgeKey) -> Option<Edge> {
        let index = self.edges.iter().position(|e| &e.key == key)?;
        Some(self.edges.remove(index))
    }

    /// Outgoing edges of `id`, in creation order.
    pub fn outgoing<'a>(&'a self, id: &'a ShapeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source() == id)
    }

    /// Outgoing edges projected onto the persisted per-shape form.
    pub fn connections_of(&self, id: &ShapeId) -> Vec<Connection> {
        self.outgoing(id).map(Edge::to_connection).collect()
    }

    /// All shapes sharing the group of `id`, or just `id` when ungrouped.
    pub fn group_members(&self, id: &ShapeId) -> Vec<ShapeId> {
        match self.get(id).and_then(|s| s.group_id.as_ref()) {
            Some(group) => self
                .shapes
                .iter()
                .filter(|s| s.group_id.as_ref() == Some(group))
                .map(|s| s.id.clone())
                .collect(),
            None if self.contains(id) => vec![id.clone()],
            None => Vec::new(),
        }
    }

    /// Assign a fresh group token to every shape in `ids`.
    /// Requires at least two existing shapes.
    pub fn group_shapes(&mut self, ids: &HashSet<ShapeId>) -> Option<String> {
        let count = self.shapes.iter().filter(|s| ids.contains(&s.id)).count();
        if count < 2 {
            return None;
        }
        let group = new_token();
        for shape in self.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
            shape.group_id = Some(group.clone());
        }
        Some(group)
    }

    /// Clear the group token on every shape in `ids`. Returns how many changed.
    pub fn ungroup_shapes(&mut self, ids: &HashSet<ShapeId>) -> usize {
        let mut changed = 0;
        for shape in self.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
            if shape.group_id.take().is_some() {
                changed += 1;
            }
        }
        changed
    }

    /// Append offset copies of `ids` with fresh ids and no connections.
    ///
    /// Group tokens are remapped per batch so copies group among themselves.
    /// Returns the new ids in paint order.
    pub fn duplicate_shapes(&mut self, ids: &HashSet<ShapeId>, offset: Vec2) -> Vec<ShapeId> {
        let copies = copy_batch(self.shapes.iter().filter(|s| ids.contains(&s.id)), offset);
        let new_ids = copies.iter().map(|s| s.id.clone()).collect();
        self.add_shapes(copies);
        new_ids
    }

    /// Move `ids` to the top of the paint order, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &HashSet<ShapeId>) {
        let (selected, rest): (Vec<Shape>, Vec<Shape>) =
            self.shapes.drain(..).partition(|s| ids.contains(&s.id));
        self.shapes = rest;
        self.shapes.extend(selected);
    }

    /// Move `ids` to the bottom of the paint order, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &HashSet<ShapeId>) {
        let (mut selected, rest): (Vec<Shape>, Vec<Shape>) =
            self.shapes.drain(..).partition(|s| ids.contains(&s.id));
        selected.extend(rest);
        self.shapes = selected;
    }

    /// Union of all shape rectangles.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(self.shapes.iter().map(Shape::rect))
    }

    /// Shapes containing `point`, front to back.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| rect_contains(s.rect(), point))
            .map(|s| s.id.clone())
            .collect()
    }

    /// First shape in paint order containing `point`, skipping `exclude`.
    pub fn first_containing(&self, point: Point, exclude: Option<&ShapeId>) -> Option<&Shape> {
        self.shapes
            .iter()
            .filter(|s| Some(&s.id) != exclude)
            .find(|s| rect_contains(s.rect(), point))
    }

    /// Shapes whose rectangle overlaps `rect` (touching edges excluded).
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| rects_overlap(s.rect(), rect))
            .map(|s| s.id.clone())
            .collect()
    }
}

/// Clone `shapes` with fresh ids, offset by `offset`, remapping group tokens.
pub(crate) fn copy_batch<'a>(shapes: impl Iterator<Item = &'a Shape>, offset: Vec2) -> Vec<Shape> {
    let mut groups: HashMap<String, String> = HashMap::new();
    shapes
        .map(|shape| {
            let mut copy = shape.duplicate(offset);
            if let Some(group) = copy.group_id.take() {
                let fresh = groups.entry(group).or_insert_with(new_token).clone();
                copy.group_id = Some(fresh);
            }
            copy
        })
        .collect()
}
