//! Materializing a shape's subtasks as connected task shapes, and undoing it.

use crate::board::BoardState;
use crate::config::BoardConfig;
use crate::geometry::Side;
use crate::shapes::{ConnectionStyle, Edge, Shape, ShapeId, ShapeKind, TaskStatus};
use std::collections::HashSet;

/// Size of a materialized subtask shape.
pub const SUBTASK_NODE_WIDTH: f64 = 200.0;
pub const SUBTASK_NODE_HEIGHT: f64 = 100.0;

/// Lay the subtasks of `parent_id` out as a column of task shapes to its right,
/// each connected from the parent's right side to the node's left side.
///
/// Returns the created ids, or `None` when the parent is missing, has no
/// subtasks, or is already expanded.
pub fn expand(
    board: &mut BoardState,
    parent_id: &ShapeId,
    config: &BoardConfig,
    style: ConnectionStyle,
) -> Option<Vec<ShapeId>> {
    let parent = board.get(parent_id)?;
    if parent.subtasks.is_empty() || parent.is_expanded() {
        return None;
    }

    let x = parent.x + parent.width + config.subtask_column_gap;
    let nodes: Vec<Shape> = parent
        .subtasks
        .iter()
        .enumerate()
        .map(|(i, subtask)| {
            let y = parent.y + i as f64 * config.subtask_row_spacing;
            let mut node = Shape::new(ShapeKind::Task, x, y, SUBTASK_NODE_WIDTH, SUBTASK_NODE_HEIGHT)
                .with_text(subtask.title.clone());
            node.status = Some(TaskStatus::from_completed(subtask.completed));
            node
        })
        .collect();
    let ids: Vec<ShapeId> = nodes.iter().map(|n| n.id.clone()).collect();

    board.shapes.extend(nodes);
    for id in &ids {
        let edge = Edge::new(parent_id.clone(), id.clone(), style)
            .with_sides(Some(Side::Right), Some(Side::Left));
        board.connect(edge);
    }

    let parent = board.get_mut(parent_id)?;
    parent.expanded_node_ids = Some(ids.clone());
    parent.hide_subtasks = true;
    log::debug!("expanded {} subtasks of {}", ids.len(), parent_id);
    Some(ids)
}

/// Remove the shapes created by [`expand`] and restore the parent's subtask list.
///
/// Ids already deleted by the user are skipped. Returns the removed ids, or
/// `None` when the parent is missing or not expanded.
pub fn collapse(board: &mut BoardState, parent_id: &ShapeId) -> Option<Vec<ShapeId>> {
    let parent = board.get_mut(parent_id)?;
    let expanded = parent.expanded_node_ids.take()?;
    parent.hide_subtasks = false;

    let doomed: HashSet<ShapeId> = expanded.into_iter().collect();
    let removed: Vec<ShapeId> = board
        .shapes
        .iter()
        .filter(|s| doomed.contains(&s.id))
        .map(|s| s.id.clone())
        .collect();
    board.remove_shapes(&doomed);
    log::debug!("collapsed {} subtask shapes of {}", removed.len(), parent_id);
    Some(removed)
}
