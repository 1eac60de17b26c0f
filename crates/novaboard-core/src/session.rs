//! Board session: one board's store, view and selection, plus the operations on them.

use crate::board::{BoardState, copy_batch};
use crate::camera::Camera;
use crate::config::BoardConfig;
use crate::geometry::Side;
use crate::interaction::{Action, InteractionMode};
use crate::routing::{Route, RouteEnd, route};
use crate::selection::{Marquee, Selection};
use crate::shapes::{
    Attachment, ConnectionStyle, CreationFollowUp, Edge, EdgeKey, Shape, ShapeId, ShapeKind,
    ShapeStyling, Subtask, TaskStatus,
};
use crate::store::ShapeStore;
use crate::subtasks;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Size, Vec2};
use std::collections::HashSet;
use rand::Rng;

/// Everything that belongs to one open board.
///
/// View state, selection and in-flight gestures are scoped here so several
/// boards can be open at once without sharing mutable state.
#[derive(Debug, Clone)]
pub struct BoardSession {
    pub(crate) config: BoardConfig,
    pub(crate) store: ShapeStore,
    pub(crate) camera: Camera,
    pub(crate) selection: Selection,
    pub(crate) tools: ToolManager,
    pub(crate) mode: InteractionMode,
    /// Shape whose text is being edited inline.
    pub(crate) editing: Option<ShapeId>,
    /// Last pointer position in canvas coordinates.
    pub(crate) pointer: Option<Point>,
    pub(crate) clipboard: Vec<Shape>,
    /// Shapes waiting on the text-generation collaborator.
    pub(crate) pending: HashSet<ShapeId>,
}

impl Default for BoardSession {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardSession {
    /// Create an empty session.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_state(BoardState::default(), config)
    }

    /// Open a session on an existing board state.
    pub fn with_state(state: BoardState, config: BoardConfig) -> Self {
        Self {
            store: ShapeStore::with_capacity(state, config.history_capacity),
            camera: Camera::with_bounds(config.min_scale, config.max_scale),
            selection: Selection::new(),
            tools: ToolManager::new(),
            mode: InteractionMode::Idle,
            editing: None,
            pointer: None,
            clipboard: Vec::new(),
            pending: HashSet::new(),
            config,
        }
    }

    /// Open a session on a store restored from persistence.
    pub fn with_store(store: ShapeStore, config: BoardConfig) -> Self {
        let mut session = Self::new(config);
        session.store = store;
        session
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn state(&self) -> &BoardState {
        self.store.state()
    }

    /// Shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.store.state().get(id)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn editing(&self) -> Option<&ShapeId> {
        self.editing.as_ref()
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn clipboard(&self) -> &[Shape] {
        &self.clipboard
    }

    pub fn is_pending(&self, id: &ShapeId) -> bool {
        self.pending.contains(id)
    }

    pub fn pending_ids(&self) -> &HashSet<ShapeId> {
        &self.pending
    }

    /// The shared update contract used by every view: replace the board state,
    /// optionally as a history entry.
    pub fn update_shapes(&mut self, state: BoardState, commit: bool) {
        self.store.commit(state, commit);
        self.sync_with_board();
    }

    /// Drop selection and editing references to shapes that no longer exist.
    pub(crate) fn sync_with_board(&mut self) {
        self.selection.retain_existing(self.store.state());
        if let Some(id) = &self.editing {
            if !self.store.state().contains(id) {
                self.editing = None;
            }
        }
    }

    /// Edit a clone of the state and commit it when `f` reports a change.
    pub(crate) fn edit(&mut self, f: impl FnOnce(&mut BoardState) -> bool) -> bool {
        let changed = self.store.update(true, f);
        if changed {
            self.sync_with_board();
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let done = self.store.undo();
        if done {
            self.sync_with_board();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.store.redo();
        if done {
            self.sync_with_board();
        }
        done
    }

    // --- Tools ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("tool set to {:?}", tool);
        self.tools.set_tool(tool);
    }

    pub fn default_connection_style(&self) -> ConnectionStyle {
        self.tools.connection_style
    }

    pub fn set_default_connection_style(&mut self, style: ConnectionStyle) {
        self.tools.connection_style = style;
    }

    pub fn set_sticky_connector(&mut self, sticky: bool) {
        self.tools.sticky_connector = sticky;
    }

    // --- View ---

    pub fn set_container(&mut self, origin: Point, size: Size) {
        self.camera.set_container(origin, size);
    }

    pub fn to_canvas(&self, client: Point) -> Point {
        self.camera.to_canvas(client)
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out(self.config.zoom_step);
    }

    /// Wheel zoom around a client point.
    pub fn zoom_at(&mut self, client: Point, factor: f64) {
        self.camera.zoom_at(client, factor);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan_by(delta);
    }

    pub fn fit_to_content(&mut self) {
        let bounds = self.store.state().bounds();
        self.camera.fit_to_content(bounds, self.config.fit_padding);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    // --- Selection ---

    pub fn select(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.selection.replace(ids);
    }

    pub fn select_all(&mut self) {
        let ids = self.store.state().ids();
        self.selection.replace(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids in paint order.
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.store
            .state()
            .shapes
            .iter()
            .filter(|s| self.selection.contains(&s.id))
            .map(|s| s.id.clone())
            .collect()
    }

    /// Select a connection; its routed midpoint becomes the menu anchor.
    pub fn select_connection(&mut self, key: EdgeKey) -> bool {
        let Some(route) = self.route_for(&key) else {
            return false;
        };
        self.selection.select_connection(key, Some(route.midpoint()));
        self.end_text_edit();
        true
    }

    // --- Creation ---

    /// Place a shape of `kind` centered on `position` (canvas), or on the
    /// viewport center when no position is known. Returns the new id and the
    /// follow-up the host should perform.
    pub fn place_shape(&mut self, kind: ShapeKind, position: Option<Point>) -> (ShapeId, Vec<Action>) {
        let center = position.unwrap_or_else(|| self.camera.viewport_center());
        let shape = Shape::centered(kind, center);
        let id = shape.id.clone();
        self.edit(|state| {
            state.add_shape(shape);
            true
        });
        self.selection.replace([id.clone()]);
        log::debug!("placed {:?} shape {}", kind, id);

        let mut actions = vec![Action::ShapeCreated(id.clone()), Action::SelectionChanged];
        match kind.capabilities().on_create {
            CreationFollowUp::TextEdit => {
                self.editing = Some(id.clone());
                actions.push(Action::TextEditRequested(id.clone()));
            }
            CreationFollowUp::DocumentEditor => {
                actions.push(Action::DocumentEditorRequested(id.clone()));
            }
            CreationFollowUp::MediaCapture | CreationFollowUp::None => {}
        }
        (id, actions)
    }

    /// Place captured media (image or voice recording) as a new shape.
    pub fn place_media(
        &mut self,
        kind: ShapeKind,
        position: Option<Point>,
        attachment: Attachment,
        label: impl Into<String>,
    ) -> Option<ShapeId> {
        if kind.capabilities().on_create != CreationFollowUp::MediaCapture {
            log::warn!("{:?} is not a media kind", kind);
            return None;
        }
        let center = position.unwrap_or_else(|| self.camera.viewport_center());
        let mut shape = Shape::centered(kind, center).with_text(label);
        shape.attachments.push(attachment);
        let id = shape.id.clone();
        self.edit(|state| {
            state.add_shape(shape);
            true
        });
        self.selection.replace([id.clone()]);
        Some(id)
    }

    // --- Structural operations on the selection ---

    /// Delete the selected connection, or else every selected shape.
    pub fn delete_selection(&mut self) -> bool {
        if let Some(selected) = self.selection.connection().cloned() {
            let removed = self.edit(|state| state.disconnect(&selected.key).is_some());
            self.selection.clear_connection();
            return removed;
        }
        if self.selection.ids().is_empty() {
            return false;
        }
        let ids = self.selection.ids().clone();
        let removed = self.edit(|state| state.remove_shapes(&ids) > 0);
        self.selection.clear();
        removed
    }

    /// Duplicate the selection offset by the configured delta and select the copies.
    pub fn duplicate_selection(&mut self) -> Vec<ShapeId> {
        if self.selection.ids().is_empty() {
            return Vec::new();
        }
        let ids = self.selection.ids().clone();
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let mut copies = Vec::new();
        self.edit(|state| {
            copies = state.duplicate_shapes(&ids, offset);
            !copies.is_empty()
        });
        self.selection.replace(copies.iter().cloned());
        copies
    }

    pub fn group_selection(&mut self) -> Option<String> {
        let ids = self.selection.ids().clone();
        let mut group = None;
        self.edit(|state| {
            group = state.group_shapes(&ids);
            group.is_some()
        });
        group
    }

    pub fn ungroup_selection(&mut self) -> bool {
        let ids = self.selection.ids().clone();
        self.edit(|state| state.ungroup_shapes(&ids) > 0)
    }

    /// Flip the lock flag of each selected shape.
    pub fn toggle_lock_selection(&mut self) -> bool {
        let ids = self.selection.ids().clone();
        if ids.is_empty() {
            return false;
        }
        self.edit(|state| {
            let mut changed = false;
            for shape in state.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
                if shape.capabilities().lockable {
                    shape.locked = !shape.locked;
                    changed = true;
                }
            }
            changed
        })
    }

    pub fn bring_selection_to_front(&mut self) -> bool {
        let ids = self.selection.ids().clone();
        if ids.is_empty() {
            return false;
        }
        self.edit(|state| {
            let before = state.ids();
            state.bring_to_front(&ids);
            state.ids() != before
        })
    }

    pub fn send_selection_to_back(&mut self) -> bool {
        let ids = self.selection.ids().clone();
        if ids.is_empty() {
            return false;
        }
        self.edit(|state| {
            let before = state.ids();
            state.send_to_back(&ids);
            state.ids() != before
        })
    }

    /// Copy the selection to the session clipboard, offset and without connections.
    pub fn copy_selection(&mut self) -> usize {
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let state = self.store.state();
        self.clipboard = copy_batch(
            state.shapes.iter().filter(|s| self.selection.contains(&s.id)),
            offset,
        );
        self.clipboard.len()
    }

    /// Paste the clipboard with fresh ids and a small random offset; selects the result.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let amount = self.config.paste_jitter;
        let pasted: Vec<Shape> = copy_batch(self.clipboard.iter(), Vec2::ZERO)
            .into_iter()
            .map(|mut shape| {
                shape.translate(Vec2::new(jitter(amount), jitter(amount)));
                shape
            })
            .collect();
        let ids: Vec<ShapeId> = pasted.iter().map(|s| s.id.clone()).collect();
        self.edit(|state| {
            state.add_shapes(pasted);
            true
        });
        self.selection.replace(ids.iter().cloned());
        ids
    }

    // --- Presentation updates on the selection ---

    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        let ids = self.selection.ids().clone();
        let opacity = opacity.clamp(0.0, 1.0);
        self.edit(|state| {
            let mut changed = false;
            for shape in state.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
                shape.opacity = Some(opacity);
                changed = true;
            }
            changed
        })
    }

    pub fn update_styling(&mut self, patch: &ShapeStyling) -> bool {
        let ids = self.selection.ids().clone();
        self.edit(|state| {
            let mut changed = false;
            for shape in state.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
                shape.styling.get_or_insert_with(ShapeStyling::default).merge(patch);
                changed = true;
            }
            changed
        })
    }

    pub fn set_status(&mut self, id: &ShapeId, status: TaskStatus) -> bool {
        self.edit(|state| match state.get_mut(id) {
            Some(shape) if shape.status != Some(status) => {
                shape.status = Some(status);
                true
            }
            _ => false,
        })
    }

    // --- Text editing ---

    /// Start inline editing. Suppressed for locked or non-editable shapes.
    pub fn begin_text_edit(&mut self, id: &ShapeId) -> bool {
        match self.shape(id) {
            Some(shape) if !shape.locked && shape.capabilities().text_editable => {
                self.editing = Some(id.clone());
                true
            }
            Some(_) => {
                log::warn!("text edit suppressed on {}", id);
                false
            }
            None => false,
        }
    }

    pub fn end_text_edit(&mut self) {
        self.editing = None;
    }

    /// Replace a shape's text as one history entry. Suppressed when locked.
    pub fn set_text(&mut self, id: &ShapeId, text: impl Into<String>) -> bool {
        let text = text.into();
        self.edit(|state| match state.get_mut(id) {
            Some(shape) if !shape.locked && shape.text != text => {
                shape.text = text;
                shape.auto_size();
                true
            }
            _ => false,
        })
    }

    // --- Subtasks and attachments ---

    pub fn add_subtask(&mut self, id: &ShapeId, title: impl Into<String>) -> Option<String> {
        let subtask = Subtask::new(title);
        let subtask_id = subtask.id.clone();
        let added = self.edit(|state| match state.get_mut(id) {
            Some(shape) if shape.capabilities().accepts_subtasks => {
                shape.subtasks.push(subtask);
                shape.auto_size();
                true
            }
            _ => false,
        });
        added.then_some(subtask_id)
    }

    pub fn toggle_subtask(&mut self, id: &ShapeId, subtask_id: &str) -> bool {
        self.edit(|state| {
            let Some(shape) = state.get_mut(id) else {
                return false;
            };
            match shape.subtasks.iter_mut().find(|t| t.id == subtask_id) {
                Some(subtask) => {
                    subtask.completed = !subtask.completed;
                    true
                }
                None => false,
            }
        })
    }

    pub fn remove_subtask(&mut self, id: &ShapeId, subtask_id: &str) -> bool {
        self.edit(|state| {
            let Some(shape) = state.get_mut(id) else {
                return false;
            };
            let before = shape.subtasks.len();
            shape.subtasks.retain(|t| t.id != subtask_id);
            if shape.subtasks.len() == before {
                return false;
            }
            shape.auto_size();
            true
        })
    }

    pub fn attach(&mut self, id: &ShapeId, attachment: Attachment) -> bool {
        self.edit(|state| match state.get_mut(id) {
            Some(shape) if shape.capabilities().accepts_attachments => {
                shape.attachments.push(attachment);
                shape.auto_size();
                true
            }
            _ => false,
        })
    }

    /// Materialize subtasks as connected task shapes.
    pub fn expand_subtasks(&mut self, id: &ShapeId) -> Vec<ShapeId> {
        let style = self.tools.connection_style;
        let config = self.config.clone();
        let mut created = Vec::new();
        self.edit(|state| match subtasks::expand(state, id, &config, style) {
            Some(ids) => {
                created = ids;
                true
            }
            None => false,
        });
        created
    }

    /// Remove previously materialized subtask shapes.
    pub fn collapse_subtasks(&mut self, id: &ShapeId) -> Vec<ShapeId> {
        let mut removed = Vec::new();
        self.edit(|state| match subtasks::collapse(state, id) {
            Some(ids) => {
                removed = ids;
                true
            }
            None => false,
        });
        removed
    }

    // --- Connections ---

    /// Connect two shapes; duplicates and self-loops are ignored.
    pub fn connect(
        &mut self,
        source: &ShapeId,
        target: &ShapeId,
        source_side: Option<Side>,
        target_side: Option<Side>,
    ) -> bool {
        let edge = Edge::new(source.clone(), target.clone(), self.tools.connection_style)
            .with_sides(source_side, target_side);
        self.edit(|state| state.connect(edge))
    }

    pub fn set_connection_style(&mut self, key: &EdgeKey, style: ConnectionStyle) -> bool {
        self.edit(|state| match state.edge_mut(key) {
            Some(edge) if edge.style != style => {
                edge.style = style;
                true
            }
            _ => false,
        })
    }

    pub fn set_connection_sides(
        &mut self,
        key: &EdgeKey,
        source_side: Option<Side>,
        target_side: Option<Side>,
    ) -> bool {
        self.edit(|state| match state.edge_mut(key) {
            Some(edge) => {
                edge.source_side = source_side;
                edge.target_side = target_side;
                true
            }
            None => false,
        })
    }

    pub fn delete_connection(&mut self, key: &EdgeKey) -> bool {
        let removed = self.edit(|state| state.disconnect(key).is_some());
        if self.selection.connection().is_some_and(|c| &c.key == key) {
            self.selection.clear_connection();
        }
        removed
    }

    // --- Rendering queries ---

    /// Route for one edge, or `None` if either endpoint is missing.
    pub fn route_for(&self, key: &EdgeKey) -> Option<Route> {
        let state = self.store.state();
        let edge = state.edge(key)?;
        let source = state.get(edge.source())?;
        let target = state.get(edge.target())?;
        Some(route(
            source.rect(),
            RouteEnd::Shape(target.rect()),
            edge.source_side,
            edge.target_side,
        ))
    }

    /// Routes for every renderable edge.
    pub fn routes(&self) -> Vec<(EdgeKey, Route)> {
        self.store
            .state()
            .edges
            .iter()
            .filter_map(|edge| self.route_for(&edge.key).map(|r| (edge.key.clone(), r)))
            .collect()
    }

    /// Ghost route of the connector draft, following the pointer.
    pub fn draft_route(&self) -> Option<Route> {
        let InteractionMode::ConnectorDraft {
            source_id,
            source_side,
            cursor,
        } = &self.mode
        else {
            return None;
        };
        let source = self.shape(source_id)?;
        Some(route(source.rect(), RouteEnd::Point(*cursor), *source_side, None))
    }

    /// Active marquee, for rendering.
    pub fn marquee(&self) -> Option<Marquee> {
        match &self.mode {
            InteractionMode::Marquee { marquee, .. } => Some(*marquee),
            _ => None,
        }
    }
}

/// Uniform random offset in `[-amount, amount)`.
fn jitter(amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    rand::thread_rng().gen_range(-amount..amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(shapes: &[(&str, f64, f64)]) -> BoardSession {
        let shapes = shapes
            .iter()
            .map(|(id, x, y)| {
                let mut s = Shape::new(ShapeKind::Task, *x, *y, 100.0, 100.0);
                s.id = ShapeId::from(*id);
                s
            })
            .collect();
        BoardSession::with_state(BoardState::from_shapes(shapes), BoardConfig::default())
    }

    fn id(s: &str) -> ShapeId {
        ShapeId::from(s)
    }

    #[test]
    fn test_place_shape_centered_and_selected() {
        let mut session = BoardSession::default();
        let (new_id, actions) = session.place_shape(ShapeKind::Idea, Some(Point::new(100.0, 100.0)));
        let shape = session.shape(&new_id).unwrap();
        assert!((shape.x - 0.0).abs() < f64::EPSILON);
        assert!((shape.y - 40.0).abs() < f64::EPSILON);
        assert!(session.selection().contains(&new_id));
        assert_eq!(session.editing(), Some(&new_id));
        assert!(actions.contains(&Action::TextEditRequested(new_id.clone())));
        assert!(session.store().can_undo());
    }

    #[test]
    fn test_place_note_requests_document_editor() {
        let mut session = BoardSession::default();
        let (new_id, actions) = session.place_shape(ShapeKind::Note, None);
        assert!(actions.contains(&Action::DocumentEditorRequested(new_id)));
        assert!(session.editing().is_none());
    }

    #[test]
    fn test_place_rectangle_has_no_follow_up() {
        let mut session = session_with(&[("a", 0.0, 0.0)]);
        let (new_id, actions) = session.place_shape(ShapeKind::Rectangle, Some(Point::ZERO));
        assert_eq!(actions.len(), 2);
        assert_eq!(session.shapes()[0].id, new_id);
    }

    #[test]
    fn test_place_at_viewport_center() {
        let mut session = BoardSession::default();
        session.set_container(Point::ZERO, Size::new(800.0, 600.0));
        let (new_id, _) = session.place_shape(ShapeKind::Circle, None);
        let center = session.shape(&new_id).unwrap().center();
        assert!((center.x - 400.0).abs() < f64::EPSILON);
        assert!((center.y - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delete_selection_prunes_edges() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0), ("c", 400.0, 0.0)]);
        assert!(session.connect(&id("a"), &id("b"), None, None));
        assert!(session.connect(&id("b"), &id("c"), None, None));
        session.select([id("b")]);
        assert!(session.delete_selection());
        assert_eq!(session.shapes().len(), 2);
        assert!(session.state().edges.is_empty());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_delete_selected_connection_only() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
        session.connect(&id("a"), &id("b"), None, None);
        assert!(session.select_connection(EdgeKey::new(id("a"), id("b"))));
        assert!(session.delete_selection());
        assert_eq!(session.shapes().len(), 2);
        assert!(session.state().edges.is_empty());
        assert!(session.selection().connection().is_none());
    }

    #[test]
    fn test_select_connection_stores_midpoint() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 300.0, 0.0)]);
        session.connect(&id("a"), &id("b"), None, None);
        session.select([id("a")]);
        assert!(session.select_connection(EdgeKey::new(id("a"), id("b"))));
        let selected = session.selection().connection().unwrap();
        let mid = selected.mid_point.unwrap();
        assert!((mid.x - 200.0).abs() < 1e-9);
        assert!(session.selection().ids().is_empty());
        assert!(!session.select_connection(EdgeKey::new(id("b"), id("a"))));
    }

    #[test]
    fn test_duplicate_selection() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
        session.connect(&id("a"), &id("b"), None, None);
        session.select([id("a"), id("b")]);
        let copies = session.duplicate_selection();
        assert_eq!(copies.len(), 2);
        assert_eq!(session.shapes().len(), 4);
        assert_eq!(session.state().edges.len(), 1);
        let first = session.shape(&copies[0]).unwrap();
        assert!((first.x - 20.0).abs() < f64::EPSILON);
        assert!((first.y - 20.0).abs() < f64::EPSILON);
        assert!(session.selection().contains(&copies[1]));
    }

    #[test]
    fn test_toggle_lock_flips_each_shape() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
        session.select([id("a")]);
        session.toggle_lock_selection();
        session.select([id("a"), id("b")]);
        session.toggle_lock_selection();
        assert!(!session.shape(&id("a")).unwrap().locked);
        assert!(session.shape(&id("b")).unwrap().locked);
    }

    #[test]
    fn test_copy_paste_fresh_ids_with_jitter() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
        session.connect(&id("a"), &id("b"), None, None);
        session.select([id("a")]);
        assert_eq!(session.copy_selection(), 1);
        let first = session.paste();
        let second = session.paste();
        assert_eq!(first.len(), 1);
        assert_ne!(first, second);
        assert_eq!(session.shapes().len(), 4);
        assert_eq!(session.state().edges.len(), 1);

        let pasted = session.shape(&first[0]).unwrap();
        assert!(pasted.x >= 20.0 - 25.0 && pasted.x < 20.0 + 25.0);
        assert!(pasted.y >= 20.0 - 25.0 && pasted.y < 20.0 + 25.0);
        assert!(session.selection().contains(&second[0]));
    }

    #[test]
    fn test_pasted_container_goes_to_back() {
        let mut frame = Shape::new(ShapeKind::Rectangle, 0.0, 0.0, 300.0, 300.0);
        frame.id = ShapeId::from("frame");
        let mut task = Shape::new(ShapeKind::Task, 50.0, 50.0, 100.0, 100.0);
        task.id = ShapeId::from("task");
        let mut session =
            BoardSession::with_state(BoardState::from_shapes(vec![frame, task]), BoardConfig::default());
        session.select([id("frame")]);
        session.copy_selection();
        let pasted = session.paste();
        assert_eq!(session.shapes()[0].id, pasted[0]);
        assert_eq!(session.shapes().last().unwrap().id, id("task"));
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut session = session_with(&[("a", 0.0, 0.0)]);
        assert!(session.paste().is_empty());
        assert_eq!(session.store().history_len(), 1);
    }

    #[test]
    fn test_front_back() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0), ("c", 400.0, 0.0)]);
        session.select([id("a")]);
        assert!(session.bring_selection_to_front());
        assert_eq!(session.state().ids(), vec![id("b"), id("c"), id("a")]);
        assert!(!session.bring_selection_to_front());
        assert!(session.send_selection_to_back());
        assert_eq!(session.state().ids(), vec![id("a"), id("b"), id("c")]);
    }

    #[test]
    fn test_text_edit_respects_lock() {
        let mut session = session_with(&[("a", 0.0, 0.0)]);
        assert!(session.begin_text_edit(&id("a")));
        assert!(session.set_text(&id("a"), "hello"));
        assert_eq!(session.shape(&id("a")).unwrap().text, "hello");

        session.select([id("a")]);
        session.toggle_lock_selection();
        assert!(!session.begin_text_edit(&id("a")));
        assert!(!session.set_text(&id("a"), "changed"));
        assert_eq!(session.shape(&id("a")).unwrap().text, "hello");
    }

    #[test]
    fn test_subtask_edits_auto_size() {
        let mut session = session_with(&[("a", 0.0, 0.0)]);
        let first = session.add_subtask(&id("a"), "one").unwrap();
        session.add_subtask(&id("a"), "two");
        let shape = session.shape(&id("a")).unwrap();
        assert_eq!(shape.subtasks.len(), 2);
        assert!((shape.height - 196.0).abs() < f64::EPSILON);

        assert!(session.toggle_subtask(&id("a"), &first));
        assert!(session.shape(&id("a")).unwrap().subtasks[0].completed);
        assert!(session.remove_subtask(&id("a"), &first));
        assert!(!session.remove_subtask(&id("a"), &first));
    }

    #[test]
    fn test_styling_and_opacity() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
        session.select([id("a"), id("b")]);
        assert!(session.set_opacity(1.7));
        assert_eq!(session.shape(&id("b")).unwrap().opacity, Some(1.0));
        session.update_styling(&ShapeStyling {
            fill_color: Some("#000".to_string()),
            ..Default::default()
        });
        let styling = session.shape(&id("a")).unwrap().styling.clone().unwrap();
        assert_eq!(styling.fill_color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_connection_editing() {
        let mut session = session_with(&[("a", 0.0, 0.0), ("b", 300.0, 0.0)]);
        session.set_default_connection_style(ConnectionStyle::Dotted);
        session.connect(&id("a"), &id("b"), Some(Side::Bottom), None);
        let key = EdgeKey::new(id("a"), id("b"));
        assert_eq!(session.state().edge(&key).unwrap().style, ConnectionStyle::Dotted);
        assert!(session.set_connection_style(&key, ConnectionStyle::Double));
        assert!(session.set_connection_sides(&key, None, Some(Side::Top)));
        let edge = session.state().edge(&key).unwrap();
        assert_eq!(edge.style, ConnectionStyle::Double);
        assert_eq!(edge.source_side, None);
        assert_eq!(edge.target_side, Some(Side::Top));
        assert!(session.delete_connection(&key));
        assert!(!session.delete_connection(&key));
    }

    #[test]
    fn test_undo_prunes_stale_selection() {
        let mut session = BoardSession::default();
        let (new_id, _) = session.place_shape(ShapeKind::Task, Some(Point::ZERO));
        assert!(session.undo());
        assert!(!session.selection().contains(&new_id));
        assert!(session.editing().is_none());
        assert!(session.redo());
        assert!(session.shape(&new_id).is_some());
    }

    #[test]
    fn test_place_media() {
        let mut session = BoardSession::default();
        let attachment = Attachment::new(crate::shapes::AttachmentKind::Audio, "data:audio/webm;base64,AAAA", "audio/webm");
        let new_id = session
            .place_media(ShapeKind::Voice, Some(Point::new(100.0, 50.0)), attachment, "Voice Note")
            .unwrap();
        let shape = session.shape(&new_id).unwrap();
        assert_eq!(shape.attachments.len(), 1);
        assert!((shape.width - 200.0).abs() < f64::EPSILON);
        assert!(session
            .place_media(ShapeKind::Task, None, Attachment::new(crate::shapes::AttachmentKind::Image, "", "image/png"), "")
            .is_none());
    }

    #[test]
    fn test_jitter_range() {
        for _ in 0..200 {
            let j = jitter(25.0);
            assert!((-25.0..25.0).contains(&j));
        }
    }
}
