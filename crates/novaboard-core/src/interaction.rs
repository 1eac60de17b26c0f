//! Pointer-driven interaction state machine.

use crate::geometry::{Side, anchor_point, nearest_side, rect_contains};
use crate::input::{MouseButton, PointerEvent, PointerTarget};
use crate::selection::{Marquee, ResizeHandle, apply_resize, effective_target, handle_at, marquee_hits};
use crate::session::BoardSession;
use crate::shapes::{CreationFollowUp, Edge, EdgeKey, ShapeId, ShapeKind};
use crate::snap::snap_to_grid;
use crate::tools::ToolKind;
use kurbo::{ParamCurveNearest, Point, Rect};
use std::collections::HashMap;

/// Accuracy used when measuring pointer distance to a connection curve.
const CURVE_ACCURACY: f64 = 0.1;

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Panning the view; `last` is the previous client position.
    Pan { last: Point },
    /// Moving the selection. Offsets are measured from `start` in client space.
    Drag {
        start: Point,
        initial: HashMap<ShapeId, Point>,
    },
    Resize {
        id: ShapeId,
        handle: ResizeHandle,
        start: Point,
        initial: Rect,
    },
    /// A connection being drawn from `source_id`; `cursor` is in canvas space.
    ConnectorDraft {
        source_id: ShapeId,
        source_side: Option<Side>,
        cursor: Point,
    },
    Marquee { marquee: Marquee, additive: bool },
}

/// Coarse state of the interaction machine, for hosts that style the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Pan,
    CreatePlacement(ShapeKind),
    Drag,
    Resize,
    ConnectorDraft,
    Marquee,
}

/// Side effects the host should perform after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged,
    ShapeCreated(ShapeId),
    /// Open the inline text editor on a freshly created shape.
    TextEditRequested(ShapeId),
    /// Open the rich document editor for a note or sheet.
    DocumentEditorRequested(ShapeId),
    /// Ask the host for an image file or a voice recording to place at `position`.
    MediaCaptureRequested { kind: ShapeKind, position: Point },
    ConnectionCreated(EdgeKey),
    /// A history entry was added.
    HistoryChanged,
    ViewChanged,
}

impl BoardSession {
    pub fn interaction_state(&self) -> InteractionState {
        match &self.mode {
            InteractionMode::Idle => match self.tools.current().creation_kind() {
                Some(kind) => InteractionState::CreatePlacement(kind),
                None => InteractionState::Idle,
            },
            InteractionMode::Pan { .. } => InteractionState::Pan,
            InteractionMode::Drag { .. } => InteractionState::Drag,
            InteractionMode::Resize { .. } => InteractionState::Resize,
            InteractionMode::ConnectorDraft { .. } => InteractionState::ConnectorDraft,
            InteractionMode::Marquee { .. } => InteractionState::Marquee,
        }
    }

    /// Whether a drag or resize gesture is running.
    pub fn is_transforming(&self) -> bool {
        matches!(
            self.mode,
            InteractionMode::Drag { .. } | InteractionMode::Resize { .. }
        )
    }

    /// Resolve what lies under a client point: resize handles of the single
    /// selected shape, then side handles and bodies front to back, then connections.
    pub fn hit_test(&self, client: Point) -> PointerTarget {
        let point = self.camera.to_canvas(client);
        let tolerance = self.config.handle_hit_tolerance / self.camera.scale;
        let state = self.store.state();

        if let Some(shape) = self.selection.single().and_then(|id| state.get(id)) {
            if shape.capabilities().resizable && !shape.locked {
                if let Some(handle) = handle_at(shape.rect(), point, tolerance) {
                    return PointerTarget::ResizeHandle(shape.id.clone(), handle);
                }
            }
        }

        for shape in state.shapes.iter().rev() {
            let rect = shape.rect();
            if let Some(side) = Side::PRIORITY
                .into_iter()
                .find(|side| anchor_point(rect, *side).distance(point) <= tolerance)
            {
                return PointerTarget::SideHandle(shape.id.clone(), side);
            }
            if rect_contains(rect, point) {
                return PointerTarget::Shape(shape.id.clone());
            }
        }

        for (key, route) in self.routes() {
            let nearest = route.curve.nearest(point, CURVE_ACCURACY);
            if nearest.distance_sq.sqrt() <= tolerance {
                return PointerTarget::Connection(key);
            }
        }

        PointerTarget::Background
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Action> {
        let canvas = self.camera.to_canvas(event.position);
        self.pointer = Some(canvas);

        // Hand on the background still clears the selection below.
        let hand = self.tools.current() == ToolKind::Hand && event.target != PointerTarget::Background;
        if event.button == MouseButton::Middle || (hand && event.button == MouseButton::Left) {
            self.mode = InteractionMode::Pan {
                last: event.position,
            };
            return Vec::new();
        }
        if event.button != MouseButton::Left {
            return Vec::new();
        }

        match &event.target {
            PointerTarget::Background => self.press_background(event, canvas),
            PointerTarget::Shape(id) => self.press_shape(event, id.clone(), canvas),
            PointerTarget::SideHandle(id, side) => {
                if !self.store.state().contains(id) {
                    return Vec::new();
                }
                self.mode = InteractionMode::ConnectorDraft {
                    source_id: id.clone(),
                    source_side: Some(*side),
                    cursor: canvas,
                };
                Vec::new()
            }
            PointerTarget::ResizeHandle(id, handle) => {
                self.press_resize_handle(event, id.clone(), *handle)
            }
            PointerTarget::Connection(key) => {
                self.mode = InteractionMode::Idle;
                if self.select_connection(key.clone()) {
                    vec![Action::SelectionChanged]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn press_background(&mut self, event: &PointerEvent, canvas: Point) -> Vec<Action> {
        let tool = self.tools.current();
        if let Some(kind) = tool.creation_kind() {
            self.tools.finish_placement();
            if kind.capabilities().on_create == CreationFollowUp::MediaCapture {
                return vec![Action::MediaCaptureRequested {
                    kind,
                    position: canvas,
                }];
            }
            let (_, actions) = self.place_shape(kind, Some(canvas));
            return actions;
        }

        if !event.modifiers.shift {
            self.selection.clear_shapes();
        }
        self.selection.clear_connection();
        self.end_text_edit();

        self.mode = if tool == ToolKind::Select {
            InteractionMode::Marquee {
                marquee: Marquee::new(canvas),
                additive: event.modifiers.shift,
            }
        } else {
            InteractionMode::Pan {
                last: event.position,
            }
        };
        vec![Action::SelectionChanged]
    }

    fn press_shape(&mut self, event: &PointerEvent, id: ShapeId, canvas: Point) -> Vec<Action> {
        let tool = self.tools.current();
        let Some(shape) = self.store.state().get(&id) else {
            return Vec::new();
        };
        let locked = shape.locked;
        if tool.is_creation() {
            return Vec::new();
        }

        if tool == ToolKind::Connector {
            return self.press_with_connector(id, canvas);
        }

        if self.editing.as_ref().is_some_and(|editing| editing != &id) {
            self.end_text_edit();
        }

        let targets = effective_target(self.store.state(), &id);
        if event.modifiers.shift {
            if targets.iter().all(|t| self.selection.contains(t)) {
                for target in &targets {
                    self.selection.remove(target);
                }
            } else {
                self.selection.extend(targets);
            }
        } else if !self.selection.contains(&id) {
            self.selection.replace(targets);
        } else {
            self.selection.extend(targets);
        }

        if !locked {
            self.begin_drag(event.position);
        }
        vec![Action::SelectionChanged]
    }

    fn press_with_connector(&mut self, id: ShapeId, canvas: Point) -> Vec<Action> {
        match std::mem::take(&mut self.mode) {
            InteractionMode::ConnectorDraft {
                source_id,
                source_side,
                ..
            } if source_id != id => {
                let mut actions = Vec::new();
                let key = EdgeKey::new(source_id.clone(), id.clone());
                if self.connect(&source_id, &id, source_side, Some(Side::Left)) {
                    actions.push(Action::ConnectionCreated(key));
                    actions.push(Action::HistoryChanged);
                }
                self.tools.finish_connector();
                actions
            }
            draft @ InteractionMode::ConnectorDraft { .. } => {
                self.mode = draft;
                Vec::new()
            }
            _ => {
                self.mode = InteractionMode::ConnectorDraft {
                    source_id: id,
                    source_side: None,
                    cursor: canvas,
                };
                Vec::new()
            }
        }
    }

    fn begin_drag(&mut self, start: Point) {
        let initial: HashMap<ShapeId, Point> = self
            .store
            .state()
            .shapes
            .iter()
            .filter(|s| self.selection.contains(&s.id) && !s.locked)
            .map(|s| (s.id.clone(), s.origin()))
            .collect();
        self.mode = if initial.is_empty() {
            InteractionMode::Idle
        } else {
            InteractionMode::Drag { start, initial }
        };
    }

    fn press_resize_handle(&mut self, event: &PointerEvent, id: ShapeId, handle: ResizeHandle) -> Vec<Action> {
        let Some(shape) = self.store.state().get(&id) else {
            return Vec::new();
        };
        if shape.locked || !shape.capabilities().resizable {
            return Vec::new();
        }
        let initial = shape.rect();
        self.selection.replace([id.clone()]);
        self.mode = InteractionMode::Resize {
            id,
            handle,
            start: event.position,
            initial,
        };
        vec![Action::SelectionChanged]
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Vec<Action> {
        let canvas = self.camera.to_canvas(event.position);
        self.pointer = Some(canvas);

        match &mut self.mode {
            InteractionMode::Idle => Vec::new(),
            InteractionMode::Pan { last } => {
                let delta = event.position - *last;
                *last = event.position;
                self.camera.pan_by(delta);
                vec![Action::ViewChanged]
            }
            InteractionMode::ConnectorDraft { cursor, .. } => {
                *cursor = canvas;
                Vec::new()
            }
            InteractionMode::Marquee { marquee, .. } => {
                marquee.current = canvas;
                Vec::new()
            }
            InteractionMode::Drag { start, initial } => {
                let delta = self.camera.delta_to_canvas(event.position - *start);
                let grid = self.config.grid_size;
                let mut state = self.store.state().clone();
                for shape in state.shapes.iter_mut() {
                    if let Some(origin) = initial.get(&shape.id) {
                        shape.set_origin(snap_to_grid(*origin + delta, grid).point);
                    }
                }
                self.store.commit(state, false);
                Vec::new()
            }
            InteractionMode::Resize {
                id,
                handle,
                start,
                initial,
            } => {
                let delta = self.camera.delta_to_canvas(event.position - *start);
                let rect = apply_resize(*initial, *handle, delta, self.config.min_shape_size);
                let mut state = self.store.state().clone();
                if let Some(shape) = state.get_mut(id) {
                    shape.set_rect(rect);
                }
                self.store.commit(state, false);
                Vec::new()
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Vec<Action> {
        let canvas = self.camera.to_canvas(event.position);
        self.pointer = Some(canvas);

        match std::mem::take(&mut self.mode) {
            InteractionMode::Idle | InteractionMode::Pan { .. } => Vec::new(),
            InteractionMode::Marquee { marquee, additive } => {
                let hits = marquee_hits(self.store.state(), marquee.rect());
                if additive || event.modifiers.shift {
                    self.selection.extend(hits);
                } else {
                    self.selection.replace(hits);
                }
                vec![Action::SelectionChanged]
            }
            InteractionMode::ConnectorDraft {
                source_id,
                source_side,
                ..
            } => {
                let actions = self.release_draft(source_id, source_side, canvas);
                self.tools.finish_connector();
                actions
            }
            InteractionMode::Drag { .. } | InteractionMode::Resize { .. } => {
                if self.store.has_uncommitted_changes() {
                    let state = self.store.state().clone();
                    self.update_shapes(state, true);
                    vec![Action::HistoryChanged]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn release_draft(&mut self, source_id: ShapeId, source_side: Option<Side>, canvas: Point) -> Vec<Action> {
        let state = self.store.state();
        let Some(target) = state.first_containing(canvas, Some(&source_id)) else {
            return Vec::new();
        };
        if state.has_edge(&source_id, &target.id) {
            return Vec::new();
        }
        let target_side = nearest_side(target.rect(), canvas);
        let edge = Edge::new(source_id, target.id.clone(), self.tools.connection_style)
            .with_sides(source_side, Some(target_side));
        let key = edge.key.clone();
        if self.edit(|state| state.connect(edge)) {
            log::debug!("connected {} -> {}", key.source, key.target);
            vec![Action::ConnectionCreated(key), Action::HistoryChanged]
        } else {
            Vec::new()
        }
    }
}
