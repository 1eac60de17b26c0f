//! End-to-end interaction scenarios driven through the public session API.

use kurbo::{Point, Vec2};
use novaboard_core::{
    Action, BoardConfig, BoardSession, BoardSnapshot, BoardState, ConnectionStyle, EdgeKey, Key, KeyEvent,
    Modifiers, PointerEvent, PointerTarget, ResizeHandle, Shape, ShapeId, ShapeKind, Side, Subtask,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn shape(id: &str, kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Shape {
    let mut shape = Shape::new(kind, x, y, width, height);
    shape.id = ShapeId::from(id);
    shape
}

fn session_with(shapes: Vec<Shape>) -> BoardSession {
    init_logging();
    BoardSession::with_state(BoardState::from_shapes(shapes), BoardConfig::default())
}

fn id(s: &str) -> ShapeId {
    ShapeId::from(s)
}

fn press(session: &mut BoardSession, x: f64, y: f64, target: PointerTarget) -> Vec<Action> {
    session.on_pointer_down(&PointerEvent::new(Point::new(x, y), target))
}

fn drag_to(session: &mut BoardSession, x: f64, y: f64) {
    let event = PointerEvent::new(Point::new(x, y), PointerTarget::Background);
    session.on_pointer_move(&event);
    session.on_pointer_up(&event);
}

fn command(c: char) -> KeyEvent {
    KeyEvent::new(Key::Character(c)).with_modifiers(Modifiers::CTRL)
}

#[test]
fn test_multi_drag_keeps_offsets_and_snaps() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Task, 48.0, 24.0, 100.0, 100.0),
    ]);
    session.select([id("a"), id("b")]);

    press(&mut session, 50.0, 50.0, PointerTarget::Shape(id("a")));
    assert!(session.is_transforming());
    drag_to(&mut session, 80.0, 63.0);

    let a = session.shape(&id("a")).unwrap().origin();
    let b = session.shape(&id("b")).unwrap().origin();
    assert_eq!(a, Point::new(24.0, 24.0));
    assert_eq!(b - a, Vec2::new(48.0, 24.0));
    for value in [a.x, a.y, b.x, b.y] {
        assert_eq!(value % 24.0, 0.0);
    }
    assert_eq!(session.store().history_len(), 2);
}

#[test]
fn test_resize_never_goes_below_minimum() {
    let mut session = session_with(vec![shape("a", ShapeKind::Idea, 100.0, 100.0, 200.0, 120.0)]);
    press(
        &mut session,
        300.0,
        220.0,
        PointerTarget::ResizeHandle(id("a"), ResizeHandle::Se),
    );
    drag_to(&mut session, -500.0, -500.0);

    let a = session.shape(&id("a")).unwrap();
    assert_eq!((a.x, a.y), (100.0, 100.0));
    assert_eq!((a.width, a.height), (40.0, 40.0));
}

#[test]
fn test_undo_redo_and_branch_truncation() {
    let mut session = BoardSession::default();
    let s0 = session.state().clone();
    let (first, _) = session.place_shape(ShapeKind::Task, Some(Point::new(0.0, 0.0)));
    session.end_text_edit();
    let s1 = session.state().clone();

    assert!(session.undo());
    assert_eq!(session.state(), &s0);
    assert!(session.redo());
    assert_eq!(session.state(), &s1);

    assert!(session.undo());
    session.place_shape(ShapeKind::Note, Some(Point::new(300.0, 0.0)));
    assert!(!session.redo());
    assert!(session.shape(&first).is_none());
}

#[test]
fn test_group_click_selects_whole_group() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Task, 200.0, 0.0, 100.0, 100.0),
        shape("c", ShapeKind::Task, 400.0, 0.0, 100.0, 100.0),
    ]);
    session.select([id("a"), id("b")]);
    let group = session.group_selection().unwrap();
    session.clear_selection();

    press(&mut session, 250.0, 50.0, PointerTarget::Shape(id("b")));
    session.on_pointer_up(&PointerEvent::new(Point::new(250.0, 50.0), PointerTarget::Background));
    assert_eq!(session.selected_ids(), vec![id("a"), id("b")]);

    session.select([id("a")]);
    assert!(session.ungroup_selection());
    assert_eq!(session.shape(&id("a")).unwrap().group_id, None);
    assert_eq!(session.shape(&id("b")).unwrap().group_id, Some(group));
}

#[test]
fn test_expand_then_collapse_restores_board() {
    let mut idea = shape("idea", ShapeKind::Idea, 0.0, 0.0, 200.0, 120.0);
    idea.subtasks = vec![Subtask::new("Research"), Subtask::new("Draft"), Subtask::new("Ship")];
    let mut session = session_with(vec![idea]);
    let before = session.state().clone();

    let created = session.expand_subtasks(&id("idea"));
    assert_eq!(created.len(), 3);
    let positions: Vec<(f64, f64)> = created
        .iter()
        .map(|c| {
            let s = session.shape(c).unwrap();
            (s.x, s.y)
        })
        .collect();
    assert_eq!(positions, vec![(320.0, 0.0), (320.0, 140.0), (320.0, 280.0)]);
    for child in &created {
        let edge = session.state().edge(&EdgeKey::new(id("idea"), child.clone())).unwrap();
        assert_eq!(edge.source_side, Some(Side::Right));
        assert_eq!(edge.target_side, Some(Side::Left));
        assert_eq!(edge.style, ConnectionStyle::default());
    }
    assert!(session.shape(&id("idea")).unwrap().hide_subtasks);

    let removed = session.collapse_subtasks(&id("idea"));
    assert_eq!(removed, created);
    assert_eq!(session.state(), &before);
}

#[test]
fn test_collapse_keeps_existing_parent_edges() {
    let mut idea = shape("idea", ShapeKind::Idea, 0.0, 0.0, 200.0, 120.0);
    idea.subtasks = vec![Subtask::new("Research"), Subtask::new("Ship")];
    let mut session = session_with(vec![
        idea,
        shape("review", ShapeKind::Task, 0.0, 400.0, 200.0, 100.0),
        shape("brief", ShapeKind::Note, -400.0, 0.0, 200.0, 240.0),
    ]);
    assert!(session.connect(&id("idea"), &id("review"), Some(Side::Bottom), Some(Side::Top)));
    assert!(session.connect(&id("brief"), &id("idea"), None, None));
    session.set_connection_style(&EdgeKey::new(id("idea"), id("review")), ConnectionStyle::Dashed);
    let before = session.state().clone();

    let created = session.expand_subtasks(&id("idea"));
    assert_eq!(session.state().edges.len(), 2 + created.len());
    session.collapse_subtasks(&id("idea"));

    assert_eq!(session.state(), &before);
    let kept = session.state().edge(&EdgeKey::new(id("idea"), id("review"))).unwrap();
    assert_eq!(kept, before.edge(&EdgeKey::new(id("idea"), id("review"))).unwrap());
    assert_eq!(kept.style, ConnectionStyle::Dashed);
    assert!(session.state().has_edge(&id("brief"), &id("idea")));
}

#[test]
fn test_route_prefers_right_to_left() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Task, 300.0, 40.0, 100.0, 100.0),
    ]);
    assert!(session.connect(&id("a"), &id("b"), None, None));
    let route = session.route_for(&EdgeKey::new(id("a"), id("b"))).unwrap();
    assert_eq!(route.start_side, Side::Right);
    assert_eq!(route.end_side, Side::Left);
    assert_eq!(route.start(), Point::new(100.0, 50.0));
    assert_eq!(route.end(), Point::new(300.0, 90.0));
}

#[test]
fn test_marquee_selects_only_overlapping_shapes() {
    let mut session = session_with(vec![
        shape("near", ShapeKind::Task, 10.0, 10.0, 50.0, 50.0),
        shape("far", ShapeKind::Task, 400.0, 400.0, 50.0, 50.0),
    ]);
    press(&mut session, 0.0, 0.0, PointerTarget::Background);
    assert!(session.marquee().is_some());
    drag_to(&mut session, 300.0, 300.0);
    assert_eq!(session.selected_ids(), vec![id("near")]);
    assert!(session.marquee().is_none());
}

#[test]
fn test_zoom_is_clamped() {
    let mut session = BoardSession::default();
    session.zoom_at(Point::ZERO, 4.8);
    assert_eq!(session.camera().scale, 4.8);
    session.zoom_in();
    assert_eq!(session.camera().scale, 5.0);

    session.reset_view();
    session.zoom_at(Point::ZERO, 0.11);
    session.zoom_out();
    assert_eq!(session.camera().scale, 0.1);
}

#[test]
fn test_zoom_at_keeps_cursor_anchor() {
    let mut session = BoardSession::default();
    session.pan_by(Vec2::new(40.0, -10.0));
    let client = Point::new(320.0, 240.0);
    let before = session.to_canvas(client);
    session.zoom_at(client, 2.0);
    let after = session.to_canvas(client);
    assert!((before - after).hypot() < 1e-9);
}

#[test]
fn test_fit_on_empty_board_resets_view() {
    let mut session = BoardSession::default();
    session.pan_by(Vec2::new(120.0, 80.0));
    session.zoom_in();
    session.fit_to_content();
    assert_eq!(session.camera().scale, 1.0);
    assert_eq!(session.camera().pan, Vec2::ZERO);
}

#[test]
fn test_keyboard_select_all_delete_undo() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Note, 200.0, 0.0, 100.0, 100.0),
    ]);
    session.connect(&id("a"), &id("b"), None, None);

    session.on_key_down(&command('a'));
    assert_eq!(session.selection().len(), 2);
    let actions = session.on_key_down(&KeyEvent::new(Key::Delete));
    assert_eq!(actions, vec![Action::HistoryChanged, Action::SelectionChanged]);
    assert!(session.shapes().is_empty());
    assert!(session.state().edges.is_empty());

    session.on_key_down(&command('z'));
    assert_eq!(session.shapes().len(), 2);
    assert!(session.state().has_edge(&id("a"), &id("b")));
}

#[test]
fn test_keyboard_ignored_while_typing() {
    let mut session = session_with(vec![shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0)]);
    session.select([id("a")]);
    let actions = session.on_key_down(&KeyEvent::new(Key::Backspace).in_text_input());
    assert!(actions.is_empty());
    assert_eq!(session.shapes().len(), 1);
}

#[test]
fn test_copy_paste_drops_connections() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Task, 200.0, 0.0, 100.0, 100.0),
    ]);
    session.connect(&id("a"), &id("b"), None, None);
    session.on_key_down(&command('a'));
    session.on_key_down(&command('c'));
    session.on_key_down(&command('v'));

    assert_eq!(session.shapes().len(), 4);
    assert_eq!(session.state().edges.len(), 1);
    let pasted = session.selected_ids();
    assert_eq!(pasted.len(), 2);
    assert!(pasted.iter().all(|p| p != &id("a") && p != &id("b")));
}

#[test]
fn test_connector_drag_between_shapes() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Task, 0.0, 0.0, 100.0, 100.0),
        shape("b", ShapeKind::Task, 300.0, 0.0, 100.0, 100.0),
    ]);
    press(&mut session, 100.0, 50.0, PointerTarget::SideHandle(id("a"), Side::Right));
    let ghost = session.draft_route().unwrap();
    assert_eq!(ghost.start_side, Side::Right);

    let release = PointerEvent::new(Point::new(305.0, 50.0), PointerTarget::Background);
    session.on_pointer_move(&release);
    let actions = session.on_pointer_up(&release);

    let key = EdgeKey::new(id("a"), id("b"));
    assert_eq!(actions, vec![Action::ConnectionCreated(key.clone()), Action::HistoryChanged]);
    let edge = session.state().edge(&key).unwrap();
    assert_eq!(edge.target_side, Some(Side::Left));
    assert!(session.draft_route().is_none());
}

#[test]
fn test_snapshot_survives_json() {
    let mut session = session_with(vec![
        shape("a", ShapeKind::Idea, 0.0, 0.0, 200.0, 120.0),
        shape("b", ShapeKind::Task, 400.0, 0.0, 200.0, 100.0),
    ]);
    session.connect(&id("a"), &id("b"), Some(Side::Bottom), None);
    session.set_text(&id("a"), "Launch plan");

    let snapshot = session.export_snapshot("board-7", "Launch", 1_700_000_000_000);
    let json = snapshot.to_json().unwrap();
    let restored = BoardSession::from_snapshot(&BoardSnapshot::from_json(&json).unwrap(), BoardConfig::default());

    assert_eq!(restored.state(), session.state());
    assert!(!restored.store().can_undo());
}
