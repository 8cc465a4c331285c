#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn input(id: i64, x: f64, y: f64) -> PointerInput {
    PointerInput::new(PointerId(id), Point::new(x, y))
}

// =============================================================
// Key
// =============================================================

#[test]
fn key_names_deserialize() {
    for (raw, key) in [("Delete", Key::Delete), ("Backspace", Key::Backspace), ("Escape", Key::Escape)] {
        assert_eq!(serde_json::from_value::<Key>(json!(raw)).unwrap(), key);
    }
}

#[test]
fn z_key_accepts_either_case() {
    assert_eq!(serde_json::from_value::<Key>(json!("z")).unwrap(), Key::Z);
    assert_eq!(serde_json::from_value::<Key>(json!("Z")).unwrap(), Key::Z);
}

#[test]
fn z_key_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Key::Z).unwrap(), json!("z"));
}

#[test]
fn unknown_key_is_rejected() {
    assert!(serde_json::from_value::<Key>(json!("Enter")).is_err());
    assert!(serde_json::from_value::<Key>(json!("")).is_err());
}

#[test]
fn shifted_z_event_deserializes() {
    let event: EditorEvent =
        serde_json::from_str(r#"{"type":"key_down","key":"Z","modifiers":{"shift":true}}"#).unwrap();
    assert_eq!(event, EditorEvent::KeyDown { key: Key::Z, modifiers: Modifiers { shift: true, ..Modifiers::default() } });
}

// =============================================================
// EditorEvent serde
// =============================================================

#[test]
fn pointer_event_deserializes_from_tagged_json() {
    let event: EditorEvent =
        serde_json::from_value(json!({ "type": "pointer_down", "pointer_id": 7, "position": { "x": 1.5, "y": 2.0 } }))
            .unwrap();
    assert_eq!(event, EditorEvent::PointerDown(input(7, 1.5, 2.0)));
}

#[test]
fn key_event_defaults_modifiers() {
    let event: EditorEvent = serde_json::from_value(json!({ "type": "key_down", "key": "z" })).unwrap();
    assert_eq!(event, EditorEvent::KeyDown { key: Key::Z, modifiers: Modifiers::default() });
}

#[test]
fn key_event_reads_partial_modifiers() {
    let event: EditorEvent =
        serde_json::from_value(json!({ "type": "key_down", "key": "z", "modifiers": { "shift": true } })).unwrap();
    let EditorEvent::KeyDown { modifiers, .. } = event else {
        panic!("expected key_down");
    };
    assert!(modifiers.shift);
    assert!(!modifiers.meta);
}

#[test]
fn spawn_event_deserializes() {
    let event: EditorEvent = serde_json::from_value(json!({ "type": "spawn_shapes", "count": 25 })).unwrap();
    assert_eq!(event, EditorEvent::SpawnShapes { count: 25 });
}

#[test]
fn unknown_event_type_is_rejected() {
    let result = serde_json::from_value::<EditorEvent>(json!({ "type": "wheel" }));
    assert!(result.is_err());
}

// =============================================================
// EditorEvent helpers
// =============================================================

#[test]
fn pointer_id_only_for_pointer_events() {
    assert_eq!(EditorEvent::PointerMove(input(3, 0.0, 0.0)).pointer_id(), Some(PointerId(3)));
    assert_eq!(EditorEvent::PointerCancel(input(4, 0.0, 0.0)).pointer_id(), Some(PointerId(4)));
    assert_eq!(EditorEvent::FrameTick { now: 0.0 }.pointer_id(), None);
    assert_eq!(EditorEvent::KeyDown { key: Key::Delete, modifiers: Modifiers::default() }.pointer_id(), None);
}

#[test]
fn event_names_are_snake_case() {
    assert_eq!(EditorEvent::PointerUp(input(1, 0.0, 0.0)).name(), "pointer_up");
    assert_eq!(EditorEvent::SpawnShapes { count: 1 }.name(), "spawn_shapes");
}

// =============================================================
// Mode
// =============================================================

#[test]
fn mode_defaults_to_idle() {
    assert_eq!(Mode::default(), Mode::Idle);
    assert_eq!(Mode::default().pointer_id(), None);
}

#[test]
fn active_modes_report_owning_pointer() {
    let mode = Mode::DrawingRect { pointer_id: PointerId(9), origin: Point::new(0.0, 0.0), current: Point::new(1.0, 1.0) };
    assert_eq!(mode.pointer_id(), Some(PointerId(9)));
    assert_eq!(mode.kind(), "drawing_rect");
}

// =============================================================
// Selection / Hover / LatestPointer
// =============================================================

#[test]
fn selection_serializes_with_kind_tag() {
    assert_eq!(serde_json::to_value(Selection::None).unwrap(), json!({ "kind": "none" }));
    assert_eq!(
        serde_json::to_value(Selection::Shape(ShapeId::from("a"))).unwrap(),
        json!({ "kind": "shape", "id": "a" })
    );
}

#[test]
fn hover_id_accessor() {
    assert_eq!(Hover::None.id(), None);
    assert_eq!(Hover::Shape(ShapeId::from("h")).id().map(ShapeId::as_str), Some("h"));
}

#[test]
fn latest_pointer_filters_by_pointer() {
    let sample = LatestPointer::from(input(1, 5.0, 6.0));
    assert_eq!(sample.position_of(PointerId(1)), Some(Point::new(5.0, 6.0)));
    assert_eq!(sample.position_of(PointerId(2)), None);
    assert_eq!(LatestPointer::None.position_of(PointerId(1)), None);
}

#[test]
fn default_session_is_idle_and_empty() {
    let session = Session::default();
    assert_eq!(session.mode, Mode::Idle);
    assert_eq!(session.selection, Selection::None);
    assert_eq!(session.hover, Hover::None);
    assert_eq!(session.latest_pointer, LatestPointer::None);
}
