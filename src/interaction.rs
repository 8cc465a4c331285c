//! The interaction state machine.
//!
//! [`on_event`] takes the current document and session plus one event and
//! returns the next session along with the [`DocAction`]s the event resolved
//! to. It never touches the document itself; the caller routes the actions
//! through the history manager.
//!
//! Hit-testing is the only O(n) step, so it is rationed: once per
//! pointer-down and once per idle frame tick. Raw pointer moves only record a
//! sample; the tick decides what the sample means. Every hit-test is reported
//! as a [`PerfEvent::HitTest`] so the cost is observable.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use rand::Rng;
use tracing::warn;

use crate::consts::{
    DRAG_THRESHOLD, MAX_SPAWN_COUNT, SPAWN_MIN_SIZE, SPAWN_MIN_X, SPAWN_MIN_Y, SPAWN_SPAN_SIZE, SPAWN_SPAN_X, SPAWN_SPAN_Y,
};
use crate::doc::{Document, Patch, Rect, ShapeId};
use crate::geom::Point;
use crate::history::DocAction;
use crate::hit::hit_test;
use crate::input::{EditorEvent, Hover, Intent, Key, LatestPointer, Mode, Modifiers, PointerInput, Selection, Session};

/// Cost accounting emitted alongside a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfEvent {
    /// One full hit-test scan was performed.
    HitTest,
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub session: Session,
    pub actions: Vec<DocAction>,
    pub perf: Vec<PerfEvent>,
}

impl Interaction {
    fn unchanged(session: &Session) -> Self {
        Self { session: session.clone(), actions: Vec::new(), perf: Vec::new() }
    }

    fn to(session: Session) -> Self {
        Self { session, actions: Vec::new(), perf: Vec::new() }
    }

    fn with_perf(mut self, perf: Vec<PerfEvent>) -> Self {
        self.perf = perf;
        self
    }
}

/// Feed one event through the state machine.
///
/// Total: any event that does not apply to the current mode, or that comes
/// from a pointer other than the one owning the gesture, returns the session
/// unchanged with no actions.
#[must_use]
pub fn on_event(doc: &Document, session: &Session, event: &EditorEvent) -> Interaction {
    match event {
        EditorEvent::PointerDown(input) => pointer_down(doc, session, *input),
        EditorEvent::PointerMove(input) => pointer_move(session, *input),
        EditorEvent::PointerUp(input) => pointer_up(doc, session, *input),
        EditorEvent::PointerCancel(input) => pointer_cancel(session, *input),
        EditorEvent::KeyDown { key, modifiers } => key_down(doc, session, *key, *modifiers),
        EditorEvent::FrameTick { .. } => frame_tick(doc, session),
        EditorEvent::SpawnShapes { count } => spawn_shapes(session, *count),
    }
}

/// Hit-test and account for it.
fn probe(doc: &Document, pt: Point, perf: &mut Vec<PerfEvent>) -> Option<ShapeId> {
    perf.push(PerfEvent::HitTest);
    hit_test(doc, pt)
}

/// Whether `input` may drive the current gesture.
fn owns_gesture(session: &Session, input: PointerInput) -> bool {
    session.mode.pointer_id().is_none_or(|active| active == input.pointer_id)
}

fn commit(patch: Patch) -> DocAction {
    DocAction::Commit(patch)
}

// ── Pointer down ────────────────────────────────────────────────

fn pointer_down(doc: &Document, session: &Session, input: PointerInput) -> Interaction {
    if session.mode != Mode::Idle {
        return Interaction::unchanged(session);
    }

    let mut perf = Vec::with_capacity(1);
    let Some(hit_id) = probe(doc, input.position, &mut perf) else {
        let next = Session {
            mode: Mode::Armed { pointer_id: input.pointer_id, origin: input.position, intent: Intent::DrawRect },
            selection: Selection::None,
            hover: Hover::None,
            latest_pointer: input.into(),
        };
        return Interaction::to(next).with_perf(perf);
    };

    let Some(rect) = doc.get(&hit_id) else {
        return Interaction::unchanged(session).with_perf(perf);
    };

    let intent = Intent::DragSelection { shape_id: hit_id.clone(), start_pointer: input.position, start_rect: rect.clone() };
    let next = Session {
        mode: Mode::Armed { pointer_id: input.pointer_id, origin: input.position, intent },
        selection: Selection::Shape(hit_id),
        hover: Hover::None,
        latest_pointer: input.into(),
    };
    Interaction::to(next).with_perf(perf)
}

// ── Pointer move ────────────────────────────────────────────────

fn pointer_move(session: &Session, input: PointerInput) -> Interaction {
    if !owns_gesture(session, input) {
        return Interaction::unchanged(session);
    }
    Interaction::to(Session { latest_pointer: input.into(), ..session.clone() })
}

// ── Pointer up ──────────────────────────────────────────────────

fn pointer_up(doc: &Document, session: &Session, input: PointerInput) -> Interaction {
    if session.mode == Mode::Idle || !owns_gesture(session, input) {
        return Interaction::unchanged(session);
    }

    let idle = Session { mode: Mode::Idle, latest_pointer: input.into(), ..session.clone() };

    match &session.mode {
        Mode::DrawingRect { origin, .. } => {
            let rect = Rect::from_corners(ShapeId::generate(), *origin, input.position);
            Interaction { session: idle, actions: vec![commit(Patch::AddRect { after: rect })], perf: Vec::new() }
        }
        Mode::DraggingSelection { shape_id, start_pointer, start_rect, .. } => {
            let actions = drop_selection(doc, shape_id, *start_pointer, start_rect, input.position)
                .map(commit)
                .into_iter()
                .collect();
            Interaction { session: idle, actions, perf: Vec::new() }
        }
        Mode::Armed { .. } | Mode::Idle => Interaction::to(idle),
    }
}

/// Build the update that moves the dragged shape to its release position.
fn drop_selection(doc: &Document, id: &ShapeId, start_pointer: Point, start_rect: &Rect, end: Point) -> Option<Patch> {
    let current = doc.get(id)?;
    let d = start_pointer.delta_to(end);
    let after = current.moved_to(start_rect.x + d.dx, start_rect.y + d.dy);
    Some(Patch::UpdateRect { id: id.clone(), before: current.clone(), after })
}

// ── Pointer cancel ──────────────────────────────────────────────

fn pointer_cancel(session: &Session, input: PointerInput) -> Interaction {
    if !owns_gesture(session, input) {
        return Interaction::unchanged(session);
    }
    Interaction::to(Session { mode: Mode::Idle, hover: Hover::None, ..session.clone() })
}

// ── Frame tick ──────────────────────────────────────────────────

fn frame_tick(doc: &Document, session: &Session) -> Interaction {
    match &session.mode {
        Mode::Idle => refresh_hover(doc, session),
        Mode::Armed { pointer_id, origin, intent } => {
            let Some(sample) = session.latest_pointer.position_of(*pointer_id) else {
                return Interaction::unchanged(session);
            };
            if !origin.exceeds(sample, DRAG_THRESHOLD) {
                return Interaction::unchanged(session);
            }
            let mode = match intent {
                Intent::DrawRect => Mode::DrawingRect { pointer_id: *pointer_id, origin: *origin, current: sample },
                Intent::DragSelection { shape_id, start_pointer, start_rect } => Mode::DraggingSelection {
                    pointer_id: *pointer_id,
                    shape_id: shape_id.clone(),
                    start_pointer: *start_pointer,
                    current_pointer: sample,
                    start_rect: start_rect.clone(),
                },
            };
            Interaction::to(Session { mode, ..session.clone() })
        }
        Mode::DrawingRect { pointer_id, origin, current } => {
            match session.latest_pointer.position_of(*pointer_id) {
                Some(sample) if sample != *current => {
                    let mode = Mode::DrawingRect { pointer_id: *pointer_id, origin: *origin, current: sample };
                    Interaction::to(Session { mode, ..session.clone() })
                }
                _ => Interaction::unchanged(session),
            }
        }
        Mode::DraggingSelection { pointer_id, current_pointer, .. } => {
            match session.latest_pointer.position_of(*pointer_id) {
                Some(sample) if sample != *current_pointer => {
                    let mut mode = session.mode.clone();
                    if let Mode::DraggingSelection { current_pointer, .. } = &mut mode {
                        *current_pointer = sample;
                    }
                    Interaction::to(Session { mode, ..session.clone() })
                }
                _ => Interaction::unchanged(session),
            }
        }
    }
}

fn refresh_hover(doc: &Document, session: &Session) -> Interaction {
    let LatestPointer::Some { position, .. } = session.latest_pointer else {
        return Interaction::unchanged(session);
    };

    let mut perf = Vec::with_capacity(1);
    let hover = match probe(doc, position, &mut perf) {
        Some(id) => Hover::Shape(id),
        None => Hover::None,
    };
    if hover == session.hover {
        return Interaction::unchanged(session).with_perf(perf);
    }
    Interaction::to(Session { hover, ..session.clone() }).with_perf(perf)
}

// ── Keyboard ────────────────────────────────────────────────────

fn key_down(doc: &Document, session: &Session, key: Key, modifiers: Modifiers) -> Interaction {
    match key {
        Key::Delete | Key::Backspace => {
            let Selection::Shape(id) = &session.selection else {
                return Interaction::unchanged(session);
            };
            let actions = doc.get(id).map(|rect| commit(Patch::RemoveRect { before: rect.clone() })).into_iter().collect();
            Interaction { session: Session { selection: Selection::None, ..session.clone() }, actions, perf: Vec::new() }
        }
        Key::Z => {
            let action = if modifiers.shift { DocAction::Redo } else { DocAction::Undo };
            Interaction {
                session: Session { selection: Selection::None, ..session.clone() },
                actions: vec![action],
                perf: Vec::new(),
            }
        }
        Key::Escape => Interaction::unchanged(session),
    }
}

// ── Commands ────────────────────────────────────────────────────

fn spawn_shapes(session: &Session, count: usize) -> Interaction {
    if count == 0 {
        return Interaction::unchanged(session);
    }
    if count > MAX_SPAWN_COUNT {
        warn!(requested = count, max = MAX_SPAWN_COUNT, "spawn count clamped");
    }
    let count = count.min(MAX_SPAWN_COUNT);
    let mut rng = rand::rng();
    let rects = (0..count)
        .map(|_| Rect {
            id: ShapeId::generate(),
            x: SPAWN_MIN_X + rng.random_range(0.0..SPAWN_SPAN_X),
            y: SPAWN_MIN_Y + rng.random_range(0.0..SPAWN_SPAN_Y),
            width: SPAWN_MIN_SIZE + rng.random_range(0.0..SPAWN_SPAN_SIZE),
            height: SPAWN_MIN_SIZE + rng.random_range(0.0..SPAWN_SPAN_SIZE),
        })
        .collect();
    Interaction { session: session.clone(), actions: vec![commit(Patch::AddRects { after: rects })], perf: Vec::new() }
}
