//! Input model: editor events, keys and modifiers, and the transient session.
//!
//! `EditorEvent` is what the host feeds in, already translated to
//! surface-local coordinates. `Session` is everything the interaction layer
//! remembers between events: the gesture [`Mode`], selection, hover, and the
//! latest pointer sample. None of it is undoable or persisted.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::doc::{Rect, ShapeId};
use crate::geom::Point;

/// Host-assigned identity of one pointer (mouse, pen, or a single touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub i64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keys the editor reacts to.
///
/// `"Z"` arrives when shift is held and maps to the same key as `"z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    #[serde(rename = "z", alias = "Z")]
    Z,
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

/// Payload shared by every pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub pointer_id: PointerId,
    pub position: Point,
}

impl PointerInput {
    #[must_use]
    pub fn new(pointer_id: PointerId, position: Point) -> Self {
        Self { pointer_id, position }
    }
}

/// One input to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    PointerCancel(PointerInput),
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// End of a frame; `now` is the host clock in milliseconds.
    FrameTick { now: f64 },
    /// Drop `count` random rectangles onto the canvas in one undoable step.
    SpawnShapes { count: usize },
}

impl EditorEvent {
    /// The pointer this event belongs to, if it is a pointer event.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::PointerDown(input) | Self::PointerMove(input) | Self::PointerUp(input) | Self::PointerCancel(input) => {
                Some(input.pointer_id)
            }
            Self::KeyDown { .. } | Self::FrameTick { .. } | Self::SpawnShapes { .. } => None,
        }
    }

    /// Stable name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown(_) => "pointer_down",
            Self::PointerMove(_) => "pointer_move",
            Self::PointerUp(_) => "pointer_up",
            Self::PointerCancel(_) => "pointer_cancel",
            Self::KeyDown { .. } => "key_down",
            Self::FrameTick { .. } => "frame_tick",
            Self::SpawnShapes { .. } => "spawn_shapes",
        }
    }
}

/// What a pointer-down provisionally means, before the drag threshold confirms it.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Pressed on empty canvas: a drag will draw a new rectangle.
    DrawRect,
    /// Pressed on a shape: a drag will move it.
    DragSelection {
        shape_id: ShapeId,
        start_pointer: Point,
        start_rect: Rect,
    },
}

/// The gesture state machine.
///
/// Every variant other than `Idle` carries the pointer that started the
/// gesture; events from any other pointer are ignored until it ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is down but has not yet moved past the drag threshold.
    Armed { pointer_id: PointerId, origin: Point, intent: Intent },
    /// Sizing a new rectangle between `origin` and `current`.
    DrawingRect { pointer_id: PointerId, origin: Point, current: Point },
    /// Moving an existing shape; the document is untouched until release.
    DraggingSelection {
        pointer_id: PointerId,
        shape_id: ShapeId,
        start_pointer: Point,
        current_pointer: Point,
        start_rect: Rect,
    },
}

impl Mode {
    /// The pointer that owns the current gesture.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::Armed { pointer_id, .. }
            | Self::DrawingRect { pointer_id, .. }
            | Self::DraggingSelection { pointer_id, .. } => Some(*pointer_id),
        }
    }

    /// Stable name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::DrawingRect { .. } => "drawing_rect",
            Self::DraggingSelection { .. } => "dragging_selection",
        }
    }
}

/// Which shape, if any, is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Shape(ShapeId),
}

impl Selection {
    #[must_use]
    pub fn id(&self) -> Option<&ShapeId> {
        match self {
            Self::None => None,
            Self::Shape(id) => Some(id),
        }
    }
}

/// Which shape, if any, the idle pointer is over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Hover {
    #[default]
    None,
    Shape(ShapeId),
}

impl Hover {
    #[must_use]
    pub fn id(&self) -> Option<&ShapeId> {
        match self {
            Self::None => None,
            Self::Shape(id) => Some(id),
        }
    }
}

/// Most recent position reported for the tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LatestPointer {
    #[default]
    None,
    Some { pointer_id: PointerId, position: Point },
}

impl LatestPointer {
    /// The sampled position, but only if it came from `pointer_id`.
    #[must_use]
    pub fn position_of(&self, pointer_id: PointerId) -> Option<Point> {
        match *self {
            Self::Some { pointer_id: id, position } if id == pointer_id => Some(position),
            _ => None,
        }
    }
}

impl From<PointerInput> for LatestPointer {
    fn from(input: PointerInput) -> Self {
        Self::Some { pointer_id: input.pointer_id, position: input.position }
    }
}

/// All transient interaction state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub mode: Mode,
    pub selection: Selection,
    pub hover: Hover,
    pub latest_pointer: LatestPointer,
}
