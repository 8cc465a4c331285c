//! Document model: shapes, the paint order, and the patch reducer.
//!
//! A [`Document`] is an immutable snapshot. Both of its collections sit behind
//! an `Arc`, so a patch that only touches one half shares the other with the
//! previous snapshot, and [`Document::ptr_eq`] tells callers in O(1) that
//! nothing changed.
//!
//! Every mutation is described by a [`Patch`] whose payload carries the
//! "before" data needed to undo it; [`Patch::inverse`] never consults the
//! document.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::geom::Point;

/// Opaque identifier for a shape.
///
/// Freshly drawn shapes get a v4 UUID; documents loaded from storage keep
/// whatever non-empty string id they were saved with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(Arc<str>);

impl ShapeId {
    /// Mint a new, globally unique id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Arc::from(Uuid::new_v4().to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(raw: &str) -> Self {
        Self(Arc::from(raw))
    }
}

impl From<String> for ShapeId {
    fn from(raw: String) -> Self {
        Self(Arc::from(raw))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// An axis-aligned rectangle on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rect {
    pub id: ShapeId,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Always `>= 0`.
    pub width: f64,
    /// Always `>= 0`.
    pub height: f64,
}

impl Rect {
    /// Build the rectangle spanned by two opposite corners, in any orientation.
    #[must_use]
    pub fn from_corners(id: ShapeId, a: Point, b: Point) -> Self {
        Self { id, x: a.x.min(b.x), y: a.y.min(b.y), width: (b.x - a.x).abs(), height: (b.y - a.y).abs() }
    }

    /// Inclusive containment test against the rectangle's bounds.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// The same rectangle moved so its top-left corner sits at `(x, y)`.
    #[must_use]
    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..self.clone() }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Immutable snapshot of every shape and their back-to-front paint order.
///
/// `order` lists each id in `shapes` exactly once; the last entry is topmost.
/// Readers still skip ids with no shape rather than trusting that invariant.
#[derive(Debug, Clone, Default)]
pub struct Document {
    shapes: Arc<HashMap<ShapeId, Rect>>,
    order: Arc<Vec<ShapeId>>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a document from already-validated parts.
    #[must_use]
    pub fn from_parts(shapes: HashMap<ShapeId, Rect>, order: Vec<ShapeId>) -> Self {
        Self { shapes: Arc::new(shapes), order: Arc::new(order) }
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Rect> {
        self.shapes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Paint order, back to front.
    #[must_use]
    pub fn order(&self) -> &[ShapeId] {
        &self.order
    }

    /// Resolved shapes in paint order, skipping stale ids.
    pub fn ordered(&self) -> impl DoubleEndedIterator<Item = &Rect> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Every shape, ordered or not, in no particular order.
    pub fn shapes(&self) -> impl Iterator<Item = &Rect> {
        self.shapes.values()
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Whether both snapshots share the same underlying collections.
    ///
    /// `true` means "definitely unchanged"; `false` only means "possibly changed".
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shapes, &other.shapes) && Arc::ptr_eq(&self.order, &other.order)
    }

    fn with_added(&self, rects: &[Rect]) -> Self {
        if rects.is_empty() {
            return self.clone();
        }
        let mut shapes = (*self.shapes).clone();
        let mut order = (*self.order).clone();
        for rect in rects {
            shapes.insert(rect.id.clone(), rect.clone());
            order.push(rect.id.clone());
        }
        Self::from_parts(shapes, order)
    }

    fn with_replaced(&self, rect: &Rect) -> Self {
        let mut shapes = (*self.shapes).clone();
        shapes.insert(rect.id.clone(), rect.clone());
        Self { shapes: Arc::new(shapes), order: Arc::clone(&self.order) }
    }

    fn without(&self, rects: &[Rect]) -> Self {
        let doomed: HashSet<&ShapeId> = rects.iter().map(|r| &r.id).collect();

        let shapes = if doomed.iter().any(|id| self.shapes.contains_key(*id)) {
            let mut shapes = (*self.shapes).clone();
            shapes.retain(|id, _| !doomed.contains(id));
            Arc::new(shapes)
        } else {
            Arc::clone(&self.shapes)
        };

        let order = if self.order.iter().any(|id| doomed.contains(id)) {
            Arc::new(self.order.iter().filter(|id| !doomed.contains(id)).cloned().collect())
        } else {
            Arc::clone(&self.order)
        };

        Self { shapes, order }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.shapes == other.shapes && self.order == other.order)
    }
}

/// One atomic, self-inverting document mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Insert a shape on top of the paint order.
    AddRect { after: Rect },
    /// Delete a shape; `before` is what gets restored on undo.
    RemoveRect { before: Rect },
    /// Replace a shape in place without touching the paint order.
    UpdateRect { id: ShapeId, before: Rect, after: Rect },
    /// Insert several shapes on top, in the given order.
    AddRects { after: Vec<Rect> },
    /// Delete several shapes at once.
    RemoveRects { before: Vec<Rect> },
}

impl Patch {
    /// The patch that undoes `self`, derived purely from its own payload.
    #[must_use]
    pub fn inverse(&self) -> Patch {
        match self {
            Self::AddRect { after } => Self::RemoveRect { before: after.clone() },
            Self::RemoveRect { before } => Self::AddRect { after: before.clone() },
            Self::UpdateRect { id, before, after } => {
                Self::UpdateRect { id: id.clone(), before: after.clone(), after: before.clone() }
            }
            Self::AddRects { after } => Self::RemoveRects { before: after.clone() },
            Self::RemoveRects { before } => Self::AddRects { after: before.clone() },
        }
    }

    /// Stable name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddRect { .. } => "add_rect",
            Self::RemoveRect { .. } => "remove_rect",
            Self::UpdateRect { .. } => "update_rect",
            Self::AddRects { .. } => "add_rects",
            Self::RemoveRects { .. } => "remove_rects",
        }
    }
}

/// Apply `patch` to `doc`, returning the next snapshot.
///
/// Total: there is no error channel. `AddRect` does not deduplicate `order`,
/// `UpdateRect` inserts when the id is absent, and removing an absent id
/// returns a snapshot sharing both collections with `doc`.
#[must_use]
pub fn apply_patch(doc: &Document, patch: &Patch) -> Document {
    match patch {
        Patch::AddRect { after } => doc.with_added(std::slice::from_ref(after)),
        Patch::AddRects { after } => doc.with_added(after),
        Patch::UpdateRect { after, .. } => doc.with_replaced(after),
        Patch::RemoveRect { before } => doc.without(std::slice::from_ref(before)),
        Patch::RemoveRects { before } => doc.without(before),
    }
}
