#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Document, ShapeId};
use crate::geom::Point;

/// Return the topmost shape whose bounds contain `pt`, if any.
///
/// Walks the paint order from the top down. Ids in the order with no backing
/// shape are skipped. O(n) in the number of shapes, which is why the
/// interaction layer only calls this once per pointer-down and once per idle tick.
#[must_use]
pub fn hit_test(doc: &Document, pt: Point) -> Option<ShapeId> {
    doc.order()
        .iter()
        .rev()
        .find(|id| doc.get(id).is_some_and(|rect| rect.contains(pt)))
        .cloned()
}
