//! Rendering: draws the editor scene onto a host-provided [`Surface`].
//!
//! This module receives a read-only view of the editor state and issues draw
//! calls. It never mutates anything. Layers, bottom to top: shapes in paint
//! order, hover outline, selection outline, drawing preview.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{HOVER_STROKE, OUTLINE_WIDTH, PREVIEW_DASH, PREVIEW_STROKE, SELECTION_STROKE, SHAPE_FILL};
use crate::doc::{Document, Rect, ShapeId};
use crate::engine::EditorState;
use crate::input::Mode;

/// Stroke style for outline calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    /// On/off dash lengths; `None` draws a solid line.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    #[must_use]
    pub fn solid(color: &'static str) -> Self {
        Self { color, width: OUTLINE_WIDTH, dash: None }
    }

    #[must_use]
    pub fn dashed(color: &'static str) -> Self {
        Self { color, width: OUTLINE_WIDTH, dash: Some(PREVIEW_DASH) }
    }
}

/// A 2D drawing backend.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: &Stroke);
}

/// Draw the full scene.
pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &EditorState) {
    let doc = state.store.doc();
    let session = &state.session;

    // Layer 1: clear.
    surface.clear();

    // Layer 2: shapes, back to front. A shape being dragged is drawn where it would land.
    for rect in doc.ordered() {
        let r = live_position(rect, &session.mode);
        surface.fill_rect(r.x, r.y, r.width, r.height, SHAPE_FILL);
    }

    // Layer 3: hover.
    if let Some(r) = resolve(doc, session.hover.id(), &session.mode) {
        surface.stroke_rect(r.x, r.y, r.width, r.height, &Stroke::solid(HOVER_STROKE));
    }

    // Layer 4: selection.
    if let Some(r) = resolve(doc, session.selection.id(), &session.mode) {
        surface.stroke_rect(r.x, r.y, r.width, r.height, &Stroke::solid(SELECTION_STROKE));
    }

    // Layer 5: in-progress rectangle.
    if let Mode::DrawingRect { origin, current, .. } = &session.mode {
        let r = Rect::from_corners(ShapeId::from("preview"), *origin, *current);
        surface.stroke_rect(r.x, r.y, r.width, r.height, &Stroke::dashed(PREVIEW_STROKE));
    }
}

fn resolve(doc: &Document, id: Option<&ShapeId>, mode: &Mode) -> Option<Rect> {
    doc.get(id?).map(|rect| live_position(rect, mode))
}

/// Where `rect` should be drawn given the current gesture.
fn live_position(rect: &Rect, mode: &Mode) -> Rect {
    match mode {
        Mode::DraggingSelection { shape_id, start_pointer, current_pointer, start_rect, .. } if *shape_id == rect.id => {
            let d = start_pointer.delta_to(*current_pointer);
            rect.moved_to(start_rect.x + d.dx, start_rect.y + d.dy)
        }
        _ => rect.clone(),
    }
}
