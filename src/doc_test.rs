#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect { id: ShapeId::from(id), x, y, width: w, height: h }
}

fn doc_of(rects: &[Rect]) -> Document {
    rects.iter().fold(Document::new(), |doc, r| apply_patch(&doc, &Patch::AddRect { after: r.clone() }))
}

fn ids(doc: &Document) -> Vec<&str> {
    doc.order().iter().map(ShapeId::as_str).collect()
}

// =============================================================
// ShapeId
// =============================================================

#[test]
fn generated_ids_are_unique() {
    assert_ne!(ShapeId::generate(), ShapeId::generate());
}

#[test]
fn shape_id_serializes_as_plain_string() {
    let json = serde_json::to_string(&ShapeId::from("shape-1")).unwrap();
    assert_eq!(json, "\"shape-1\"");
}

#[test]
fn shape_id_display_matches_raw() {
    assert_eq!(ShapeId::from("abc").to_string(), "abc");
}

// =============================================================
// Rect
// =============================================================

#[test]
fn from_corners_normalises_any_drag_direction() {
    let id = ShapeId::from("r");
    let forward = Rect::from_corners(id.clone(), Point::new(10.0, 10.0), Point::new(20.0, 30.0));
    let backward = Rect::from_corners(id, Point::new(20.0, 30.0), Point::new(10.0, 10.0));
    assert_eq!(forward, backward);
    assert_eq!((forward.x, forward.y, forward.width, forward.height), (10.0, 10.0, 10.0, 20.0));
}

#[test]
fn contains_is_inclusive_on_all_edges() {
    let r = rect("r", 0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(10.0, 0.0)));
    assert!(!r.contains(Point::new(10.01, 5.0)));
    assert!(!r.contains(Point::new(5.0, -0.01)));
}

#[test]
fn zero_size_rect_contains_its_origin() {
    let r = rect("r", 4.0, 4.0, 0.0, 0.0);
    assert!(r.contains(Point::new(4.0, 4.0)));
}

#[test]
fn moved_to_keeps_id_and_size() {
    let r = rect("r", 1.0, 2.0, 3.0, 4.0).moved_to(10.0, 20.0);
    assert_eq!(r, rect("r", 10.0, 20.0, 3.0, 4.0));
}

// =============================================================
// apply_patch: AddRect
// =============================================================

#[test]
fn add_inserts_and_appends_to_order() {
    let doc = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0), rect("b", 0.0, 0.0, 1.0, 1.0)]);
    assert_eq!(doc.len(), 2);
    assert_eq!(ids(&doc), vec!["a", "b"]);
}

#[test]
fn add_does_not_mutate_previous_snapshot() {
    let before = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    let after = apply_patch(&before, &Patch::AddRect { after: rect("b", 0.0, 0.0, 1.0, 1.0) });
    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 2);
}

#[test]
fn add_existing_id_overwrites_shape_but_duplicates_order() {
    let doc = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    let doc = apply_patch(&doc, &Patch::AddRect { after: rect("a", 5.0, 5.0, 1.0, 1.0) });
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get(&ShapeId::from("a")).map(|r| r.x), Some(5.0));
    assert_eq!(ids(&doc), vec!["a", "a"]);
}

// =============================================================
// apply_patch: UpdateRect
// =============================================================

#[test]
fn update_replaces_shape_and_shares_order() {
    let doc = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0), rect("b", 0.0, 0.0, 1.0, 1.0)]);
    let patch = Patch::UpdateRect {
        id: ShapeId::from("a"),
        before: rect("a", 0.0, 0.0, 1.0, 1.0),
        after: rect("a", 9.0, 9.0, 1.0, 1.0),
    };
    let next = apply_patch(&doc, &patch);
    assert_eq!(next.get(&ShapeId::from("a")).map(Rect::origin), Some(Point::new(9.0, 9.0)));
    assert_eq!(ids(&next), vec!["a", "b"]);
    assert!(Arc::ptr_eq(&doc.order, &next.order));
}

#[test]
fn update_of_absent_id_inserts_without_ordering() {
    let patch = Patch::UpdateRect {
        id: ShapeId::from("ghost"),
        before: rect("ghost", 0.0, 0.0, 1.0, 1.0),
        after: rect("ghost", 1.0, 1.0, 1.0, 1.0),
    };
    let next = apply_patch(&Document::new(), &patch);
    assert!(next.contains(&ShapeId::from("ghost")));
    assert!(next.order().is_empty());
}

// =============================================================
// apply_patch: RemoveRect
// =============================================================

#[test]
fn remove_deletes_shape_and_filters_order() {
    let a = rect("a", 0.0, 0.0, 1.0, 1.0);
    let doc = doc_of(&[a.clone(), rect("b", 0.0, 0.0, 1.0, 1.0)]);
    let next = apply_patch(&doc, &Patch::RemoveRect { before: a });
    assert!(!next.contains(&ShapeId::from("a")));
    assert_eq!(ids(&next), vec!["b"]);
}

#[test]
fn remove_absent_id_shares_both_collections() {
    let doc = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    let next = apply_patch(&doc, &Patch::RemoveRect { before: rect("zzz", 0.0, 0.0, 1.0, 1.0) });
    assert!(next.ptr_eq(&doc));
}

// =============================================================
// apply_patch: bulk variants
// =============================================================

#[test]
fn add_rects_appends_in_given_order() {
    let patch = Patch::AddRects { after: vec![rect("x", 0.0, 0.0, 1.0, 1.0), rect("y", 0.0, 0.0, 1.0, 1.0)] };
    let next = apply_patch(&doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]), &patch);
    assert_eq!(ids(&next), vec!["a", "x", "y"]);
}

#[test]
fn add_rects_empty_is_a_shared_noop() {
    let doc = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    assert!(apply_patch(&doc, &Patch::AddRects { after: Vec::new() }).ptr_eq(&doc));
}

#[test]
fn remove_rects_filters_all_in_one_pass() {
    let a = rect("a", 0.0, 0.0, 1.0, 1.0);
    let c = rect("c", 0.0, 0.0, 1.0, 1.0);
    let doc = doc_of(&[a.clone(), rect("b", 0.0, 0.0, 1.0, 1.0), c.clone()]);
    let next = apply_patch(&doc, &Patch::RemoveRects { before: vec![a, c] });
    assert_eq!(ids(&next), vec!["b"]);
    assert_eq!(next.len(), 1);
}

// =============================================================
// Readers
// =============================================================

#[test]
fn ordered_skips_stale_ids() {
    let mut shapes = HashMap::new();
    shapes.insert(ShapeId::from("a"), rect("a", 0.0, 0.0, 1.0, 1.0));
    let doc = Document::from_parts(shapes, vec![ShapeId::from("stale"), ShapeId::from("a")]);
    let seen: Vec<&str> = doc.ordered().map(|r| r.id.as_str()).collect();
    assert_eq!(seen, vec!["a"]);
}

#[test]
fn equality_is_structural() {
    let a = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    let b = doc_of(&[rect("a", 0.0, 0.0, 1.0, 1.0)]);
    assert!(!a.ptr_eq(&b));
    assert_eq!(a, b);
}

// =============================================================
// Patch::inverse
// =============================================================

#[test]
fn inverse_of_add_is_remove() {
    let r = rect("a", 0.0, 0.0, 1.0, 1.0);
    assert_eq!(Patch::AddRect { after: r.clone() }.inverse(), Patch::RemoveRect { before: r });
}

#[test]
fn inverse_of_update_swaps_payloads() {
    let before = rect("a", 0.0, 0.0, 1.0, 1.0);
    let after = rect("a", 2.0, 2.0, 1.0, 1.0);
    let patch = Patch::UpdateRect { id: ShapeId::from("a"), before: before.clone(), after: after.clone() };
    assert_eq!(patch.inverse(), Patch::UpdateRect { id: ShapeId::from("a"), before: after, after: before });
}

#[test]
fn inverse_is_an_involution() {
    let patch = Patch::RemoveRects { before: vec![rect("a", 0.0, 0.0, 1.0, 1.0)] };
    assert_eq!(patch.inverse().inverse(), patch);
}

// =============================================================
// Round-trip properties
// =============================================================

fn arb_rects() -> impl Strategy<Value = Vec<Rect>> {
    prop::collection::vec((-500.0..500.0f64, -500.0..500.0f64, 0.0..200.0f64, 0.0..200.0f64), 0..12).prop_map(|dims| {
        dims.into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| rect(&format!("s{i}"), x, y, w, h))
            .collect()
    })
}

proptest! {
    #[test]
    fn add_then_inverse_restores(rects in arb_rects(), x in -100.0..100.0f64, y in -100.0..100.0f64) {
        let doc = doc_of(&rects);
        let patch = Patch::AddRect { after: rect("fresh", x, y, 5.0, 5.0) };
        let round = apply_patch(&apply_patch(&doc, &patch), &patch.inverse());
        prop_assert_eq!(round, doc);
    }

    #[test]
    fn update_then_inverse_restores(rects in arb_rects(), pick in any::<prop::sample::Index>(), dx in -50.0..50.0f64) {
        prop_assume!(!rects.is_empty());
        let doc = doc_of(&rects);
        let before = pick.get(&rects).clone();
        let after = before.moved_to(before.x + dx, before.y - dx);
        let patch = Patch::UpdateRect { id: before.id.clone(), before, after };
        let round = apply_patch(&apply_patch(&doc, &patch), &patch.inverse());
        prop_assert_eq!(round, doc);
    }

    #[test]
    fn remove_topmost_then_inverse_restores(rects in arb_rects()) {
        prop_assume!(!rects.is_empty());
        let doc = doc_of(&rects);
        let top = rects[rects.len() - 1].clone();
        let patch = Patch::RemoveRect { before: top };
        let round = apply_patch(&apply_patch(&doc, &patch), &patch.inverse());
        prop_assert_eq!(round, doc);
    }

    #[test]
    fn bulk_add_then_inverse_restores(base in arb_rects(), extra in 0usize..8) {
        let doc = doc_of(&base);
        let added: Vec<Rect> = (0..extra).map(|i| rect(&format!("n{i}"), 0.0, 0.0, 1.0, 1.0)).collect();
        let patch = Patch::AddRects { after: added };
        let round = apply_patch(&apply_patch(&doc, &patch), &patch.inverse());
        prop_assert_eq!(round, doc);
    }
}
