//! Persisted document format (version 1) and its validating parser.
//!
//! ```json
//! { "version": 1, "shapes": [{ "id": "a", "x": 0, "y": 0, "width": 10, "height": 10 }], "shapeOrder": ["a"] }
//! ```
//!
//! Parsing is strict about shapes and lenient about order: a malformed shape
//! rejects the whole document, while a `shapeOrder` that is merely out of sync
//! with `shapes` is repaired and reported as warnings.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::consts::DOCUMENT_VERSION;
use crate::doc::{Document, Rect, ShapeId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedRectV1 {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDocumentV1 {
    pub version: u64,
    pub shapes: Vec<PersistedRectV1>,
    pub shape_order: Vec<String>,
}

/// One structural problem, located by a JSON-path-like string (`shapes[2].width`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, message: &str) -> Self {
        Self { path: path.into(), message: message.to_owned() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() { write!(f, "{}", self.message) } else { write!(f, "{}: {}", self.path, self.message) }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid document ({} error(s)): {}", .0.len(), first_error(.0))]
pub struct ParseError(pub Vec<ValidationError>);

fn first_error(errors: &[ValidationError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// A validated document plus any repairs made to its order.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub doc: EditorDocumentV1,
    pub warnings: Vec<String>,
}

// =============================================================================
// PARSE
// =============================================================================

/// Validate untrusted JSON as a version-1 document.
///
/// # Errors
///
/// Returns every shape-level problem found, or the first header problem
/// (non-object root, wrong version, `shapes`/`shapeOrder` not arrays).
pub fn parse_document(raw: &Value) -> Result<Parsed, ParseError> {
    let (shapes_raw, order_raw) = parse_header(raw)?;
    let (shapes, ids) = parse_shapes(shapes_raw)?;
    let (shape_order, warnings) = normalise_order(order_raw, &shapes, &ids)?;
    Ok(Parsed { doc: EditorDocumentV1 { version: DOCUMENT_VERSION, shapes, shape_order }, warnings })
}

fn fail(path: &str, message: &str) -> ParseError {
    ParseError(vec![ValidationError::new(path, message)])
}

/// JSON numbers compare by value, so `1` and `1.0` both qualify.
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
fn is_supported_version(raw: Option<&Value>) -> bool {
    raw.and_then(Value::as_f64).is_some_and(|v| v == DOCUMENT_VERSION as f64)
}

fn parse_header(raw: &Value) -> Result<(&[Value], &[Value]), ParseError> {
    let Some(root) = raw.as_object() else {
        return Err(fail("", "Expected an object at root"));
    };
    if !is_supported_version(root.get("version")) {
        return Err(fail("version", "Expected version === 1"));
    }
    let Some(shapes) = root.get("shapes").and_then(Value::as_array) else {
        return Err(fail("shapes", "Expected shapes to be an array"));
    };
    let Some(order) = root.get("shapeOrder").and_then(Value::as_array) else {
        return Err(fail("shapeOrder", "Expected shapeOrder to be an array"));
    };
    Ok((shapes, order))
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn finite(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn parse_shapes(raw: &[Value]) -> Result<(Vec<PersistedRectV1>, HashSet<String>), ParseError> {
    let mut errors = Vec::new();
    let mut shapes = Vec::with_capacity(raw.len());
    let mut ids = HashSet::with_capacity(raw.len());

    for (i, value) in raw.iter().enumerate() {
        let base = format!("shapes[{i}]");
        let Some(obj) = value.as_object() else {
            errors.push(ValidationError::new(base, "Expected shape to be an object"));
            continue;
        };

        let Some(shape) = parse_shape(obj, &base, &mut errors) else {
            continue;
        };
        if !ids.insert(shape.id.clone()) {
            errors.push(ValidationError::new(format!("{base}.id"), "Duplicate shape id"));
            continue;
        }
        shapes.push(shape);
    }

    if errors.is_empty() { Ok((shapes, ids)) } else { Err(ParseError(errors)) }
}

/// Check every field of one shape, recording each problem. `None` if any failed.
fn parse_shape(obj: &Map<String, Value>, base: &str, errors: &mut Vec<ValidationError>) -> Option<PersistedRectV1> {
    let id = non_empty_str(obj.get("id"));
    let x = finite(obj.get("x"));
    let y = finite(obj.get("y"));
    let width = finite(obj.get("width")).filter(|w| *w >= 0.0);
    let height = finite(obj.get("height")).filter(|h| *h >= 0.0);

    if id.is_none() {
        errors.push(ValidationError::new(format!("{base}.id"), "Expected non-empty string id"));
    }
    if x.is_none() {
        errors.push(ValidationError::new(format!("{base}.x"), "Expected finite number"));
    }
    if y.is_none() {
        errors.push(ValidationError::new(format!("{base}.y"), "Expected finite number"));
    }
    if width.is_none() {
        errors.push(ValidationError::new(format!("{base}.width"), "Expected finite number >= 0"));
    }
    if height.is_none() {
        errors.push(ValidationError::new(format!("{base}.height"), "Expected finite number >= 0"));
    }

    Some(PersistedRectV1 { id: id?.to_owned(), x: x?, y: y?, width: width?, height: height? })
}

/// Reconcile `shapeOrder` against the parsed shapes.
///
/// Non-string entries are errors. Duplicates and unknown ids are dropped, and
/// shapes missing from the order are appended in `shapes` order.
fn normalise_order(
    raw: &[Value],
    shapes: &[PersistedRectV1],
    ids: &HashSet<String>,
) -> Result<(Vec<String>, Vec<String>), ParseError> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.len());
    let mut order = Vec::with_capacity(shapes.len());

    for (i, value) in raw.iter().enumerate() {
        let Some(id) = non_empty_str(Some(value)) else {
            errors.push(ValidationError::new(format!("shapeOrder[{i}]"), "Expected non-empty string id"));
            continue;
        };
        if !seen.insert(id) {
            warnings.push(format!("Deduped duplicate id in shapeOrder: \"{id}\""));
            continue;
        }
        if !ids.contains(id) {
            warnings.push(format!("Dropped unknown id from shapeOrder: \"{id}\""));
            continue;
        }
        order.push(id.to_owned());
    }

    if !errors.is_empty() {
        return Err(ParseError(errors));
    }

    if order.len() != ids.len() {
        order.extend(shapes.iter().filter(|s| !seen.contains(s.id.as_str())).map(|s| s.id.clone()));
        warnings.push("shapeOrder was missing ids; appended missing shapes to the end".to_owned());
    }

    Ok((order, warnings))
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Snapshot a document into the persisted shape.
///
/// Shapes are written once each in paint order, followed by any shape missing
/// from the order (sorted by id). `shapeOrder` is written as is, so loading
/// appends those extras back on top.
#[must_use]
pub fn to_persisted(doc: &Document) -> EditorDocumentV1 {
    let mut seen: HashSet<&ShapeId> = HashSet::with_capacity(doc.len());
    let mut rects: Vec<&Rect> = doc.ordered().filter(|r| seen.insert(&r.id)).collect();
    let mut unordered: Vec<&Rect> = doc.shapes().filter(|r| !seen.contains(&r.id)).collect();
    unordered.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    rects.extend(unordered);

    let shapes = rects
        .into_iter()
        .map(|r| PersistedRectV1 { id: r.id.as_str().to_owned(), x: r.x, y: r.y, width: r.width, height: r.height })
        .collect();
    let shape_order = doc.order().iter().map(|id| id.as_str().to_owned()).collect();
    EditorDocumentV1 { version: DOCUMENT_VERSION, shapes, shape_order }
}

/// Build a document from a validated persisted one.
#[must_use]
pub fn from_persisted(persisted: &EditorDocumentV1) -> Document {
    let shapes: HashMap<ShapeId, Rect> = persisted
        .shapes
        .iter()
        .map(|s| {
            let id = ShapeId::from(s.id.as_str());
            (id.clone(), Rect { id, x: s.x, y: s.y, width: s.width, height: s.height })
        })
        .collect();
    let order = persisted.shape_order.iter().map(|id| ShapeId::from(id.as_str())).collect();
    Document::from_parts(shapes, order)
}
