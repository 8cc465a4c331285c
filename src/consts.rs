//! Shared numeric constants for the editor core.

// ── Interaction ─────────────────────────────────────────────────

/// Pointer travel, per axis and in surface units, that turns a press into a drag.
///
/// The comparison is strict: a sample exactly this far from the origin is still a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

// ── Spawn command ───────────────────────────────────────────────

/// Left edge of the region random shapes are spawned into.
pub const SPAWN_MIN_X: f64 = 50.0;
/// Horizontal extent of the spawn region.
pub const SPAWN_SPAN_X: f64 = 800.0;
/// Top edge of the region random shapes are spawned into.
pub const SPAWN_MIN_Y: f64 = 50.0;
/// Vertical extent of the spawn region.
pub const SPAWN_SPAN_Y: f64 = 500.0;
/// Smallest width/height of a spawned shape.
pub const SPAWN_MIN_SIZE: f64 = 10.0;
/// Range added on top of [`SPAWN_MIN_SIZE`].
pub const SPAWN_SPAN_SIZE: f64 = 60.0;
/// Most shapes one spawn command creates; larger requests are clamped.
pub const MAX_SPAWN_COUNT: usize = 10_000;

// ── Debug ───────────────────────────────────────────────────────

/// Default number of dev-log entries retained before the oldest are dropped.
pub const DEFAULT_DEVLOG_CAPACITY: usize = 200;

/// Smoothing factor for the frame-time moving average.
pub const FRAME_MS_EMA_ALPHA: f64 = 0.1;

// ── Rendering ───────────────────────────────────────────────────

/// Dash pattern (on, off) for the in-progress rectangle preview.
pub const PREVIEW_DASH: [f64; 2] = [6.0, 4.0];

/// Fill color for committed shapes.
pub const SHAPE_FILL: &str = "#D94B4B";

/// Stroke color for the drawing preview.
pub const PREVIEW_STROKE: &str = "#1F1A17";

/// Outline color for the hovered shape.
pub const HOVER_STROKE: &str = "#8A8A8A";

/// Outline color for the selected shape.
pub const SELECTION_STROKE: &str = "#1E6FD9";

/// Outline width in surface units.
pub const OUTLINE_WIDTH: f64 = 2.0;

// ── Persistence ─────────────────────────────────────────────────

/// The only document format version this crate reads and writes.
pub const DOCUMENT_VERSION: u64 = 1;
