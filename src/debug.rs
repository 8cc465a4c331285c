//! Frame metrics and the bounded developer log.
//!
//! The recorder is fed by [`crate::engine::EngineCore`] as frames run. It never
//! influences editor behavior; hosts read it through [`DebugRecorder::snapshot`]
//! for an overlay or a replay summary.

#[cfg(test)]
#[path = "debug_test.rs"]
mod debug_test;

use std::collections::VecDeque;

use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use tracing::debug;

use crate::consts::FRAME_MS_EMA_ALPHA;
use crate::doc::Patch;
use crate::engine::EditorState;
use crate::frame::Coalesced;
use crate::history::{DocAction, HistoryInfo};
use crate::interaction::PerfEvent;

/// Rolling numbers for the most recent frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub frame_ms_last: Option<f64>,
    pub frame_ms_avg: Option<f64>,
    pub last_render_ms: Option<f64>,
    pub queue_length: usize,
    pub moves_dropped: usize,
    pub shape_count: usize,
    pub hit_tests_this_frame: usize,
}

/// Dev-log entry names. Serialized as their [`DevLogName::as_str`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevLogName {
    ModeChanged,
    HoverChanged,
    SelectionChanged,
    Commit,
    Undo,
    Redo,
    RectAdded,
    RectRemoved,
    RectUpdated,
    RectsAdded,
    RectsRemoved,
}

impl DevLogName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModeChanged => "session/mode_changed",
            Self::HoverChanged => "session/hover_changed",
            Self::SelectionChanged => "session/selection_changed",
            Self::Commit => "history/commit",
            Self::Undo => "history/undo",
            Self::Redo => "history/redo",
            Self::RectAdded => "doc/rect_added",
            Self::RectRemoved => "doc/rect_removed",
            Self::RectUpdated => "doc/rect_updated",
            Self::RectsAdded => "doc/rects_added",
            Self::RectsRemoved => "doc/rects_removed",
        }
    }
}

impl Serialize for DevLogName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevLogEvent {
    /// Host clock in milliseconds.
    pub ts: f64,
    pub name: DevLogName,
    pub data: Value,
}

/// Everything an overlay needs in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub metrics: Metrics,
    pub history: HistoryInfo,
    pub dev_log: Vec<DevLogEvent>,
}

#[derive(Debug)]
pub struct DebugRecorder {
    capacity: usize,
    metrics: Metrics,
    dev_log: VecDeque<DevLogEvent>,
}

impl DebugRecorder {
    /// A recorder that keeps at most `capacity` dev-log entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity, metrics: Metrics::default(), dev_log: VecDeque::with_capacity(capacity) }
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn dev_log(&self) -> impl ExactSizeIterator<Item = &DevLogEvent> {
        self.dev_log.iter()
    }

    // --- Frame metrics ---

    pub fn begin_frame(&mut self) {
        self.metrics.hit_tests_this_frame = 0;
    }

    pub fn record_move_coalesce(&mut self, coalesced: &Coalesced) {
        self.metrics.queue_length = coalesced.queue_length;
        self.metrics.moves_dropped = coalesced.moves_dropped;
    }

    pub fn record_perf(&mut self, perf: &[PerfEvent]) {
        let hits = perf.iter().filter(|p| matches!(p, PerfEvent::HitTest)).count();
        self.metrics.hit_tests_this_frame += hits;
    }

    pub fn record_render(&mut self, ms: f64) {
        self.metrics.last_render_ms = Some(ms);
    }

    /// Close out a frame that took `frame_ms`; folds it into the moving average.
    pub fn end_frame(&mut self, frame_ms: f64) {
        self.metrics.frame_ms_last = Some(frame_ms);
        self.metrics.frame_ms_avg = Some(match self.metrics.frame_ms_avg {
            None => frame_ms,
            Some(avg) => avg + FRAME_MS_EMA_ALPHA * (frame_ms - avg),
        });
    }

    // --- Dev log ---

    /// Log what changed between two editor states as a result of `actions`.
    pub fn record_transition(&mut self, ts: f64, prev: &EditorState, next: &EditorState, actions: &[DocAction]) {
        let (before, after) = (&prev.session, &next.session);
        if before.mode.kind() != after.mode.kind() {
            self.push(ts, DevLogName::ModeChanged, json!({ "from": before.mode.kind(), "to": after.mode.kind() }));
        }
        if before.hover != after.hover {
            self.push(ts, DevLogName::HoverChanged, json!({ "hover": after.hover }));
        }
        if before.selection != after.selection {
            self.push(ts, DevLogName::SelectionChanged, json!({ "selection": after.selection }));
        }

        let prev_info = prev.store.info();
        for action in actions {
            match action {
                DocAction::Commit(patch) => {
                    self.push(ts, DevLogName::Commit, json!({ "kind": patch.kind() }));
                    self.record_patch(ts, patch);
                }
                DocAction::Undo if prev_info.can_undo => {
                    self.push(ts, DevLogName::Undo, json!({ "depth": next.store.info().depth }));
                }
                DocAction::Redo if prev_info.can_redo => {
                    self.push(ts, DevLogName::Redo, json!({ "depth": next.store.info().depth }));
                }
                DocAction::Undo | DocAction::Redo => {}
            }
        }

        self.metrics.shape_count = next.store.doc().len();
    }

    fn record_patch(&mut self, ts: f64, patch: &Patch) {
        match patch {
            Patch::AddRect { after } => self.push(
                ts,
                DevLogName::RectAdded,
                json!({ "id": after.id, "x": after.x, "y": after.y, "width": after.width, "height": after.height }),
            ),
            Patch::RemoveRect { before } => self.push(ts, DevLogName::RectRemoved, json!({ "id": before.id })),
            Patch::UpdateRect { id, before, after } => self.push(
                ts,
                DevLogName::RectUpdated,
                json!({ "id": id, "from": before.origin(), "to": after.origin() }),
            ),
            Patch::AddRects { after } => self.push(ts, DevLogName::RectsAdded, json!({ "count": after.len() })),
            Patch::RemoveRects { before } => self.push(ts, DevLogName::RectsRemoved, json!({ "count": before.len() })),
        }
    }

    fn push(&mut self, ts: f64, name: DevLogName, data: Value) {
        debug!(name = name.as_str(), %data, "dev log");
        if self.capacity == 0 {
            return;
        }
        while self.dev_log.len() >= self.capacity {
            self.dev_log.pop_front();
        }
        self.dev_log.push_back(DevLogEvent { ts, name, data });
    }

    #[must_use]
    pub fn snapshot(&self, state: &EditorState) -> DebugSnapshot {
        let metrics = Metrics { shape_count: state.store.doc().len(), ..self.metrics.clone() };
        DebugSnapshot { metrics, history: state.store.info(), dev_log: self.dev_log.iter().cloned().collect() }
    }
}
