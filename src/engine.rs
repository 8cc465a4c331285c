use tracing::{debug, trace};

use crate::config::EditorConfig;
use crate::consts::DEFAULT_DEVLOG_CAPACITY;
use crate::debug::{DebugRecorder, DebugSnapshot};
use crate::doc::Document;
use crate::frame::{FrameDriver, coalesce_move_events};
use crate::history::{DocAction, DocStore, HistoryInfo};
use crate::input::{EditorEvent, Session};
use crate::interaction::{PerfEvent, on_event};
use crate::render::{Surface, render};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Document with its history, plus the transient session.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub store: DocStore,
    pub session: Session,
}

impl EditorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh editor over `doc` with empty history.
    #[must_use]
    pub fn from_document(doc: Document) -> Self {
        Self { store: DocStore::from_document(doc), session: Session::default() }
    }
}

/// Result of reducing one event.
#[derive(Debug, Clone)]
pub struct Step {
    pub next: EditorState,
    pub actions: Vec<DocAction>,
    pub perf: Vec<PerfEvent>,
}

/// Reduce one event: run the state machine, then route its actions through history.
///
/// Pure. `prev` is untouched and shares every unchanged collection with `next`.
#[must_use]
pub fn reduce(prev: &EditorState, event: &EditorEvent) -> Step {
    let out = on_event(prev.store.doc(), &prev.session, event);
    let store = out.actions.iter().fold(prev.store.clone(), |store, action| store.apply(action));
    Step { next: EditorState { store, session: out.session }, actions: out.actions, perf: out.perf }
}

/// Summary of one [`EngineCore::process_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Queued events reduced this frame, after coalescing. The closing tick is not counted.
    pub events_processed: usize,
    pub moves_dropped: usize,
    pub hit_tests: usize,
    /// Whether the document snapshot at the end of the frame differs from the one at the start.
    pub doc_changed: bool,
}

/// Stateful wrapper a host drives: queue events, run frames, render.
///
/// All editor logic lives in [`reduce`]; this type only owns the current
/// state, the pending queue, and the debug recorder.
#[derive(Debug)]
pub struct EngineCore {
    state: EditorState,
    driver: FrameDriver,
    recorder: DebugRecorder,
    last_now: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            state: EditorState::default(),
            driver: FrameDriver::new(),
            recorder: DebugRecorder::new(DEFAULT_DEVLOG_CAPACITY),
            last_now: 0.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &EditorConfig) -> Self {
        Self { recorder: DebugRecorder::new(config.devlog_capacity), ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the document with a loaded one. History and session are reset.
    pub fn hydrate(&mut self, doc: Document) {
        debug!(shapes = doc.len(), "hydrated document");
        self.state = EditorState::from_document(doc);
    }

    /// Queue an event for the next frame. Returns `true` when the host should schedule one.
    pub fn enqueue(&mut self, event: EditorEvent) -> bool {
        self.driver.enqueue(event)
    }

    /// Reduce one event immediately, bypassing the frame queue.
    pub fn dispatch(&mut self, event: &EditorEvent) -> Vec<DocAction> {
        if let EditorEvent::FrameTick { now } = event {
            self.last_now = *now;
        }
        self.step(self.last_now, event)
    }

    /// Run one frame: drain the queue, coalesce moves, reduce everything, then tick.
    pub fn process_frame(&mut self, now: f64) -> FrameReport {
        self.last_now = now;
        self.recorder.begin_frame();

        let coalesced = coalesce_move_events(self.driver.take_batch());
        self.recorder.record_move_coalesce(&coalesced);

        let doc_before = self.state.store.doc().clone();
        for event in &coalesced.events {
            self.step(now, event);
        }
        self.step(now, &EditorEvent::FrameTick { now });

        let report = FrameReport {
            events_processed: coalesced.events.len(),
            moves_dropped: coalesced.moves_dropped,
            hit_tests: self.recorder.metrics().hit_tests_this_frame,
            doc_changed: !doc_before.ptr_eq(self.state.store.doc()),
        };
        trace!(
            events = report.events_processed,
            dropped = report.moves_dropped,
            hit_tests = report.hit_tests,
            doc_changed = report.doc_changed,
            "frame processed"
        );
        report
    }

    /// Record how long the host spent on the frame just finished.
    pub fn end_frame(&mut self, frame_ms: f64) {
        self.recorder.end_frame(frame_ms);
    }

    pub fn record_render(&mut self, ms: f64) {
        self.recorder.record_render(ms);
    }

    fn step(&mut self, ts: f64, event: &EditorEvent) -> Vec<DocAction> {
        let step = reduce(&self.state, event);
        trace!(event = event.name(), mode = step.next.session.mode.kind(), actions = step.actions.len(), "event reduced");
        self.recorder.record_perf(&step.perf);
        self.recorder.record_transition(ts, &self.state, &step.next, &step.actions);
        self.state = step.next;
        step.actions
    }

    // --- Render ---

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        render(surface, &self.state);
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.state.store.doc()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.state.session
    }

    #[must_use]
    pub fn history_info(&self) -> HistoryInfo {
        self.state.store.info()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.driver.pending()
    }

    #[must_use]
    pub fn is_frame_scheduled(&self) -> bool {
        self.driver.is_frame_scheduled()
    }

    #[must_use]
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        self.recorder.snapshot(&self.state)
    }
}
