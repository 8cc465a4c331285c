//! Per-frame event batching.
//!
//! Hosts push raw events as they arrive; once per frame the engine drains the
//! queue, collapses redundant pointer moves, and feeds what is left through
//! the state machine before a single closing `FrameTick`.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use std::collections::HashSet;

use crate::input::{EditorEvent, PointerId};

/// Output of [`coalesce_move_events`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coalesced {
    pub events: Vec<EditorEvent>,
    pub moves_dropped: usize,
    pub moves_kept: usize,
    /// Length of the batch before coalescing.
    pub queue_length: usize,
}

/// Keep only the last move in each run of moves from the same pointer.
///
/// A run ends at any other event from that pointer (down, up, cancel) or at a
/// `FrameTick`. Everything that survives keeps its arrival order.
#[must_use]
pub fn coalesce_move_events(events: Vec<EditorEvent>) -> Coalesced {
    let queue_length = events.len();
    let mut superseded: HashSet<PointerId> = HashSet::new();
    let mut kept = Vec::with_capacity(queue_length);
    let mut moves_dropped = 0;
    let mut moves_kept = 0;

    for event in events.into_iter().rev() {
        match &event {
            EditorEvent::PointerMove(input) => {
                if !superseded.insert(input.pointer_id) {
                    moves_dropped += 1;
                    continue;
                }
                moves_kept += 1;
            }
            EditorEvent::PointerDown(input) | EditorEvent::PointerUp(input) | EditorEvent::PointerCancel(input) => {
                superseded.remove(&input.pointer_id);
            }
            EditorEvent::FrameTick { .. } => superseded.clear(),
            EditorEvent::KeyDown { .. } | EditorEvent::SpawnShapes { .. } => {}
        }
        kept.push(event);
    }

    kept.reverse();
    Coalesced { events: kept, moves_dropped, moves_kept, queue_length }
}

/// Pending-event queue plus the "frame requested" flag.
#[derive(Debug, Default)]
pub struct FrameDriver {
    queue: Vec<EditorEvent>,
    frame_scheduled: bool,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Returns `true` when this call is the one that requested
    /// the next frame, so the host knows to schedule a tick.
    pub fn enqueue(&mut self, event: EditorEvent) -> bool {
        self.queue.push(event);
        let newly_scheduled = !self.frame_scheduled;
        self.frame_scheduled = true;
        newly_scheduled
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_frame_scheduled(&self) -> bool {
        self.frame_scheduled
    }

    /// Drain the queue for processing. Anything enqueued afterwards belongs to
    /// the next frame.
    pub fn take_batch(&mut self) -> Vec<EditorEvent> {
        self.frame_scheduled = false;
        std::mem::take(&mut self.queue)
    }
}
