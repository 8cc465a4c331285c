//! Interaction core for a single-user rectangle editor.
//!
//! The host owns the window and the drawing surface; this crate owns
//! everything in between. Raw pointer and key events are queued, batched per
//! frame, and reduced through a pure state machine into undoable document
//! patches. The document itself is an immutable copy-on-write snapshot, so
//! "did anything change" is a pointer comparison.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Pure [`engine::reduce`] plus the stateful [`engine::EngineCore`] a host drives |
//! | [`interaction`] | Gesture state machine: pointer ownership, drag threshold, hover |
//! | [`frame`] | Per-frame queue and pointer-move coalescing |
//! | [`doc`] | Shapes, paint order, patches and the patch reducer |
//! | [`history`] | Undo/redo over forward patches |
//! | [`hit`] | Topmost-shape hit-testing |
//! | [`input`] | Editor events and transient session state |
//! | [`geom`] | Points and deltas |
//! | [`render`] | Scene drawing onto a host [`render::Surface`] |
//! | [`persist`] | Versioned document format and validating parser |
//! | [`storage`] | Primary/backup document storage with load fallback |
//! | [`debug`] | Frame metrics and the bounded dev log |
//! | [`config`] | Environment-driven configuration |
//! | [`consts`] | Shared constants (drag threshold, spawn region, colors) |

pub mod config;
pub mod consts;
pub mod debug;
pub mod doc;
pub mod engine;
pub mod frame;
pub mod geom;
pub mod hit;
pub mod history;
pub mod input;
pub mod interaction;
pub mod persist;
pub mod render;
pub mod storage;
