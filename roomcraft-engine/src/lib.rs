//! Pure geometric and data core for the room-planning editor.
//!
//! This crate has no notion of a window, a pointer, or a frame: it is the
//! value-oriented model and the functions that transform it. The host
//! binary crate owns the event loop, rendering, and interaction dispatch;
//! see that crate's `interaction` module for how these operations get
//! wired to pointer/keyboard input.

pub mod auto;
pub mod config;
pub mod error;
pub mod furniture_library;
pub mod geometry;
pub mod history;
pub mod ids;
pub mod scene;
pub mod snap;
pub mod spatial_hash;
pub mod templates;

pub use error::SceneError;
pub use scene::{Scene, Snapshot};
