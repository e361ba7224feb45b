//! Replay of recorded player signal traces.
//!
//! A trace is a TOML file describing one playback session: the resource, its
//! duration, and the ordered signals the host dispatched. Replaying it drives
//! a [`crate::tracker::BufferTracker`] over a [`crate::media::ScriptedMedia`]
//! and returns what was emitted, which makes tracking behaviour reproducible
//! outside a player.

mod run;
mod trace;

pub use run::{replay, ReplayReport, ReplayStep};
pub use trace::{Trace, TraceEvent};
