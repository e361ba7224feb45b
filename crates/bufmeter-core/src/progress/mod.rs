//! Progress estimation state machine.
//!
//! [`ProgressController`] owns the per-resource [`ProgressState`]. It is pure:
//! callers feed it the current ranges and duration, and it answers with what
//! happened (a [`ProgressStep`]) or what to emit (a [`FinalizePlan`]). Reading
//! the media element, delivering records and gating re-entrancy live in
//! [`crate::tracker`].

mod controller;
mod state;

pub use controller::{FinalizePlan, ProgressController, ProgressStep};
pub use state::{Phase, ProgressState, ResourceProfile};
