//! CLI command handlers, one per file.

mod estimate;
mod probe;
mod replay;

pub use estimate::run_estimate;
pub use probe::run_probe;
pub use replay::run_replay;
