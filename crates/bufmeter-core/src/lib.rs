//! bufmeter: estimate downloaded media bytes from buffered time ranges.
//!
//! The pure pieces (`ranges`, `estimate`, `progress`) have no I/O. `tracker`
//! ties them to a [`media::MediaSource`], a [`size::SizeResolver`] and a
//! [`sink::SinkSet`].

pub mod config;
pub mod error;
pub mod estimate;
pub mod logging;
pub mod media;
pub mod progress;
pub mod ranges;
pub mod record;
pub mod replay;
pub mod sink;
pub mod size;
pub mod tracker;
