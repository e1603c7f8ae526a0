//! # pose_stream
//!
//! Data layer for a live stream of human-body keypoint estimates.
//!
//! An external pose model emits [`PoseEstimate`] values at its own,
//! variable rate. The [`Snapshot`] store folds those arrivals into the
//! latest-known-good coordinate set for a fixed collection of tracked
//! body landmarks ([`TrackedPart`]), with per-keypoint confidence
//! filtering ([`filter`]) deciding whether a fresh value may overwrite
//! the one on display.
//!
//! The crate is pure: no I/O, no clocks, no threads. Consumers decide
//! when to ingest and when to read.

pub mod keypoint;
pub mod filter;
pub mod snapshot;

pub use keypoint::{Keypoint, PoseEstimate, TrackedPart};
pub use filter::{accept, passes, CLASSIFY_GATE, READOUT_GATE};
pub use snapshot::Snapshot;
