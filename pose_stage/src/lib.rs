//! # pose_stage
//!
//! The gesture-to-animation stage application.
//!
//! A pose source emits keypoint estimates on its own thread at its own
//! rate. The main loop folds them into the snapshot store, classifies the
//! current posture once per frame, and lets the transition controller fire
//! stage reactions exactly once per gesture change:
//!
//! | Gesture | Reaction |
//! |---|---|
//! | Hands up | `Sunshine` animation |
//! | Hands down | `Rainy` animation |
//! | T pose | `Wally` animation + MIDI fanfare |
//! | (none) | everything stopped, "NO POSE DETECTED" |
//!
//! A side panel lists the tracked keypoint coordinates, refreshed on its
//! own 200 ms cadence, independent of classification.
//!
//! ## Pose sources
//!
//! No camera or estimation model ships here — poses arrive through the
//! [`source::PoseSource`] seam. Two sources are built in:
//!
//! * **Interactive** (default): keyboard keys pose a synthetic skeleton.
//! * **Scripted** (`--scripted`): a fixed demo script cycles through the
//!   postures.
//!
//! ### Interactive keys
//!
//! | Key | Posture |
//! |---|---|
//! | `U` | Hands up |
//! | `J` | Hands down |
//! | `T` | T pose |
//! | `N` | Neutral stand |
//! | `O` | Occlude the arms (low confidence — readout freezes, gesture holds) |
//! | `Q` | Quit |

pub mod config;
pub mod source;
pub mod audio;
pub mod stage;
pub mod readout;
pub mod visualizer;
pub mod app;
