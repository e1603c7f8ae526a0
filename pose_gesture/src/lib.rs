//! # pose_gesture
//!
//! Turns noisy per-frame keypoint coordinates into one of a small number of
//! discrete, stable gesture states, and fires enter/exit side effects
//! exactly once per state change.
//!
//! ## Gesture → Reaction mapping
//!
//! | Gesture | Predicate (screen space, y grows downward) | Reaction |
//! |---|---|---|
//! | Hands up | both wrists above both eyes | `Sunshine` animation |
//! | Hands down | both wrists below both knees | `Rainy` animation |
//! | T pose | arms out, wrists level with elbows (±100 px) | `Wally` animation + audio cue |
//! | (none) | fallback | everything stopped, "NO POSE DETECTED" |
//!
//! Predicates are evaluated in fixed priority order; the first match wins.
//! The [`controller::TransitionController`] guarantees that re-classifying
//! the same gesture on consecutive ticks produces zero collaborator calls.

pub mod classify;
pub mod controller;

pub use classify::{classify, GestureLabel, LEVEL_TOLERANCE_PX};
pub use controller::{AnimationName, StageActions, TransitionController};
