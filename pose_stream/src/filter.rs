//! Confidence filtering.
//!
//! A fresh keypoint may only overwrite a stored/displayed one when its
//! confidence is *strictly* above the gate. Anything at or below the gate
//! leaves the previous value in place — body parts are often briefly
//! occluded, and a stale coordinate beats a flickering one.

use crate::keypoint::Keypoint;

/// Gate for classification acceptance and marker rendering.
pub const CLASSIFY_GATE: f32 = 0.2;

/// Gate for the periodic numeric readout.
pub const READOUT_GATE: f32 = 0.1;

/// True when `kp` clears the gate (strictly greater — a confidence exactly
/// equal to the gate is rejected).
pub fn passes(kp: &Keypoint, gate: f32) -> bool {
    kp.confidence > gate
}

/// Accept `fresh` over `old` iff it clears the gate; otherwise keep `old`
/// unchanged. Pure, reusable with either gate value.
pub fn accept(old: Option<Keypoint>, fresh: Keypoint, gate: f32) -> Option<Keypoint> {
    if passes(&fresh, gate) {
        Some(fresh)
    } else {
        old
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
