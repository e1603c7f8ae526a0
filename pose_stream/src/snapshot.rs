//! The latest-known-good keypoint store.
//!
//! Two layers are kept per tracked part:
//!
//! * `newest` — the most recent value seen at any confidence. The periodic
//!   readout reads this layer through its own gate.
//! * `steady` — the latest value accepted under [`CLASSIFY_GATE`]. The
//!   gesture classifier reads this layer.
//!
//! Values are never removed. A part absent from an estimate, or present
//! below the gate, keeps whatever was stored before — classification
//! continuity is preferred over flicker from occlusion.

use crate::filter::{self, CLASSIFY_GATE};
use crate::keypoint::{Keypoint, PoseEstimate, TrackedPart, TRACKED_COUNT};

/// Per-part store of the latest keypoints, created empty at startup and
/// populated incrementally as estimates arrive. Lives for the process
/// duration; there is no teardown or reset.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    newest: [Option<Keypoint>; TRACKED_COUNT],
    steady: [Option<Keypoint>; TRACKED_COUNT],
}

impl Snapshot {
    pub fn new() -> Self {
        Snapshot::default()
    }

    /// Fold one arrival into the store.
    ///
    /// Every tracked part present in the estimate replaces its `newest`
    /// slot unconditionally; the `steady` slot is replaced only by
    /// acceptance under the classification gate.
    pub fn ingest(&mut self, estimate: &PoseEstimate) {
        for kp in &estimate.keypoints {
            let Some(part) = TrackedPart::from_name(&kp.name) else {
                continue;
            };
            let i = part.index();
            self.newest[i] = Some(kp.clone());
            self.steady[i] = filter::accept(self.steady[i].take(), kp.clone(), CLASSIFY_GATE);
        }
    }

    /// Most recent value for `part`, any confidence.
    pub fn newest(&self, part: TrackedPart) -> Option<&Keypoint> {
        self.newest[part.index()].as_ref()
    }

    /// Latest value for `part` accepted under the classification gate.
    pub fn steady(&self, part: TrackedPart) -> Option<&Keypoint> {
        self.steady[part.index()].as_ref()
    }

    /// True once every tracked part has been seen at least once.
    pub fn is_complete(&self) -> bool {
        self.newest.iter().all(|slot| slot.is_some())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(parts: &[(TrackedPart, f32, f32, f32)]) -> PoseEstimate {
        PoseEstimate {
            keypoints: parts
                .iter()
                .map(|&(p, x, y, c)| Keypoint::new(p.name(), x, y, c))
                .collect(),
            skeleton: Vec::new(),
        }
    }

    #[test]
    fn starts_empty() {
        let snap = Snapshot::new();
        assert!(!snap.is_complete());
        for part in TrackedPart::ALL {
            assert!(snap.newest(part).is_none());
            assert!(snap.steady(part).is_none());
        }
    }

    #[test]
    fn confident_value_lands_in_both_layers() {
        let mut snap = Snapshot::new();
        snap.ingest(&estimate(&[(TrackedPart::Nose, 5.0, 6.0, 0.9)]));
        assert_eq!(snap.newest(TrackedPart::Nose).unwrap().x, 5.0);
        assert_eq!(snap.steady(TrackedPart::Nose).unwrap().x, 5.0);
    }

    #[test]
    fn low_confidence_updates_newest_only() {
        let mut snap = Snapshot::new();
        snap.ingest(&estimate(&[(TrackedPart::LeftWrist, 1.0, 1.0, 0.9)]));
        snap.ingest(&estimate(&[(TrackedPart::LeftWrist, 9.0, 9.0, 0.15)]));

        // newest follows the stream; steady retains the last accepted value.
        assert_eq!(snap.newest(TrackedPart::LeftWrist).unwrap().x, 9.0);
        assert_eq!(snap.steady(TrackedPart::LeftWrist).unwrap().x, 1.0);
    }

    #[test]
    fn absent_part_keeps_stale_value() {
        let mut snap = Snapshot::new();
        snap.ingest(&estimate(&[(TrackedPart::RightKnee, 3.0, 4.0, 0.8)]));
        snap.ingest(&estimate(&[(TrackedPart::Nose, 0.0, 0.0, 0.8)]));
        assert_eq!(snap.steady(TrackedPart::RightKnee).unwrap().y, 4.0);
    }

    #[test]
    fn untracked_names_are_ignored() {
        let mut snap = Snapshot::new();
        snap.ingest(&PoseEstimate {
            keypoints: vec![Keypoint::new("leftAnkle", 1.0, 2.0, 0.9)],
            skeleton: Vec::new(),
        });
        assert!(!snap.is_complete());
        for part in TrackedPart::ALL {
            assert!(snap.newest(part).is_none());
        }
    }

    #[test]
    fn complete_after_full_pass() {
        let mut snap = Snapshot::new();
        let all: Vec<_> = TrackedPart::ALL
            .iter()
            .map(|&p| (p, 1.0, 2.0, 0.5))
            .collect();
        snap.ingest(&estimate(&all));
        assert!(snap.is_complete());
    }
}
