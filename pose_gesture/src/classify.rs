//! Snapshot → gesture classification.
//!
//! `classify` is deterministic, total, and side-effect free: it always
//! returns a label, never blocks waiting for fresher data, and never
//! panics on missing keypoints.

use pose_stream::{Keypoint, Snapshot, TrackedPart};

/// How far apart (in pixels) a wrist and its elbow may sit vertically
/// while the arm still counts as "level" for the T pose.
pub const LEVEL_TOLERANCE_PX: f32 = 100.0;

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// Mutually-exclusive, exhaustive classification result for a single tick.
///
/// `Initial` is both the startup default and the fallback when nothing
/// matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureLabel {
    #[default]
    Initial,
    HandsUp,
    HandsDown,
    TPose,
}

impl GestureLabel {
    /// The fixed status string displayed on entering this state.
    pub fn status_text(self) -> &'static str {
        match self {
            GestureLabel::Initial   => "NO POSE DETECTED",
            GestureLabel::HandsUp   => "HANDS UP",
            GestureLabel::HandsDown => "HANDS DOWN",
            GestureLabel::TPose     => "T POSE",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Classify the current snapshot contents.
///
/// Predicates run in fixed priority order with short-circuit: the first
/// match wins and later predicates are not evaluated. A predicate touching
/// a part the snapshot has never accepted is false, so missing data falls
/// through toward `Initial`.
pub fn classify(snap: &Snapshot) -> GestureLabel {
    if hands_up(snap) {
        GestureLabel::HandsUp
    } else if hands_down(snap) {
        GestureLabel::HandsDown
    } else if t_pose(snap) {
        GestureLabel::TPose
    } else {
        GestureLabel::Initial
    }
}

/// Fetch the classifier's view of a part (the steady, gate-accepted layer).
fn part(snap: &Snapshot, part: TrackedPart) -> Option<&Keypoint> {
    snap.steady(part)
}

/// Both wrists above both eyes.
fn hands_up(snap: &Snapshot) -> bool {
    let Some(lw) = part(snap, TrackedPart::LeftWrist) else { return false };
    let Some(le) = part(snap, TrackedPart::LeftEye)   else { return false };
    let Some(rw) = part(snap, TrackedPart::RightWrist) else { return false };
    let Some(re) = part(snap, TrackedPart::RightEye)   else { return false };
    lw.y < le.y && rw.y < re.y
}

/// Both wrists below both knees.
fn hands_down(snap: &Snapshot) -> bool {
    let Some(lw) = part(snap, TrackedPart::LeftWrist) else { return false };
    let Some(lk) = part(snap, TrackedPart::LeftKnee)  else { return false };
    let Some(rw) = part(snap, TrackedPart::RightWrist) else { return false };
    let Some(rk) = part(snap, TrackedPart::RightKnee)  else { return false };
    lw.y > lk.y && rw.y > rk.y
}

/// Arms extended outward, wrists roughly level with the elbows.
///
/// "Outward" means the left wrist sits left of the left elbow and the right
/// wrist right of the right elbow (mirror view: left elbow x < left wrist x
/// in screen coordinates).
fn t_pose(snap: &Snapshot) -> bool {
    let Some(le) = part(snap, TrackedPart::LeftElbow)  else { return false };
    let Some(lw) = part(snap, TrackedPart::LeftWrist)  else { return false };
    let Some(re) = part(snap, TrackedPart::RightElbow) else { return false };
    let Some(rw) = part(snap, TrackedPart::RightWrist) else { return false };
    le.x < lw.x
        && re.x > rw.x
        && (le.y - lw.y).abs() < LEVEL_TOLERANCE_PX
        && (re.y - rw.y).abs() < LEVEL_TOLERANCE_PX
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pose_stream::PoseEstimate;

    /// Build a snapshot from (part, x, y) triples, all at full confidence.
    fn snap(parts: &[(TrackedPart, f32, f32)]) -> Snapshot {
        let mut s = Snapshot::new();
        s.ingest(&PoseEstimate {
            keypoints: parts
                .iter()
                .map(|&(p, x, y)| Keypoint::new(p.name(), x, y, 1.0))
                .collect(),
            skeleton: Vec::new(),
        });
        s
    }

    #[test]
    fn empty_snapshot_is_initial() {
        assert_eq!(classify(&Snapshot::new()), GestureLabel::Initial);
    }

    #[test]
    fn zeroed_low_confidence_pose_is_initial() {
        // All parts at {0,0} with zero confidence never get accepted, so
        // every predicate sees missing data and falls through.
        let mut s = Snapshot::new();
        s.ingest(&PoseEstimate {
            keypoints: TrackedPart::ALL
                .iter()
                .map(|p| Keypoint::new(p.name(), 0.0, 0.0, 0.0))
                .collect(),
            skeleton: Vec::new(),
        });
        assert_eq!(classify(&s), GestureLabel::Initial);
    }

    #[test]
    fn scenario_a_hands_up() {
        let s = snap(&[
            (TrackedPart::LeftWrist, 0.0, 100.0),
            (TrackedPart::LeftEye, 0.0, 300.0),
            (TrackedPart::RightWrist, 0.0, 90.0),
            (TrackedPart::RightEye, 0.0, 310.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::HandsUp);
    }

    #[test]
    fn scenario_b_hands_down() {
        let s = snap(&[
            (TrackedPart::LeftWrist, 0.0, 500.0),
            (TrackedPart::LeftKnee, 0.0, 400.0),
            (TrackedPart::RightWrist, 0.0, 510.0),
            (TrackedPart::RightKnee, 0.0, 420.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::HandsDown);
    }

    #[test]
    fn scenario_c_t_pose() {
        // Arms out, wrists within the ±100 px level band of the elbows.
        let s = snap(&[
            (TrackedPart::LeftElbow, 150.0, 300.0),
            (TrackedPart::LeftWrist, 200.0, 350.0),
            (TrackedPart::RightElbow, 650.0, 300.0),
            (TrackedPart::RightWrist, 600.0, 310.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::TPose);
    }

    #[test]
    fn folded_arms_are_not_a_t_pose() {
        // Wrists tucked inward of the elbows fail the orientation check
        // even with the y-deltas inside the level band.
        let s = snap(&[
            (TrackedPart::LeftElbow, 200.0, 300.0),
            (TrackedPart::LeftWrist, 150.0, 350.0),
            (TrackedPart::RightElbow, 600.0, 300.0),
            (TrackedPart::RightWrist, 650.0, 310.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::Initial);
    }

    #[test]
    fn t_pose_rejected_outside_level_band() {
        let s = snap(&[
            (TrackedPart::LeftElbow, 150.0, 300.0),
            (TrackedPart::LeftWrist, 200.0, 450.0), // 150 px drop
            (TrackedPart::RightElbow, 650.0, 300.0),
            (TrackedPart::RightWrist, 600.0, 310.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::Initial);
    }

    #[test]
    fn hands_up_wins_over_hands_down() {
        // Contradictory in practice, but the priority order must hold:
        // wrists simultaneously above the eyes and below the knees.
        let s = snap(&[
            (TrackedPart::LeftWrist, 0.0, 100.0),
            (TrackedPart::LeftEye, 0.0, 300.0),
            (TrackedPart::RightWrist, 0.0, 100.0),
            (TrackedPart::RightEye, 0.0, 300.0),
            (TrackedPart::LeftKnee, 0.0, 50.0),
            (TrackedPart::RightKnee, 0.0, 50.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::HandsUp);
    }

    #[test]
    fn hands_up_ignores_unrelated_parts() {
        // Only wrists and eyes matter for the priority-1 predicate.
        let s = snap(&[
            (TrackedPart::LeftWrist, 0.0, 100.0),
            (TrackedPart::LeftEye, 0.0, 300.0),
            (TrackedPart::RightWrist, 0.0, 90.0),
            (TrackedPart::RightEye, 0.0, 310.0),
            (TrackedPart::Nose, 123.0, 456.0),
            (TrackedPart::LeftShoulder, 7.0, 8.0),
        ]);
        assert_eq!(classify(&s), GestureLabel::HandsUp);
    }

    #[test]
    fn partial_snapshot_never_panics() {
        // One wrist only — every predicate must treat the gaps as
        // non-matching.
        let s = snap(&[(TrackedPart::LeftWrist, 10.0, 10.0)]);
        assert_eq!(classify(&s), GestureLabel::Initial);
    }

    #[test]
    fn status_text_per_label() {
        assert_eq!(GestureLabel::Initial.status_text(), "NO POSE DETECTED");
        assert_eq!(GestureLabel::HandsUp.status_text(), "HANDS UP");
        assert_eq!(GestureLabel::HandsDown.status_text(), "HANDS DOWN");
        assert_eq!(GestureLabel::TPose.status_text(), "T POSE");
    }
}
