//! Pose sources — where keypoint estimates come from.
//!
//! The public interface is a stream of [`PoseEstimate`] values delivered
//! over a `mpsc` channel. Consumers don't know or care whether estimates
//! came from a camera pipeline or the built-in synthetic skeleton; a real
//! estimation backend plugs in by implementing [`PoseSource`].
//!
//! Only a single subject is ever modeled: each arrival carries one primary
//! pose, and that is the one classification consumes.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use pose_stream::{Keypoint, PoseEstimate, TrackedPart};

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait — unified interface for backends
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`PoseEstimate`]s over a channel.
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<PoseEstimate>);
}

/// Spawn a pose source on its own thread and return the receiving end.
pub fn spawn_pose_source<S: PoseSource>(source: S) -> Receiver<PoseEstimate> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimPosture — the synthetic skeleton's target configurations
// ════════════════════════════════════════════════════════════════════════════

/// Postures the synthetic skeleton can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPosture {
    /// Standing, arms at the sides.
    Neutral,
    /// Both wrists raised above the eyes.
    HandsUp,
    /// Both wrists dropped below the knees.
    HandsDown,
    /// Arms straight out, wrists level with the elbows.
    TPose,
    /// Arms reported at rock-bottom confidence (simulated occlusion).
    Occluded,
}

/// Raw input event from the stage window to the interactive source.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    SetPosture(SimPosture),
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic skeleton
// ════════════════════════════════════════════════════════════════════════════

// Figure anchor coordinates, in stage viewport pixels. The skeleton is
// drawn as seen by a mirror-view camera: the subject's left side lands at
// the larger x.
const CX: f32 = 330.0; // torso centerline

/// Deterministic sway so the figure breathes instead of freezing.
/// `phase` advances once per emitted estimate.
fn sway(phase: u32, speed: f32, amplitude: f32) -> f32 {
    (phase as f32 * speed).sin() * amplitude
}

/// Arm placement for one posture: (elbow, wrist) for the subject's left
/// arm; the right arm mirrors around the centerline.
fn arm_targets(posture: SimPosture) -> ((f32, f32), (f32, f32)) {
    match posture {
        // Wrists hang well below the elbows, outside the T-pose level band.
        SimPosture::Neutral   => ((CX + 80.0, 310.0), (CX + 85.0, 440.0)),
        SimPosture::HandsUp   => ((CX + 75.0, 180.0), (CX + 70.0, 100.0)),
        SimPosture::HandsDown => ((CX + 70.0, 480.0), (CX + 50.0, 610.0)),
        SimPosture::TPose     => ((CX + 90.0, 235.0), (CX + 180.0, 240.0)),
        // Occlusion keeps the neutral geometry; only confidence collapses.
        SimPosture::Occluded  => arm_targets(SimPosture::Neutral),
    }
}

/// Build one estimate of the synthetic skeleton holding `posture`.
///
/// Non-arm parts sit at fixed anchors plus sway. Confidence wobbles in a
/// band well above the gates, except for the arms of an occluded posture,
/// which drop to 0.05 so neither gate accepts them.
pub fn synthetic_estimate(posture: SimPosture, phase: u32) -> PoseEstimate {
    let dx = sway(phase, 0.11, 3.0);
    let dy = sway(phase, 0.07, 2.0);

    let ((lex, ley), (lwx, lwy)) = arm_targets(posture);
    let mirror = |x: f32| CX - (x - CX);

    let arm_conf = if posture == SimPosture::Occluded { 0.05 } else { 0.9 };
    // Mild per-frame confidence wobble for everything else.
    let body_conf = 0.82 + sway(phase, 0.05, 0.08);

    let place = |part: TrackedPart, x: f32, y: f32, conf: f32| {
        Keypoint::new(part.name(), x + dx, y + dy, conf)
    };

    let keypoints = vec![
        place(TrackedPart::Nose, CX, 160.0, body_conf),
        place(TrackedPart::LeftEye, CX + 20.0, 150.0, body_conf),
        place(TrackedPart::RightEye, CX - 20.0, 150.0, body_conf),
        place(TrackedPart::LeftShoulder, CX + 60.0, 230.0, body_conf),
        place(TrackedPart::RightShoulder, CX - 60.0, 230.0, body_conf),
        place(TrackedPart::LeftElbow, lex, ley, arm_conf),
        place(TrackedPart::RightElbow, mirror(lex), ley, arm_conf),
        place(TrackedPart::LeftWrist, lwx, lwy, arm_conf),
        place(TrackedPart::RightWrist, mirror(lwx), lwy, arm_conf),
        place(TrackedPart::LeftKnee, CX + 30.0, 560.0, body_conf),
        place(TrackedPart::RightKnee, CX - 30.0, 560.0, body_conf),
        // Landmarks the models report but the stage does not track.
        Keypoint::new("leftHip", CX + 40.0 + dx, 420.0 + dy, body_conf),
        Keypoint::new("rightHip", CX - 40.0 + dx, 420.0 + dy, body_conf),
        Keypoint::new("leftAnkle", CX + 30.0 + dx, 690.0 + dy, body_conf),
        Keypoint::new("rightAnkle", CX - 30.0 + dx, 690.0 + dy, body_conf),
    ];

    PoseEstimate { keypoints, skeleton: skeleton_bones() }
}

/// The bone connections reported alongside every synthetic estimate.
fn skeleton_bones() -> Vec<(String, String)> {
    [
        ("leftEye", "nose"),
        ("rightEye", "nose"),
        ("leftShoulder", "rightShoulder"),
        ("leftShoulder", "leftElbow"),
        ("leftElbow", "leftWrist"),
        ("rightShoulder", "rightElbow"),
        ("rightElbow", "rightWrist"),
        ("leftShoulder", "leftHip"),
        ("rightShoulder", "rightHip"),
        ("leftHip", "rightHip"),
        ("leftHip", "leftKnee"),
        ("rightHip", "rightKnee"),
        ("leftKnee", "leftAnkle"),
        ("rightKnee", "rightAnkle"),
    ]
    .iter()
    .map(|&(a, b)| (a.to_string(), b.to_string()))
    .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — keyboard-driven synthetic skeleton (default mode)
// ════════════════════════════════════════════════════════════════════════════

/// Interactive source: the stage window sends [`SimInput`] events here and
/// the skeleton holds the selected posture, emitting estimates on a fixed
/// cadence until the channel closes.
pub struct SimPoseSource {
    pub input_rx: Receiver<SimInput>,
    pub period:   Duration,
}

impl PoseSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<PoseEstimate>) {
        let mut posture = SimPosture::Neutral;
        let mut phase = 0u32;

        loop {
            loop {
                match self.input_rx.try_recv() {
                    Ok(SimInput::SetPosture(p)) => posture = p,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if tx.send(synthetic_estimate(posture, phase)).is_err() {
                return;
            }
            phase = phase.wrapping_add(1);
            thread::sleep(self.period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedPoseSource — fixed demo loop
// ════════════════════════════════════════════════════════════════════════════

/// Demo source cycling through a fixed posture script, `hold` estimates
/// per step.
pub struct ScriptedPoseSource {
    pub script: Vec<SimPosture>,
    pub hold:   u32,
    pub period: Duration,
}

impl ScriptedPoseSource {
    /// The default demo: neutral → hands up → neutral → hands down →
    /// t pose → occluded → neutral, then repeat.
    pub fn demo(period: Duration) -> Self {
        ScriptedPoseSource {
            script: vec![
                SimPosture::Neutral,
                SimPosture::HandsUp,
                SimPosture::Neutral,
                SimPosture::HandsDown,
                SimPosture::TPose,
                SimPosture::Occluded,
            ],
            hold: 90, // ~3 s per posture at the default cadence
            period,
        }
    }
}

impl PoseSource for ScriptedPoseSource {
    fn run(self: Box<Self>, tx: Sender<PoseEstimate>) {
        if self.script.is_empty() {
            return;
        }
        let mut phase = 0u32;
        loop {
            let step = (phase / self.hold.max(1)) as usize % self.script.len();
            if tx.send(synthetic_estimate(self.script[step], phase)).is_err() {
                return;
            }
            phase = phase.wrapping_add(1);
            thread::sleep(self.period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pose_gesture::{classify, GestureLabel};
    use pose_stream::Snapshot;

    fn classify_posture(posture: SimPosture) -> GestureLabel {
        let mut snap = Snapshot::new();
        snap.ingest(&synthetic_estimate(posture, 0));
        classify(&snap)
    }

    #[test]
    fn postures_classify_to_their_gesture() {
        assert_eq!(classify_posture(SimPosture::Neutral), GestureLabel::Initial);
        assert_eq!(classify_posture(SimPosture::HandsUp), GestureLabel::HandsUp);
        assert_eq!(classify_posture(SimPosture::HandsDown), GestureLabel::HandsDown);
        assert_eq!(classify_posture(SimPosture::TPose), GestureLabel::TPose);
    }

    #[test]
    fn postures_hold_under_sway() {
        for phase in 0..200 {
            let mut snap = Snapshot::new();
            snap.ingest(&synthetic_estimate(SimPosture::HandsUp, phase));
            assert_eq!(classify(&snap), GestureLabel::HandsUp, "phase {}", phase);
        }
    }

    #[test]
    fn occluded_arms_fall_below_both_gates() {
        let est = synthetic_estimate(SimPosture::Occluded, 0);
        for name in ["leftWrist", "rightWrist", "leftElbow", "rightElbow"] {
            let kp = est.keypoint(name).unwrap();
            assert!(kp.confidence < 0.1, "{} should be occluded", name);
        }
        // The rest of the body stays confidently visible.
        assert!(est.keypoint("nose").unwrap().confidence > 0.2);
    }

    #[test]
    fn occlusion_keeps_previous_gesture() {
        // A confident T pose followed by occluded arms: the steady layer
        // retains the old coordinates, so the gesture holds.
        let mut snap = Snapshot::new();
        snap.ingest(&synthetic_estimate(SimPosture::TPose, 0));
        snap.ingest(&synthetic_estimate(SimPosture::Occluded, 1));
        assert_eq!(classify(&snap), GestureLabel::TPose);
    }

    #[test]
    fn estimate_covers_every_tracked_part() {
        let est = synthetic_estimate(SimPosture::Neutral, 7);
        for part in TrackedPart::ALL {
            assert!(est.keypoint(part.name()).is_some(), "{} missing", part.name());
        }
    }

    #[test]
    fn bones_resolve_against_the_estimate() {
        let est = synthetic_estimate(SimPosture::Neutral, 0);
        for i in 0..est.skeleton.len() {
            assert!(est.bone(i).is_some(), "bone {} unresolved", i);
        }
    }

    #[test]
    fn scripted_source_emits_and_cycles() {
        let src = ScriptedPoseSource {
            script: vec![SimPosture::HandsUp, SimPosture::HandsDown],
            hold: 2,
            period: Duration::from_millis(1),
        };
        let rx = spawn_pose_source(src);

        let mut labels = Vec::new();
        for _ in 0..6 {
            let est = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            let mut snap = Snapshot::new();
            snap.ingest(&est);
            labels.push(classify(&snap));
        }
        assert_eq!(
            labels,
            [
                GestureLabel::HandsUp,
                GestureLabel::HandsUp,
                GestureLabel::HandsDown,
                GestureLabel::HandsDown,
                GestureLabel::HandsUp,
                GestureLabel::HandsUp,
            ]
        );
    }

    #[test]
    fn sim_source_follows_posture_commands() {
        let (input_tx, input_rx) = mpsc::channel();
        let rx = spawn_pose_source(SimPoseSource {
            input_rx,
            period: Duration::from_millis(1),
        });

        input_tx.send(SimInput::SetPosture(SimPosture::HandsUp)).unwrap();
        // Give the command time to be drained, then check a later estimate.
        let mut last = None;
        for _ in 0..50 {
            last = Some(rx.recv_timeout(Duration::from_secs(2)).unwrap());
        }
        let mut snap = Snapshot::new();
        snap.ingest(&last.unwrap());
        assert_eq!(classify(&snap), GestureLabel::HandsUp);
    }
}
