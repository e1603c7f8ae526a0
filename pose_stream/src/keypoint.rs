//! Keypoints, pose estimates, and the tracked-landmark set.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Keypoint
// ════════════════════════════════════════════════════════════════════════════

/// A single named 2D body-landmark estimate.
///
/// Coordinates are in screen space: `y` grows downward, so a wrist *above*
/// the eyes has a *smaller* `y` than they do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name:       String,
    pub x:          f32,
    pub y:          f32,
    /// Detection confidence in `0.0..=1.0`.
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Keypoint { name: name.into(), x, y, confidence }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseEstimate
// ════════════════════════════════════════════════════════════════════════════

/// One pose emitted by the external estimation model: an ordered sequence
/// of keypoints plus the named skeleton connections between them.
///
/// A model may report several poses per frame. Classification only ever
/// consumes the first one (single-subject policy); rendering may draw all.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub keypoints: Vec<Keypoint>,
    /// Bone connections as pairs of keypoint names.
    pub skeleton:  Vec<(String, String)>,
}

impl PoseEstimate {
    /// Look up a keypoint by its model-assigned name.
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.name == name)
    }

    /// Resolve a skeleton connection to its two endpoint keypoints.
    /// `None` when either endpoint is missing from this estimate.
    pub fn bone(&self, index: usize) -> Option<(&Keypoint, &Keypoint)> {
        let (a, b) = self.skeleton.get(index)?;
        Some((self.keypoint(a)?, self.keypoint(b)?))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackedPart — the closed landmark set the system cares about
// ════════════════════════════════════════════════════════════════════════════

/// The eleven body landmarks tracked by the snapshot store and the readout.
///
/// The discriminant doubles as the storage index inside [`crate::Snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackedPart {
    Nose,
    LeftEye,
    RightEye,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftKnee,
    RightKnee,
}

/// Number of tracked landmarks.
pub const TRACKED_COUNT: usize = 11;

impl TrackedPart {
    /// Every tracked part, in table/display order.
    pub const ALL: [TrackedPart; TRACKED_COUNT] = [
        TrackedPart::Nose,
        TrackedPart::LeftEye,
        TrackedPart::RightEye,
        TrackedPart::LeftShoulder,
        TrackedPart::RightShoulder,
        TrackedPart::LeftElbow,
        TrackedPart::RightElbow,
        TrackedPart::LeftWrist,
        TrackedPart::RightWrist,
        TrackedPart::LeftKnee,
        TrackedPart::RightKnee,
    ];

    /// The model-facing landmark name (matches what pose models emit).
    pub fn name(self) -> &'static str {
        match self {
            TrackedPart::Nose          => "nose",
            TrackedPart::LeftEye       => "leftEye",
            TrackedPart::RightEye      => "rightEye",
            TrackedPart::LeftShoulder  => "leftShoulder",
            TrackedPart::RightShoulder => "rightShoulder",
            TrackedPart::LeftElbow     => "leftElbow",
            TrackedPart::RightElbow    => "rightElbow",
            TrackedPart::LeftWrist     => "leftWrist",
            TrackedPart::RightWrist    => "rightWrist",
            TrackedPart::LeftKnee      => "leftKnee",
            TrackedPart::RightKnee     => "rightKnee",
        }
    }

    /// Match a model keypoint name against the tracked set.
    /// Untracked names (ankles, hips, ears, ...) return `None` and are
    /// simply not stored.
    pub fn from_name(name: &str) -> Option<TrackedPart> {
        TrackedPart::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Storage index inside the snapshot arrays.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
