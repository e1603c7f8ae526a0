//! The state-transition controller.
//!
//! One [`TransitionController`] owns the current gesture state. Each draw
//! tick it receives the classifier's output; when the label differs from
//! the current state it fires the exit/enter side effects toward the stage
//! collaborators exactly once, then records the new state. Repeated
//! identical labels are pure no-ops.

use crate::classify::GestureLabel;

// ════════════════════════════════════════════════════════════════════════════
// AnimationName
// ════════════════════════════════════════════════════════════════════════════

/// The named animations the stage can play, one per recognized gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationName {
    Sunshine,
    Rainy,
    Wally,
}

impl AnimationName {
    pub const ALL: [AnimationName; 3] = [
        AnimationName::Sunshine,
        AnimationName::Rainy,
        AnimationName::Wally,
    ];
}

impl GestureLabel {
    /// The animation this gesture activates, if any. `Initial` shows
    /// nothing (pure reset).
    pub fn animation(self) -> Option<AnimationName> {
        match self {
            GestureLabel::Initial   => None,
            GestureLabel::HandsUp   => Some(AnimationName::Sunshine),
            GestureLabel::HandsDown => Some(AnimationName::Rainy),
            GestureLabel::TPose     => Some(AnimationName::Wally),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StageActions — the collaborator seam
// ════════════════════════════════════════════════════════════════════════════

/// Everything the controller may do to the outside world.
///
/// All calls must be idempotent-safe: the controller may stop an animation
/// that is not playing or hide one that is already hidden.
pub trait StageActions {
    fn play_animation(&mut self, name: AnimationName);
    fn stop_animation(&mut self, name: AnimationName);
    fn set_visible(&mut self, name: AnimationName, visible: bool);
    fn play_audio(&mut self);
    fn pause_audio(&mut self);
    fn set_status(&mut self, text: &str);
}

// ════════════════════════════════════════════════════════════════════════════
// TransitionController
// ════════════════════════════════════════════════════════════════════════════

/// Finite-state machine over [`GestureLabel`] with no terminal state.
///
/// The current state is owned exclusively here and mutated only by
/// [`TransitionController::tick`].
#[derive(Debug, Default)]
pub struct TransitionController {
    current: GestureLabel,
}

impl TransitionController {
    pub fn new() -> Self {
        TransitionController { current: GestureLabel::Initial }
    }

    pub fn current(&self) -> GestureLabel {
        self.current
    }

    /// Consume one classifier output.
    ///
    /// Exit actions are modeled as "stop everything the target state does
    /// not need": every real transition stops and hides all non-target
    /// animations and pauses audio unless the target keeps it playing.
    /// Enter actions then activate the target's animation (and audio for
    /// the T pose) and update the status text.
    pub fn tick(&mut self, label: GestureLabel, stage: &mut dyn StageActions) {
        if label == self.current {
            return;
        }

        let target = label.animation();

        for name in AnimationName::ALL {
            if Some(name) != target {
                stage.stop_animation(name);
                stage.set_visible(name, false);
            }
        }
        if label != GestureLabel::TPose {
            stage.pause_audio();
        }

        if let Some(name) = target {
            stage.set_visible(name, true);
            stage.play_animation(name);
        }
        if label == GestureLabel::TPose {
            stage.play_audio();
        }

        stage.set_status(label.status_text());
        self.current = label;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
