//! Stage state — the animations, the status banner, and the audio handle.
//!
//! Each named animation is procedural: a playback flag, a visibility flag,
//! and a frame counter the drawing code turns into motion. The [`Stage`]
//! owns all three animations plus the cue player and is the single
//! implementor of [`StageActions`], so every reaction the transition
//! controller can trigger lands here.

use pose_gesture::{AnimationName, StageActions};

use crate::audio::CuePlayer;

// ════════════════════════════════════════════════════════════════════════════
// AnimationState
// ════════════════════════════════════════════════════════════════════════════

/// Playback state of one procedural animation.
///
/// Stopping rewinds to frame zero (matching an animation player that
/// restarts from the top); hiding without stopping keeps the frame.
#[derive(Clone, Debug, Default)]
pub struct AnimationState {
    playing: bool,
    visible: bool,
    frame:   f32,
}

impl AnimationState {
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.frame = 0.0;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Advance one display frame.
    pub fn tick(&mut self) {
        if self.playing {
            self.frame += 1.0;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Drawable means visible; a hidden animation is skipped entirely.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn frame(&self) -> f32 {
        self.frame
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stage
// ════════════════════════════════════════════════════════════════════════════

/// Everything the transition controller can touch, in one place.
pub struct Stage {
    sunshine: AnimationState,
    rainy:    AnimationState,
    wally:    AnimationState,
    status:   String,
    audio:    CuePlayer,
}

impl Stage {
    pub fn new(audio: CuePlayer) -> Self {
        Stage {
            sunshine: AnimationState::default(),
            rainy:    AnimationState::default(),
            wally:    AnimationState::default(),
            status:   "STAGE READY".to_string(),
            audio,
        }
    }

    pub fn animation(&self, name: AnimationName) -> &AnimationState {
        match name {
            AnimationName::Sunshine => &self.sunshine,
            AnimationName::Rainy    => &self.rainy,
            AnimationName::Wally    => &self.wally,
        }
    }

    fn animation_mut(&mut self, name: AnimationName) -> &mut AnimationState {
        match name {
            AnimationName::Sunshine => &mut self.sunshine,
            AnimationName::Rainy    => &mut self.rainy,
            AnimationName::Wally    => &mut self.wally,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Advance all animation playback by one display frame.
    pub fn tick(&mut self) {
        for name in AnimationName::ALL {
            self.animation_mut(name).tick();
        }
    }

    /// Shut down the audio thread (end of run).
    pub fn quit_audio(&self) {
        self.audio.quit();
    }
}

impl StageActions for Stage {
    fn play_animation(&mut self, name: AnimationName) {
        self.animation_mut(name).play();
    }

    fn stop_animation(&mut self, name: AnimationName) {
        self.animation_mut(name).stop();
    }

    fn set_visible(&mut self, name: AnimationName, visible: bool) {
        self.animation_mut(name).set_visible(visible);
    }

    fn play_audio(&mut self) {
        self.audio.play();
    }

    fn pause_audio(&mut self) {
        self.audio.pause();
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stage() -> Stage {
        Stage::new(CuePlayer::spawn(56, 0, 100))
    }

    #[test]
    fn animations_start_stopped_and_hidden() {
        let stage = make_stage();
        for name in AnimationName::ALL {
            assert!(!stage.animation(name).is_playing());
            assert!(!stage.animation(name).is_visible());
        }
        assert_eq!(stage.status(), "STAGE READY");
    }

    #[test]
    fn play_targets_only_the_named_animation() {
        let mut stage = make_stage();
        stage.play_animation(AnimationName::Rainy);
        stage.set_visible(AnimationName::Rainy, true);

        assert!(stage.animation(AnimationName::Rainy).is_playing());
        assert!(stage.animation(AnimationName::Rainy).is_visible());
        assert!(!stage.animation(AnimationName::Sunshine).is_playing());
        assert!(!stage.animation(AnimationName::Wally).is_visible());
    }

    #[test]
    fn tick_advances_only_playing_animations() {
        let mut stage = make_stage();
        stage.play_animation(AnimationName::Sunshine);
        for _ in 0..5 {
            stage.tick();
        }
        assert_eq!(stage.animation(AnimationName::Sunshine).frame(), 5.0);
        assert_eq!(stage.animation(AnimationName::Rainy).frame(), 0.0);
    }

    #[test]
    fn stop_rewinds() {
        let mut stage = make_stage();
        stage.play_animation(AnimationName::Wally);
        stage.tick();
        stage.tick();
        stage.stop_animation(AnimationName::Wally);
        assert_eq!(stage.animation(AnimationName::Wally).frame(), 0.0);
        assert!(!stage.animation(AnimationName::Wally).is_playing());
    }

    #[test]
    fn stopping_a_stopped_animation_is_harmless() {
        let mut stage = make_stage();
        stage.stop_animation(AnimationName::Sunshine);
        stage.stop_animation(AnimationName::Sunshine);
        assert!(!stage.animation(AnimationName::Sunshine).is_playing());
    }

    #[test]
    fn status_follows_set_status() {
        let mut stage = make_stage();
        stage.set_status("T POSE");
        assert_eq!(stage.status(), "T POSE");
    }
}
