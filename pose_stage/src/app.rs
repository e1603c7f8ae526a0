//! Top-level application state and the multi-rate main loop.
//!
//! Three cadences share one cooperative thread of control:
//!
//! * the **draw tick**, every frame: render the current estimate, then
//!   classify and let the transition controller react;
//! * the **readout tick**, every `readout_period_ms`: refresh the
//!   keypoint table from the snapshot store;
//! * the **estimate arrival**, whenever the pose-source thread sends one:
//!   folded into the store at the top of the next frame.
//!
//! The pose source is the only other thread touching pose data, and it
//! only ever talks through the channel, so the store and the controller
//! state need no locking.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use pose_gesture::{classify, GestureLabel, TransitionController};
use pose_stream::{PoseEstimate, Snapshot};

use crate::audio::CuePlayer;
use crate::config::StageConfig;
use crate::readout::ReadoutTable;
use crate::source::{ScriptedPoseSource, SimPoseSource, spawn_pose_source};
use crate::stage::Stage;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// SourceMode
// ════════════════════════════════════════════════════════════════════════════

/// Which built-in pose source drives the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceMode {
    /// Keyboard-posed synthetic skeleton (default).
    Interactive,
    /// Fixed demo script cycling through the postures.
    Scripted,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// Everything the main loop mutates, owned in one place and handed into
/// each component through its contract — no ambient globals.
pub struct AppState {
    snapshot:   Snapshot,
    /// The most recent arrival, kept for marker/skeleton rendering.
    /// Only this primary pose is ever classified (single-subject policy).
    latest:     Option<PoseEstimate>,
    controller: TransitionController,
    stage:      Stage,
    readout:    ReadoutTable,
    readout_gate: f32,
}

impl AppState {
    pub fn new(cfg: &StageConfig) -> Self {
        let audio = CuePlayer::spawn(
            cfg.fanfare_program,
            cfg.fanfare_channel,
            cfg.fanfare_velocity,
        );
        AppState {
            snapshot:   Snapshot::new(),
            latest:     None,
            controller: TransitionController::new(),
            stage:      Stage::new(audio),
            readout:    ReadoutTable::new(),
            readout_gate: cfg.readout_gate,
        }
    }

    // ── estimate arrival ─────────────────────────────────────────────────

    pub fn handle_arrival(&mut self, estimate: PoseEstimate) {
        self.snapshot.ingest(&estimate);
        self.latest = Some(estimate);
    }

    // ── draw tick: classify → transition → advance animations ───────────

    pub fn frame_tick(&mut self) {
        let label = classify(&self.snapshot);
        self.controller.tick(label, &mut self.stage);
        self.stage.tick();
    }

    // ── readout tick ─────────────────────────────────────────────────────

    pub fn readout_tick(&mut self) {
        self.readout.refresh(&self.snapshot, self.readout_gate);
    }

    // ── accessors for the render loop and tests ──────────────────────────

    pub fn latest_estimate(&self) -> Option<&PoseEstimate> {
        self.latest.as_ref()
    }
    pub fn stage(&self) -> &Stage {
        &self.stage
    }
    pub fn readout(&self) -> &ReadoutTable {
        &self.readout
    }
    pub fn current_gesture(&self) -> GestureLabel {
        self.controller.current()
    }
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn shutdown(&self) {
        self.stage.quit_audio();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the stage until the window closes.
///
/// Per frame, in order: poll input, drain the estimate channel into the
/// store, refresh the readout if its period elapsed, render from the
/// current state, then classify and transition. Rendering reads the
/// snapshot before classification mutates anything, and the classifier
/// output is fully consumed before the next frame begins.
pub fn run(cfg: StageConfig, mode: SourceMode) -> Result<()> {
    let period = Duration::from_millis(cfg.estimate_period_ms);

    // ── pose source (its own thread, talking through a channel) ──────────
    let (sim_tx, sim_rx) = mpsc::channel();
    let estimate_rx = match mode {
        SourceMode::Interactive => spawn_pose_source(SimPoseSource {
            input_rx: sim_rx,
            period,
        }),
        SourceMode::Scripted => spawn_pose_source(ScriptedPoseSource::demo(period)),
    };

    // ── window and state ─────────────────────────────────────────────────
    let mut vis = Visualizer::new(sim_tx).map_err(|e| anyhow!("opening stage window: {}", e))?;
    let mut app = AppState::new(&cfg);

    let readout_period = Duration::from_millis(cfg.readout_period_ms);
    let mut last_readout = Instant::now();

    log::info!("stage running ({:?} source)", mode);

    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain arrivals; values become visible to this frame's readers.
        loop {
            match estimate_rx.try_recv() {
                Ok(est) => app.handle_arrival(est),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("pose source disconnected");
                    app.shutdown();
                    return Ok(());
                }
            }
        }

        if last_readout.elapsed() >= readout_period {
            app.readout_tick();
            last_readout = Instant::now();
        }

        vis.render(
            app.latest_estimate(),
            app.stage(),
            app.readout(),
            cfg.marker_gate,
        );

        app.frame_tick();
    }

    app.shutdown();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{synthetic_estimate, SimPosture};
    use pose_gesture::AnimationName;
    use pose_stream::TrackedPart;

    fn make_app() -> AppState {
        AppState::new(&StageConfig::default())
    }

    #[test]
    fn arrival_populates_snapshot_and_latest() {
        let mut app = make_app();
        assert!(app.latest_estimate().is_none());

        app.handle_arrival(synthetic_estimate(SimPosture::Neutral, 0));
        assert!(app.latest_estimate().is_some());
        assert!(app.snapshot().is_complete());
    }

    #[test]
    fn no_estimates_stays_initial() {
        let mut app = make_app();
        app.frame_tick();
        assert_eq!(app.current_gesture(), GestureLabel::Initial);
    }

    #[test]
    fn hands_up_arrival_enters_sunshine() {
        let mut app = make_app();
        app.handle_arrival(synthetic_estimate(SimPosture::HandsUp, 0));
        app.frame_tick();

        assert_eq!(app.current_gesture(), GestureLabel::HandsUp);
        assert!(app.stage().animation(AnimationName::Sunshine).is_playing());
        assert!(app.stage().animation(AnimationName::Sunshine).is_visible());
        assert_eq!(app.stage().status(), "HANDS UP");
    }

    #[test]
    fn posture_sequence_swaps_animations() {
        let mut app = make_app();

        app.handle_arrival(synthetic_estimate(SimPosture::HandsUp, 0));
        app.frame_tick();
        app.handle_arrival(synthetic_estimate(SimPosture::TPose, 1));
        app.frame_tick();

        assert_eq!(app.current_gesture(), GestureLabel::TPose);
        assert!(!app.stage().animation(AnimationName::Sunshine).is_playing());
        assert!(!app.stage().animation(AnimationName::Sunshine).is_visible());
        assert!(app.stage().animation(AnimationName::Wally).is_playing());
        assert_eq!(app.stage().status(), "T POSE");
    }

    #[test]
    fn repeated_frames_do_not_restart_animations() {
        let mut app = make_app();
        app.handle_arrival(synthetic_estimate(SimPosture::HandsUp, 0));
        app.frame_tick();

        // More frames of the same posture: the animation keeps advancing
        // instead of being restarted by re-entry.
        for phase in 1..10 {
            app.handle_arrival(synthetic_estimate(SimPosture::HandsUp, phase));
            app.frame_tick();
        }
        // One frame per tick, ten ticks total, never rewound.
        assert_eq!(app.stage().animation(AnimationName::Sunshine).frame(), 10.0);
    }

    #[test]
    fn occlusion_holds_the_gesture() {
        let mut app = make_app();
        app.handle_arrival(synthetic_estimate(SimPosture::HandsUp, 0));
        app.frame_tick();

        app.handle_arrival(synthetic_estimate(SimPosture::Occluded, 1));
        app.frame_tick();
        assert_eq!(app.current_gesture(), GestureLabel::HandsUp);
    }

    #[test]
    fn neutral_resets_to_initial() {
        let mut app = make_app();
        app.handle_arrival(synthetic_estimate(SimPosture::HandsDown, 0));
        app.frame_tick();
        app.handle_arrival(synthetic_estimate(SimPosture::Neutral, 1));
        app.frame_tick();

        assert_eq!(app.current_gesture(), GestureLabel::Initial);
        for name in AnimationName::ALL {
            assert!(!app.stage().animation(name).is_playing());
            assert!(!app.stage().animation(name).is_visible());
        }
        assert_eq!(app.stage().status(), "NO POSE DETECTED");
    }

    #[test]
    fn readout_tick_fills_cells_independently_of_frames() {
        let mut app = make_app();
        app.handle_arrival(synthetic_estimate(SimPosture::Neutral, 0));

        // No readout tick yet: cells stay blank even after frames.
        app.frame_tick();
        assert!(app.readout().rows().all(|(_, kp)| kp.is_none()));

        app.readout_tick();
        let filled = app.readout().rows().filter(|(_, kp)| kp.is_some()).count();
        assert_eq!(filled, TrackedPart::ALL.len());
    }
}
