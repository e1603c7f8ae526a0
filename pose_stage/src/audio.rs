//! The T-pose audio cue, played over real-time MIDI.
//!
//! A dedicated thread owns the MIDI connection and steps through a short
//! fanfare when told to play. Pausing holds the position so a resumed cue
//! continues where it stopped; once the fanfare finishes it rewinds and
//! waits for the next play command.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// CueCommand — sent to the cue thread
// ════════════════════════════════════════════════════════════════════════════

pub enum CueCommand {
    /// Start the fanfare, or resume a paused one.
    Play,
    /// Silence after the current note, keeping the position.
    Pause,
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// The fanfare
// ════════════════════════════════════════════════════════════════════════════

/// (MIDI note, duration ms). A rising major-arpeggio whoop.
const FANFARE: [(u8, u64); 5] = [
    (60, 110), // C4
    (64, 110), // E4
    (67, 110), // G4
    (72, 160), // C5
    (76, 420), // E5, held
];

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null (for machines without a synth)
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

// ── null backend ──────────────────────────────────────────────────────────

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8) {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8) {}
    fn note_off(&mut self, _ch: u8, _n: u8) {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick the first usable one
// ════════════════════════════════════════════════════════════════════════════

/// Try to open a MIDI output port, preferring a softsynth when one is
/// visible. Falls back to `NullOut` with a warning if none can be opened.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("pose_stage_cue") {
        Ok(m) => m,
        Err(e) => {
            log::warn!("MIDI init error: {} — cue will be silent", e);
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("no MIDI output ports found — cue will be silent");
        log::warn!("install a synthesiser such as `timidity -iA` or `fluidsynth` to hear it");
        return Box::new(NullOut);
    }

    let port_idx = ports
        .iter()
        .enumerate()
        .find(|(_, p)| {
            midi_out
                .port_name(p)
                .map(|n| {
                    let n = n.to_lowercase();
                    n.contains("fluid")
                        || n.contains("timidity")
                        || n.contains("microsoft")
                        || n.contains("synth")
                })
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    log::info!("opening MIDI port: {}", name);

    match midi_out.connect(port, "pose-stage-cue") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            log::warn!("failed to connect to MIDI port: {} — cue will be silent", e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CuePlayer — handle to the cue thread
// ════════════════════════════════════════════════════════════════════════════

pub struct CuePlayer {
    cmd_tx: Sender<CueCommand>,
}

impl CuePlayer {
    /// Spawn the cue thread with the given General MIDI program.
    pub fn spawn(program: u8, channel: u8, velocity: u8) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<CueCommand>();
        thread::spawn(move || cue_thread(program, channel, velocity, cmd_rx));
        CuePlayer { cmd_tx }
    }

    pub fn play(&self) {
        let _ = self.cmd_tx.send(CueCommand::Play);
    }
    pub fn pause(&self) {
        let _ = self.cmd_tx.send(CueCommand::Pause);
    }
    pub fn quit(&self) {
        let _ = self.cmd_tx.send(CueCommand::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// cue_thread — the playback loop
// ════════════════════════════════════════════════════════════════════════════

fn cue_thread(program: u8, channel: u8, velocity: u8, cmd_rx: Receiver<CueCommand>) {
    let mut midi = open_midi_output();
    let mut playing = false;
    let mut step = 0usize;

    midi.program_change(channel, program);

    loop {
        // ── drain commands ────────────────────────────────────────────────
        loop {
            match cmd_rx.try_recv() {
                Ok(CueCommand::Play) => {
                    playing = true;
                }
                Ok(CueCommand::Pause) => {
                    playing = false;
                }
                Ok(CueCommand::Quit) => return,
                Err(_) => break,
            }
        }

        if !playing {
            thread::sleep(Duration::from_millis(10));
            continue;
        }

        if step >= FANFARE.len() {
            // Finished: rewind and wait for the next play command.
            playing = false;
            step = 0;
            continue;
        }

        let (note, millis) = FANFARE[step];
        midi.note_on(channel, note, velocity);
        thread::sleep(Duration::from_millis(millis));
        midi.note_off(channel, note);
        step += 1;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
