//! Stage configuration, loadable from a TOML file.
//!
//! The numeric defaults are domain-tuned and deliberately not derived:
//! changing the gates or the level band changes which postures classify.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use pose_stream::{CLASSIFY_GATE, READOUT_GATE};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageConfig {
    /// Confidence gate for marker rendering and classification acceptance.
    pub marker_gate:        f32,
    /// Confidence gate for the numeric readout panel.
    pub readout_gate:       f32,
    /// Readout refresh period in milliseconds.
    pub readout_period_ms:  u64,
    /// Emission period of the built-in pose sources, in milliseconds.
    pub estimate_period_ms: u64,
    /// General MIDI program for the T-pose fanfare (56 = trumpet).
    pub fanfare_program:    u8,
    pub fanfare_channel:    u8,
    pub fanfare_velocity:   u8,
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            marker_gate:        CLASSIFY_GATE,
            readout_gate:       READOUT_GATE,
            readout_period_ms:  200,
            estimate_period_ms: 33,
            fanfare_program:    56,
            fanfare_channel:    0,
            fanfare_velocity:   100,
        }
    }
}

impl StageConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_gates() {
        let cfg = StageConfig::default();
        assert_eq!(cfg.marker_gate, 0.2);
        assert_eq!(cfg.readout_gate, 0.1);
        assert_eq!(cfg.readout_period_ms, 200);
    }

    #[test]
    fn toml_round_trip() {
        let cfg = StageConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: StageConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.readout_period_ms, cfg.readout_period_ms);
        assert_eq!(back.fanfare_program, cfg.fanfare_program);
    }
}
