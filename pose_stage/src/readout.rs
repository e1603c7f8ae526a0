//! The keypoint readout table.
//!
//! One row per tracked part, holding the coordinates most recently
//! accepted under the readout gate. Refreshed only on its own slow
//! cadence; never feeds back into classification.

use pose_stream::{filter, Keypoint, Snapshot, TrackedPart};

/// Display cells, indexed by position in [`TrackedPart::ALL`].
#[derive(Clone, Debug, Default)]
pub struct ReadoutTable {
    cells: Vec<Option<Keypoint>>,
}

impl ReadoutTable {
    pub fn new() -> Self {
        ReadoutTable {
            cells: vec![None; TrackedPart::ALL.len()],
        }
    }

    /// Re-read the store and update every cell whose fresh value clears
    /// the gate. Cells keep their previous contents otherwise, so a
    /// briefly-occluded part shows its last good coordinates instead of
    /// blanking.
    pub fn refresh(&mut self, snap: &Snapshot, gate: f32) {
        for (i, part) in TrackedPart::ALL.iter().enumerate() {
            if let Some(kp) = snap.newest(*part) {
                self.cells[i] = filter::accept(self.cells[i].take(), kp.clone(), gate);
            }
        }
    }

    /// Rows in display order: every tracked part with its displayable
    /// value, if one has ever been accepted.
    pub fn rows(&self) -> impl Iterator<Item = (TrackedPart, Option<&Keypoint>)> {
        TrackedPart::ALL
            .iter()
            .zip(self.cells.iter())
            .map(|(part, cell)| (*part, cell.as_ref()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
