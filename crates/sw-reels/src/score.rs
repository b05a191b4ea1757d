//! Score accumulation and the bonus threshold ledger

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ScoreConfig;
use crate::evaluate::WinLine;
use crate::grid::Cell;

/// The score awarded for one settle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    /// Per-cell component: unique matched cells × per-cell reward
    pub cell_points: u64,
    /// Weight component: sum of per-line payouts from the weight table
    pub line_points: u64,
    /// Distinct cells that matched
    pub unique_cells: usize,
}

impl ScoreDelta {
    pub fn total(&self) -> u64 {
        self.cell_points + self.line_points
    }
}

/// Converts a solved win set into a score delta.
///
/// The per-cell reward is counted once per unique cell coordinate, no
/// matter how many lines share the cell. The weight component is summed
/// per line — two paylines over the same cells each pay their own weight.
/// Presentation mode never influences scoring.
#[derive(Debug, Clone)]
pub struct ScoreAccumulator {
    config: ScoreConfig,
    min_match: u8,
}

impl ScoreAccumulator {
    pub fn new(config: ScoreConfig, min_match: u8) -> Self {
        Self { config, min_match }
    }

    /// Score a settle. Fills each line's display score and returns the
    /// de-duplicated delta.
    pub fn settle(&self, wins: &mut [WinLine]) -> ScoreDelta {
        let mut unique: BTreeSet<Cell> = BTreeSet::new();
        let mut line_points = 0u64;

        for win in wins.iter_mut() {
            let weight = match (&self.config.weights, win.symbol) {
                (Some(table), Some(symbol)) => {
                    table.weight(symbol, win.cells.len() as u8, self.min_match)
                }
                _ => 0,
            };
            win.score = if weight > 0 {
                weight
            } else {
                win.cells.len() as u64 * self.config.per_cell_reward
            };
            line_points += weight;
            unique.extend(win.cells.iter().copied());
        }

        ScoreDelta {
            cell_points: unique.len() as u64 * self.config.per_cell_reward,
            line_points,
            unique_cells: unique.len(),
        }
    }
}

/// Monotonically non-decreasing score plus the next bonus checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLedger {
    total: u64,
    next_threshold: u64,
    threshold_multiple: u64,
}

impl ScoreLedger {
    pub fn new(threshold_multiple: u64) -> Self {
        Self {
            total: 0,
            next_threshold: threshold_multiple,
            threshold_multiple,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn next_threshold(&self) -> u64 {
        self.next_threshold
    }

    /// Add a settle's score
    pub fn add(&mut self, delta: ScoreDelta) -> u64 {
        self.total += delta.total();
        self.total
    }

    /// Has the running total reached the armed checkpoint?
    pub fn crossed_threshold(&self) -> bool {
        self.total >= self.next_threshold
    }

    /// Re-arm the checkpoint after a bonus exit:
    /// `floor(total / multiple) * multiple + multiple`, so consecutive
    /// checkpoints stay evenly spaced above the current score.
    pub fn recompute_threshold(&mut self) {
        self.next_threshold =
            (self.total / self.threshold_multiple) * self.threshold_multiple
                + self.threshold_multiple;
    }
}
