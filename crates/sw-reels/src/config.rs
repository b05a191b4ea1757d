//! Game configuration
//!
//! Everything a game defines up front lives here: grid shape, win strategy,
//! scoring, bonus rules, presentation, and the re-entrancy policy. The
//! session validates the whole bundle once at construction; nothing is
//! re-checked per spin.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{SlotError, SlotResult};
use crate::payline::{Payline, standard_5x3_lines, validate_lines};
use crate::symbols::SymbolId;
use crate::timing::SpinTiming;

/// Grid shape (rows × cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Visible rows per column
    pub rows: u8,
    /// Number of columns (reels)
    pub cols: u8,
}

impl GridSpec {
    /// Classic 5-column, 3-row layout
    pub fn standard_5x3() -> Self {
        Self { rows: 3, cols: 5 }
    }

    /// Large hunter layout: 7 columns of 5 rows
    pub fn hunter_7x5() -> Self {
        Self { rows: 5, cols: 7 }
    }

    /// Total grid positions
    pub fn total_cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Which win-detection strategy a game runs.
///
/// Strictly one of the two; there is no blended strategy. What the
/// presentation draws on top of the result is a separate choice
/// ([`PresentationMode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalStrategy {
    /// Free-form contiguous runs in rows/columns/diagonals
    Runs,
    /// Fixed payline table with wildcard substitution
    Paylines,
}

/// Outcome of a payline consisting entirely of wilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildLinePolicy {
    /// The line is void (no base symbol was ever established)
    Void,
    /// The line pays as a run of the wild symbol itself
    PayAsWild,
}

/// Win-detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinConfig {
    /// Strategy selector
    pub strategy: EvalStrategy,
    /// Minimum run / matched-prefix length that counts as a win
    pub min_match: u8,
    /// All-wild payline outcome (payline strategy only)
    pub wild_line: WildLinePolicy,
}

impl Default for WinConfig {
    fn default() -> Self {
        Self {
            strategy: EvalStrategy::Runs,
            min_match: 3,
            wild_line: WildLinePolicy::Void,
        }
    }
}

/// Payout weight table: symbol × run length → payout.
///
/// External configuration, never computed by the evaluator. Index 0 of a
/// weight row is the payout for a `min_match`-long win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayWeights {
    table: HashMap<SymbolId, Vec<u64>>,
}

impl PayWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight row for a symbol
    pub fn set(&mut self, symbol: SymbolId, weights: Vec<u64>) {
        self.table.insert(symbol, weights);
    }

    /// Weight for `symbol` at `run_len`, given the configured minimum
    pub fn weight(&self, symbol: SymbolId, run_len: u8, min_match: u8) -> u64 {
        if run_len < min_match {
            return 0;
        }
        let idx = (run_len - min_match) as usize;
        self.table
            .get(&symbol)
            .and_then(|row| row.get(idx).or(row.last()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Reward per unique matched cell
    pub per_cell_reward: u64,
    /// Optional symbol × length weight table
    #[serde(default)]
    pub weights: Option<PayWeights>,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            per_cell_reward: 10,
            weights: None,
        }
    }
}

/// What arms the bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusTrigger {
    /// Cumulative score crossing evenly spaced checkpoints
    ScoreThreshold,
    /// An external progression collaborator reaching its end
    Progression,
}

/// Hot Spin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Trigger source
    pub trigger: BonusTrigger,
    /// Checkpoint spacing for the score-threshold trigger
    pub threshold_multiple: u64,
    /// Guaranteed spins per bonus
    pub spins: u32,
    /// How many leading regular faces form the bonus population
    pub symbol_type_count: usize,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            trigger: BonusTrigger::ScoreThreshold,
            threshold_multiple: 100,
            spins: 3,
            symbol_type_count: 3,
        }
    }
}

/// Behavior of a spin request while a cycle is already in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentryPolicy {
    /// The second request joins the in-flight cycle (no-op)
    JoinInFlight,
    /// The second request is rejected with `SlotError::SpinInFlight`
    Reject,
}

/// How win lines play back over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// One line at a time, looping until stopped
    RotatingSingle,
    /// All lines at once for a single fixed duration
    TotalSimultaneous,
}

/// What geometry the presentation draws per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Payline geometry only
    Line,
    /// Per-cell connectors only
    Way,
    /// Both at once
    LineAndWay,
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentConfig {
    /// Playback selector
    pub playback: PlaybackMode,
    /// Geometry selector
    pub mode: PresentationMode,
    /// Dwell per line in rotating playback
    pub line_dwell_ms: f64,
    /// Total presentation duration (both playback modes)
    pub total_duration_ms: f64,
    /// Preallocated line-display pool size
    pub max_line_displays: usize,
}

impl Default for PresentConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackMode::TotalSimultaneous,
            mode: PresentationMode::Way,
            line_dwell_ms: 500.0,
            total_duration_ms: 3000.0,
            max_line_displays: 32,
        }
    }
}

/// The whole game definition the session is constructed from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub grid: GridSpec,
    pub win: WinConfig,
    pub score: ScoreConfig,
    pub bonus: BonusConfig,
    pub present: PresentConfig,
    pub timing: SpinTiming,
    pub reentry: ReentryPolicy,
    /// Chain another spin automatically after each normal presentation
    pub auto_play: bool,
    /// Payline table (payline strategy only; empty for run games)
    #[serde(default)]
    pub paylines: Vec<Payline>,
}

impl SessionConfig {
    /// Run-detection game on the standard grid
    pub fn standard_runs() -> Self {
        Self {
            grid: GridSpec::standard_5x3(),
            win: WinConfig::default(),
            score: ScoreConfig::default(),
            bonus: BonusConfig::default(),
            present: PresentConfig::default(),
            timing: SpinTiming::normal(),
            reentry: ReentryPolicy::JoinInFlight,
            auto_play: false,
            paylines: Vec::new(),
        }
    }

    /// Payline game on the standard grid with the nine-line table
    pub fn standard_paylines() -> Self {
        Self {
            win: WinConfig {
                strategy: EvalStrategy::Paylines,
                ..WinConfig::default()
            },
            present: PresentConfig {
                mode: PresentationMode::Line,
                playback: PlaybackMode::RotatingSingle,
                ..PresentConfig::default()
            },
            paylines: standard_5x3_lines(),
            ..Self::standard_runs()
        }
    }

    /// Validate the bundle once, before any spin runs
    pub fn validate(&self) -> SlotResult<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(SlotError::Config("grid must be non-empty".into()));
        }
        if self.win.min_match == 0 {
            return Err(SlotError::Config("min_match must be at least 1".into()));
        }
        if self.win.strategy == EvalStrategy::Paylines && self.paylines.is_empty() {
            return Err(SlotError::Config(
                "payline strategy configured with an empty line table".into(),
            ));
        }
        validate_lines(&self.paylines, self.grid)?;
        if self.bonus.threshold_multiple == 0 {
            return Err(SlotError::Config(
                "bonus threshold multiple must be positive".into(),
            ));
        }
        if self.timing.stop_increment_ms <= 0.0 {
            return Err(SlotError::Config(
                "stop increment must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Serialization(e.to_string()))
    }

    /// Import from JSON and validate
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SlotError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::standard_runs()
    }
}
