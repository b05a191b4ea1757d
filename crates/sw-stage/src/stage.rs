//! Stage — the enum defining all canonical game phases

use serde::{Deserialize, Serialize};

/// Canonical game stage — the shared language of reel game flow.
///
/// Every boundary the session crosses maps to exactly one stage. Audio
/// keys off these, so the set is intentionally small and stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin requested and accepted, all columns start this tick
    SpinStart,

    /// One column is scrolling
    ReelSpinning {
        /// Which column (0-indexed)
        column: u8,
    },

    /// One column has settled, showing final symbols
    ReelStop {
        /// Which column settled (0-indexed)
        column: u8,
        /// Symbols on this column (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All columns settled, wins being evaluated
    EvaluateWins,

    /// Spin cycle complete, control back at the caller
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Win presentation starting
    WinPresent {
        /// Number of winning lines
        line_count: u8,
        /// Score awarded for this settle
        score_delta: u64,
    },

    /// Individual win line being highlighted
    WinLineShow {
        /// Payline index, absent for run-based wins
        #[serde(default)]
        line_index: Option<u8>,
        /// Display score for this line
        line_score: u64,
    },

    /// Win presentation torn down
    WinPresentEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // BONUS LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Hot Spin entered: reduced symbol population, forced spins
    BonusEnter {
        /// Guaranteed spins awarded
        spins: u32,
    },

    /// One forced bonus spin starting
    BonusSpin {
        /// Spins left after this one
        remaining: u32,
    },

    /// Hot Spin exited: full population restored
    BonusExit {
        /// Next score checkpoint that re-arms the bonus
        next_threshold: u64,
    },
}

impl Stage {
    /// Stable identifier, used as sound/telemetry key
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SpinStart => "SPIN_START",
            Self::ReelSpinning { .. } => "REEL_SPINNING",
            Self::ReelStop { .. } => "REEL_STOP",
            Self::EvaluateWins => "EVALUATE_WINS",
            Self::SpinEnd => "SPIN_END",
            Self::WinPresent { .. } => "WIN_PRESENT",
            Self::WinLineShow { .. } => "WIN_LINE_SHOW",
            Self::WinPresentEnd => "WIN_PRESENT_END",
            Self::BonusEnter { .. } => "BONUS_ENTER",
            Self::BonusSpin { .. } => "BONUS_SPIN",
            Self::BonusExit { .. } => "BONUS_EXIT",
        }
    }

    /// Does this stage belong to the win presentation?
    pub fn is_win_stage(&self) -> bool {
        matches!(
            self,
            Self::WinPresent { .. } | Self::WinLineShow { .. } | Self::WinPresentEnd
        )
    }

    /// Does this stage belong to the bonus lifecycle?
    pub fn is_bonus_stage(&self) -> bool {
        matches!(
            self,
            Self::BonusEnter { .. } | Self::BonusSpin { .. } | Self::BonusExit { .. }
        )
    }
}
