//! Hot Spin bonus controller
//!
//! A two-state machine gated by either the score ledger's checkpoint or an
//! external progression signal. While active, the session runs on the
//! reduced symbol population with manual input disabled, and every spin is
//! forced until the guaranteed count runs out.

use crate::config::{BonusConfig, BonusTrigger};
use crate::score::ScoreLedger;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusPhase {
    Normal,
    BonusActive,
}

/// What the session should do after a presentation completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusDecision {
    /// Nothing bonus-related; the session may idle or auto-play
    None,
    /// Enter the bonus now (swap population, force the first spin)
    Enter,
    /// Still in the bonus; force the next guaranteed spin
    ChainSpin,
    /// Guaranteed spins exhausted; restore and exit
    Exit,
}

/// Normal ⇄ BonusActive state machine
#[derive(Debug, Clone)]
pub struct BonusController {
    config: BonusConfig,
    phase: BonusPhase,
    spins_remaining: u32,
}

impl BonusController {
    pub fn new(config: BonusConfig) -> Self {
        Self {
            config,
            phase: BonusPhase::Normal,
            spins_remaining: 0,
        }
    }

    pub fn phase(&self) -> BonusPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == BonusPhase::BonusActive
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn config(&self) -> &BonusConfig {
        &self.config
    }

    /// Activate the bonus. Idempotent: a second call while active changes
    /// nothing.
    pub fn enter(&mut self) {
        if self.is_active() {
            return;
        }
        self.phase = BonusPhase::BonusActive;
        self.spins_remaining = self.config.spins;
        log::info!("bonus entered, {} guaranteed spins", self.spins_remaining);
    }

    /// Deactivate and re-arm the score checkpoint. Idempotent.
    pub fn exit(&mut self, ledger: &mut ScoreLedger) {
        if !self.is_active() {
            return;
        }
        self.phase = BonusPhase::Normal;
        self.spins_remaining = 0;
        ledger.recompute_threshold();
        log::info!(
            "bonus exited, next threshold {}",
            ledger.next_threshold()
        );
    }

    /// The decision point, evaluated only at the spin-completion boundary
    /// (after presentation), never mid-animation.
    pub fn decide_after_present(
        &mut self,
        ledger: &ScoreLedger,
        progression_complete: bool,
    ) -> BonusDecision {
        if self.is_active() {
            self.spins_remaining = self.spins_remaining.saturating_sub(1);
            if self.spins_remaining > 0 {
                return BonusDecision::ChainSpin;
            }
            return BonusDecision::Exit;
        }

        let triggered = match self.config.trigger {
            BonusTrigger::ScoreThreshold => ledger.crossed_threshold(),
            BonusTrigger::Progression => progression_complete,
        };
        if triggered {
            BonusDecision::Enter
        } else {
            BonusDecision::None
        }
    }
}
