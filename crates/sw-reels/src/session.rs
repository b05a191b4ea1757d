//! Game session orchestrator
//!
//! An explicitly constructed, dependency-injected session owning its own
//! scheduler, bonus controller, sequencer, and ledger — no module-level
//! singletons. Control flow is a finite-state machine with an explicit
//! transition table:
//!
//! ```text
//! Idle → Spinning → Evaluating → Presenting → (Rechaining | Idle)
//!                        └────────────────────────┘
//! ```
//!
//! One `tick(delta_ms)` call advances every active timer and animation;
//! collaborators are invoked from the tick thread only.

use rand::SeedableRng;
use rand::rngs::StdRng;

use sw_stage::{Stage, StageEvent};

use crate::bonus::{BonusController, BonusDecision};
use crate::clock::{TimerHandle, Timers};
use crate::collab::{
    AnimationPlayer, LineRenderer, ProgressionTrack, SoundPlayer, SymbolVisuals,
};
use crate::config::{PlaybackMode, ReentryPolicy, SessionConfig};
use crate::error::{SlotError, SlotResult};
use crate::evaluate::{WinLine, evaluate};
use crate::grid::Cell;
use crate::present::LinePresentationSequencer;
use crate::scheduler::{SpinScheduler, SpinSignal};
use crate::score::{ScoreAccumulator, ScoreLedger};
use crate::symbols::SymbolSet;

/// Sound cue keys
const SOUND_SPIN_START: &str = "spin_start";
const SOUND_REEL_STOP: &str = "reel_stop";
const SOUND_BONUS_ENTER: &str = "bonus_enter";
const SOUND_BONUS_EXIT: &str = "bonus_exit";

/// Bonus loop effect key (the idle character starts running)
const ANIM_BONUS_LOOP: &str = "hunter";

/// Orchestrator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Spinning,
    Evaluating,
    Presenting,
    Rechaining,
}

fn transition_allowed(from: SessionPhase, to: SessionPhase) -> bool {
    use SessionPhase::*;
    matches!(
        (from, to),
        (Idle, Spinning)
            | (Spinning, Evaluating)
            | (Evaluating, Presenting)
            | (Evaluating, Rechaining)
            | (Presenting, Rechaining)
            | (Rechaining, Spinning)
            | (_, Idle) // completion and cancellation paths
    )
}

/// The injected collaborator bundle
pub struct Collaborators {
    pub visuals: Box<dyn SymbolVisuals>,
    pub line_renderer: Box<dyn LineRenderer>,
    pub animations: Box<dyn AnimationPlayer>,
    pub sound: Box<dyn SoundPlayer>,
    pub progression: Option<Box<dyn ProgressionTrack>>,
}

impl Collaborators {
    /// Headless bundle for tests and simulation
    pub fn headless() -> Self {
        Self {
            visuals: Box::new(crate::collab::NullVisuals),
            line_renderer: Box::new(crate::collab::NullLineRenderer),
            animations: Box::new(crate::collab::NullAnimations),
            sound: Box::new(crate::collab::SilentSound),
            progression: None,
        }
    }
}

/// One running game
pub struct GameSession {
    config: SessionConfig,
    normal_symbols: SymbolSet,
    bonus_symbols: SymbolSet,
    scheduler: SpinScheduler,
    bonus: BonusController,
    sequencer: LinePresentationSequencer,
    accumulator: ScoreAccumulator,
    ledger: ScoreLedger,
    timers: Timers,
    rng: StdRng,
    phase: SessionPhase,
    input_enabled: bool,
    /// Session-owned timer that ends a rotating presentation
    present_stop_timer: Option<TimerHandle>,
    events: Vec<StageEvent>,
    collab: Collaborators,
}

impl GameSession {
    pub fn new(
        config: SessionConfig,
        symbols: SymbolSet,
        collab: Collaborators,
    ) -> SlotResult<Self> {
        config.validate()?;
        let mut rng = StdRng::from_os_rng();
        let bonus_symbols = symbols.bonus_subset(config.bonus.symbol_type_count);
        let scheduler = SpinScheduler::new(
            config.grid,
            symbols.clone(),
            config.timing.clone(),
            config.reentry,
            &mut rng,
        )?;
        let mut session = Self {
            bonus: BonusController::new(config.bonus.clone()),
            sequencer: LinePresentationSequencer::new(config.present.clone()),
            accumulator: ScoreAccumulator::new(config.score.clone(), config.win.min_match),
            ledger: ScoreLedger::new(config.bonus.threshold_multiple),
            timers: Timers::new(),
            rng,
            phase: SessionPhase::Idle,
            input_enabled: true,
            present_stop_timer: None,
            events: Vec::new(),
            normal_symbols: symbols,
            bonus_symbols,
            scheduler,
            config,
            collab,
        };
        session.refresh_visuals();
        Ok(session)
    }

    /// Convenience constructor with the standard symbol set
    pub fn standard(config: SessionConfig, collab: Collaborators) -> SlotResult<Self> {
        Self::new(config, SymbolSet::standard(), collab)
    }

    /// Seed the RNG for reproducible runs
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.ledger.total()
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.is_active()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The population columns currently sample from
    pub fn active_population(&self) -> &SymbolSet {
        self.scheduler.population()
    }

    /// Take everything emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Player spin input. Rejected while input is disabled (bonus spins in
    /// progress) and resolved per the re-entrancy policy while a cycle is
    /// already running.
    pub fn request_spin(&mut self) -> SlotResult<()> {
        if !self.input_enabled {
            return Err(SlotError::InputDisabled);
        }
        if self.phase != SessionPhase::Idle {
            return match self.config.reentry {
                ReentryPolicy::JoinInFlight => Ok(()),
                ReentryPolicy::Reject => Err(SlotError::SpinInFlight),
            };
        }
        self.start_spin()
    }

    /// "Stop all" interaction: settle every column on its current symbols.
    /// Only honored when the timing profile allows it.
    pub fn force_stop_all(&mut self) -> SlotResult<()> {
        if self.phase != SessionPhase::Spinning {
            return Ok(());
        }
        self.scheduler.force_stop_all()
    }

    /// Tear down the in-flight cycle and presentation. The bonus, if
    /// active, is exited so the population and input always come back to
    /// their normal state.
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
        self.stop_presentation();
        self.sequencer.take_completion(); // discard, cycle is abandoned
        if self.bonus.is_active() {
            self.exit_bonus();
        }
        self.transition(SessionPhase::Idle);
    }

    /// Advance the whole session by one frame
    pub fn tick(&mut self, delta_ms: f64) -> SlotResult<()> {
        // 1. Timers first: presentation dwell steps and the rotating-mode
        //    stop deadline both live on the shared service.
        let fired = self.timers.advance(delta_ms);
        for handle in fired {
            if self.sequencer.owns_timer(handle) {
                self.sequencer.on_timer(
                    handle,
                    &mut self.timers,
                    self.collab.line_renderer.as_mut(),
                    self.collab.sound.as_mut(),
                );
            } else if self.present_stop_timer == Some(handle) {
                self.present_stop_timer = None;
                self.sequencer
                    .stop(&mut self.timers, self.collab.line_renderer.as_mut());
            }
        }

        // 2. Columns.
        if self.phase == SessionPhase::Spinning {
            let signals = match self.scheduler.tick(delta_ms, &mut self.rng) {
                Ok(signals) => signals,
                Err(err) => {
                    // Fatal to this cycle only: the scheduler already tore
                    // down its columns; bring the session back to Idle.
                    log::warn!("spin cycle failed: {err}");
                    if self.bonus.is_active() {
                        self.exit_bonus();
                    }
                    self.transition(SessionPhase::Idle);
                    return Err(err);
                }
            };

            for column in self.scheduler.columns() {
                self.collab
                    .visuals
                    .set_column_offset(column.index(), column.offset_rows());
            }

            for signal in signals {
                match signal {
                    SpinSignal::ColumnStopped { column, symbols } => {
                        for (row, &symbol) in symbols.iter().enumerate() {
                            self.collab
                                .visuals
                                .set_symbol_visual(Cell::new(row as u8, column), symbol);
                        }
                        self.collab.sound.play(SOUND_REEL_STOP);
                        self.emit(Stage::ReelStop { column, symbols });
                    }
                    SpinSignal::Settled => self.on_settled()?,
                }
            }
        }

        // 3. Presentation completion is observed exactly once.
        if self.phase == SessionPhase::Presenting && self.sequencer.take_completion() {
            self.emit(Stage::WinPresentEnd);
            self.after_present();
        }

        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERNAL TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn transition(&mut self, to: SessionPhase) {
        if self.phase == to {
            return;
        }
        if !transition_allowed(self.phase, to) {
            log::error!("illegal transition {:?} → {:?}", self.phase, to);
            debug_assert!(false, "illegal transition {:?} → {:?}", self.phase, to);
        }
        log::debug!("session {:?} → {:?}", self.phase, to);
        self.phase = to;
    }

    fn start_spin(&mut self) -> SlotResult<()> {
        self.scheduler.spin()?;
        self.emit(Stage::SpinStart);
        let columns: Vec<u8> = self.scheduler.columns().iter().map(|c| c.index()).collect();
        for column in columns {
            self.emit(Stage::ReelSpinning { column });
        }
        self.collab.sound.play(SOUND_SPIN_START);
        self.transition(SessionPhase::Spinning);
        Ok(())
    }

    fn on_settled(&mut self) -> SlotResult<()> {
        self.transition(SessionPhase::Evaluating);
        self.emit(Stage::EvaluateWins);

        let grid = self.scheduler.grid()?;
        let mut wins: Vec<WinLine> = evaluate(
            &grid,
            &self.normal_symbols,
            &self.config.win,
            &self.config.paylines,
        );

        if wins.is_empty() {
            self.emit(Stage::SpinEnd);
            self.after_present();
            return Ok(());
        }

        // Score is applied before presentation starts and is never rolled
        // back by presentation errors.
        let delta = self.accumulator.settle(&mut wins);
        self.ledger.add(delta);
        if let Some(track) = self.collab.progression.as_mut() {
            track.advance();
        }

        self.emit(Stage::WinPresent {
            line_count: wins.len() as u8,
            score_delta: delta.total(),
        });
        for win in &wins {
            self.emit(Stage::WinLineShow {
                line_index: win.line_index,
                line_score: win.score,
            });
        }

        self.sequencer.begin(
            wins,
            &mut self.timers,
            self.collab.line_renderer.as_mut(),
            self.collab.sound.as_mut(),
        );
        if self.config.present.playback == PlaybackMode::RotatingSingle {
            // The rotation loops until the session ends it.
            self.present_stop_timer =
                Some(self.timers.schedule(self.config.present.total_duration_ms));
        }
        self.transition(SessionPhase::Presenting);
        Ok(())
    }

    fn after_present(&mut self) {
        if self.phase == SessionPhase::Presenting {
            self.emit(Stage::SpinEnd);
        }

        let progression_complete = self
            .collab
            .progression
            .as_ref()
            .map(|p| p.is_complete())
            .unwrap_or(false);
        let decision = self.bonus.decide_after_present(&self.ledger, progression_complete);

        match decision {
            BonusDecision::Enter => self.enter_bonus(),
            BonusDecision::ChainSpin => {
                self.emit(Stage::BonusSpin {
                    remaining: self.bonus.spins_remaining(),
                });
                self.transition(SessionPhase::Rechaining);
                self.chain_spin();
            }
            BonusDecision::Exit => {
                self.exit_bonus();
                if self.config.auto_play {
                    self.transition(SessionPhase::Rechaining);
                    self.chain_spin();
                } else {
                    self.transition(SessionPhase::Idle);
                }
            }
            BonusDecision::None => {
                if self.config.auto_play {
                    self.transition(SessionPhase::Rechaining);
                    self.chain_spin();
                } else {
                    self.transition(SessionPhase::Idle);
                }
            }
        }
    }

    fn chain_spin(&mut self) {
        if let Err(err) = self.start_spin() {
            // A chained spin can only fail if a cycle is somehow live;
            // surface it and return control rather than wedging the FSM.
            log::error!("chained spin failed: {err}");
            self.transition(SessionPhase::Idle);
        }
    }

    fn enter_bonus(&mut self) {
        self.bonus.enter();
        self.input_enabled = false;
        self.scheduler.set_population(self.bonus_symbols.clone());
        self.scheduler.repopulate(&mut self.rng);
        self.refresh_visuals();

        self.emit(Stage::BonusEnter {
            spins: self.bonus.spins_remaining(),
        });
        self.collab.sound.play(SOUND_BONUS_ENTER);
        if let Err(err) = self.collab.animations.play(ANIM_BONUS_LOOP, true) {
            log::warn!("bonus effect unavailable: {err}");
        }

        self.transition(SessionPhase::Rechaining);
        self.chain_spin();
    }

    fn exit_bonus(&mut self) {
        self.bonus.exit(&mut self.ledger);
        // Always the complete original list, never a partial one.
        self.scheduler.set_population(self.normal_symbols.clone());
        self.scheduler.repopulate(&mut self.rng);
        self.refresh_visuals();
        self.input_enabled = true;
        self.collab.animations.stop();
        if let Some(track) = self.collab.progression.as_mut() {
            track.reset();
        }
        self.collab.sound.play(SOUND_BONUS_EXIT);
        self.emit(Stage::BonusExit {
            next_threshold: self.ledger.next_threshold(),
        });
    }

    fn stop_presentation(&mut self) {
        if let Some(handle) = self.present_stop_timer.take() {
            self.timers.cancel(handle);
        }
        self.sequencer
            .stop(&mut self.timers, self.collab.line_renderer.as_mut());
    }

    fn refresh_visuals(&mut self) {
        for column in self.scheduler.columns() {
            for (row, &symbol) in column.visible_symbols().iter().enumerate() {
                self.collab
                    .visuals
                    .set_symbol_visual(Cell::new(row as u8, column.index()), symbol);
            }
            self.collab
                .visuals
                .set_column_offset(column.index(), column.offset_rows());
        }
    }

    fn emit(&mut self, stage: Stage) {
        self.events.push(StageEvent::new(stage, self.timers.now()));
    }
}
