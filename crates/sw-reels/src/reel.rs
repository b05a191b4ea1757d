//! Reel column state machine
//!
//! One column owns its ordered symbol strip and a small state machine
//! driving the visual scroll offset over time:
//!
//! ```text
//! Idle → Accelerating → Spinning → Decelerating → Bouncing → Idle
//! ```
//!
//! Phases are strictly monotonic within one spin. While Spinning, every
//! symbol that scrolls fully off view is replaced with a fresh sample from
//! the active population — this is the only place new grid content enters.

use rand::rngs::StdRng;

use crate::symbols::{SymbolId, SymbolSet};
use crate::timing::SpinTiming;

/// Column phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReelPhase {
    Idle,
    Accelerating,
    Spinning,
    Decelerating,
    Bouncing,
}

/// One spinning column
#[derive(Debug, Clone)]
pub struct ReelColumn {
    index: u8,
    strip: Vec<SymbolId>,
    phase: ReelPhase,
    /// Visual scroll offset in row units; negative during the pre-roll dip
    offset_rows: f64,
    /// Time since `start()`
    elapsed_ms: f64,
    stop_deadline_ms: f64,
    /// Time inside the current Decelerating/Bouncing phase
    phase_elapsed_ms: f64,
    /// Offset at Decelerating entry, eased down to zero
    decel_from: f64,
    settled: bool,
    force_requested: bool,
}

impl ReelColumn {
    /// Create an idle, settled column with a freshly sampled strip
    pub fn new(index: u8, rows: u8, population: &SymbolSet, rng: &mut StdRng) -> Self {
        let strip = (0..rows).map(|_| population.sample(rng)).collect();
        Self {
            index,
            strip,
            phase: ReelPhase::Idle,
            offset_rows: 0.0,
            elapsed_ms: 0.0,
            stop_deadline_ms: 0.0,
            phase_elapsed_ms: 0.0,
            decel_from: 0.0,
            settled: true,
            force_requested: false,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    /// Current visual offset in row units
    pub fn offset_rows(&self) -> f64 {
        self.offset_rows
    }

    /// The strip, top to bottom. Authoritative once settled.
    pub fn visible_symbols(&self) -> &[SymbolId] {
        &self.strip
    }

    /// Have this column's symbols become final for the current cycle?
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Resample the whole strip from a population (idle columns only —
    /// used at construction and on bonus population swaps)
    pub fn repopulate(&mut self, population: &SymbolSet, rng: &mut StdRng) {
        if self.phase != ReelPhase::Idle {
            log::debug!("reel {}: repopulate ignored while spinning", self.index);
            return;
        }
        for slot in &mut self.strip {
            *slot = population.sample(rng);
        }
    }

    /// Begin a spin with the given stop deadline. No-op unless Idle.
    pub fn start(&mut self, stop_delay_ms: f64) {
        if self.phase != ReelPhase::Idle {
            log::debug!("reel {}: start ignored, phase {:?}", self.index, self.phase);
            return;
        }
        self.phase = ReelPhase::Accelerating;
        self.offset_rows = 0.0;
        self.elapsed_ms = 0.0;
        self.stop_deadline_ms = stop_delay_ms;
        self.phase_elapsed_ms = 0.0;
        self.settled = false;
        self.force_requested = false;
    }

    /// Skip the remaining Spinning time and settle on the symbols that are
    /// visible right now. The pre-roll is not cancelable; a request made
    /// during it takes effect the moment Spinning begins.
    pub fn force_stop(&mut self) {
        match self.phase {
            ReelPhase::Spinning => self.enter_decelerating(),
            ReelPhase::Accelerating => self.force_requested = true,
            _ => {}
        }
    }

    /// Tear down a spin immediately: snap to row alignment and settle on
    /// whatever is visible. Used by the scheduler's cancel path only.
    pub(crate) fn abort(&mut self) {
        self.phase = ReelPhase::Idle;
        self.offset_rows = 0.0;
        self.phase_elapsed_ms = 0.0;
        self.settled = true;
        self.force_requested = false;
    }

    fn enter_decelerating(&mut self) {
        self.phase = ReelPhase::Decelerating;
        self.phase_elapsed_ms = 0.0;
        self.decel_from = self.offset_rows;
    }

    /// Advance the column by `delta_ms`
    pub fn tick(
        &mut self,
        delta_ms: f64,
        population: &SymbolSet,
        rng: &mut StdRng,
        timing: &SpinTiming,
    ) {
        if self.phase == ReelPhase::Idle {
            return;
        }
        self.elapsed_ms += delta_ms;

        match self.phase {
            ReelPhase::Idle => {}
            ReelPhase::Accelerating => {
                let t = (self.elapsed_ms / timing.pre_roll_ms.max(f64::EPSILON)).min(1.0);
                self.offset_rows = -timing.pre_roll_offset_rows * t;
                if self.elapsed_ms >= timing.pre_roll_ms {
                    self.phase = ReelPhase::Spinning;
                    if self.force_requested {
                        self.enter_decelerating();
                    }
                }
            }
            ReelPhase::Spinning => {
                self.offset_rows += timing.rows_per_sec * delta_ms / 1000.0;
                while self.offset_rows >= 1.0 {
                    self.offset_rows -= 1.0;
                    self.scroll_one_row(population, rng);
                }
                if self.elapsed_ms > self.stop_deadline_ms {
                    self.enter_decelerating();
                }
            }
            ReelPhase::Decelerating => {
                self.phase_elapsed_ms += delta_ms;
                let t = (self.phase_elapsed_ms / timing.decel_ms.max(f64::EPSILON)).min(1.0);
                self.offset_rows = self.decel_from * (1.0 - t);
                if t >= 1.0 {
                    self.phase = ReelPhase::Bouncing;
                    self.phase_elapsed_ms = 0.0;
                    self.offset_rows = 0.0;
                }
            }
            ReelPhase::Bouncing => {
                self.phase_elapsed_ms += delta_ms;
                let t = (self.phase_elapsed_ms / timing.bounce_ms.max(f64::EPSILON)).min(1.0);
                // Overshoot down and ease back to alignment
                self.offset_rows = timing.bounce_offset_rows * (std::f64::consts::PI * t).sin();
                if t >= 1.0 {
                    self.offset_rows = 0.0;
                    self.phase = ReelPhase::Idle;
                    self.settled = true;
                }
            }
        }
    }

    /// The bottom symbol leaves view; a fresh sample enters at the top.
    fn scroll_one_row(&mut self, population: &SymbolSet, rng: &mut StdRng) {
        self.strip.pop();
        self.strip.insert(0, population.sample(rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn drive(column: &mut ReelColumn, population: &SymbolSet, rng: &mut StdRng, timing: &SpinTiming, ms: f64) {
        let mut remaining = ms;
        while remaining > 0.0 {
            let step = remaining.min(16.0);
            column.tick(step, population, rng, timing);
            remaining -= step;
        }
    }

    #[test]
    fn test_phase_sequence_is_monotonic() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        assert_eq!(column.phase(), ReelPhase::Idle);
        assert!(column.is_settled());

        column.start(timing.stop_deadline(0));
        assert_eq!(column.phase(), ReelPhase::Accelerating);
        assert!(!column.is_settled());

        let mut seen = vec![column.phase()];
        for _ in 0..200 {
            column.tick(16.0, &population, &mut rng, &timing);
            if *seen.last().unwrap() != column.phase() {
                seen.push(column.phase());
            }
            if column.is_settled() {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                ReelPhase::Accelerating,
                ReelPhase::Spinning,
                ReelPhase::Decelerating,
                ReelPhase::Bouncing,
                ReelPhase::Idle,
            ]
        );
        assert!(column.is_settled());
        assert_eq!(column.offset_rows(), 0.0);
    }

    #[test]
    fn test_settle_is_strictly_after_stop_deadline() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(2);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        column.start(1000.0);
        let mut elapsed = 0.0;
        while !column.is_settled() {
            column.tick(16.0, &population, &mut rng, &timing);
            elapsed += 16.0;
            assert!(elapsed < 5000.0, "column never settled");
        }
        assert!(elapsed > 1000.0);
    }

    #[test]
    fn test_start_is_reentrant_noop() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        column.start(1000.0);
        drive(&mut column, &population, &mut rng, &timing, 400.0);
        let phase = column.phase();
        let elapsed_before = column.elapsed_ms;
        column.start(9999.0); // ignored
        assert_eq!(column.phase(), phase);
        assert_eq!(column.elapsed_ms, elapsed_before);
        assert_eq!(column.stop_deadline_ms, 1000.0);
    }

    #[test]
    fn test_strip_length_is_invariant() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(4);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 4, &population, &mut rng);

        column.start(800.0);
        for _ in 0..200 {
            column.tick(16.0, &population, &mut rng, &timing);
            assert_eq!(column.visible_symbols().len(), 4);
        }
    }

    #[test]
    fn test_spinning_samples_from_active_population() {
        let population = SymbolSet::standard();
        let bonus = population.bonus_subset(3);
        let mut rng = StdRng::seed_from_u64(5);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &bonus, &mut rng);

        column.start(2000.0);
        // Drive with the bonus population long enough to replace the strip
        while !column.is_settled() {
            column.tick(16.0, &bonus, &mut rng, &timing);
        }
        let bonus_ids: Vec<SymbolId> = bonus.symbols().iter().map(|s| s.id).collect();
        for &id in column.visible_symbols() {
            assert!(bonus_ids.contains(&id));
        }
    }

    #[test]
    fn test_force_stop_keeps_current_symbols() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(6);
        let timing = SpinTiming::turbo();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        column.start(60_000.0); // would naturally spin for a minute
        drive(&mut column, &population, &mut rng, &timing, 500.0);
        assert_eq!(column.phase(), ReelPhase::Spinning);

        column.force_stop();
        assert_eq!(column.phase(), ReelPhase::Decelerating);
        let frozen = column.visible_symbols().to_vec();

        drive(&mut column, &population, &mut rng, &timing, 1000.0);
        assert!(column.is_settled());
        assert_eq!(column.visible_symbols(), frozen.as_slice());
    }

    #[test]
    fn test_force_stop_during_pre_roll_waits_for_spinning() {
        let population = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        column.start(60_000.0);
        column.tick(16.0, &population, &mut rng, &timing);
        assert_eq!(column.phase(), ReelPhase::Accelerating);

        column.force_stop(); // pre-roll is non-cancelable
        assert_eq!(column.phase(), ReelPhase::Accelerating);

        drive(&mut column, &population, &mut rng, &timing, 200.0);
        assert!(matches!(
            column.phase(),
            ReelPhase::Decelerating | ReelPhase::Bouncing | ReelPhase::Idle
        ));
    }

    #[test]
    fn test_repopulate_only_when_idle() {
        let population = SymbolSet::standard();
        let bonus = population.bonus_subset(3);
        let mut rng = StdRng::seed_from_u64(8);
        let timing = SpinTiming::normal();
        let mut column = ReelColumn::new(0, 3, &population, &mut rng);

        column.start(1000.0);
        let strip = column.visible_symbols().to_vec();
        column.repopulate(&bonus, &mut rng); // ignored while spinning
        assert_eq!(column.visible_symbols(), strip.as_slice());

        while !column.is_settled() {
            column.tick(16.0, &population, &mut rng, &timing);
        }
        column.repopulate(&bonus, &mut rng);
        let bonus_ids: Vec<SymbolId> = bonus.symbols().iter().map(|s| s.id).collect();
        for &id in column.visible_symbols() {
            assert!(bonus_ids.contains(&id));
        }
    }
}
