//! Spin scheduler
//!
//! Starts every column in the same tick with staggered stop deadlines,
//! aggregates per-column settles into a single completion, and owns the
//! cancellation and re-entrancy guards. At most one spin cycle is ever in
//! flight.

use rand::rngs::StdRng;

use crate::config::{GridSpec, ReentryPolicy};
use crate::error::{SlotError, SlotResult};
use crate::grid::SymbolGrid;
use crate::reel::ReelColumn;
use crate::symbols::{SymbolId, SymbolSet};
use crate::timing::SpinTiming;

/// What a scheduler tick observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinSignal {
    /// One column settled; its symbols are now authoritative
    ColumnStopped { column: u8, symbols: Vec<SymbolId> },
    /// Every column settled; the grid is complete
    Settled,
}

/// Drives all columns of one grid through a spin cycle
#[derive(Debug)]
pub struct SpinScheduler {
    timing: SpinTiming,
    reentry: ReentryPolicy,
    population: SymbolSet,
    columns: Vec<ReelColumn>,
    in_flight: bool,
    elapsed_ms: f64,
    reported: Vec<bool>,
}

impl SpinScheduler {
    pub fn new(
        grid: GridSpec,
        population: SymbolSet,
        timing: SpinTiming,
        reentry: ReentryPolicy,
        rng: &mut StdRng,
    ) -> SlotResult<Self> {
        if grid.rows == 0 || grid.cols == 0 {
            return Err(SlotError::Config("grid must be non-empty".into()));
        }
        let columns = (0..grid.cols)
            .map(|i| ReelColumn::new(i, grid.rows, &population, rng))
            .collect::<Vec<_>>();
        let reported = vec![false; grid.cols as usize];
        Ok(Self {
            timing,
            reentry,
            population,
            columns,
            in_flight: false,
            elapsed_ms: 0.0,
            reported,
        })
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn columns(&self) -> &[ReelColumn] {
        &self.columns
    }

    /// Swap the active symbol population (takes effect on the next samples)
    pub fn set_population(&mut self, population: SymbolSet) {
        self.population = population;
    }

    pub fn population(&self) -> &SymbolSet {
        &self.population
    }

    /// Resample every idle column from the active population
    pub fn repopulate(&mut self, rng: &mut StdRng) {
        for column in &mut self.columns {
            column.repopulate(&self.population, rng);
        }
    }

    /// Start a spin cycle: all columns start this tick, stop deadlines
    /// staggered `base + i * increment`. A second call while in flight is
    /// resolved by the configured policy — joined as a no-op or rejected —
    /// never silently dropped.
    pub fn spin(&mut self) -> SlotResult<()> {
        if self.in_flight {
            return match self.reentry {
                ReentryPolicy::JoinInFlight => Ok(()),
                ReentryPolicy::Reject => Err(SlotError::SpinInFlight),
            };
        }
        self.in_flight = true;
        self.elapsed_ms = 0.0;
        self.reported.iter_mut().for_each(|r| *r = false);
        for column in &mut self.columns {
            column.start(self.timing.stop_deadline(column.index()));
        }
        Ok(())
    }

    /// Skip the remaining spin time on every column; settles on the
    /// currently visible symbols. Requires `allow_force_stop`.
    pub fn force_stop_all(&mut self) -> SlotResult<()> {
        if !self.timing.allow_force_stop {
            return Err(SlotError::ForceStopDisabled);
        }
        for column in &mut self.columns {
            column.force_stop();
        }
        Ok(())
    }

    /// Tear down every live column timer and drop the outstanding cycle.
    /// The next `tick` emits nothing; the grid keeps the visible symbols.
    pub fn cancel(&mut self) {
        if !self.in_flight {
            return;
        }
        log::debug!("spin cycle canceled after {:.0}ms", self.elapsed_ms);
        for column in &mut self.columns {
            column.abort();
        }
        self.in_flight = false;
    }

    /// Advance the cycle. Emits one `ColumnStopped` per newly settled
    /// column and a final `Settled` once the whole grid is authoritative.
    pub fn tick(&mut self, delta_ms: f64, rng: &mut StdRng) -> SlotResult<Vec<SpinSignal>> {
        if !self.in_flight {
            return Ok(Vec::new());
        }
        self.elapsed_ms += delta_ms;

        let mut signals = Vec::new();
        for column in &mut self.columns {
            column.tick(delta_ms, &self.population, rng, &self.timing);
            let idx = column.index() as usize;
            if column.is_settled() && !self.reported[idx] {
                self.reported[idx] = true;
                signals.push(SpinSignal::ColumnStopped {
                    column: column.index(),
                    symbols: column.visible_symbols().to_vec(),
                });
            }
        }

        if self.columns.iter().all(ReelColumn::is_settled) {
            self.in_flight = false;
            signals.push(SpinSignal::Settled);
            return Ok(signals);
        }

        if self.elapsed_ms > self.timing.settle_timeout_ms {
            let stuck = self
                .columns
                .iter()
                .find(|c| !c.is_settled())
                .map(|c| c.index())
                .unwrap_or(0);
            let timeout_ms = self.timing.settle_timeout_ms;
            self.cancel();
            return Err(SlotError::SettleTimeout {
                column: stuck,
                timeout_ms,
            });
        }

        Ok(signals)
    }

    /// The current grid, assembled from column strips
    pub fn grid(&self) -> SlotResult<SymbolGrid> {
        let strips: Vec<Vec<SymbolId>> = self
            .columns
            .iter()
            .map(|c| c.visible_symbols().to_vec())
            .collect();
        SymbolGrid::from_columns(&strips)
    }
}
