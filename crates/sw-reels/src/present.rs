//! Win-line presentation sequencer
//!
//! Consumes a solved win set and plays it back over time. Two playback
//! modes: rotating single-line (one line highlighted at a time, looping
//! until stopped) and total/simultaneous (everything at once for one fixed
//! duration). Geometry per line is dispatched through [`LineRenderer`] by
//! the configured [`PresentationMode`].
//!
//! Guarantees, both modes: `stop()` at any time cancels pending timers and
//! leaves zero residual visual state; the completion signal is observable
//! exactly once per presentation, even when stopped early.

use crate::clock::{TimerHandle, Timers};
use crate::collab::{LineRenderer, SoundPlayer};
use crate::config::{PlaybackMode, PresentConfig, PresentationMode};
use crate::evaluate::WinLine;
use crate::grid::Cell;

/// Sound cue keys
const SOUND_WIN_LINE: &str = "win_line";
const SOUND_WIN_TOTAL: &str = "win_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeqState {
    Idle,
    Rotating { index: usize },
    Total,
}

/// Plays a solved `WinLine` set back over time
#[derive(Debug)]
pub struct LinePresentationSequencer {
    config: PresentConfig,
    wins: Vec<WinLine>,
    state: SeqState,
    step_timer: Option<TimerHandle>,
    /// First pass plays sound cues; cleared on rotation wraparound
    sound_live: bool,
    completed: bool,
    completion_taken: bool,
}

impl LinePresentationSequencer {
    pub fn new(config: PresentConfig) -> Self {
        Self {
            config,
            wins: Vec::new(),
            state: SeqState::Idle,
            step_timer: None,
            sound_live: true,
            completed: false,
            completion_taken: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != SeqState::Idle
    }

    /// Does this fired timer belong to the sequencer?
    pub fn owns_timer(&self, handle: TimerHandle) -> bool {
        self.step_timer == Some(handle)
    }

    /// Start presenting a win set. An empty set completes immediately.
    pub fn begin(
        &mut self,
        wins: Vec<WinLine>,
        timers: &mut Timers,
        renderer: &mut dyn LineRenderer,
        sound: &mut dyn SoundPlayer,
    ) {
        self.stop(timers, renderer);
        self.completed = false;
        self.completion_taken = false;
        self.sound_live = true;
        self.wins = wins;

        if self.wins.is_empty() {
            self.completed = true;
            return;
        }

        match self.config.playback {
            PlaybackMode::RotatingSingle => {
                self.state = SeqState::Rotating { index: 0 };
                self.draw_step(0, renderer, sound);
                self.step_timer = Some(timers.schedule(self.config.line_dwell_ms));
            }
            PlaybackMode::TotalSimultaneous => {
                self.state = SeqState::Total;
                self.draw_total(renderer, sound);
                self.step_timer = Some(timers.schedule(self.config.total_duration_ms));
            }
        }
    }

    /// Handle a fired timer previously returned by `Timers::advance`
    pub fn on_timer(
        &mut self,
        handle: TimerHandle,
        timers: &mut Timers,
        renderer: &mut dyn LineRenderer,
        sound: &mut dyn SoundPlayer,
    ) {
        if !self.owns_timer(handle) {
            return;
        }
        self.step_timer = None;

        match self.state {
            SeqState::Idle => {}
            SeqState::Rotating { index } => {
                // The previous step's visuals are cleared in full before the
                // next line draws — the highlight containers are exclusive.
                renderer.clear_hits();
                let next = (index + 1) % self.wins.len();
                if next == 0 {
                    self.sound_live = false;
                }
                self.state = SeqState::Rotating { index: next };
                self.draw_step(next, renderer, sound);
                self.step_timer = Some(timers.schedule(self.config.line_dwell_ms));
            }
            SeqState::Total => {
                renderer.clear_hits();
                self.state = SeqState::Idle;
                self.completed = true;
            }
        }
    }

    /// Cancel pending timers and clear every residual visual. Safe at any
    /// time; an active presentation counts as completed.
    pub fn stop(&mut self, timers: &mut Timers, renderer: &mut dyn LineRenderer) {
        if let Some(handle) = self.step_timer.take() {
            timers.cancel(handle);
        }
        if self.is_active() {
            renderer.clear_hits();
            self.state = SeqState::Idle;
            self.completed = true;
        }
        self.wins.clear();
    }

    /// Observe completion. Returns true exactly once per presentation.
    pub fn take_completion(&mut self) -> bool {
        if self.completed && !self.completion_taken {
            self.completion_taken = true;
            return true;
        }
        false
    }

    fn draw_step(&self, index: usize, renderer: &mut dyn LineRenderer, sound: &mut dyn SoundPlayer) {
        let win = &self.wins[index];
        for &cell in &win.cells {
            renderer.render_symbol_hit(cell);
        }
        self.draw_geometry(win, renderer);
        renderer.show_score_popup(self.popup_cell(win), win.score);
        if self.sound_live {
            sound.play(SOUND_WIN_LINE);
        }
    }

    fn draw_total(&self, renderer: &mut dyn LineRenderer, sound: &mut dyn SoundPlayer) {
        let draw_lines = self.wins.len() <= self.config.max_line_displays;
        if !draw_lines {
            log::warn!(
                "line display pool too small ({} wins > {} displays), skipping line geometry",
                self.wins.len(),
                self.config.max_line_displays
            );
        }
        for win in &self.wins {
            for &cell in &win.cells {
                renderer.render_symbol_hit(cell);
            }
            if draw_lines {
                self.draw_geometry(win, renderer);
            }
        }
        if self.sound_live {
            sound.play(SOUND_WIN_TOTAL);
        }
    }

    fn draw_geometry(&self, win: &WinLine, renderer: &mut dyn LineRenderer) {
        match self.config.mode {
            PresentationMode::Line => {
                if let Some(index) = win.line_index {
                    renderer.render_line_hit(index);
                }
            }
            PresentationMode::Way => {
                for &cell in &win.cells {
                    renderer.render_connector_hit(cell);
                }
            }
            PresentationMode::LineAndWay => {
                for &cell in &win.cells {
                    renderer.render_connector_hit(cell);
                }
                if let Some(index) = win.line_index {
                    renderer.render_line_hit(index);
                }
            }
        }
    }

    /// Where the score popup sits: column 2 for line displays, column 1
    /// for short way wins, centered on the win otherwise.
    fn popup_cell(&self, win: &WinLine) -> Cell {
        let target_col = match self.config.mode {
            PresentationMode::Line | PresentationMode::LineAndWay => 2,
            PresentationMode::Way => {
                if win.cells.len() < 5 {
                    1
                } else {
                    2
                }
            }
        };
        win.cells
            .iter()
            .find(|c| c.col == target_col)
            .copied()
            .unwrap_or_else(|| win.cells[win.cells.len() / 2])
    }
}
