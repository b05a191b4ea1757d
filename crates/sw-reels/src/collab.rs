//! Narrow collaborator interfaces
//!
//! The engine never reaches into a loosely-typed external object: rendering,
//! effect playback, audio, and progression are each a small capability trait
//! the embedding game implements. The engine calls these and never reads
//! back from them.

use crate::error::SlotResult;
use crate::grid::Cell;
use crate::symbols::SymbolId;

/// Symbol-cell rendering surface
pub trait SymbolVisuals {
    /// Reflect a grid cell's symbol
    fn set_symbol_visual(&mut self, cell: Cell, symbol: SymbolId);
    /// Toggle a cell's base sprite (hidden while an effect plays on top)
    fn set_symbol_visible(&mut self, cell: Cell, visible: bool);
    /// Reflect a column's scroll offset, in row units
    fn set_column_offset(&mut self, column: u8, offset_rows: f64);
}

/// Win-line geometry surface, dispatched by presentation mode
pub trait LineRenderer {
    /// Pulse one matched cell
    fn render_symbol_hit(&mut self, cell: Cell);
    /// Draw the way-connector on one matched cell
    fn render_connector_hit(&mut self, cell: Cell);
    /// Draw one payline's geometry
    fn render_line_hit(&mut self, line_index: u8);
    /// Show a score popup at a cell
    fn show_score_popup(&mut self, cell: Cell, score: u64);
    /// Remove every hit, connector, line, and popup currently shown
    fn clear_hits(&mut self);
}

/// Skeletal/vector effect playback, keyed by name
pub trait AnimationPlayer {
    /// Start an effect; `Err(MissingAsset)` when the key cannot resolve
    fn play(&mut self, name: &str, looped: bool) -> SlotResult<()>;
    /// Stop whatever is playing
    fn stop(&mut self);
}

/// Fire-and-forget audio
pub trait SoundPlayer {
    fn play(&mut self, key: &str);
}

/// External progression collaborator (the map track): advances station by
/// station, completes at the end, and is reset by the bonus exit.
pub trait ProgressionTrack {
    fn advance(&mut self);
    fn is_complete(&self) -> bool;
    fn reset(&mut self);
}

/// A concrete progression track with a fixed number of stations
#[derive(Debug, Clone)]
pub struct StationTrack {
    stations: usize,
    current: usize,
}

impl StationTrack {
    pub fn new(stations: usize) -> Self {
        Self {
            stations: stations.max(1),
            current: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.current
    }
}

impl ProgressionTrack for StationTrack {
    fn advance(&mut self) {
        if self.current < self.stations {
            self.current += 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.current >= self.stations
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}

/// No-op visuals for headless runs
#[derive(Debug, Default)]
pub struct NullVisuals;

impl SymbolVisuals for NullVisuals {
    fn set_symbol_visual(&mut self, _cell: Cell, _symbol: SymbolId) {}
    fn set_symbol_visible(&mut self, _cell: Cell, _visible: bool) {}
    fn set_column_offset(&mut self, _column: u8, _offset_rows: f64) {}
}

/// No-op line renderer for headless runs
#[derive(Debug, Default)]
pub struct NullLineRenderer;

impl LineRenderer for NullLineRenderer {
    fn render_symbol_hit(&mut self, _cell: Cell) {}
    fn render_connector_hit(&mut self, _cell: Cell) {}
    fn render_line_hit(&mut self, _line_index: u8) {}
    fn show_score_popup(&mut self, _cell: Cell, _score: u64) {}
    fn clear_hits(&mut self) {}
}

/// No-op effect player for headless runs
#[derive(Debug, Default)]
pub struct NullAnimations;

impl AnimationPlayer for NullAnimations {
    fn play(&mut self, _name: &str, _looped: bool) -> SlotResult<()> {
        Ok(())
    }
    fn stop(&mut self) {}
}

/// No-op audio for headless runs
#[derive(Debug, Default)]
pub struct SilentSound;

impl SoundPlayer for SilentSound {
    fn play(&mut self, _key: &str) {}
}
