//! Symbol grid — the settled rows × cols matrix

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::SymbolId;

/// A grid coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// The current rows × cols matrix of symbol identifiers; pure data.
///
/// Mutated only by the spin scheduler while columns settle; evaluation
/// reads it and never writes. Every cell holds a symbol at all times —
/// there is no "empty" state, so a partially settled grid cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolGrid {
    rows: u8,
    cols: u8,
    cells: Vec<SymbolId>,
}

impl SymbolGrid {
    /// Create a grid with every cell set to `fill`
    pub fn filled(rows: u8, cols: u8, fill: SymbolId) -> SlotResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SlotError::Config(format!(
                "grid must be non-empty, got {rows}x{cols}"
            )));
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![fill; rows as usize * cols as usize],
        })
    }

    /// Build from column strips (each of length `rows`, top to bottom)
    pub fn from_columns(columns: &[Vec<SymbolId>]) -> SlotResult<Self> {
        let cols = columns.len();
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(SlotError::Config("grid must be non-empty".into()));
        }
        if columns.iter().any(|c| c.len() != rows) {
            return Err(SlotError::Config("ragged column strips".into()));
        }
        let mut grid = Self::filled(rows as u8, cols as u8, columns[0][0])?;
        for (col, strip) in columns.iter().enumerate() {
            grid.set_column(col as u8, strip);
        }
        Ok(grid)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    fn index(&self, row: u8, col: u8) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row as usize * self.cols as usize + col as usize
    }

    pub fn get(&self, row: u8, col: u8) -> SymbolId {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: u8, col: u8, id: SymbolId) {
        let i = self.index(row, col);
        self.cells[i] = id;
    }

    /// Overwrite one column from a strip (top to bottom)
    pub fn set_column(&mut self, col: u8, strip: &[SymbolId]) {
        debug_assert_eq!(strip.len(), self.rows as usize);
        for (row, &id) in strip.iter().enumerate() {
            self.set(row as u8, col, id);
        }
    }

    /// One column as a strip (top to bottom)
    pub fn column(&self, col: u8) -> Vec<SymbolId> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Iterate all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, SymbolId)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| (Cell::new(row, col), self.get(row, col)))
        })
    }
}
