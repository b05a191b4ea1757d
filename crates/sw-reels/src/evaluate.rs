//! Win detection
//!
//! Two interchangeable strategies over a settled grid: free-form contiguous
//! runs and fixed paylines with wildcard substitution. Both are pure
//! functions of the grid — evaluating twice yields identical results.

use serde::{Deserialize, Serialize};

use crate::config::{EvalStrategy, WildLinePolicy, WinConfig};
use crate::grid::{Cell, SymbolGrid};
use crate::payline::Payline;
use crate::symbols::{SymbolId, SymbolSet};

/// One winning arrangement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    /// Payline index; absent for run-based wins
    pub line_index: Option<u8>,
    /// The symbol that won (the base symbol for payline wins)
    pub symbol: Option<SymbolId>,
    /// Matched cells, in scan order
    pub cells: Vec<Cell>,
    /// Display score for this line, filled by the score accumulator
    pub score: u64,
}

/// Evaluate a settled grid with the configured strategy
pub fn evaluate(
    grid: &SymbolGrid,
    symbols: &SymbolSet,
    config: &WinConfig,
    paylines: &[Payline],
) -> Vec<WinLine> {
    match config.strategy {
        EvalStrategy::Runs => detect_runs(grid, config.min_match),
        EvalStrategy::Paylines => {
            detect_paylines(grid, symbols, paylines, config.min_match, config.wild_line)
        }
    }
}

/// Free-form run detection: maximal same-symbol runs of length >=
/// `min_match` along rows, columns, and both diagonal families.
///
/// Equality is literal — wilds are not substituted here. A diagonal run is
/// reported from exactly one starting cell: a cell whose up-left
/// (down-right family) or down-left (up-right family) neighbor already
/// carries the same symbol is an interior cell of a longer run and is
/// skipped.
pub fn detect_runs(grid: &SymbolGrid, min_match: u8) -> Vec<WinLine> {
    let rows = grid.rows();
    let cols = grid.cols();
    let min = min_match as usize;
    let mut wins = Vec::new();

    // Horizontal
    for row in 0..rows {
        let mut col = 0;
        while col < cols {
            let start = col;
            let symbol = grid.get(row, col);
            while col + 1 < cols && grid.get(row, col + 1) == symbol {
                col += 1;
            }
            let len = (col - start + 1) as usize;
            if len >= min {
                let cells = (start..=col).map(|c| Cell::new(row, c)).collect();
                wins.push(run_line(symbol, cells));
            }
            col += 1;
        }
    }

    // Vertical
    for col in 0..cols {
        let mut row = 0;
        while row < rows {
            let start = row;
            let symbol = grid.get(row, col);
            while row + 1 < rows && grid.get(row + 1, col) == symbol {
                row += 1;
            }
            let len = (row - start + 1) as usize;
            if len >= min {
                let cells = (start..=row).map(|r| Cell::new(r, col)).collect();
                wins.push(run_line(symbol, cells));
            }
            row += 1;
        }
    }

    // Diagonal, down-right
    for row in 0..rows {
        for col in 0..cols {
            let symbol = grid.get(row, col);
            if row > 0 && col > 0 && grid.get(row - 1, col - 1) == symbol {
                continue; // interior of a run already reported
            }
            let mut len = 1u8;
            while row + len < rows && col + len < cols && grid.get(row + len, col + len) == symbol
            {
                len += 1;
            }
            if len as usize >= min {
                let cells = (0..len)
                    .map(|i| Cell::new(row + i, col + i))
                    .collect();
                wins.push(run_line(symbol, cells));
            }
        }
    }

    // Diagonal, up-right
    for row in (0..rows).rev() {
        for col in 0..cols {
            let symbol = grid.get(row, col);
            if row + 1 < rows && col > 0 && grid.get(row + 1, col - 1) == symbol {
                continue;
            }
            let mut len = 1u8;
            while len <= row && col + len < cols && grid.get(row - len, col + len) == symbol {
                len += 1;
            }
            if len as usize >= min {
                let cells = (0..len)
                    .map(|i| Cell::new(row - i, col + i))
                    .collect();
                wins.push(run_line(symbol, cells));
            }
        }
    }

    wins
}

fn run_line(symbol: SymbolId, cells: Vec<Cell>) -> WinLine {
    WinLine {
        line_index: None,
        symbol: Some(symbol),
        cells,
        score: 0,
    }
}

/// Table-driven payline detection with wildcard-tolerant prefix matching.
///
/// The first non-wild symbol on the line becomes its base symbol; a cell
/// matches if it equals the base or is a wild; matching is a contiguous
/// prefix from column 0 and stops at the first mismatch. A line wins when
/// the prefix is at least `min_match` long and a base symbol was
/// established — an all-wild line resolves per `wild_line`.
pub fn detect_paylines(
    grid: &SymbolGrid,
    symbols: &SymbolSet,
    paylines: &[Payline],
    min_match: u8,
    wild_line: WildLinePolicy,
) -> Vec<WinLine> {
    let mut wins = Vec::new();

    for payline in paylines {
        if payline.positions.len() != grid.cols() as usize {
            // Malformed line cannot index the grid; it produces nothing.
            continue;
        }

        let line_symbols: Vec<SymbolId> = payline
            .positions
            .iter()
            .enumerate()
            .map(|(col, &row)| grid.get(row, col as u8))
            .collect();

        let base = line_symbols.iter().copied().find(|&s| !symbols.is_wild(s));
        let base = match (base, wild_line) {
            (Some(s), _) => s,
            (None, WildLinePolicy::PayAsWild) => match symbols.wild_id() {
                Some(w) => w,
                None => continue,
            },
            (None, WildLinePolicy::Void) => continue,
        };

        let mut cells = Vec::new();
        for (col, &symbol) in line_symbols.iter().enumerate() {
            if symbol == base || symbols.is_wild(symbol) {
                cells.push(Cell::new(payline.positions[col], col as u8));
            } else {
                break;
            }
        }

        if cells.len() >= min_match as usize {
            wins.push(WinLine {
                line_index: Some(payline.index),
                symbol: Some(base),
                cells,
                score: 0,
            });
        }
    }

    wins
}
