//! Payline definitions
//!
//! A payline is an ordered list of row positions, one per column, fixed at
//! configuration time. Run-based games configure none; payline games may
//! configure dozens.

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{SlotError, SlotResult};

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row position for each column (e.g., [1, 0, 0, 0, 1] for a "V")
    pub positions: Vec<u8>,
}

impl Payline {
    /// Create a straight line (same row across all columns)
    pub fn straight(index: u8, row: u8, cols: u8) -> Self {
        Self {
            index,
            positions: vec![row; cols as usize],
        }
    }

    /// Check this line against a grid shape
    pub fn validate(&self, grid: GridSpec) -> SlotResult<()> {
        if self.positions.len() != grid.cols as usize {
            return Err(SlotError::PaylineShape {
                index: self.index,
                expected: grid.cols as usize,
                got: self.positions.len(),
            });
        }
        for &row in &self.positions {
            if row >= grid.rows {
                return Err(SlotError::PaylineRow {
                    index: self.index,
                    row,
                    rows: grid.rows,
                });
            }
        }
        Ok(())
    }
}

/// Standard nine-line table for a 5×3 grid
pub fn standard_5x3_lines() -> Vec<Payline> {
    vec![
        // Straight lines
        Payline::straight(0, 1, 5), // Middle
        Payline::straight(1, 0, 5), // Top
        Payline::straight(2, 2, 5), // Bottom
        // V shapes
        Payline { index: 3, positions: vec![0, 1, 2, 1, 0] },
        Payline { index: 4, positions: vec![2, 1, 0, 1, 2] },
        // Zigzag
        Payline { index: 5, positions: vec![0, 0, 1, 2, 2] },
        Payline { index: 6, positions: vec![2, 2, 1, 0, 0] },
        Payline { index: 7, positions: vec![1, 0, 0, 0, 1] },
        Payline { index: 8, positions: vec![1, 2, 2, 2, 1] },
    ]
}

/// Validate a whole table against a grid shape
pub fn validate_lines(lines: &[Payline], grid: GridSpec) -> SlotResult<()> {
    for line in lines {
        line.validate(grid)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line() {
        let line = Payline::straight(0, 1, 5);
        assert_eq!(line.positions, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_standard_table_validates() {
        let grid = GridSpec::standard_5x3();
        assert!(validate_lines(&standard_5x3_lines(), grid).is_ok());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let grid = GridSpec::standard_5x3();
        let line = Payline { index: 3, positions: vec![0, 1, 2] };
        match line.validate(grid) {
            Err(SlotError::PaylineShape { index: 3, expected: 5, got: 3 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_row_rejected() {
        let grid = GridSpec::standard_5x3();
        let line = Payline { index: 1, positions: vec![0, 0, 3, 0, 0] };
        assert!(matches!(
            line.validate(grid),
            Err(SlotError::PaylineRow { index: 1, row: 3, rows: 3 })
        ));
    }
}
