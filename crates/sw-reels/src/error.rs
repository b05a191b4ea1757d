//! Error types for the reel engine

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("payline {index} has {got} positions, grid has {expected} columns")]
    PaylineShape {
        index: u8,
        expected: usize,
        got: usize,
    },

    #[error("payline {index} references row {row} outside a {rows}-row grid")]
    PaylineRow { index: u8, row: u8, rows: u8 },

    #[error("column {column} failed to settle within {timeout_ms}ms")]
    SettleTimeout { column: u8, timeout_ms: f64 },

    #[error("spin already in flight")]
    SpinInFlight,

    #[error("spin input is disabled")]
    InputDisabled,

    #[error("force stop is not enabled for this game")]
    ForceStopDisabled,

    #[error("missing asset: {0}")]
    MissingAsset(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
