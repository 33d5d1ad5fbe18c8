//! Error types for the blended-context coder.

use thiserror::Error;

/// Every failure aborts the current run, nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Narrowing left the symbol no room in the current interval.
    #[error("zero interval while coding symbol #{position}")]
    ZeroInterval { position: u64 },

    /// The model assigned no probability mass to the symbol being coded.
    #[error("zero probability for symbol {symbol:#04x} at #{position}")]
    ZeroProbability { symbol: u8, position: u64 },

    /// The model configuration was rejected.
    #[error("invalid model config: {0}")]
    InvalidConfig(String),

    /// A compressed container ended before its header did.
    #[error("truncated input: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// An I/O error from the bit sink/source or the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for coding operations.
pub type Result<T> = std::result::Result<T, Error>;
