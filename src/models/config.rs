use crate::error::{Error, Result};

/// Highest context order a table can be allocated for
pub const MAX_SUPPORTED_ORDER: usize = 8;

/// Context orders used by [`BlendedModel`](super::BlendedModel).
///
/// `max_order` sizes the context table, `window` caps the rolling context and
/// so the longest order ever populated. With the defaults (3 and 2) the
/// order-3 table is allocated but never filled.
/// Encoder and decoder must agree on both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    max_order: usize,
    window: usize,
}

impl ModelConfig {
    pub fn new(max_order: usize, window: usize) -> Result<Self> {
        if max_order > MAX_SUPPORTED_ORDER {
            return Err(Error::InvalidConfig(format!(
                "max order {max_order} exceeds {MAX_SUPPORTED_ORDER}"
            )));
        }
        if window > max_order {
            return Err(Error::InvalidConfig(format!(
                "window {window} exceeds max order {max_order}"
            )));
        }
        Ok(Self { max_order, window })
    }

    /// Uses every allocated order, not bit-compatible with the default
    pub fn full(max_order: usize) -> Result<Self> {
        Self::new(max_order, max_order)
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { max_order: 3, window: 2 }
    }
}
