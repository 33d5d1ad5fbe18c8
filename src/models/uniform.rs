use super::{Distribution, Model, SYMBOLS};

/// Static model, every byte is equally likely. Baseline of 8 bits/byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniform;

impl Uniform {
    pub fn new() -> Self {
        Self
    }
}

impl Model for Uniform {
    fn predict(&self) -> Distribution {
        Distribution::from_probabilities([1.0 / SYMBOLS as f64; SYMBOLS])
    }

    fn update(&mut self, _symbol: u8) {}
}
