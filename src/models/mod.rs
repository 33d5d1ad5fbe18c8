pub mod blended;
pub mod config;
pub mod context_table;
pub mod uniform;

pub use self::{blended::*, config::*, context_table::*, uniform::*};

/// Alphabet size, models always predict over every byte value
pub const SYMBOLS: usize = 256;

/// An adaptive model over the byte alphabet.
///
/// Encoder and decoder must make the same sequence of `predict`/`update`
/// calls for the stream to decode.
pub trait Model {
    /// Distribution of the next symbol given everything seen so far
    fn predict(&self) -> Distribution;
    /// Learns `symbol` and advances the context past it
    fn update(&mut self, symbol: u8);
}

/// Per-symbol probabilities `P` and their cumulative sums `F`.
///
/// `F[0] = 0` and `F[s + 1] = F[s] + P[s]`; the implicit `F[256]` is not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    p: [f64; SYMBOLS],
    f: [f64; SYMBOLS],
}

impl Distribution {
    pub fn from_probabilities(p: [f64; SYMBOLS]) -> Self {
        let mut f = [0.0; SYMBOLS];
        for s in 1..SYMBOLS {
            f[s] = f[s - 1] + p[s - 1];
        }
        Self { p, f }
    }

    pub fn p(&self, symbol: u8) -> f64 {
        self.p[usize::from(symbol)]
    }

    pub fn f(&self, symbol: u8) -> f64 {
        self.f[usize::from(symbol)]
    }

    pub fn probabilities(&self) -> &[f64; SYMBOLS] {
        &self.p
    }

    pub fn cumulative(&self) -> &[f64; SYMBOLS] {
        &self.f
    }

    /// Sum of all probabilities, 1 up to rounding
    pub fn total(&self) -> f64 {
        self.f[SYMBOLS - 1] + self.p[SYMBOLS - 1]
    }

    /// Largest symbol `s` for which `below(s, F[s])` holds.
    ///
    /// `below` must be monotone (true then false) over increasing symbols.
    pub fn locate(&self, below: impl Fn(u8, f64) -> bool) -> u8 {
        let (mut lo, mut hi) = (0, SYMBOLS);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if below(mid as u8, self.f[mid]) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        u8::try_from(lo.saturating_sub(1)).unwrap_or(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::{Distribution, SYMBOLS};

    #[test]
    fn cumulative_is_prefix_sum() {
        let mut p = [0.0; SYMBOLS];
        p[0] = 0.5;
        p[1] = 0.25;
        p[255] = 0.25;
        let dist = Distribution::from_probabilities(p);
        assert_eq!(dist.f(0), 0.0);
        assert_eq!(dist.f(1), 0.5);
        assert_eq!(dist.f(2), 0.75);
        assert_eq!(dist.f(255), 0.75);
        assert_eq!(dist.total(), 1.0);
    }

    #[test]
    fn locate_buckets() {
        let dist = Distribution::from_probabilities([1.0 / 256.0; SYMBOLS]);
        assert_eq!(dist.locate(|_, f| f <= 0.0), 0);
        assert_eq!(dist.locate(|_, f| f <= 0.5), 128);
        assert_eq!(dist.locate(|_, f| f < 0.5), 127);
        assert_eq!(dist.locate(|_, f| f <= 1.0), 255);
        assert_eq!(dist.locate(|s, _| s < 10), 9);
    }
}
