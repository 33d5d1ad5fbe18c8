use log::trace;

use super::{ACRead, ACWrite};
use crate::error::{Error, Result};
use crate::models::{Distribution, Model, SYMBOLS};

const PRECISION: u32 = u32::BITS; // 32
const ONE: u64 = (1 << PRECISION) - 1; // 0xFFFFFFFF
const QUARTER: u64 = (ONE + 3) / 4; // ceil(ONE / 4) = 0x40000000
const HALF: u64 = 2 * QUARTER; // 0x80000000
const THREE_QUARTERS: u64 = 3 * QUARTER; // 0xC0000000

/// The `ArithmeticCoder` encodes/decodes bytes given a full symbol distribution.
///
/// The interval `[lo, hi]` is inclusive on both ends and always nested inside
/// `[0, ONE]`. Pending straddle bits live in the writer (`ACWrite::inc_parity`).
pub struct ArithmeticCoder<T> {
    lo: u64,
    hi: u64,
    x: u64,        // state (decoder only)
    position: u64, // symbols coded so far
    io: T,
}

impl<T> ArithmeticCoder<T> {
    /// Symbols coded so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Narrows `[lo, hi]` to the sub-interval owned by `symbol`.
    ///
    /// Symbol `s` starts at `lo + floor((range - 256) * F[s]) + s`, so every
    /// symbol keeps at least one unit of width however small its probability,
    /// and the sub-intervals tile `[lo, hi]` without sharing a point.
    fn narrow(&mut self, symbol: u8, dist: &Distribution) -> Result<()> {
        let p = dist.p(symbol);
        if p <= 0.0 {
            return Err(Error::ZeroProbability { symbol, position: self.position });
        }

        let range = self.hi - self.lo + 1;
        if range <= SYMBOLS as u64 {
            return Err(Error::ZeroInterval { position: self.position });
        }
        let start = sub_interval_start(range, symbol, dist.f(symbol));
        let end = match symbol.checked_add(1) {
            Some(next) => sub_interval_start(range, next, dist.f(next)),
            None => range,
        };
        if start >= end {
            return Err(Error::ZeroInterval { position: self.position });
        }

        self.hi = self.lo + end - 1;
        self.lo += start;
        debug_assert!(self.hi <= ONE);
        Ok(())
    }
}

impl<W: ACWrite> ArithmeticCoder<W> {
    pub fn new_coder(writer: W) -> Self {
        Self { lo: 0, hi: ONE, x: 0, position: 0, io: writer }
    }

    /// Codes `symbol` under `model`'s prediction, then lets the model learn it
    pub fn encode(&mut self, symbol: u8, model: &mut impl Model) -> Result<()> {
        let dist = model.predict();
        self.narrow(symbol, &dist)?;
        model.update(symbol);
        self.position += 1;

        // Renormalize range -> write settled bits to stream
        loop {
            if self.hi < HALF {
                self.io.write_bit(0)?;
            } else if self.lo >= HALF {
                self.io.write_bit(1)?;
                self.lo -= HALF;
                self.hi -= HALF;
            } else if self.lo >= QUARTER && self.hi < THREE_QUARTERS {
                // E3 renorm (straddling the middle) -> increase parity
                self.io.inc_parity();
                self.lo -= QUARTER;
                self.hi -= QUARTER;
            } else {
                break;
            }

            self.lo <<= 1;
            self.hi = (self.hi << 1) | 1;
        }

        Ok(())
    }

    /// Emits the terminating bits and flushes the writer, returning it
    pub fn finish(mut self) -> Result<W> {
        // one extra straddle bit makes the tail prefix-free
        self.io.inc_parity();
        let bit = u8::from(self.lo >= QUARTER);
        trace!("[ac] finish after {} symbols, tail bit {}", self.position, bit);
        self.io.write_bit(bit)?;
        self.io.flush()?;
        Ok(self.io)
    }
}

impl<R: ACRead> ArithmeticCoder<R> {
    pub fn new_decoder(mut reader: R) -> Result<Self> {
        let x = u64::from(reader.read_u32()?);
        Ok(Self { lo: 0, hi: ONE, x, position: 0, io: reader })
    }

    /// Recovers the next symbol, updating `model` exactly as the encoder did
    pub fn decode(&mut self, model: &mut impl Model) -> Result<u8> {
        let dist = model.predict();
        let range = self.hi - self.lo + 1;
        let offset = self.x.saturating_sub(self.lo);
        let symbol = dist.locate(|s, f| sub_interval_start(range, s, f) <= offset);

        self.narrow(symbol, &dist)?;
        model.update(symbol);
        self.position += 1;

        // Renormalize range -> read new bits from stream
        loop {
            if self.hi < HALF {
                // nothing to subtract
            } else if self.lo >= HALF {
                self.lo -= HALF;
                self.hi -= HALF;
                self.x = self.x.saturating_sub(HALF);
            } else if self.lo >= QUARTER && self.hi < THREE_QUARTERS {
                self.lo -= QUARTER;
                self.hi -= QUARTER;
                self.x = self.x.saturating_sub(QUARTER);
            } else {
                break;
            }

            self.lo <<= 1;
            self.hi = (self.hi << 1) | 1;
            self.x = (self.x << 1) | u64::from(self.io.read_bit()?);
        }

        Ok(symbol)
    }

    pub fn into_inner(self) -> R {
        self.io
    }
}

/// Offset of `symbol`'s sub-interval from `lo`, strictly increasing in `symbol`
#[inline(always)]
fn sub_interval_start(range: u64, symbol: u8, f: f64) -> u64 {
    // range <= 2^32, exact in f64; F may overshoot 1 by rounding
    let scale = range.saturating_sub(SYMBOLS as u64);
    ((scale as f64 * f).floor() as u64).min(scale) + u64::from(symbol)
}
