pub mod arithmetic_coder;
pub mod io;


pub use self::arithmetic_coder::ArithmeticCoder;

use std::io as stdio;

pub trait ACRead {
    /// Read bit or 0 on EOF
    fn read_bit(&mut self) -> stdio::Result<u8>;
    /// Read the first 32 bits as a BE u32, padding with 0s on EOF
    fn read_u32(&mut self) -> stdio::Result<u32>;
}

pub trait ACWrite {
    /// Increases the number of reverse (straddle) bits to write
    fn inc_parity(&mut self);
    /// Writes a bit followed by all pending reverse bits
    fn write_bit(&mut self, bit: u8) -> stdio::Result<()>;
    /// Flushes the internal writer, padding to its natural unit
    fn flush(&mut self) -> stdio::Result<()>;
}
