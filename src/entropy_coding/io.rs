use std::io::{self, Bytes, Read, Write};

use super::{ACRead, ACWrite};

/// Packed bit source over any `io::Read`, MSB first, zeros past the end
pub struct ACReader<R> {
    bytes: Bytes<R>,
    byte: u8,
    left: u32, // unread bits in `byte`
}

impl<R: Read> ACReader<R> {
    pub fn new(inner: R) -> Self {
        Self { bytes: inner.bytes(), byte: 0, left: 0 }
    }

    fn next_byte(&mut self) -> io::Result<u8> {
        self.bytes.next().transpose().map(|byte| byte.unwrap_or(0))
    }
}

impl<R: Read> ACRead for ACReader<R> {
    fn read_bit(&mut self) -> io::Result<u8> {
        if self.left == 0 {
            self.byte = self.next_byte()?;
            self.left = u8::BITS;
        }
        self.left -= 1;
        Ok((self.byte >> self.left) & 1)
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        debug_assert!(self.left == 0, "read_u32 must start byte aligned");
        let mut x = 0;
        for _ in 0..4 {
            x = (x << 8) | u32::from(self.next_byte()?);
        }
        Ok(x)
    }
}

/// Packed bit sink over any `io::Write`, MSB first
pub struct ACWriter<W> {
    inner: W,
    acc: u8,
    filled: u32, // bits already in `acc`
    pending: u64,
}

impl<W: Write> ACWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, acc: 0, filled: 0, pending: 0 }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn push(&mut self, bit: u8) -> io::Result<()> {
        self.acc = (self.acc << 1) | bit;
        self.filled += 1;
        if self.filled == u8::BITS {
            self.inner.write_all(&[self.acc])?;
            self.acc = 0;
            self.filled = 0;
        }
        Ok(())
    }
}

impl<W: Write> ACWrite for ACWriter<W> {
    fn inc_parity(&mut self) {
        self.pending += 1;
    }

    fn write_bit(&mut self, bit: u8) -> io::Result<()> {
        debug_assert!(bit <= 1, "not a bit: {bit}");
        self.push(bit)?;
        for _ in 0..std::mem::take(&mut self.pending) {
            self.push(bit ^ 1)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        // zero padding matches what the reader yields past EOF
        while self.filled > 0 {
            self.push(0)?;
        }
        self.inner.flush()
    }
}

/// Unpacked in-memory bit sink, one `u8` (0 or 1) per bit
#[derive(Debug, Default)]
pub struct BitSink {
    bits: Vec<u8>,
    rev_bits: u64,
}

impl BitSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }
}

impl ACWrite for BitSink {
    fn inc_parity(&mut self) {
        self.rev_bits += 1;
    }

    fn write_bit(&mut self, bit: u8) -> io::Result<()> {
        debug_assert!(bit <= 1, "not a bit: {bit}");
        self.bits.push(bit);
        let pending = std::mem::take(&mut self.rev_bits) as usize;
        self.bits.extend(std::iter::repeat(bit ^ 1).take(pending));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads an unpacked bit slice, yields 0s once the slice is exhausted
#[derive(Debug)]
pub struct BitSource<'a> {
    bits: &'a [u8],
    pos: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(bits: &'a [u8]) -> Self {
        Self { bits, pos: 0 }
    }

    /// Number of genuine (non-padding) bits consumed so far
    pub fn consumed(&self) -> usize {
        self.pos.min(self.bits.len())
    }
}

impl ACRead for BitSource<'_> {
    fn read_bit(&mut self) -> io::Result<u8> {
        let bit = self.bits.get(self.pos).map_or(0, |&bit| bit & 1);
        self.pos += 1;
        Ok(bit)
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        let mut x = 0;
        for _ in 0..u32::BITS {
            x = (x << 1) | u32::from(self.read_bit()?);
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::{ACRead, ACReader, ACWrite, ACWriter, BitSink, BitSource};

    #[test]
    fn reader_is_msb_first() {
        let data = [0b1100_0001, 0b0111_1110];
        let mut reader = ACReader::new(&data[..]);
        let bits: Vec<u8> = (0..16).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(bits, [1, 1, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 0]);
        assert!((0..20).all(|_| reader.read_bit().unwrap() == 0));
    }

    #[test]
    fn reader_u32_pads_short_input() {
        let mut reader = ACReader::new(&[0xca, 0xfe, 0x01][..]);
        assert_eq!(reader.read_u32().unwrap(), 0xcafe_0100);
        assert_eq!(reader.read_bit().unwrap(), 0);
    }

    #[test]
    fn pending_bits_cross_bytes() {
        let mut data = Vec::new();
        let mut writer = ACWriter::new(&mut data);
        for _ in 0..5 {
            writer.write_bit(0).unwrap();
        }
        for _ in 0..4 {
            writer.inc_parity();
        }
        writer.write_bit(1).unwrap(); // 1 then 0000
        writer.write_bit(1).unwrap();
        writer.flush().unwrap();
        assert_eq!(data, [0b0000_0100, 0b0010_0000]);
    }

    #[test]
    fn flush_on_byte_boundary() {
        let mut data = Vec::new();
        let mut writer = ACWriter::new(&mut data);
        for bit in [1, 0, 1, 0, 1, 0, 1, 0] {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(data, [0xaa]);
    }

    #[test]
    fn writer_then_reader() {
        let bits = [1, 0, 0, 1, 1, 1, 0, 1, 0, 1, 1];
        let mut data = Vec::new();
        let mut writer = ACWriter::new(&mut data);
        bits.iter().for_each(|&bit| writer.write_bit(bit).unwrap());
        writer.flush().unwrap();
        assert_eq!(data.len(), 2);

        let mut reader = ACReader::new(data.as_slice());
        for &bit in &bits {
            assert_eq!(reader.read_bit().unwrap(), bit);
        }
        // padding
        assert_eq!(reader.read_bit().unwrap(), 0);
    }

    #[test]
    fn sink_and_source_agree() {
        let mut sink = BitSink::new();
        sink.write_bit(1).unwrap();
        sink.inc_parity();
        sink.inc_parity();
        sink.write_bit(0).unwrap();
        let bits = sink.into_bits();
        assert_eq!(bits, [1, 0, 1, 1]);

        let mut source = BitSource::new(&bits);
        assert_eq!(source.read_u32().unwrap(), 0b1011 << 28);
        assert_eq!(source.consumed(), 4);
        assert_eq!(source.read_bit().unwrap(), 0);
    }
}
