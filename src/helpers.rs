use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use crate::entropy_coding;

/// Returns the offset of the first byte where the files differ,
/// or the length of the shorter one if it is a prefix of the other
pub fn cmp(file1: &Path, file2: &Path) -> io::Result<Option<u64>> {
    let r1 = BufReader::new(File::open(file1)?);
    let r2 = BufReader::new(File::open(file2)?);

    let mut bytes1 = r1.bytes();
    let mut bytes2 = r2.bytes();
    let mut pos = 0;
    loop {
        match (bytes1.next().transpose()?, bytes2.next().transpose()?) {
            (None, None) => return Ok(None),
            (Some(b1), Some(b2)) if b1 == b2 => pos += 1,
            _ => return Ok(Some(pos)),
        }
    }
}

/// Counting sink: measures the coded size without producing output
#[derive(Debug, Default)]
pub struct ACStats {
    bit_count: u64,
    rev_bits: u64,
}

impl ACStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits(&self) -> u64 {
        self.bit_count
    }

    /// Compressed size in bytes, padding included
    pub fn result(&self) -> u64 {
        self.bit_count.div_ceil(8)
    }
}

impl entropy_coding::ACWrite for ACStats {
    fn inc_parity(&mut self) {
        self.rev_bits += 1;
    }

    fn write_bit(&mut self, _bit: u8) -> io::Result<()> {
        self.bit_count += 1 + self.rev_bits;
        self.rev_bits = 0;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
