use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::entropy_coding::io::{ACReader, ACWriter, BitSink, BitSource};
use crate::entropy_coding::{ACRead, ACWrite, ArithmeticCoder};
use crate::error::{Error, Result};
use crate::models::{BlendedModel, Model, ModelConfig};

/// Big-endian symbol count in front of every compressed container
pub const HEADER_LEN: usize = u64::BITS as usize / 8;

/// Codes every symbol of `input` into `writer` and returns the flushed writer
pub fn encode_into<W: ACWrite>(input: &[u8], model: &mut impl Model, writer: W) -> Result<W> {
    let mut ac = ArithmeticCoder::new_coder(writer);
    for &symbol in input {
        ac.encode(symbol, model)?;
    }
    ac.finish()
}

/// Decodes exactly `len` symbols from `reader`
pub fn decode_from<R: ACRead>(reader: R, len: u64, model: &mut impl Model) -> Result<Vec<u8>> {
    let mut ac = ArithmeticCoder::new_decoder(reader)?;
    // capacity is only a hint, the header may lie
    let mut output = Vec::with_capacity(usize::try_from(len.min(1 << 20)).unwrap_or(0));
    for _ in 0..len {
        output.push(ac.decode(model)?);
    }
    Ok(output)
}

/// Encodes `input` into an unpacked bit vector (one 0/1 per element)
pub fn encode_bits(input: &[u8]) -> Result<Vec<u8>> {
    encode_bits_with(ModelConfig::default(), input)
}

pub fn encode_bits_with(config: ModelConfig, input: &[u8]) -> Result<Vec<u8>> {
    let mut model = BlendedModel::with_config(config);
    let sink = encode_into(input, &mut model, BitSink::new())?;
    let bits = sink.into_bits();
    debug!(
        "encoded {} symbols into {} bits ({} contexts at top order)",
        input.len(),
        bits.len(),
        model.table().context_count(config.window())
    );
    Ok(bits)
}

/// Decodes `len` symbols from a bit vector produced by [`encode_bits`]
pub fn decode_bits(bits: &[u8], len: usize) -> Result<Vec<u8>> {
    decode_bits_with(ModelConfig::default(), bits, len)
}

pub fn decode_bits_with(config: ModelConfig, bits: &[u8], len: usize) -> Result<Vec<u8>> {
    let mut model = BlendedModel::with_config(config);
    let output = decode_from(BitSource::new(bits), len as u64, &mut model)?;
    debug!("decoded {} symbols from {} bits", output.len(), bits.len());
    Ok(output)
}

/// Compresses `input` into a self-describing container:
/// the symbol count as a BE u64, then the bitstream packed MSB first
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    compress_with(ModelConfig::default(), input)
}

pub fn compress_with(config: ModelConfig, input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(HEADER_LEN + input.len() / 2);
    write_container(config, input, &mut output)?;
    Ok(output)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with(ModelConfig::default(), data)
}

pub fn decompress_with(config: ModelConfig, data: &[u8]) -> Result<Vec<u8>> {
    let (len, payload) = split_header(data)?;
    let mut model = BlendedModel::with_config(config);
    decode_from(ACReader::new(payload), len, &mut model)
}

pub fn compress_file(input_path: &Path, output_path: &Path, config: ModelConfig) -> Result<()> {
    let mut input = Vec::new();
    BufReader::new(File::open(input_path)?).read_to_end(&mut input)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    write_container(config, &input, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn decompress_file(input_path: &Path, output_path: &Path, config: ModelConfig) -> Result<()> {
    let mut data = Vec::new();
    BufReader::new(File::open(input_path)?).read_to_end(&mut data)?;
    let output = decompress_with(config, &data)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(&output)?;
    writer.flush()?;
    Ok(())
}

fn write_container<W: Write>(config: ModelConfig, input: &[u8], mut writer: W) -> Result<()> {
    let len = input.len() as u64;
    writer.write_all(&len.to_be_bytes())?;

    debug!("compressing {} symbols with {:?}", len, config);
    let mut model = BlendedModel::with_config(config);
    encode_into(input, &mut model, ACWriter::new(writer))?;
    let contexts: Vec<usize> =
        (0..=config.max_order()).map(|order| model.table().context_count(order)).collect();
    debug!("compressed {} symbols, contexts per order: {:?}", len, contexts);
    Ok(())
}

fn split_header(data: &[u8]) -> Result<(u64, &[u8])> {
    if data.len() < HEADER_LEN {
        return Err(Error::Truncated { expected: HEADER_LEN, actual: data.len() });
    }
    let (header, payload) = data.split_at(HEADER_LEN);
    let mut len = [0; HEADER_LEN];
    len.copy_from_slice(header);
    Ok((u64::from_be_bytes(len), payload))
}
