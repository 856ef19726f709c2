//! Stream filter registry.
//!
//! Codec logic lives here and nowhere else; stream-owning dictionaries call
//! through `decode`/`encode` by filter name.

use crate::error::{PdfError, Result};
use crate::objects::Dictionary;

/// Apply the named filter in the decode direction.
///
/// Unknown filter names are a format error. `params` is the filter's
/// `/DecodeParms` entry when the stream carries one.
pub fn decode(name: &str, data: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
    match name {
        "FlateDecode" => {
            if let Some(params) = params {
                // Predictor application is up to the consumer of pixel data.
                if params.contains_key("Predictor") {
                    tracing::warn!("flate predictor parameters ignored");
                }
            }
            flate_decode(data)
        }
        "ASCIIHexDecode" => ascii_hex_decode(data),
        other => Err(PdfError::InvalidFormat(format!("unknown filter {other}"))),
    }
}

/// Apply the named filter in the encode direction.
pub fn encode(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    match name {
        "FlateDecode" => flate_encode(data),
        "ASCIIHexDecode" => Ok(ascii_hex_encode(data)),
        other => Err(PdfError::InvalidFormat(format!("unknown filter {other}"))),
    }
}

#[cfg(feature = "compression")]
fn flate_encode(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder
        .finish()
        .map_err(|e| PdfError::CompressionError(e.to_string()))
}

#[cfg(feature = "compression")]
fn flate_decode(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    Ok(decompressed)
}

#[cfg(not(feature = "compression"))]
fn flate_encode(_data: &[u8]) -> Result<Vec<u8>> {
    Err(PdfError::CompressionError(
        "built without the compression feature".into(),
    ))
}

#[cfg(not(feature = "compression"))]
fn flate_decode(_data: &[u8]) -> Result<Vec<u8>> {
    Err(PdfError::CompressionError(
        "built without the compression feature".into(),
    ))
}

fn ascii_hex_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2 + 1);
    for byte in data {
        out.extend_from_slice(format!("{byte:02X}").as_bytes());
    }
    out.push(b'>');
    out
}

fn ascii_hex_decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut pending: Option<u8> = None;
    for &byte in data {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            b'>' => break,
            b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0' => continue,
            other => {
                return Err(PdfError::InvalidFormat(format!(
                    "invalid hex digit 0x{other:02x}"
                )))
            }
        };
        match pending.take() {
            Some(high) => out.push(high << 4 | digit),
            None => pending = Some(digit),
        }
    }
    // An odd final digit is padded with zero.
    if let Some(high) = pending {
        out.push(high << 4);
    }
    Ok(out)
}
