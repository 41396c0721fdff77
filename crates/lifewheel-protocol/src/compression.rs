//! zlib-wrapped deflate, byte-compatible with `CompressionStream('deflate')`.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{ProtocolError, Result};

/// Compression level for exported batches.
pub const DEFLATE_LEVEL: u32 = 9;

pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(DEFLATE_LEVEL));
    encoder
        .write_all(data)
        .map_err(|e| ProtocolError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ProtocolError::Compression(e.to_string()))
}

pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ProtocolError::Decompression(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"lifewheel lifewheel lifewheel lifewheel";
        let compressed = deflate(data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn zlib_header() {
        // CMF 0x78 (deflate, 32K window), FLG 0xda for maximum compression.
        let compressed = deflate(&[0, 0, 0, 0]).unwrap();
        assert_eq!(&compressed[..2], &[0x78, 0xda]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            inflate(&[1, 2, 3, 4, 5]),
            Err(ProtocolError::Decompression(_))
        ));
    }
}
