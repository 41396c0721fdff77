//! Fixed-width integer and UTF-8 string primitives shared by every
//! protocol version.

use crate::error::{ProtocolError, Result};

/// Encode `n` as a big-endian u32, saturating into `[0, u32::MAX]`.
pub fn encode_uint32(n: i64) -> [u8; 4] {
    let clamped = n.clamp(0, i64::from(u32::MAX)) as u32;
    clamped.to_be_bytes()
}

/// Decode a big-endian u32.
pub fn decode_uint32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Encode a byte length as a u32 prefix. Unlike [`encode_uint32`] this
/// refuses to saturate, since a clamped length would corrupt the stream.
pub fn encode_length(len: usize) -> Result<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| ProtocolError::LengthOverflow(len))
}

pub fn encode_utf8_string(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode UTF-8, replacing invalid sequences the way `TextDecoder` does.
pub fn decode_utf8_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Concatenate chunks in order into one buffer.
pub fn concat_bytes(chunks: &[&[u8]]) -> Vec<u8> {
    let total = chunks.iter().map(|c| c.len()).sum();
    let mut out = Vec::with_capacity(total);
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out
}

/// Bounds-checked cursor over a decoded buffer.
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                ProtocolError::CorruptBatch(format!(
                    "needed {} bytes at offset {}, only {} available",
                    len,
                    self.offset,
                    self.remaining()
                ))
            })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub fn read_uint32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(decode_uint32([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.offset..];
        self.offset = self.data.len();
        slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint32_is_big_endian() {
        assert_eq!(encode_uint32(0x01020304), [1, 2, 3, 4]);
        assert_eq!(decode_uint32([1, 2, 3, 4]), 0x01020304);
    }

    #[test]
    fn uint32_saturates() {
        assert_eq!(encode_uint32(-5), [0, 0, 0, 0]);
        assert_eq!(encode_uint32(1 << 40), [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(decode_uint32(encode_uint32(i64::from(u32::MAX))), u32::MAX);
    }

    #[test]
    fn utf8_round_trip() {
        let text = "Kärlek & hälsa 🌱";
        assert_eq!(decode_utf8_string(&encode_utf8_string(text)), text);
        assert_eq!(encode_utf8_string("é").len(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_utf8_string(&[0x61, 0xff, 0x62]), "a\u{fffd}b");
    }

    #[test]
    fn concat_preserves_order() {
        assert_eq!(concat_bytes(&[&[1, 2], &[], &[3]]), vec![1, 2, 3]);
        assert!(concat_bytes(&[]).is_empty());
    }

    #[test]
    fn reader_bounds() {
        let data = [0, 0, 0, 7, 9];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_uint32().unwrap(), 7);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_uint32().is_err());
        assert_eq!(reader.take(1).unwrap(), &[9]);
        assert!(reader.is_empty());
        assert!(reader.take(usize::MAX).is_err());
    }
}
