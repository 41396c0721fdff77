//! Single-entry record codec.
//!
//! Layout: `[time: u32 BE seconds][values][comment length: u32 BE][comment UTF-8]`,
//! where the comment part only exists in layouts with comments.

use chrono::{DateTime, Utc};

use crate::bytes::{decode_utf8_string, encode_length, encode_uint32, ByteReader};
use crate::error::{ProtocolError, Result};
use crate::layout::WireLayout;
use crate::types::{ProtocolVersion, ReflectionEntry, DIMENSIONS, MAX_PACKED_VALUE};

/// Pack each adjacent pair of values into one byte, high nibble first.
///
/// Values above 15 are rejected rather than wrapped.
pub fn pack_values(data: &[u8; DIMENSIONS]) -> Result<[u8; DIMENSIONS / 2]> {
    if let Some((index, &value)) = data
        .iter()
        .enumerate()
        .find(|(_, v)| **v > MAX_PACKED_VALUE)
    {
        return Err(ProtocolError::ValueOutOfRange { index, value });
    }
    let mut packed = [0u8; DIMENSIONS / 2];
    for (i, byte) in packed.iter_mut().enumerate() {
        *byte = (data[2 * i] << 4) | data[2 * i + 1];
    }
    Ok(packed)
}

pub fn unpack_values(packed: &[u8; DIMENSIONS / 2]) -> [u8; DIMENSIONS] {
    let mut data = [0u8; DIMENSIONS];
    for (i, byte) in packed.iter().enumerate() {
        data[2 * i] = byte >> 4;
        data[2 * i + 1] = byte & 0x0f;
    }
    data
}

fn decode_time(seconds: u32) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(seconds), 0)
        .ok_or_else(|| ProtocolError::CorruptBatch(format!("invalid timestamp {}", seconds)))
}

/// Encode one entry for the given protocol version.
pub fn encode_entry(entry: &ReflectionEntry, version: ProtocolVersion) -> Result<Vec<u8>> {
    encode_entry_with(entry, &WireLayout::for_version(version)?)
}

/// Decode one entry record for the given protocol version.
pub fn decode_entry(bytes: &[u8], version: ProtocolVersion) -> Result<ReflectionEntry> {
    decode_entry_with(bytes, &WireLayout::for_version(version)?)
}

pub(crate) fn encode_entry_with(entry: &ReflectionEntry, layout: &WireLayout) -> Result<Vec<u8>> {
    let comment = entry.comment.as_bytes();
    let comment_part = if layout.comments { 4 + comment.len() } else { 0 };
    let mut out = Vec::with_capacity(4 + layout.values_length() + comment_part);

    out.extend_from_slice(&encode_uint32(entry.time.timestamp()));
    if layout.packed_values {
        out.extend_from_slice(&pack_values(&entry.data)?);
    } else {
        out.extend_from_slice(&entry.data);
    }
    if layout.comments {
        out.extend_from_slice(&encode_length(comment.len())?);
        out.extend_from_slice(comment);
    }
    Ok(out)
}

pub(crate) fn decode_entry_with(bytes: &[u8], layout: &WireLayout) -> Result<ReflectionEntry> {
    if let Some(expected) = layout.fixed_entry_length() {
        if bytes.len() != expected {
            return Err(ProtocolError::CorruptBatch(format!(
                "entry is {} bytes, expected {}",
                bytes.len(),
                expected
            )));
        }
    }

    let mut reader = ByteReader::new(bytes);
    let time = decode_time(reader.read_uint32()?)?;

    let values = reader.take(layout.values_length())?;
    let data = if layout.packed_values {
        unpack_values(&[values[0], values[1], values[2], values[3]])
    } else {
        let mut data = [0u8; DIMENSIONS];
        data.copy_from_slice(values);
        data
    };

    let comment = if layout.comments {
        let declared = reader.read_uint32()? as usize;
        if declared > reader.remaining() {
            return Err(ProtocolError::CorruptBatch(format!(
                "comment claims {} bytes, only {} left in entry",
                declared,
                reader.remaining()
            )));
        }
        // The entry's own length prefix bounds the comment. Older browser
        // builds stored the comment length in UTF-16 units, which undercounts
        // non-ASCII text, so the whole remainder is the comment.
        decode_utf8_string(reader.rest())
    } else {
        String::new()
    };

    Ok(ReflectionEntry { time, data, comment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LAYOUT_V1, LAYOUT_V2, LAYOUT_V3};
    use chrono::TimeZone;

    fn entry(comment: &str) -> ReflectionEntry {
        ReflectionEntry::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8],
            comment,
        )
    }

    #[test]
    fn packs_high_nibble_first() {
        assert_eq!(
            pack_values(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap(),
            [0x12, 0x34, 0x56, 0x78]
        );
    }

    #[test]
    fn nibble_boundaries() {
        let packed = pack_values(&[15, 0, 0, 15, 10, 10, 1, 1]).unwrap();
        assert_eq!(packed, [0xf0, 0x0f, 0xaa, 0x11]);
        assert_eq!(unpack_values(&packed), [15, 0, 0, 15, 10, 10, 1, 1]);
    }

    #[test]
    fn rejects_sixteen() {
        assert!(matches!(
            pack_values(&[1, 1, 1, 16, 1, 1, 1, 1]),
            Err(ProtocolError::ValueOutOfRange { index: 3, value: 16 })
        ));
    }

    #[test]
    fn v1_layout() {
        let bytes = encode_entry(&entry(""), 1).unwrap();
        assert_eq!(hex::encode(&bytes), "659200800102030405060708");
        assert_eq!(decode_entry_with(&bytes, &LAYOUT_V1).unwrap(), entry(""));
    }

    #[test]
    fn v1_keeps_values_above_nibble_range() {
        let mut e = entry("");
        e.data = [200, 1, 1, 1, 1, 1, 1, 1];
        let bytes = encode_entry_with(&e, &LAYOUT_V1).unwrap();
        assert_eq!(decode_entry_with(&bytes, &LAYOUT_V1).unwrap().data[0], 200);
    }

    #[test]
    fn v2_layout_drops_comment() {
        let bytes = encode_entry(&entry("ignored"), 2).unwrap();
        assert_eq!(hex::encode(&bytes), "6592008012345678");
        assert_eq!(decode_entry_with(&bytes, &LAYOUT_V2).unwrap(), entry(""));
    }

    #[test]
    fn v3_layout() {
        let bytes = encode_entry(&entry("ok"), 3).unwrap();
        assert_eq!(hex::encode(&bytes), "6592008012345678000000026f6b");
        assert_eq!(decode_entry_with(&bytes, &LAYOUT_V3).unwrap(), entry("ok"));
    }

    #[test]
    fn v3_comment_length_counts_bytes() {
        let bytes = encode_entry(&entry("hå"), 3).unwrap();
        assert_eq!(&bytes[8..12], &[0, 0, 0, 3]);
        assert_eq!(decode_entry(&bytes, 3).unwrap().comment, "hå");
    }

    #[test]
    fn v3_accepts_utf16_comment_length() {
        let mut bytes = encode_entry(&entry("hå"), 3).unwrap();
        bytes[11] = 2;
        assert_eq!(decode_entry(&bytes, 3).unwrap().comment, "hå");
    }

    #[test]
    fn v3_rejects_overlong_comment_length() {
        let mut bytes = encode_entry(&entry("ok"), 3).unwrap();
        bytes[11] = 9;
        assert!(decode_entry(&bytes, 3).is_err());
    }

    #[test]
    fn fixed_layouts_reject_wrong_size() {
        assert!(decode_entry(&[0u8; 11], 1).is_err());
        assert!(decode_entry(&[0u8; 9], 2).is_err());
        assert!(decode_entry(&[0u8; 6], 3).is_err());
    }

    #[test]
    fn pre_epoch_time_saturates_to_zero() {
        let e = ReflectionEntry::new(Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap(), [1; 8], "");
        let bytes = encode_entry(&e, 3).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn unknown_version() {
        assert!(matches!(
            encode_entry(&entry(""), 9),
            Err(ProtocolError::UnsupportedVersion(9))
        ));
    }
}
