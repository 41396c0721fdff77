//! Entry-list codec.
//!
//! Layout before compression:
//! `[count: u32 BE][entry]*` for fixed-size layouts, and
//! `[count: u32 BE]([entry length: u32 BE][entry])*` for layouts with comments.

use tracing::{debug, warn};

use crate::bytes::{encode_length, ByteReader};
use crate::compression::{deflate, inflate};
use crate::entry::{decode_entry_with, encode_entry_with};
use crate::error::{ProtocolError, Result};
use crate::layout::WireLayout;
use crate::types::{ProtocolVersion, ReflectionEntry};

/// Encode entries in the given order using the given protocol version.
pub fn encode_batch(entries: &[ReflectionEntry], version: ProtocolVersion) -> Result<Vec<u8>> {
    encode_batch_with(entries, &WireLayout::for_version(version)?)
}

/// Decode a batch written by the given protocol version.
///
/// Fails if the number of decoded entries does not match the declared count.
pub fn decode_batch(data: &[u8], version: ProtocolVersion) -> Result<Vec<ReflectionEntry>> {
    decode_batch_with(data, &WireLayout::for_version(version)?)
}

pub(crate) fn encode_batch_with(
    entries: &[ReflectionEntry],
    layout: &WireLayout,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&encode_length(entries.len())?);
    for entry in entries {
        let record = encode_entry_with(entry, layout)?;
        if layout.comments {
            out.extend_from_slice(&encode_length(record.len())?);
        }
        out.extend_from_slice(&record);
    }

    if !layout.compressed {
        return Ok(out);
    }
    let compressed = deflate(&out)?;
    debug!(
        version = layout.version,
        entries = entries.len(),
        raw = out.len(),
        compressed = compressed.len(),
        "encoded batch"
    );
    Ok(compressed)
}

pub(crate) fn decode_batch_with(data: &[u8], layout: &WireLayout) -> Result<Vec<ReflectionEntry>> {
    let inflated;
    let raw = if layout.compressed {
        inflated = match inflate(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(version = layout.version, error = %e, "failed to decompress batch");
                return Err(e);
            }
        };
        inflated.as_slice()
    } else {
        data
    };

    let mut reader = ByteReader::new(raw);
    let expected = reader.read_uint32()?;
    // The count is untrusted; never preallocate more than the data could hold.
    let mut entries = Vec::with_capacity((expected as usize).min(raw.len() / 8));

    match layout.fixed_entry_length() {
        Some(entry_length) => {
            while !reader.is_empty() {
                let record = reader
                    .take(entry_length)
                    .map_err(|_| count_mismatch(expected, entries.len(), layout))?;
                entries.push(decode_entry_with(record, layout)?);
            }
        }
        None => {
            while !reader.is_empty() {
                let length = reader.read_uint32()? as usize;
                let record = reader.take(length)?;
                entries.push(decode_entry_with(record, layout)?);
            }
        }
    }

    if entries.len() != expected as usize {
        return Err(count_mismatch(expected, entries.len(), layout));
    }
    debug!(version = layout.version, entries = entries.len(), "decoded batch");
    Ok(entries)
}

fn count_mismatch(expected: u32, decoded: usize, layout: &WireLayout) -> ProtocolError {
    warn!(version = layout.version, expected, decoded, "batch entry count mismatch");
    ProtocolError::EntryCountMismatch { expected, decoded }
}
