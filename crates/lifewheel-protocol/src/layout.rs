//! Frozen byte layouts, one per protocol version.
//!
//! | version | values          | compressed | comment |
//! |---------|-----------------|------------|---------|
//! | 1       | 8 bytes         | no         | no      |
//! | 2       | 4 nibble bytes  | yes        | no      |
//! | 3       | 4 nibble bytes  | yes        | yes     |
//!
//! A layout must never change once released; new formats get a new version.

use crate::error::{ProtocolError, Result};
use crate::types::{ProtocolVersion, DIMENSIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireLayout {
    pub version: ProtocolVersion,
    /// Two 4-bit values per byte instead of one value per byte.
    pub packed_values: bool,
    /// The whole batch is deflate-compressed after encoding.
    pub compressed: bool,
    /// Entries carry a length-prefixed comment, and the batch prefixes each
    /// entry with its own byte length.
    pub comments: bool,
}

pub const LAYOUT_V1: WireLayout = WireLayout {
    version: 1,
    packed_values: false,
    compressed: false,
    comments: false,
};

pub const LAYOUT_V2: WireLayout = WireLayout {
    version: 2,
    packed_values: true,
    compressed: true,
    comments: false,
};

pub const LAYOUT_V3: WireLayout = WireLayout {
    version: 3,
    packed_values: true,
    compressed: true,
    comments: true,
};

const LAYOUTS: &[WireLayout] = &[LAYOUT_V1, LAYOUT_V2, LAYOUT_V3];

/// Timestamp prefix of every entry.
pub const TIME_LENGTH: usize = 4;

impl WireLayout {
    pub fn for_version(version: ProtocolVersion) -> Result<Self> {
        LAYOUTS
            .iter()
            .find(|l| l.version == version)
            .copied()
            .ok_or(ProtocolError::UnsupportedVersion(version))
    }

    /// Bytes used by the eight dimension values.
    pub fn values_length(&self) -> usize {
        if self.packed_values {
            DIMENSIONS / 2
        } else {
            DIMENSIONS
        }
    }

    /// Size of one entry record, or `None` when entries vary in length.
    pub fn fixed_entry_length(&self) -> Option<usize> {
        if self.comments {
            None
        } else {
            Some(TIME_LENGTH + self.values_length())
        }
    }
}
