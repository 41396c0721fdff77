//! Reflection entries and the value types passed across the protocol API.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one frozen wire format.
pub type ProtocolVersion = u32;

/// Number of life dimensions rated per reflection.
pub const DIMENSIONS: usize = 8;

/// Lowest rating the UI hands out.
pub const MIN_LEVEL: u8 = 1;

/// Highest rating the UI hands out.
pub const MAX_LEVEL: u8 = 10;

/// Largest value that survives nibble packing.
pub const MAX_PACKED_VALUE: u8 = 15;

/// Discriminator stored in the `type` field of every save file.
pub const SAVE_FILE_TYPE: &str = "lifewheel";

/// One reflection: a rating for each dimension, a timestamp, and an
/// optional free-text comment (empty when absent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReflectionEntry {
    #[serde(with = "time_format")]
    pub time: DateTime<Utc>,
    pub data: [u8; DIMENSIONS],
    #[serde(default)]
    pub comment: String,
}

impl ReflectionEntry {
    /// Create an entry, truncating `time` to whole seconds.
    pub fn new(time: DateTime<Utc>, data: [u8; DIMENSIONS], comment: impl Into<String>) -> Self {
        Self {
            time: time.trunc_subsecs(0),
            data,
            comment: comment.into(),
        }
    }

    /// Create an entry stamped with the current time.
    pub fn now(data: [u8; DIMENSIONS], comment: impl Into<String>) -> Self {
        Self::new(Utc::now(), data, comment)
    }

    /// Whether every rating lies in `MIN_LEVEL..=MAX_LEVEL`.
    ///
    /// Codecs accept any value that fits the wire format; this is the
    /// stricter check for entries about to be shown or stored.
    pub fn has_valid_levels(&self) -> bool {
        self.data
            .iter()
            .all(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
    }
}

/// A link split into its header fields and decoded payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub encrypted: bool,
    pub version: ProtocolVersion,
    pub data: Vec<u8>,
}

/// Settings the application shell supplies when exporting.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Location of the app that wrote the file, stored in the `url` field.
    pub url: String,
}

impl ExportOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// RFC 3339 timestamps with millisecond precision, the way browsers
/// serialize dates. Parsed instants are truncated to whole seconds.
mod time_format {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc).trunc_subsecs(0))
            .map_err(serde::de::Error::custom)
    }
}
