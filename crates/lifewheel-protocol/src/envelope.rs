//! Link and save-file envelopes.
//!
//! Link: `<encrypted 0|1>e<version>p<base64url payload>`, e.g. `0e3peJz...`.
//! File: `{"type":"lifewheel","version":3,"url":"...","encrypted":false,"data":[...]}`
//! where `data` is the entry list, or the base64url payload when encrypted.

use std::sync::OnceLock;

use chrono::NaiveDate;
use lifewheel_crypto::{base64url_decode, base64url_encode, CryptoError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::types::{ParsedLink, ProtocolVersion, ReflectionEntry, SAVE_FILE_TYPE};

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^([01])e(\d+)p").expect("static regex is valid"))
}

/// Header fields of a link plus the still-encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkHeader<'a> {
    pub encrypted: bool,
    pub version: ProtocolVersion,
    pub remainder: &'a str,
}

pub fn format_header(encrypted: bool, version: ProtocolVersion) -> String {
    format!("{}e{}p", if encrypted { '1' } else { '0' }, version)
}

pub fn parse_header(link: &str) -> Result<LinkHeader<'_>> {
    let captures = header_regex()
        .captures(link)
        .ok_or_else(|| ProtocolError::InvalidHeader(truncate_for_error(link)))?;

    let encrypted = &captures[1] == "1";
    let version = captures[2]
        .parse::<ProtocolVersion>()
        .map_err(|_| ProtocolError::InvalidHeader(truncate_for_error(link)))?;
    let remainder = &link[captures[0].len()..];
    if remainder.is_empty() {
        return Err(ProtocolError::EmptyLinkData);
    }

    Ok(LinkHeader {
        encrypted,
        version,
        remainder,
    })
}

pub fn format_link(data: &[u8], encrypted: bool, version: ProtocolVersion) -> String {
    format_header(encrypted, version) + &base64url_encode(data)
}

/// Parse the header and decode the payload.
pub fn parse_link(link: &str) -> Result<ParsedLink> {
    let header = parse_header(link)?;
    let data = decode_payload(header.remainder)?;
    Ok(ParsedLink {
        encrypted: header.encrypted,
        version: header.version,
        data,
    })
}

fn decode_payload(encoded: &str) -> Result<Vec<u8>> {
    base64url_decode(encoded).map_err(|e| match e {
        CryptoError::InvalidBase64(reason) => ProtocolError::InvalidBase64(reason),
        other => other.into(),
    })
}

fn truncate_for_error(link: &str) -> String {
    link.chars().take(16).collect()
}

/// The `data` field of a save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaveFileData {
    Entries(Vec<ReflectionEntry>),
    /// base64url of an encrypted payload.
    Encrypted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub version: ProtocolVersion,
    pub url: String,
    pub encrypted: bool,
    pub data: SaveFileData,
}

impl SaveFile {
    pub fn plain(version: ProtocolVersion, url: &str, entries: Vec<ReflectionEntry>) -> Self {
        Self {
            file_type: SAVE_FILE_TYPE.to_string(),
            version,
            url: url.to_string(),
            encrypted: false,
            data: SaveFileData::Entries(entries),
        }
    }

    pub fn encrypted(version: ProtocolVersion, url: &str, payload: &[u8]) -> Self {
        Self {
            file_type: SAVE_FILE_TYPE.to_string(),
            version,
            url: url.to_string(),
            encrypted: true,
            data: SaveFileData::Encrypted(base64url_encode(payload)),
        }
    }

    /// Parse and validate a save file.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: SaveFile = serde_json::from_str(text)?;
        file.validate()?;
        Ok(file)
    }

    /// Check the type discriminator and that `encrypted` agrees with `data`.
    pub fn validate(&self) -> Result<()> {
        if self.file_type != SAVE_FILE_TYPE {
            return Err(ProtocolError::InvalidFile(format!(
                "unsupported file type {:?}",
                self.file_type
            )));
        }
        match (&self.data, self.encrypted) {
            (SaveFileData::Entries(_), false) | (SaveFileData::Encrypted(_), true) => Ok(()),
            (SaveFileData::Entries(_), true) => Err(ProtocolError::InvalidFile(
                "marked encrypted but contains plain entries".to_string(),
            )),
            (SaveFileData::Encrypted(_), false) => Err(ProtocolError::InvalidFile(
                "marked unencrypted but contains an encrypted payload".to_string(),
            )),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Decoded bytes of an encrypted file's payload.
    pub fn encrypted_payload(&self) -> Result<Vec<u8>> {
        match &self.data {
            SaveFileData::Encrypted(encoded) => decode_payload(encoded),
            SaveFileData::Entries(_) => Err(ProtocolError::InvalidFile(
                "file does not contain an encrypted payload".to_string(),
            )),
        }
    }

    /// Pretty JSON with numeric arrays kept on one line.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(minify_json_arrays(&serde_json::to_string_pretty(self)?))
    }
}

/// Collapse arrays that hold only numbers onto a single line.
///
/// Purely cosmetic; string contents are never touched.
pub fn minify_json_arrays(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < json.len() {
        let c = json[i..].chars().next().unwrap_or_default();
        let width = c.len_utf8();

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += width;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '[' => {
                if let Some((collapsed, consumed)) = collapse_numeric_array(&json[i..]) {
                    out.push_str(&collapsed);
                    i += consumed;
                    continue;
                }
                out.push(c);
            }
            _ => out.push(c),
        }
        i += width;
    }
    out
}

/// If `s` starts with an array of plain numbers, return it on one line along
/// with the number of bytes it spanned.
fn collapse_numeric_array(s: &str) -> Option<(String, usize)> {
    let end = s.find(']')?;
    let inner = &s[1..end];
    let is_numeric = inner.chars().all(|c| {
        c.is_ascii_digit() || c.is_ascii_whitespace() || matches!(c, ',' | '-' | '+' | '.' | 'e' | 'E')
    });
    if !is_numeric || !inner.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let items: Vec<&str> = inner.split(',').map(str::trim).collect();
    Some((format!("[{}]", items.join(", ")), end + 1))
}

/// Suggested download name, e.g. `2024-01-31-lifewheel.json`.
pub fn save_file_name(date: NaiveDate) -> String {
    format!("{}-lifewheel.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry() -> ReflectionEntry {
        ReflectionEntry::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8],
            "note [1, 2]",
        )
    }

    #[test]
    fn header_round_trip() {
        for encrypted in [false, true] {
            for version in [1, 2, 3, 10, 4096, u32::MAX] {
                let link = format!("{}AAAA", format_header(encrypted, version));
                let header = parse_header(&link).unwrap();
                assert_eq!(header.encrypted, encrypted);
                assert_eq!(header.version, version);
                assert_eq!(header.remainder, "AAAA");
            }
        }
        assert_eq!(format_header(true, 3), "1e3p");
        assert_eq!(format_header(false, 12), "0e12p");
    }

    #[test]
    fn rejects_bad_headers() {
        for link in ["", "2e3pAAAA", "0x3pAAAA", "0epAAAA", " 0e3pAAAA", "e3pAAAA", "0e3AAAA"] {
            assert!(
                matches!(parse_header(link), Err(ProtocolError::InvalidHeader(_))),
                "{link:?}"
            );
        }
        assert!(matches!(
            parse_header("0e99999999999999999999pAAAA"),
            Err(ProtocolError::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(
            parse_header("1e3p"),
            Err(ProtocolError::EmptyLinkData)
        ));
    }

    #[test]
    fn link_round_trip() {
        let link = format_link(&[0xfb, 0xff, 0xfe, 0x00], true, 3);
        assert!(link.starts_with("1e3p"));
        assert!(!link.contains('='));
        let parsed = parse_link(&link).unwrap();
        assert!(parsed.encrypted);
        assert_eq!(parsed.version, 3);
        assert_eq!(parsed.data, vec![0xfb, 0xff, 0xfe, 0x00]);
    }

    #[test]
    fn rejects_non_base64url_payload() {
        assert!(matches!(
            parse_link("0e3p+/=="),
            Err(ProtocolError::InvalidBase64(_))
        ));
    }

    #[test]
    fn save_file_field_names() {
        let file = SaveFile::plain(3, "https://example.com/", vec![entry()]);
        let value: serde_json::Value =
            serde_json::from_str(&file.to_pretty_json().unwrap()).unwrap();
        assert_eq!(value["type"], "lifewheel");
        assert_eq!(value["version"], 3);
        assert_eq!(value["url"], "https://example.com/");
        assert_eq!(value["encrypted"], false);
        assert_eq!(value["data"][0]["time"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["data"][0]["comment"], "note [1, 2]");
    }

    #[test]
    fn pretty_json_collapses_data_arrays() {
        let file = SaveFile::plain(3, "u", vec![entry()]);
        let json = file.to_pretty_json().unwrap();
        assert!(json.contains(r#""data": [1, 2, 3, 4, 5, 6, 7, 8]"#));
        assert!(json.contains('\n'));
        assert_eq!(SaveFile::from_json(&json).unwrap(), file);
    }

    #[test]
    fn minify_leaves_strings_alone() {
        let json = "{\n  \"a\": \"[1,\\n 2]\",\n  \"b\": [\n    1,\n    2\n  ],\n  \"c\": []\n}";
        let minified = minify_json_arrays(json);
        assert!(minified.contains(r#""a": "[1,\n 2]""#));
        assert!(minified.contains(r#""b": [1, 2]"#));
        assert!(minified.contains(r#""c": []"#));
    }

    #[test]
    fn encrypted_file_shape() {
        let file = SaveFile::encrypted(3, "u", &[1, 2, 3]);
        let json = serde_json::to_string(&file).unwrap();
        assert_eq!(
            json,
            r#"{"type":"lifewheel","version":3,"url":"u","encrypted":true,"data":"AQID"}"#
        );
        let parsed = SaveFile::from_json(&json).unwrap();
        assert!(parsed.is_encrypted());
        assert_eq!(parsed.encrypted_payload().unwrap(), vec![1, 2, 3]);
        assert!(SaveFile::plain(3, "u", vec![]).encrypted_payload().is_err());
        let mangled = SaveFile {
            data: SaveFileData::Encrypted("not base64!".to_string()),
            ..SaveFile::encrypted(3, "u", &[1])
        };
        assert!(matches!(
            mangled.encrypted_payload(),
            Err(ProtocolError::InvalidBase64(_))
        ));
    }

    #[test]
    fn rejects_foreign_files() {
        let json = r#"{"type":"other","version":1,"url":"","encrypted":false,"data":[]}"#;
        assert!(matches!(
            SaveFile::from_json(json),
            Err(ProtocolError::InvalidFile(_))
        ));
    }

    #[test]
    fn rejects_inconsistent_encryption_flag() {
        let json = r#"{"type":"lifewheel","version":3,"url":"","encrypted":true,"data":[]}"#;
        assert!(SaveFile::from_json(json).is_err());
        let json = r#"{"type":"lifewheel","version":3,"url":"","encrypted":false,"data":"AQID"}"#;
        assert!(SaveFile::from_json(json).is_err());
    }

    #[test]
    fn reads_v1_files_without_comments() {
        let json = r#"{
  "type": "lifewheel",
  "version": 1,
  "url": "https://example.com/",
  "encrypted": false,
  "data": [{"time": "2023-02-03T10:00:00.000Z", "data": [5, 5, 5, 5, 5, 5, 5, 5]}]
}"#;
        let file = SaveFile::from_json(json).unwrap();
        match file.data {
            SaveFileData::Entries(entries) => assert_eq!(entries[0].comment, ""),
            SaveFileData::Encrypted(_) => panic!("expected entries"),
        }
    }

    #[test]
    fn file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(save_file_name(date), "2024-01-31-lifewheel.json");
    }
}
