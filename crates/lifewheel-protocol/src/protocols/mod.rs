//! The `Protocol` capability and the registry of every released version.
//!
//! Each version is frozen once released: its decoder must keep reading what
//! it once wrote. Only the current version is ever used to export.

mod v1;
mod v2;
mod v3;

pub use v1::ProtocolV1;
pub use v2::ProtocolV2;
pub use v3::ProtocolV3;

use lifewheel_crypto::{decrypt_payload, encrypt_payload, UserKey};

use crate::batch::{decode_batch_with, encode_batch_with};
use crate::envelope::{self, format_link, SaveFile, SaveFileData};
use crate::error::{ProtocolError, Result};
use crate::layout::WireLayout;
use crate::types::{ExportOptions, ParsedLink, ProtocolVersion, ReflectionEntry};

/// Version used for every export.
pub const CURRENT_PROTOCOL_VERSION: ProtocolVersion = 3;

/// Every released version, oldest first. Never remove an entry.
static PROTOCOLS: [&dyn Protocol; 3] = [&ProtocolV1, &ProtocolV2, &ProtocolV3];

/// Import and export operations implemented once per protocol version.
///
/// Implementations only need to describe their byte layout; the envelope
/// handling is shared. Override a method when a version diverges.
pub trait Protocol: Send + Sync {
    fn layout(&self) -> &WireLayout;

    fn version(&self) -> ProtocolVersion {
        self.layout().version
    }

    fn encode_entries(&self, entries: &[ReflectionEntry]) -> Result<Vec<u8>> {
        encode_batch_with(entries, self.layout())
    }

    fn decode_entries(&self, data: &[u8]) -> Result<Vec<ReflectionEntry>> {
        decode_batch_with(data, self.layout())
    }

    /// Normalize entries read from a plain save file written by this version.
    fn revive_entries(&self, entries: Vec<ReflectionEntry>) -> Vec<ReflectionEntry> {
        entries
    }

    /// All released versions share one header format. A version whose
    /// header drifts overrides this; the dispatcher tries newest first.
    fn parse_link(&self, link: &str) -> Result<ParsedLink> {
        envelope::parse_link(link)
    }

    /// Encode and encrypt, stamping the key's round count into the payload.
    fn encrypt_entries(&self, entries: &[ReflectionEntry], key: &UserKey) -> Result<Vec<u8>> {
        let encoded = self.encode_entries(entries)?;
        Ok(encrypt_payload(&encoded, key, key.iterations)?)
    }

    fn export_file(&self, entries: &[ReflectionEntry], options: &ExportOptions) -> SaveFile {
        SaveFile::plain(self.version(), &options.url, entries.to_vec())
    }

    fn export_encrypted_file(
        &self,
        entries: &[ReflectionEntry],
        key: &UserKey,
        options: &ExportOptions,
    ) -> Result<SaveFile> {
        let payload = self.encrypt_entries(entries, key)?;
        Ok(self.export_encrypted_file_from_payload(&payload, options))
    }

    /// Wrap a payload from [`Protocol::encrypt_entries`] without re-encrypting.
    fn export_encrypted_file_from_payload(
        &self,
        payload: &[u8],
        options: &ExportOptions,
    ) -> SaveFile {
        SaveFile::encrypted(self.version(), &options.url, payload)
    }

    fn export_link(&self, entries: &[ReflectionEntry]) -> Result<String> {
        Ok(format_link(
            &self.encode_entries(entries)?,
            false,
            self.version(),
        ))
    }

    fn export_encrypted_link(&self, entries: &[ReflectionEntry], key: &UserKey) -> Result<String> {
        let payload = self.encrypt_entries(entries, key)?;
        Ok(self.export_encrypted_link_from_payload(&payload))
    }

    fn export_encrypted_link_from_payload(&self, payload: &[u8]) -> String {
        format_link(payload, true, self.version())
    }

    fn import_file(&self, file: &SaveFile) -> Result<Vec<ReflectionEntry>> {
        file.validate()?;
        match &file.data {
            SaveFileData::Entries(entries) => Ok(self.revive_entries(entries.clone())),
            SaveFileData::Encrypted(_) => Err(ProtocolError::InvalidFile(
                "file is encrypted and needs a key".to_string(),
            )),
        }
    }

    fn import_encrypted_file(&self, file: &SaveFile, key: &UserKey) -> Result<Vec<ReflectionEntry>> {
        file.validate()?;
        let payload = file.encrypted_payload()?;
        let decrypted = decrypt_payload(&payload, key)?;
        self.decode_entries(&decrypted)
    }

    fn import_link(&self, link: &ParsedLink) -> Result<Vec<ReflectionEntry>> {
        if link.encrypted {
            return Err(ProtocolError::LinkEncrypted);
        }
        self.decode_entries(&link.data)
    }

    fn import_encrypted_link(
        &self,
        link: &ParsedLink,
        key: &UserKey,
    ) -> Result<Vec<ReflectionEntry>> {
        if !link.encrypted {
            return Err(ProtocolError::LinkNotEncrypted);
        }
        let decrypted = decrypt_payload(&link.data, key)?;
        self.decode_entries(&decrypted)
    }
}

/// All registered versions, oldest first.
pub fn protocols() -> &'static [&'static dyn Protocol] {
    &PROTOCOLS
}

/// Look up the implementation for `version`. Unknown versions are an
/// error; there is no fallback.
pub fn get_protocol(version: ProtocolVersion) -> Result<&'static dyn Protocol> {
    PROTOCOLS
        .iter()
        .copied()
        .find(|p| p.version() == version)
        .ok_or(ProtocolError::UnsupportedVersion(version))
}

pub fn current_protocol() -> &'static dyn Protocol {
    PROTOCOLS[PROTOCOLS.len() - 1]
}

pub fn supported_versions() -> Vec<ProtocolVersion> {
    PROTOCOLS.iter().map(|p| p.version()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_ordered_and_complete() {
        assert_eq!(supported_versions(), vec![1, 2, 3]);
        assert_eq!(current_protocol().version(), CURRENT_PROTOCOL_VERSION);
    }

    #[test]
    fn lookup_by_version() {
        for version in supported_versions() {
            assert_eq!(get_protocol(version).unwrap().version(), version);
        }
        assert!(matches!(
            get_protocol(0),
            Err(ProtocolError::UnsupportedVersion(0))
        ));
        assert!(matches!(
            get_protocol(4),
            Err(ProtocolError::UnsupportedVersion(4))
        ));
    }

    #[test]
    fn layouts_match_versions() {
        for protocol in protocols() {
            assert_eq!(
                WireLayout::for_version(protocol.version()).unwrap(),
                *protocol.layout()
            );
        }
    }
}
