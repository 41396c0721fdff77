//! Version dispatch.
//!
//! Imports read the version the data declares and route to that version's
//! codec. Exports always go through the current version.

use lifewheel_crypto::{derive_key_from_data, UserKey};
use tracing::debug;

use crate::envelope::SaveFile;
use crate::error::{ProtocolError, Result};
use crate::protocols::{current_protocol, get_protocol, protocols};
use crate::types::{ExportOptions, ParsedLink, ReflectionEntry};

/// Parse a link written by any released version.
///
/// Header parsers are tried newest first; the first one that yields a
/// registered version wins.
pub fn parse_link(link: &str) -> Result<ParsedLink> {
    let mut last_error = ProtocolError::InvalidHeader(String::new());
    for protocol in protocols().iter().rev() {
        match protocol.parse_link(link) {
            Ok(parsed) => match get_protocol(parsed.version) {
                Ok(_) => {
                    debug!(version = parsed.version, encrypted = parsed.encrypted, "parsed link");
                    return Ok(parsed);
                }
                Err(e) => last_error = e,
            },
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

pub fn import_link(link: &ParsedLink) -> Result<Vec<ReflectionEntry>> {
    get_protocol(link.version)?.import_link(link)
}

pub fn import_encrypted_link(link: &ParsedLink, key: &UserKey) -> Result<Vec<ReflectionEntry>> {
    get_protocol(link.version)?.import_encrypted_link(link, key)
}

/// Re-derive the key from the link payload, then import. The key is
/// returned so the caller can keep it for the session.
pub fn import_encrypted_link_with_password(
    link: &ParsedLink,
    password: &str,
) -> Result<(Vec<ReflectionEntry>, UserKey)> {
    let protocol = get_protocol(link.version)?;
    if !link.encrypted {
        return Err(ProtocolError::LinkNotEncrypted);
    }
    let key = derive_key_from_data(&link.data, password)?;
    let entries = protocol.import_encrypted_link(link, &key)?;
    Ok((entries, key))
}

pub fn import_file(file: &SaveFile) -> Result<Vec<ReflectionEntry>> {
    debug!(version = file.version, encrypted = file.encrypted, "importing file");
    get_protocol(file.version)?.import_file(file)
}

pub fn import_encrypted_file(file: &SaveFile, key: &UserKey) -> Result<Vec<ReflectionEntry>> {
    debug!(version = file.version, "importing encrypted file");
    get_protocol(file.version)?.import_encrypted_file(file, key)
}

pub fn import_encrypted_file_with_password(
    file: &SaveFile,
    password: &str,
) -> Result<(Vec<ReflectionEntry>, UserKey)> {
    let protocol = get_protocol(file.version)?;
    file.validate()?;
    let key = derive_key_from_data(&file.encrypted_payload()?, password)?;
    let entries = protocol.import_encrypted_file(file, &key)?;
    Ok((entries, key))
}

pub fn export_file(entries: &[ReflectionEntry], options: &ExportOptions) -> SaveFile {
    current_protocol().export_file(entries, options)
}

pub fn export_encrypted_file(
    entries: &[ReflectionEntry],
    key: &UserKey,
    options: &ExportOptions,
) -> Result<SaveFile> {
    current_protocol().export_encrypted_file(entries, key, options)
}

pub fn export_encrypted_file_from_payload(payload: &[u8], options: &ExportOptions) -> SaveFile {
    current_protocol().export_encrypted_file_from_payload(payload, options)
}

pub fn export_link(entries: &[ReflectionEntry]) -> Result<String> {
    current_protocol().export_link(entries)
}

pub fn export_encrypted_link(entries: &[ReflectionEntry], key: &UserKey) -> Result<String> {
    current_protocol().export_encrypted_link(entries, key)
}

pub fn export_encrypted_link_from_payload(payload: &[u8]) -> String {
    current_protocol().export_encrypted_link_from_payload(payload)
}

/// Encode with the current version and encrypt, for callers that export
/// the same payload as both a file and a link.
pub fn encrypt_entries(entries: &[ReflectionEntry], key: &UserKey) -> Result<Vec<u8>> {
    current_protocol().encrypt_entries(entries, key)
}
