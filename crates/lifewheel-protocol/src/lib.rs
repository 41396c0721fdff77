//! Versioned encoding of Lifewheel reflection entries.
//!
//! Entries travel as a compact binary batch, wrapped either in a shareable
//! link or a JSON save file, optionally encrypted with a password-derived
//! key. Every released protocol version stays importable; exports always
//! use [`CURRENT_PROTOCOL_VERSION`].

pub mod batch;
pub mod bytes;
pub mod compression;
pub mod dispatch;
pub mod entry;
pub mod envelope;
pub mod error;
pub mod key_store;
pub mod layout;
pub mod merge;
pub mod protocols;
pub mod types;

pub use batch::{decode_batch, encode_batch};
pub use dispatch::{
    encrypt_entries, export_encrypted_file, export_encrypted_file_from_payload,
    export_encrypted_link, export_encrypted_link_from_payload, export_file, export_link,
    import_encrypted_file, import_encrypted_file_with_password, import_encrypted_link,
    import_encrypted_link_with_password, import_file, import_link, parse_link,
};
pub use entry::{decode_entry, encode_entry, pack_values, unpack_values};
pub use envelope::{format_link, minify_json_arrays, save_file_name, SaveFile, SaveFileData};
pub use error::{ProtocolError, Result};
pub use key_store::{EncryptionKey, EncryptionKeyOptions, KeyStore, MemoryKeyStore, DEFAULT_KEY_ID};
pub use merge::{merge_entries, unique_entries};
pub use protocols::{
    current_protocol, get_protocol, supported_versions, Protocol, CURRENT_PROTOCOL_VERSION,
};
pub use types::{
    ExportOptions, ParsedLink, ProtocolVersion, ReflectionEntry, DIMENSIONS, MAX_LEVEL, MIN_LEVEL,
};

pub use lifewheel_crypto::{derive_key, derive_key_from_data, generate_user_key, UserKey};
