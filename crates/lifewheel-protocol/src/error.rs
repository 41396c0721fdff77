use lifewheel_crypto::CryptoError;
use thiserror::Error;

use crate::types::ProtocolVersion;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid link header: {0:?}")]
    InvalidHeader(String),

    #[error("Link contains no data after the header")]
    EmptyLinkData,

    #[error("Invalid base64url payload: {0}")]
    InvalidBase64(String),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(ProtocolVersion),

    #[error("Corrupt batch: {0}")]
    CorruptBatch(String),

    #[error("Corrupt batch: expected {expected} entries but decoded {decoded}")]
    EntryCountMismatch { expected: u32, decoded: usize },

    #[error("Decompression failed: {0}")]
    Decompression(String),

    #[error("Compression failed: {0}")]
    Compression(String),

    #[error("Value {value} at dimension {index} does not fit in 4 bits")]
    ValueOutOfRange { index: usize, value: u8 },

    #[error("Length {0} does not fit in a u32 length prefix")]
    LengthOverflow(usize),

    #[error("Invalid save file: {0}")]
    InvalidFile(String),

    #[error("Link is encrypted")]
    LinkEncrypted,

    #[error("Link is not encrypted")]
    LinkNotEncrypted,

    #[error("Key store error: {0}")]
    KeyStore(String),

    #[error("Key derivation task failed: {0}")]
    KeyDerivation(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// True when the data could not be decrypted, i.e. the password is wrong
    /// or the payload was modified. The UI re-prompts for a password on this
    /// and reports everything else as unreadable data.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, ProtocolError::Crypto(CryptoError::DecryptionFailed))
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
