use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid salt length: expected {expected} bytes, got {got}")]
    InvalidSaltLength { expected: usize, got: usize },

    #[error("Invalid iteration count: {0}")]
    InvalidIterations(u32),

    #[error("Encrypted payload too short: expected at least {min} bytes, got {got}")]
    DataTooShort { min: usize, got: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// AEAD authentication failed. Either the password is wrong or the
    /// payload was modified.
    #[error("Unable to decrypt: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Invalid base64url: {0}")]
    InvalidBase64(String),

    #[error("Invalid random range: [{min}, {max})")]
    InvalidRange { min: u32, max: u32 },

    #[error("Passphrase must include at least {min} words, got {got}")]
    PassphraseTooShort { min: usize, got: usize },

    #[error("Word list cannot supply {wanted} distinct words")]
    WordListExhausted { wanted: usize },

    #[error("Invalid word list line {line}: {reason}")]
    InvalidWordList { line: usize, reason: String },

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
