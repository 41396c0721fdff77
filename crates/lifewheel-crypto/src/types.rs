use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 salt length in bytes. Stored at the start of every encrypted payload.
pub const SALT_LENGTH: usize = 32;

/// AES-GCM IV length in bytes. Browsers accept 16-byte IVs and older
/// payloads use them, so this stays at 16 rather than the 12-byte default.
pub const IV_LENGTH: usize = 16;

/// Length of the big-endian iteration count following the IV.
pub const ITERATIONS_LENGTH: usize = 4;

/// `salt || iv || iterations` prefix of every encrypted payload.
pub const PAYLOAD_HEADER_LENGTH: usize = SALT_LENGTH + IV_LENGTH + ITERATIONS_LENGTH;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// PBKDF2 rounds stamped into new payloads. Decryption always uses the
/// count stored in the payload itself.
pub const DEFAULT_ITERATIONS: u32 = 1_000_000;

/// Shortest passphrase the generator will produce.
pub const MIN_PASSPHRASE_WORDS: usize = 4;

/// A password-derived AES-256-GCM key together with the salt and PBKDF2
/// round count it was derived with.
///
/// Salt and round count travel in every payload encrypted with this key so
/// the receiving side only needs the password.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct UserKey {
    pub key: [u8; AES_KEY_LENGTH],
    pub salt: [u8; SALT_LENGTH],
    pub iterations: u32,
}

impl UserKey {
    pub fn new(key: [u8; AES_KEY_LENGTH], salt: [u8; SALT_LENGTH], iterations: u32) -> Self {
        Self {
            key,
            salt,
            iterations,
        }
    }

    /// Build a key from untrusted slices (e.g. bytes coming from JS).
    pub fn from_slices(
        key: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<Self, crate::CryptoError> {
        let key: [u8; AES_KEY_LENGTH] =
            key.try_into()
                .map_err(|_| crate::CryptoError::InvalidKeyLength {
                    expected: AES_KEY_LENGTH,
                    got: key.len(),
                })?;
        let salt: [u8; SALT_LENGTH] =
            salt.try_into()
                .map_err(|_| crate::CryptoError::InvalidSaltLength {
                    expected: SALT_LENGTH,
                    got: salt.len(),
                })?;
        Ok(Self {
            key,
            salt,
            iterations,
        })
    }
}

impl std::fmt::Debug for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserKey")
            .field("key", &"<redacted>")
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .finish()
    }
}
