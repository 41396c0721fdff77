//! PBKDF2-HMAC-SHA256 password stretching into AES-256-GCM keys.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

use crate::aes_gcm::PayloadFrame;
use crate::error::CryptoError;
use crate::random::generate_salt;
use crate::types::{UserKey, AES_KEY_LENGTH, SALT_LENGTH};

/// Derive a 256-bit key from `password` and `salt`.
///
/// Deterministic for identical inputs. This is deliberately slow for large
/// iteration counts; callers on an async runtime should move it off the
/// executor thread.
pub fn derive_key(salt: &[u8], password: &str, iterations: u32) -> Result<UserKey, CryptoError> {
    let salt: [u8; SALT_LENGTH] = salt.try_into().map_err(|_| CryptoError::InvalidSaltLength {
        expected: SALT_LENGTH,
        got: salt.len(),
    })?;
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations(iterations));
    }

    debug!(iterations, "deriving key");
    let mut key = [0u8; AES_KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut key);
    let user_key = UserKey::new(key, salt, iterations);
    key.zeroize();
    Ok(user_key)
}

/// Re-derive the key a payload was encrypted with, reading the salt and
/// iteration count from the payload header.
pub fn derive_key_from_data(payload: &[u8], password: &str) -> Result<UserKey, CryptoError> {
    let frame = PayloadFrame::parse(payload)?;
    derive_key(frame.salt, password, frame.iterations)
}

/// Derive a key under a freshly generated random salt.
pub fn generate_user_key(password: &str, iterations: u32) -> Result<UserKey, CryptoError> {
    let salt = generate_salt()?;
    derive_key(&salt, password, iterations)
}
