//! AES-256-GCM encryption of opaque payloads.
//!
//! Wire format:
//! [32 bytes: PBKDF2 salt][16 bytes: IV][4 bytes: iterations (u32 BE)][N bytes: ciphertext + tag]
//!
//! The salt and iteration count travel with the ciphertext so decryption
//! needs nothing but the password.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};

use crate::error::CryptoError;
use crate::pbkdf2::derive_key_from_data;
use crate::random::generate_iv;
use crate::types::{
    UserKey, AES_GCM_TAG_LENGTH, ITERATIONS_LENGTH, IV_LENGTH, PAYLOAD_HEADER_LENGTH, SALT_LENGTH,
};

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Borrowed view of an encrypted payload split into its parts.
#[derive(Debug, Clone, Copy)]
pub struct PayloadFrame<'a> {
    pub salt: &'a [u8],
    pub iv: &'a [u8],
    pub iterations: u32,
    pub ciphertext: &'a [u8],
}

impl<'a> PayloadFrame<'a> {
    /// Minimum payload size: header plus an empty plaintext's tag.
    pub const MIN_LENGTH: usize = PAYLOAD_HEADER_LENGTH + AES_GCM_TAG_LENGTH;

    pub fn parse(payload: &'a [u8]) -> Result<Self, CryptoError> {
        if payload.len() < Self::MIN_LENGTH {
            return Err(CryptoError::DataTooShort {
                min: Self::MIN_LENGTH,
                got: payload.len(),
            });
        }
        let (salt, rest) = payload.split_at(SALT_LENGTH);
        let (iv, rest) = rest.split_at(IV_LENGTH);
        let (iterations, ciphertext) = rest.split_at(ITERATIONS_LENGTH);
        let iterations = u32::from_be_bytes([
            iterations[0],
            iterations[1],
            iterations[2],
            iterations[3],
        ]);
        Ok(Self {
            salt,
            iv,
            iterations,
            ciphertext,
        })
    }
}

fn cipher_for(key: &UserKey) -> Result<Aes256Gcm16, CryptoError> {
    Aes256Gcm16::new_from_slice(&key.key).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Encrypt `content` under `key` with a fresh random IV.
///
/// `iterations` is the PBKDF2 round count `key` was derived with; it is
/// written into the frame so the receiver can re-derive the same key.
pub fn encrypt_payload(
    content: &[u8],
    key: &UserKey,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key)?;
    let iv = generate_iv()?;
    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), content)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(PAYLOAD_HEADER_LENGTH + ciphertext.len());
    result.extend_from_slice(&key.salt);
    result.extend_from_slice(&iv);
    result.extend_from_slice(&iterations.to_be_bytes());
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt a payload produced by [`encrypt_payload`].
///
/// A wrong key and a tampered payload are indistinguishable and both yield
/// [`CryptoError::DecryptionFailed`].
pub fn decrypt_payload(payload: &[u8], key: &UserKey) -> Result<Vec<u8>, CryptoError> {
    let frame = PayloadFrame::parse(payload)?;
    let cipher = cipher_for(key)?;
    cipher
        .decrypt(Nonce::<U16>::from_slice(frame.iv), frame.ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Re-derive the key from the payload header and decrypt in one step.
///
/// Returns the derived key too, so the caller can reuse it for the session.
pub fn decrypt_payload_with_password(
    payload: &[u8],
    password: &str,
) -> Result<(Vec<u8>, UserKey), CryptoError> {
    let key = derive_key_from_data(payload, password)?;
    let content = decrypt_payload(payload, &key)?;
    Ok((content, key))
}
