//! Cryptographically secure randomness for salts, IVs, and passphrases.

use crate::error::CryptoError;
use crate::types::{IV_LENGTH, SALT_LENGTH};

/// Fill `buf` from the operating system CSPRNG (or `crypto.getRandomValues` on wasm).
pub fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    getrandom::getrandom(buf).map_err(|e| CryptoError::RngFailed(e.to_string()))
}

/// Generate a fresh PBKDF2 salt. Never reuse one across independent keys.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH], CryptoError> {
    let mut salt = [0u8; SALT_LENGTH];
    fill_random(&mut salt)?;
    Ok(salt)
}

/// Generate a random 16-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; IV_LENGTH], CryptoError> {
    let mut iv = [0u8; IV_LENGTH];
    fill_random(&mut iv)?;
    Ok(iv)
}

/// Uniform random integer in `[min, max)`.
///
/// Draws single bytes and rejects those at or above the largest multiple of
/// the range that fits in a byte, so every outcome is equally likely.
/// The range `max - min` must be between 1 and 256.
pub fn secure_random_int(min: u32, max: u32) -> Result<u32, CryptoError> {
    let range = max
        .checked_sub(min)
        .filter(|r| (1..=256).contains(r))
        .ok_or(CryptoError::InvalidRange { min, max })?;
    let limit = 256 - (256 % range);

    let mut byte = [0u8; 1];
    loop {
        fill_random(&mut byte)?;
        let value = u32::from(byte[0]);
        if value < limit {
            return Ok(min + value % range);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_unique() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[test]
    fn ivs_are_unique() {
        assert_ne!(generate_iv().unwrap(), generate_iv().unwrap());
    }

    #[test]
    fn random_int_stays_in_range() {
        for _ in 0..2000 {
            let n = secure_random_int(1, 7).unwrap();
            assert!((1..7).contains(&n));
        }
    }

    #[test]
    fn random_int_hits_every_value() {
        let mut seen = [false; 6];
        for _ in 0..5000 {
            seen[(secure_random_int(1, 7).unwrap() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn single_value_range() {
        assert_eq!(secure_random_int(5, 6).unwrap(), 5);
    }

    #[test]
    fn full_byte_range() {
        let n = secure_random_int(0, 256).unwrap();
        assert!(n < 256);
    }

    #[test]
    fn rejects_empty_or_oversized_range() {
        assert!(secure_random_int(3, 3).is_err());
        assert!(secure_random_int(4, 3).is_err());
        assert!(secure_random_int(0, 257).is_err());
    }
}
