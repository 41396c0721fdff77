pub mod aes_gcm;
pub mod base64url;
pub mod error;
pub mod passphrase;
pub mod pbkdf2;
pub mod random;
pub mod types;

pub use aes_gcm::{decrypt_payload, decrypt_payload_with_password, encrypt_payload, PayloadFrame};
pub use base64url::{base64url_decode, base64url_encode};
pub use error::CryptoError;
pub use passphrase::{PassphraseGenerator, WordList};
pub use pbkdf2::{derive_key, derive_key_from_data, generate_user_key};
pub use random::{fill_random, generate_iv, generate_salt, secure_random_int};
pub use types::{
    UserKey, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, DEFAULT_ITERATIONS, ITERATIONS_LENGTH,
    IV_LENGTH, MIN_PASSPHRASE_WORDS, PAYLOAD_HEADER_LENGTH, SALT_LENGTH,
};
