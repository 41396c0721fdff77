//! WASM bindings for lifewheel-crypto.

use lifewheel_crypto::{
    base64url_decode, base64url_encode, decrypt_payload, decrypt_payload_with_password,
    derive_key, derive_key_from_data, encrypt_payload, generate_salt, generate_user_key,
    secure_random_int, PassphraseGenerator, WordList, DEFAULT_ITERATIONS,
};
use wasm_bindgen::prelude::*;

use crate::error::crypto_error;
use crate::js::{key_from_js, key_to_js, set};

// --- Constants ---

#[wasm_bindgen(js_name = "DEFAULT_ITERATIONS")]
pub fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

// --- Base64url ---

#[wasm_bindgen(js_name = "base64urlEncode")]
pub fn wasm_base64url_encode(data: &[u8]) -> String {
    base64url_encode(data)
}

#[wasm_bindgen(js_name = "base64urlDecode")]
pub fn wasm_base64url_decode(encoded: &str) -> Result<Vec<u8>, JsValue> {
    base64url_decode(encoded).map_err(crypto_error)
}

// --- Randomness ---

#[wasm_bindgen(js_name = "generateSalt")]
pub fn wasm_generate_salt() -> Result<Vec<u8>, JsValue> {
    generate_salt().map(|salt| salt.to_vec()).map_err(crypto_error)
}

#[wasm_bindgen(js_name = "secureRandomInt")]
pub fn wasm_secure_random_int(min: u32, max: u32) -> Result<u32, JsValue> {
    secure_random_int(min, max).map_err(crypto_error)
}

// --- Key derivation ---

#[wasm_bindgen(js_name = "deriveKey")]
pub fn wasm_derive_key(salt: &[u8], password: &str, iterations: u32) -> Result<JsValue, JsValue> {
    let key = derive_key(salt, password, iterations).map_err(crypto_error)?;
    key_to_js(&key)
}

/// Re-derive the key an encrypted payload was made with.
#[wasm_bindgen(js_name = "deriveKeyFromData")]
pub fn wasm_derive_key_from_data(payload: &[u8], password: &str) -> Result<JsValue, JsValue> {
    let key = derive_key_from_data(payload, password).map_err(crypto_error)?;
    key_to_js(&key)
}

#[wasm_bindgen(js_name = "generateUserKey")]
pub fn wasm_generate_user_key(password: &str, iterations: Option<u32>) -> Result<JsValue, JsValue> {
    let key = generate_user_key(password, iterations.unwrap_or(DEFAULT_ITERATIONS))
        .map_err(crypto_error)?;
    key_to_js(&key)
}

// --- AES-256-GCM ---

#[wasm_bindgen(js_name = "encryptPayload")]
pub fn wasm_encrypt_payload(content: &[u8], key: JsValue) -> Result<Vec<u8>, JsValue> {
    let key = key_from_js(&key)?;
    encrypt_payload(content, &key, key.iterations).map_err(crypto_error)
}

#[wasm_bindgen(js_name = "decryptPayload")]
pub fn wasm_decrypt_payload(payload: &[u8], key: JsValue) -> Result<Vec<u8>, JsValue> {
    let key = key_from_js(&key)?;
    decrypt_payload(payload, &key).map_err(crypto_error)
}

/// Returns `{content: Uint8Array, key}`.
#[wasm_bindgen(js_name = "decryptPayloadWithPassword")]
pub fn wasm_decrypt_payload_with_password(
    payload: &[u8],
    password: &str,
) -> Result<JsValue, JsValue> {
    let (content, key) = decrypt_payload_with_password(payload, password).map_err(crypto_error)?;
    let result = js_sys::Object::new();
    set(&result, "content", &js_sys::Uint8Array::from(content.as_slice()).into())?;
    set(&result, "key", &key_to_js(&key)?)?;
    Ok(result.into())
}

// --- Passphrases ---

/// `word_list` is the diceware list text, one `<id>\t<word>` per line.
#[wasm_bindgen(js_name = "generatePassphrase")]
pub fn wasm_generate_passphrase(word_list: &str, words: usize) -> Result<String, JsValue> {
    let list = WordList::parse(word_list).map_err(crypto_error)?;
    PassphraseGenerator::new(list)
        .generate(words)
        .map_err(crypto_error)
}
