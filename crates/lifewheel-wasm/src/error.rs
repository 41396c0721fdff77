//! Error conversion at the JS boundary.

use lifewheel_crypto::CryptoError;
use lifewheel_protocol::ProtocolError;
use wasm_bindgen::JsValue;

/// `name` of the JS error thrown when a password is wrong or the payload
/// was tampered with. The UI re-prompts on this and on nothing else.
pub const DECRYPTION_ERROR: &str = "DecryptionError";

/// Wrap any displayable error in a JS `Error` so callers get a stack and
/// `instanceof Error` holds.
pub fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn named_error(message: String, name: Option<&str>) -> JsValue {
    let error = js_sys::Error::new(&message);
    if let Some(name) = name {
        error.set_name(name);
    }
    error.into()
}

fn crypto_error_name(e: &CryptoError) -> Option<&'static str> {
    matches!(e, CryptoError::DecryptionFailed).then_some(DECRYPTION_ERROR)
}

fn protocol_error_name(e: &ProtocolError) -> Option<&'static str> {
    e.is_decryption_failure().then_some(DECRYPTION_ERROR)
}

pub fn crypto_error(e: CryptoError) -> JsValue {
    let name = crypto_error_name(&e);
    named_error(e.to_string(), name)
}

pub fn protocol_error(e: ProtocolError) -> JsValue {
    let name = protocol_error_name(&e);
    named_error(e.to_string(), name)
}
