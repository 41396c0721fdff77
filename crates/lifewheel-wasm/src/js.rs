//! Conversions between JS objects and the Rust types that have no serde
//! representation suitable for the browser.

use js_sys::{Object, Reflect, Uint8Array};
use lifewheel_crypto::UserKey;
use lifewheel_protocol::{ParsedLink, ReflectionEntry, SaveFile};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{crypto_error, protocol_error, to_js_error};

pub fn set(target: &Object, field: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &field.into(), value)?;
    Ok(())
}

fn get(source: &JsValue, field: &str) -> Result<JsValue, JsValue> {
    let value = Reflect::get(source, &field.into())?;
    if value.is_undefined() {
        return Err(to_js_error(format!("missing field `{field}`")));
    }
    Ok(value)
}

fn bytes(source: &JsValue, field: &str) -> Result<Vec<u8>, JsValue> {
    let value = get(source, field)?;
    if !value.is_instance_of::<Uint8Array>() {
        return Err(to_js_error(format!("`{field}` must be a Uint8Array")));
    }
    Ok(Uint8Array::new(&value).to_vec())
}

/// `{key: Uint8Array, salt: Uint8Array, iterations: number}`
pub fn key_to_js(key: &UserKey) -> Result<JsValue, JsValue> {
    let out = Object::new();
    set(&out, "key", &Uint8Array::from(&key.key[..]).into())?;
    set(&out, "salt", &Uint8Array::from(&key.salt[..]).into())?;
    set(&out, "iterations", &JsValue::from(key.iterations))?;
    Ok(out.into())
}

pub fn key_from_js(value: &JsValue) -> Result<UserKey, JsValue> {
    let mut key = bytes(value, "key")?;
    let salt = bytes(value, "salt")?;
    let iterations = get(value, "iterations")?
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .ok_or_else(|| to_js_error("`iterations` must be an unsigned 32-bit integer"))?;
    let user_key = UserKey::from_slices(&key, &salt, iterations as u32).map_err(crypto_error);
    zeroize::Zeroize::zeroize(&mut key);
    user_key
}

pub fn link_to_js(link: &ParsedLink) -> Result<JsValue, JsValue> {
    let out = Object::new();
    set(&out, "encrypted", &JsValue::from(link.encrypted))?;
    set(&out, "version", &JsValue::from(link.version))?;
    set(&out, "data", &Uint8Array::from(link.data.as_slice()).into())?;
    Ok(out.into())
}

pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true))
        .map_err(to_js_error)
}

pub fn entries_from_js(value: JsValue) -> Result<Vec<ReflectionEntry>, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

/// Accepts either the parsed JSON object or the raw file text.
pub fn save_file_from_js(value: JsValue) -> Result<SaveFile, JsValue> {
    if let Some(text) = value.as_string() {
        return SaveFile::from_json(&text).map_err(protocol_error);
    }
    let file: SaveFile = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
    file.validate().map_err(protocol_error)?;
    Ok(file)
}
