//! WASM bindings for lifewheel-protocol.

use lifewheel_protocol::{
    encrypt_entries, export_encrypted_file, export_encrypted_file_from_payload,
    export_encrypted_link, export_encrypted_link_from_payload, export_file, export_link,
    import_encrypted_file, import_encrypted_file_with_password, import_encrypted_link,
    import_encrypted_link_with_password, import_file, import_link, merge_entries, parse_link,
    save_file_name, supported_versions, ExportOptions, ReflectionEntry, UserKey,
    CURRENT_PROTOCOL_VERSION,
};
use wasm_bindgen::prelude::*;

use crate::error::{protocol_error, to_js_error};
use crate::js::{
    entries_from_js, key_from_js, key_to_js, link_to_js, save_file_from_js, set, to_js,
};

// --- Constants ---

#[wasm_bindgen(js_name = "CURRENT_PROTOCOL_VERSION")]
pub fn current_protocol_version() -> u32 {
    CURRENT_PROTOCOL_VERSION
}

#[wasm_bindgen(js_name = "SUPPORTED_PROTOCOL_VERSIONS")]
pub fn supported_protocol_versions() -> Vec<u32> {
    supported_versions()
}

fn entries_with_key(entries: &[ReflectionEntry], key: &UserKey) -> Result<JsValue, JsValue> {
    let result = js_sys::Object::new();
    set(&result, "entries", &to_js(entries)?)?;
    set(&result, "key", &key_to_js(key)?)?;
    Ok(result.into())
}

// --- Links ---

/// Returns `{encrypted, version, data: Uint8Array}`.
#[wasm_bindgen(js_name = "parseLink")]
pub fn wasm_parse_link(link: &str) -> Result<JsValue, JsValue> {
    link_to_js(&parse_link(link).map_err(protocol_error)?)
}

#[wasm_bindgen(js_name = "exportLink")]
pub fn wasm_export_link(entries: JsValue) -> Result<String, JsValue> {
    export_link(&entries_from_js(entries)?).map_err(protocol_error)
}

#[wasm_bindgen(js_name = "exportEncryptedLink")]
pub fn wasm_export_encrypted_link(entries: JsValue, key: JsValue) -> Result<String, JsValue> {
    let key = key_from_js(&key)?;
    export_encrypted_link(&entries_from_js(entries)?, &key).map_err(protocol_error)
}

#[wasm_bindgen(js_name = "exportEncryptedLinkFromPayload")]
pub fn wasm_export_encrypted_link_from_payload(payload: &[u8]) -> String {
    export_encrypted_link_from_payload(payload)
}

#[wasm_bindgen(js_name = "importLink")]
pub fn wasm_import_link(link: &str) -> Result<JsValue, JsValue> {
    let parsed = parse_link(link).map_err(protocol_error)?;
    to_js(&import_link(&parsed).map_err(protocol_error)?)
}

#[wasm_bindgen(js_name = "importEncryptedLink")]
pub fn wasm_import_encrypted_link(link: &str, key: JsValue) -> Result<JsValue, JsValue> {
    let key = key_from_js(&key)?;
    let parsed = parse_link(link).map_err(protocol_error)?;
    to_js(&import_encrypted_link(&parsed, &key).map_err(protocol_error)?)
}

/// Returns `{entries, key}` so the session can keep the derived key.
#[wasm_bindgen(js_name = "importEncryptedLinkWithPassword")]
pub fn wasm_import_encrypted_link_with_password(
    link: &str,
    password: &str,
) -> Result<JsValue, JsValue> {
    let parsed = parse_link(link).map_err(protocol_error)?;
    let (entries, key) =
        import_encrypted_link_with_password(&parsed, password).map_err(protocol_error)?;
    entries_with_key(&entries, &key)
}

// --- Save files ---

#[wasm_bindgen(js_name = "exportFile")]
pub fn wasm_export_file(entries: JsValue, url: &str) -> Result<JsValue, JsValue> {
    let file = export_file(&entries_from_js(entries)?, &ExportOptions::new(url));
    to_js(&file)
}

#[wasm_bindgen(js_name = "exportEncryptedFile")]
pub fn wasm_export_encrypted_file(
    entries: JsValue,
    key: JsValue,
    url: &str,
) -> Result<JsValue, JsValue> {
    let key = key_from_js(&key)?;
    let file = export_encrypted_file(&entries_from_js(entries)?, &key, &ExportOptions::new(url))
        .map_err(protocol_error)?;
    to_js(&file)
}

#[wasm_bindgen(js_name = "exportEncryptedFileFromPayload")]
pub fn wasm_export_encrypted_file_from_payload(
    payload: &[u8],
    url: &str,
) -> Result<JsValue, JsValue> {
    to_js(&export_encrypted_file_from_payload(payload, &ExportOptions::new(url)))
}

/// Encrypt once for exporting as both a file and a link.
#[wasm_bindgen(js_name = "encryptEntries")]
pub fn wasm_encrypt_entries(entries: JsValue, key: JsValue) -> Result<Vec<u8>, JsValue> {
    let key = key_from_js(&key)?;
    encrypt_entries(&entries_from_js(entries)?, &key).map_err(protocol_error)
}

/// Pretty JSON ready for download.
#[wasm_bindgen(js_name = "saveFileToJson")]
pub fn wasm_save_file_to_json(file: JsValue) -> Result<String, JsValue> {
    save_file_from_js(file)?
        .to_pretty_json()
        .map_err(protocol_error)
}

#[wasm_bindgen(js_name = "isEncryptedFile")]
pub fn wasm_is_encrypted_file(file: JsValue) -> Result<bool, JsValue> {
    Ok(save_file_from_js(file)?.is_encrypted())
}

#[wasm_bindgen(js_name = "importFile")]
pub fn wasm_import_file(file: JsValue) -> Result<JsValue, JsValue> {
    to_js(&import_file(&save_file_from_js(file)?).map_err(protocol_error)?)
}

#[wasm_bindgen(js_name = "importEncryptedFile")]
pub fn wasm_import_encrypted_file(file: JsValue, key: JsValue) -> Result<JsValue, JsValue> {
    let key = key_from_js(&key)?;
    to_js(&import_encrypted_file(&save_file_from_js(file)?, &key).map_err(protocol_error)?)
}

#[wasm_bindgen(js_name = "importEncryptedFileWithPassword")]
pub fn wasm_import_encrypted_file_with_password(
    file: JsValue,
    password: &str,
) -> Result<JsValue, JsValue> {
    let (entries, key) = import_encrypted_file_with_password(&save_file_from_js(file)?, password)
        .map_err(protocol_error)?;
    entries_with_key(&entries, &key)
}

/// `date` is `YYYY-MM-DD`.
#[wasm_bindgen(js_name = "saveFileName")]
pub fn wasm_save_file_name(date: &str) -> Result<String, JsValue> {
    let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(to_js_error)?;
    Ok(save_file_name(date))
}

// --- Merging ---

#[wasm_bindgen(js_name = "mergeEntries")]
pub fn wasm_merge_entries(current: JsValue, incoming: JsValue) -> Result<JsValue, JsValue> {
    let merged = merge_entries(&entries_from_js(current)?, &entries_from_js(incoming)?);
    to_js(&merged)
}
