//! WASM bindings for Lifewheel.
//!
//! Exposes the protocol and crypto crates via wasm-bindgen for the browser
//! app. Entries and save files cross as plain JS objects, byte payloads as
//! `Uint8Array`.

pub mod crypto;
mod error;
mod js;
pub mod protocol;
