//! Session key holder.
//!
//! Keeps the derived [`UserKey`] in memory for the session and optionally
//! persists it through a pluggable [`KeyStore`]. Key derivation runs on the
//! blocking pool on native targets; in the browser it runs inline.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lifewheel_crypto::{decrypt_payload_with_password, generate_user_key, UserKey, DEFAULT_ITERATIONS};
use parking_lot::Mutex;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{ProtocolError, Result};

/// Id the key is stored under unless configured otherwise.
pub const DEFAULT_KEY_ID: &str = "enc";

/// Persistent storage for user keys, keyed by id.
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<UserKey>>;
    async fn set(&self, id: &str, key: &UserKey) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory store. Keys are zeroized when removed or dropped.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: Mutex<HashMap<String, UserKey>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, id: &str) -> Result<Option<UserKey>> {
        Ok(self.keys.lock().get(id).cloned())
    }

    async fn set(&self, id: &str, key: &UserKey) -> Result<()> {
        self.keys.lock().insert(id.to_string(), key.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.keys.lock().remove(id);
        Ok(())
    }
}

#[async_trait]
impl<S: KeyStore + ?Sized> KeyStore for Arc<S> {
    async fn get(&self, id: &str) -> Result<Option<UserKey>> {
        (**self).get(id).await
    }

    async fn set(&self, id: &str, key: &UserKey) -> Result<()> {
        (**self).set(id, key).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }
}

/// Configuration for [`EncryptionKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKeyOptions {
    pub key_id: String,
    /// Write keys through to the store when they change.
    pub persist: bool,
    /// PBKDF2 rounds for newly generated keys.
    pub iterations: u32,
}

impl Default for EncryptionKeyOptions {
    fn default() -> Self {
        Self {
            key_id: DEFAULT_KEY_ID.to_string(),
            persist: false,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// The user's key for the current session.
pub struct EncryptionKey<S: KeyStore> {
    store: S,
    options: EncryptionKeyOptions,
    key: Option<UserKey>,
}

impl<S: KeyStore> EncryptionKey<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, EncryptionKeyOptions::default())
    }

    pub fn with_options(store: S, options: EncryptionKeyOptions) -> Self {
        Self {
            store,
            options,
            key: None,
        }
    }

    pub fn options(&self) -> &EncryptionKeyOptions {
        &self.options
    }

    pub fn key(&self) -> Option<&UserKey> {
        self.key.as_ref()
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub fn set_should_persist(&mut self, persist: bool) {
        self.options.persist = persist;
    }

    /// Replace the session key, writing it through when persisting.
    ///
    /// The key is only adopted once the store accepted it.
    pub async fn set_key(&mut self, key: UserKey) -> Result<()> {
        if self.options.persist {
            debug!(key_id = %self.options.key_id, "persisting session key");
            self.store.set(&self.options.key_id, &key).await?;
        }
        self.key = Some(key);
        Ok(())
    }

    /// Derive a fresh key with a new random salt and make it the session key.
    pub async fn generate_user_key(&mut self, password: &str) -> Result<&UserKey> {
        let password = Zeroizing::new(password.to_string());
        let iterations = self.options.iterations;
        let key = run_blocking(move || generate_user_key(&password, iterations)).await??;
        debug!(iterations, "generated session key");
        self.set_key(key).await?;
        self.key
            .as_ref()
            .ok_or_else(|| ProtocolError::KeyStore("key missing after set".to_string()))
    }

    /// Decrypt `payload` with `password`, adopting the key it was made with.
    ///
    /// On failure the current session key is left untouched.
    pub async fn unlock(&mut self, payload: &[u8], password: &str) -> Result<Vec<u8>> {
        let password = Zeroizing::new(password.to_string());
        let payload = payload.to_vec();
        let (content, key) =
            run_blocking(move || decrypt_payload_with_password(&payload, &password)).await??;
        self.set_key(key).await?;
        Ok(content)
    }

    /// Write the session key to the store if persistence is on.
    pub async fn persist(&self) -> Result<()> {
        match (&self.key, self.options.persist) {
            (Some(key), true) => {
                debug!(key_id = %self.options.key_id, "persisting session key");
                self.store.set(&self.options.key_id, key).await
            }
            _ => Ok(()),
        }
    }

    /// Restore a previously persisted key. Returns whether one was found.
    pub async fn load(&mut self) -> Result<bool> {
        match self.store.get(&self.options.key_id).await? {
            Some(key) => {
                self.key = Some(key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget the key in memory and in the store.
    pub async fn clear(&mut self) -> Result<()> {
        self.key = None;
        self.store.delete(&self.options.key_id).await
    }
}

/// Run `f` on the blocking pool of the ambient Tokio runtime, or inline when
/// the caller is driven by some other executor.
#[cfg(not(target_arch = "wasm32"))]
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle
            .spawn_blocking(f)
            .await
            .map_err(|e| ProtocolError::KeyDerivation(e.to_string())),
        Err(_) => Ok(f()),
    }
}

#[cfg(target_arch = "wasm32")]
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    Ok(f())
}
