//! Key-value persistence for session and preference state.
//!
//! The browser offers two stores with the same interface: sessionStorage
//! (one tab) and localStorage (the whole profile). Either may be missing or
//! refuse writes, so every operation is fallible and callers degrade to
//! in-memory state.

use std::collections::HashMap;

use crate::error::StorageError;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process store. Used natively and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stands in for storage that is disabled (privacy mode, sandboxed frame).
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{local_store, session_store, WebStore};

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, UnavailableStore};
    use crate::error::StorageError;

    fn backend_error(err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Backend(format!("{:?}", err))
    }

    /// `window.sessionStorage` / `window.localStorage`.
    pub struct WebStore {
        storage: web_sys::Storage,
    }

    impl KeyValueStore for WebStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage.get_item(key).map_err(backend_error)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage.set_item(key, value).map_err(backend_error)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.storage.remove_item(key).map_err(backend_error)
        }
    }

    fn boxed(storage: Option<web_sys::Storage>, which: &str) -> Box<dyn KeyValueStore> {
        match storage {
            Some(storage) => Box::new(WebStore { storage }),
            None => {
                tracing::warn!("{} is unavailable, state will not survive a reload", which);
                Box::new(UnavailableStore)
            }
        }
    }

    /// Tab-scoped store for the training session.
    pub fn session_store() -> Box<dyn KeyValueStore> {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        boxed(storage, "sessionStorage")
    }

    /// Profile-scoped store for preferences.
    pub fn local_store() -> Box<dyn KeyValueStore> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        boxed(storage, "localStorage")
    }
}
