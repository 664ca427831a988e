// ============================================================================
// TOKEN STORAGE - Durable home of the bearer token
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// Persists the bearer token across restarts.
pub trait TokenStorage {
    fn load_token(&self) -> Option<String>;
    fn save_token(&self, token: &str) -> Result<(), String>;
    fn remove_token(&self) -> Result<(), String>;
}

/// localStorage-backed storage (browser only)
#[cfg(target_arch = "wasm32")]
pub struct LocalTokenStorage {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalTokenStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStorage for LocalTokenStorage {
    fn load_token(&self) -> Option<String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::get::<String>(&self.key).ok()
    }

    fn save_token(&self, token: &str) -> Result<(), String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::set(&self.key, token)
            .map_err(|e| format!("Error saving token to localStorage: {}", e))
    }

    fn remove_token(&self) -> Result<(), String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::delete(&self.key);
        Ok(())
    }
}

/// In-process storage. Clones share the slot, which is how a "restart" is
/// simulated: build a new store over a clone of the same storage.
#[derive(Clone, Default)]
pub struct MemoryTokenStorage {
    token: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.token.borrow_mut() = Some(token.into());
        storage
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save_token(&self, token: &str) -> Result<(), String> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn remove_token(&self) -> Result<(), String> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}
