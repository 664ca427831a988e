// ============================================================================
// REQUEST CONTEXT - Credential attached to every outbound request
// ============================================================================
// Written by SessionStore, read by ApiClient at send time. Clones share the
// same slot, so clearing it takes effect for every holder immediately.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct RequestContext {
    token: Rc<RefCell<Option<String>>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    pub fn clear(&self) {
        self.set_token(None);
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn has_credential(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// `Authorization` header for the current credential, if any
    pub fn authorization(&self) -> Option<(String, String)> {
        self.token
            .borrow()
            .as_ref()
            .map(|token| ("Authorization".to_string(), format!("Bearer {}", token)))
    }
}
