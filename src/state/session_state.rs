// ============================================================================
// SESSION STORE - Authentication state (token + profile)
// ============================================================================
// Owns the bearer token and the current user. The token is persisted through
// TokenStorage and mirrored into the API client's RequestContext, so every
// request made by any store carries it while the session lasts.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{ActionError, ActionResult};
use crate::models::{AuthTokenResponse, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
use crate::services::ApiClient;
use crate::state::reactivity::ReactiveState;
use crate::utils::TokenStorage;

/// Authentication snapshot. `user` is present only for a validated token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Read-only view of the session's "is authenticated" flag. This is all the
/// other stores get to see of the session.
#[derive(Clone)]
pub struct AuthFlag {
    state: ReactiveState<bool>,
}

impl AuthFlag {
    pub(crate) fn from_state(state: ReactiveState<bool>) -> Self {
        Self { state }
    }

    pub fn get(&self) -> bool {
        self.state.get()
    }

    /// Called once per change of the flag
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(bool) + 'static,
    {
        self.state.subscribe(move |authenticated| callback(*authenticated));
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: Rc<dyn TokenStorage>,
    session: Rc<RefCell<Session>>,
    /// Bumped on every session replacement; results of requests started
    /// under an older generation are dropped.
    generation: Rc<Cell<u64>>,
    authenticated: ReactiveState<bool>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Rc<dyn TokenStorage>) -> Self {
        Self {
            api,
            storage,
            session: Rc::new(RefCell::new(Session::default())),
            generation: Rc::new(Cell::new(0)),
            authenticated: ReactiveState::new(false),
        }
    }

    /// Restore a persisted session. Any failure (rejected token, network
    /// error, unreadable profile) forgets the token for good; there is no
    /// retry.
    pub async fn initialize(&self) {
        let token = match self.storage.load_token() {
            Some(token) => token,
            None => {
                log::info!("ℹ️ No persisted token, starting signed out");
                return;
            }
        };

        self.api.context().set_token(Some(token.clone()));
        let generation = self.generation.get();
        let outcome = self.api.get_me().await;

        // A login or logout during startup owns the session now.
        if self.generation.get() != generation {
            log::info!("ℹ️ Session changed during startup, ignoring token check");
            return;
        }
        match outcome {
            Ok(user) => {
                log::info!("✅ Session restored for {}", user.email);
                self.apply(Session {
                    token: Some(token),
                    user: Some(user),
                });
            }
            Err(e) => {
                log::warn!("⚠️ Persisted token rejected, signing out: {}", e);
                self.forget_token();
                self.apply(Session::default());
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ActionResult<UserProfile> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&request).await {
            Ok(response) => Ok(self.establish(response)),
            Err(e) => {
                log::error!("❌ Login failed: {}", e);
                Err(ActionError::from_api(e, "Login failed"))
            }
        }
    }

    /// Create an account; the server signs the new user in straight away.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        location: Option<&str>,
    ) -> ActionResult<UserProfile> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            location: location.map(str::to_string),
        };
        match self.api.register(&request).await {
            Ok(response) => Ok(self.establish(response)),
            Err(e) => {
                log::error!("❌ Registration failed: {}", e);
                Err(ActionError::from_api(e, "Registration failed"))
            }
        }
    }

    /// Local only: no request is made and it cannot fail.
    pub fn logout(&self) {
        log::info!("👋 Logout");
        self.forget_token();
        self.apply(Session::default());
    }

    pub async fn update_profile(&self, patch: &ProfileUpdate) -> ActionResult<UserProfile> {
        if !self.is_authenticated() {
            return Err(ActionError::not_authenticated());
        }
        let generation = self.generation.get();
        match self.api.update_me(patch).await {
            Ok(user) => {
                // A logout or account switch while the request was in flight wins.
                if self.generation.get() != generation || !self.is_authenticated() {
                    log::warn!("⚠️ Dropping profile update from an ended session");
                    return Err(ActionError::not_authenticated());
                }
                self.session.borrow_mut().user = Some(user.clone());
                log::info!("✅ Profile updated");
                Ok(user)
            }
            Err(e) => {
                log::error!("❌ Profile update failed: {}", e);
                Err(ActionError::from_api(e, "Profile update failed"))
            }
        }
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn auth_flag(&self) -> AuthFlag {
        AuthFlag::from_state(self.authenticated.clone())
    }

    fn establish(&self, response: AuthTokenResponse) -> UserProfile {
        let AuthTokenResponse {
            access_token, user, ..
        } = response;

        // Another account's data must not survive the switch: signing out
        // first makes every bound store reset.
        let switching = self
            .user()
            .map(|current| current.id != user.id)
            .unwrap_or(false);
        if switching {
            log::info!("🔄 Switching account, closing session of the previous user");
            self.apply(Session::default());
        }

        if let Err(e) = self.storage.save_token(&access_token) {
            log::error!("❌ Error persisting token: {}", e);
        }
        self.api.context().set_token(Some(access_token.clone()));
        log::info!("✅ Signed in as {}", user.email);
        self.apply(Session {
            token: Some(access_token),
            user: Some(user.clone()),
        });
        user
    }

    fn forget_token(&self) {
        if let Err(e) = self.storage.remove_token() {
            log::error!("❌ Error removing persisted token: {}", e);
        }
        self.api.context().clear();
    }

    // Session first, then the flag: subscribers may read the store.
    fn apply(&self, session: Session) {
        let authenticated = session.is_authenticated();
        self.generation.set(self.generation.get() + 1);
        *self.session.borrow_mut() = session;
        self.authenticated.set_if_changed(authenticated);
    }
}
