// ============================================================================
// GROCERY COMPARE - CLIENT CORE
// ============================================================================
// Layers:
// - Models: wire types shared with the comparison API
// - Services: HTTP only (transport seam, ApiClient, catalog search)
// - State: session, basket and shopping-list stores over Rc<RefCell>
// - ViewModels: pure derivations for the views
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, CONFIG};
pub use error::{ActionError, ActionResult, ApiError, FailureKind};
pub use state::{
    AppState, AuthFlag, CartState, CartStore, MutationOrdering, Session, SessionStore,
    ShoppingListStore,
};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use crate::config::CONFIG;
    use crate::services::GlooTransport;
    use crate::state::AppState;
    use crate::utils::{LocalSpawner, LocalTokenStorage};

    // Single instance for the lifetime of the page
    thread_local! {
        static APP: RefCell<Option<AppState>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() {
            log::Level::Info
        } else {
            log::Level::Warn
        };
        wasm_logger::init(wasm_logger::Config::new(level));
        log::info!("🛒 Grocery Compare client ({})", CONFIG.environment);

        let app = AppState::new(
            &CONFIG,
            Rc::new(GlooTransport::new()),
            Rc::new(LocalTokenStorage::new(CONFIG.token_storage_key.clone())),
            Rc::new(LocalSpawner),
        );
        APP.with(|cell| *cell.borrow_mut() = Some(app.clone()));

        wasm_bindgen_futures::spawn_local(async move {
            app.start().await;
        });
        Ok(())
    }

    /// Current application state, once `main` has run
    pub fn app() -> Option<AppState> {
        APP.with(|cell| cell.borrow().clone())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::app;
