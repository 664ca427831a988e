// ============================================================================
// APP STATE - Composition root
// ============================================================================
// One ApiClient (and so one RequestContext) shared by every store. The cart
// and the shopping lists see the session only through its AuthFlag.
// ============================================================================

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::services::{ApiClient, CatalogService, HttpTransport};
use crate::state::cart_state::CartStore;
use crate::state::session_state::SessionStore;
use crate::state::shopping_list_state::ShoppingListStore;
use crate::utils::{TaskSpawner, TokenStorage};

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub session: SessionStore,
    pub cart: CartStore,
    pub shopping_lists: ShoppingListStore,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn TokenStorage>,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        let api = ApiClient::new(config.api_base_url(), transport);
        log::info!("🌐 API base URL: {}", api.base_url());

        let session = SessionStore::new(api.clone(), storage);
        let cart = CartStore::new(
            api.clone(),
            session.auth_flag(),
            config.mutation_ordering,
            spawner,
        );
        let shopping_lists = ShoppingListStore::new(api.clone(), session.auth_flag());
        let catalog = CatalogService::new(api.clone(), config.categories_cache_hours);

        Self {
            api,
            session,
            cart,
            shopping_lists,
            catalog,
        }
    }

    /// Restore the persisted session. A valid token activates the cart,
    /// which then fetches on the spawner.
    pub async fn start(&self) {
        log::info!("🚀 Starting client");
        self.session.initialize().await;
    }
}
