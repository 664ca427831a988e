// ============================================================================
// CART STORE - Mirror of the server-held basket
// ============================================================================
// Disabled while signed out (no snapshot, every call fails locally), Active
// while signed in. Every successful call swaps in the server's whole basket;
// nothing is patched locally.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use crate::error::{ActionError, ActionResult, ApiError};
use crate::models::{AddBasketItem, BasketSnapshot, BasketSummary};
use crate::services::ApiClient;
use crate::state::mutation_gate::{MutationGate, MutationOrdering};
use crate::state::session_state::AuthFlag;
use crate::utils::TaskSpawner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Disabled,
    Active,
}

struct CartInner {
    api: ApiClient,
    auth: AuthFlag,
    snapshot: RefCell<Option<BasketSnapshot>>,
    /// Bumped on every enable/disable; responses from an older epoch are dropped.
    epoch: Cell<u64>,
    gate: MutationGate,
}

#[derive(Clone)]
pub struct CartStore {
    inner: Rc<CartInner>,
}

impl CartStore {
    /// Build the store and bind it to the session's authentication flag.
    /// Becoming authenticated schedules one `fetch` on `spawner`; losing
    /// authentication drops the snapshot on the spot.
    pub fn new(
        api: ApiClient,
        auth: AuthFlag,
        ordering: MutationOrdering,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        let store = Self {
            inner: Rc::new(CartInner {
                api,
                auth,
                snapshot: RefCell::new(None),
                epoch: Cell::new(0),
                gate: MutationGate::new(ordering),
            }),
        };

        let weak = Rc::downgrade(&store.inner);
        let listener_spawner = spawner.clone();
        store.inner.auth.subscribe(move |authenticated| {
            if let Some(inner) = weak.upgrade() {
                let store = CartStore { inner };
                if authenticated {
                    store.activate(listener_spawner.as_ref());
                } else {
                    store.deactivate();
                }
            }
        });

        if store.inner.auth.get() {
            store.activate(spawner.as_ref());
        }
        store
    }

    pub fn state(&self) -> CartState {
        if self.inner.auth.get() {
            CartState::Active
        } else {
            CartState::Disabled
        }
    }

    /// Current snapshot (absent while disabled or before the first fetch)
    pub fn snapshot(&self) -> Option<BasketSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn item_count(&self) -> u32 {
        self.inner
            .snapshot
            .borrow()
            .as_ref()
            .map(|basket| basket.total_items)
            .unwrap_or(0)
    }

    pub fn total_cost(&self) -> f64 {
        self.inner
            .snapshot
            .borrow()
            .as_ref()
            .map(|basket| basket.total_cost)
            .unwrap_or(0.0)
    }

    pub fn estimated_savings(&self) -> f64 {
        self.inner
            .snapshot
            .borrow()
            .as_ref()
            .and_then(|basket| basket.estimated_savings)
            .unwrap_or(0.0)
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    pub async fn fetch(&self) -> ActionResult<BasketSnapshot> {
        self.replace_snapshot("fetch", "Failed to load basket", self.inner.api.get_basket())
            .await
    }

    /// `quantity` must be positive; the caller checks it.
    pub async fn add_item(
        &self,
        product_id: &str,
        store_id: &str,
        quantity: f64,
    ) -> ActionResult<BasketSnapshot> {
        let item = AddBasketItem {
            product_id: product_id.to_string(),
            store_id: store_id.to_string(),
            quantity,
        };
        self.replace_snapshot(
            "add_item",
            "Failed to add item to basket",
            self.inner.api.add_basket_item(&item),
        )
        .await
    }

    /// The minimum-quantity policy lives in the view (see `viewmodels`).
    pub async fn update_item(&self, item_id: &str, quantity: f64) -> ActionResult<BasketSnapshot> {
        self.replace_snapshot(
            "update_item",
            "Failed to update item",
            self.inner.api.update_basket_item(item_id, quantity),
        )
        .await
    }

    pub async fn remove_item(&self, item_id: &str) -> ActionResult<BasketSnapshot> {
        self.replace_snapshot(
            "remove_item",
            "Failed to remove item",
            self.inner.api.remove_basket_item(item_id),
        )
        .await
    }

    pub async fn clear(&self) -> ActionResult<BasketSnapshot> {
        self.replace_snapshot("clear", "Failed to clear basket", self.inner.api.clear_basket())
            .await
    }

    /// Comparison payload; the stored snapshot is left alone.
    pub async fn fetch_summary(&self) -> ActionResult<BasketSummary> {
        if !self.inner.auth.get() {
            log::warn!("⚠️ Basket summary requested while signed out");
            return Err(ActionError::not_authenticated());
        }
        self.inner
            .api
            .get_basket_summary()
            .await
            .map_err(|e| {
                log::error!("❌ Basket summary failed: {}", e);
                ActionError::from_api(e, "Failed to load basket summary")
            })
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    async fn replace_snapshot<F>(
        &self,
        action: &'static str,
        fallback: &'static str,
        request: F,
    ) -> ActionResult<BasketSnapshot>
    where
        F: Future<Output = Result<BasketSnapshot, ApiError>>,
    {
        if !self.inner.auth.get() {
            log::warn!("⚠️ Basket {} ignored: not signed in", action);
            return Err(ActionError::not_authenticated());
        }
        let epoch = self.inner.epoch.get();

        let inner = &self.inner;
        let outcome = self
            .inner
            .gate
            .run(async {
                // A queued call may get its turn after a logout.
                if !inner.auth.get() || inner.epoch.get() != epoch {
                    return Err(ActionError::not_authenticated());
                }
                request
                    .await
                    .map_err(|e| ActionError::from_api(e, fallback))
            })
            .await;

        match outcome {
            Ok(snapshot) => {
                if self.inner.epoch.get() != epoch || !self.inner.auth.get() {
                    log::warn!("⚠️ Dropping basket {} response from an ended session", action);
                    return Err(ActionError::not_authenticated());
                }
                log::info!(
                    "🛒 Basket {}: {} lines, {} items, total {:.2}",
                    action,
                    snapshot.items.len(),
                    snapshot.total_items,
                    snapshot.total_cost
                );
                *self.inner.snapshot.borrow_mut() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Err(error) => {
                log::error!("❌ Basket {} failed: {}", action, error);
                Err(error)
            }
        }
    }

    fn activate(&self, spawner: &dyn TaskSpawner) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
        *self.inner.snapshot.borrow_mut() = None;
        log::info!("🛒 Basket enabled, fetching");

        let store = self.clone();
        spawner.spawn(Box::pin(async move {
            if let Err(e) = store.fetch().await {
                log::warn!("⚠️ Initial basket fetch failed: {}", e);
            }
        }));
    }

    fn deactivate(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
        *self.inner.snapshot.borrow_mut() = None;
        log::info!("🛒 Basket disabled, snapshot discarded");
    }
}
