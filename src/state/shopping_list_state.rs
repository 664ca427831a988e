// ============================================================================
// SHOPPING LIST STORE - The user's saved lists
// ============================================================================
// Same contract as the basket: server responses replace whole lists, calls
// while signed out fail locally, and signing out drops everything. Lists are
// loaded on demand (`fetch_all`), not on login.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use crate::error::{ActionError, ActionResult, ApiError};
use crate::models::{
    NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItemPatch, ShoppingListPatch,
};
use crate::services::ApiClient;
use crate::state::session_state::AuthFlag;

struct ListsInner {
    api: ApiClient,
    auth: AuthFlag,
    lists: RefCell<Vec<ShoppingList>>,
    epoch: Cell<u64>,
}

#[derive(Clone)]
pub struct ShoppingListStore {
    inner: Rc<ListsInner>,
}

impl ShoppingListStore {
    pub fn new(api: ApiClient, auth: AuthFlag) -> Self {
        let store = Self {
            inner: Rc::new(ListsInner {
                api,
                auth,
                lists: RefCell::new(Vec::new()),
                epoch: Cell::new(0),
            }),
        };

        let weak = Rc::downgrade(&store.inner);
        store.inner.auth.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.epoch.set(inner.epoch.get() + 1);
                inner.lists.borrow_mut().clear();
            }
        });
        store
    }

    pub fn lists(&self) -> Vec<ShoppingList> {
        self.inner.lists.borrow().clone()
    }

    pub fn list(&self, list_id: &str) -> Option<ShoppingList> {
        self.inner
            .lists
            .borrow()
            .iter()
            .find(|list| list.id == list_id)
            .cloned()
    }

    pub async fn fetch_all(&self) -> ActionResult<Vec<ShoppingList>> {
        let lists = self
            .call("Failed to load shopping lists", self.inner.api.get_shopping_lists())
            .await?;
        log::info!("📋 Loaded {} shopping lists", lists.len());
        *self.inner.lists.borrow_mut() = lists.clone();
        Ok(lists)
    }

    /// New lists go to the front, newest first.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ActionResult<ShoppingList> {
        let request = NewShoppingList {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let list = self
            .call(
                "Failed to create shopping list",
                self.inner.api.create_shopping_list(&request),
            )
            .await?;
        log::info!("📋 Created list '{}'", list.name);
        self.inner.lists.borrow_mut().insert(0, list.clone());
        Ok(list)
    }

    pub async fn refresh(&self, list_id: &str) -> ActionResult<ShoppingList> {
        let list = self
            .call(
                "Failed to load shopping list",
                self.inner.api.get_shopping_list(list_id),
            )
            .await?;
        Ok(self.upsert(list))
    }

    pub async fn update(
        &self,
        list_id: &str,
        patch: &ShoppingListPatch,
    ) -> ActionResult<ShoppingList> {
        let list = self
            .call(
                "Failed to update shopping list",
                self.inner.api.update_shopping_list(list_id, patch),
            )
            .await?;
        Ok(self.upsert(list))
    }

    /// The local entry is dropped only once the server confirms.
    pub async fn delete(&self, list_id: &str) -> ActionResult {
        self.call(
            "Failed to delete shopping list",
            self.inner.api.delete_shopping_list(list_id),
        )
        .await?;
        self.inner.lists.borrow_mut().retain(|list| list.id != list_id);
        log::info!("🗑️ Deleted list {}", list_id);
        Ok(())
    }

    pub async fn add_item(
        &self,
        list_id: &str,
        item: &NewShoppingListItem,
    ) -> ActionResult<ShoppingList> {
        let list = self
            .call(
                "Failed to add item to list",
                self.inner.api.add_shopping_list_item(list_id, item),
            )
            .await?;
        Ok(self.upsert(list))
    }

    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        patch: &ShoppingListItemPatch,
    ) -> ActionResult<ShoppingList> {
        let list = self
            .call(
                "Failed to update list item",
                self.inner.api.update_shopping_list_item(list_id, item_id, patch),
            )
            .await?;
        Ok(self.upsert(list))
    }

    pub async fn remove_item(&self, list_id: &str, item_id: &str) -> ActionResult<ShoppingList> {
        let list = self
            .call(
                "Failed to remove list item",
                self.inner.api.remove_shopping_list_item(list_id, item_id),
            )
            .await?;
        Ok(self.upsert(list))
    }

    async fn call<T, F>(&self, fallback: &'static str, request: F) -> ActionResult<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if !self.inner.auth.get() {
            return Err(ActionError::not_authenticated());
        }
        let epoch = self.inner.epoch.get();
        let result = request.await;

        if self.inner.epoch.get() != epoch || !self.inner.auth.get() {
            log::warn!("⚠️ Dropping shopping list response from an ended session");
            return Err(ActionError::not_authenticated());
        }
        result.map_err(|e| {
            log::error!("❌ {}: {}", fallback, e);
            ActionError::from_api(e, fallback)
        })
    }

    fn upsert(&self, list: ShoppingList) -> ShoppingList {
        let mut lists = self.inner.lists.borrow_mut();
        match lists.iter_mut().find(|existing| existing.id == list.id) {
            Some(existing) => *existing = list.clone(),
            None => lists.insert(0, list.clone()),
        }
        list
    }
}
