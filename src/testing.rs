// ============================================================================
// TEST SUPPORT - Scripted transport and an in-memory comparison backend
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use futures::channel::oneshot;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ApiError;
use crate::models::{
    AddBasketItem, BasketItem, BasketSnapshot, BasketSummary, LoginRequest, NewShoppingList,
    NewShoppingListItem, ProfileUpdate, RegisterRequest, ShoppingList, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListPatch, UpdateBasketItem, UserProfile,
};
use crate::services::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

pub const FAKE_BASE_URL: &str = "http://test/api";

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(status, body)
}

/// Basket holding a single line `item-1` (P1 at S1) with `quantity`
pub fn basket_response(quantity: f64) -> HttpResponse {
    let body = json!({
        "items": [{
            "id": "item-1",
            "product_id": "P1",
            "product_name": "Oat milk",
            "store_id": "S1",
            "store_name": "FreshMart",
            "price": 2.0,
            "unit": "1L",
            "quantity": quantity,
            "total_price": quantity * 2.0
        }],
        "total_items": quantity as u32,
        "total_cost": quantity * 2.0
    });
    HttpResponse::new(200, body.to_string())
}

// ----------------------------------------------------------------------------
// Scripted transport
// ----------------------------------------------------------------------------

/// Answers requests from a FIFO script. Each request takes the next entry;
/// gated entries stay pending until the test sends their response.
#[derive(Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<oneshot::Receiver<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ready(&self, response: HttpResponse) {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(response);
        self.script.borrow_mut().push_back(rx);
    }

    pub fn push_gated(&self) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(rx);
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(reply) => reply
                .await
                .map_err(|_| ApiError::Network("script entry dropped".into())),
            None => Err(ApiError::Network("script exhausted".into())),
        }
    }
}

// ----------------------------------------------------------------------------
// Fake backend
// ----------------------------------------------------------------------------

struct FakePrice {
    store_id: &'static str,
    store_name: &'static str,
    price: f64,
    unit: &'static str,
    available: bool,
}

struct FakeProduct {
    id: &'static str,
    name: &'static str,
    prices: Vec<FakePrice>,
}

struct Account {
    password: String,
    profile: UserProfile,
}

#[derive(Default)]
struct FakeState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    baskets: HashMap<String, Vec<BasketItem>>,
    lists: Vec<ShoppingList>,
}

/// In-memory stand-in for the comparison API: auth, basket and shopping
/// lists, with totals recomputed the way the real server does.
pub struct FakeBackend {
    state: RefCell<FakeState>,
    catalog: Vec<FakeProduct>,
    requests: RefCell<Vec<HttpRequest>>,
    offline: Cell<bool>,
    next_id: Cell<u32>,
}

pub const SEEDED_EMAIL: &str = "a@b.com";

impl FakeBackend {
    /// Seeded with one shopper (`a@b.com` / `x`) and three products:
    /// P1 oat milk (S1 2.00, S2 1.50), P2 sourdough (S1 3.00, S2 3.40),
    /// P3 eggs (S1 2.50 only).
    pub fn new() -> Self {
        let price = |store_id, store_name, price, unit| FakePrice {
            store_id,
            store_name,
            price,
            unit,
            available: true,
        };
        let catalog = vec![
            FakeProduct {
                id: "P1",
                name: "Oat milk",
                prices: vec![
                    price("S1", "FreshMart", 2.0, "1L"),
                    price("S2", "ValueShop", 1.5, "1L"),
                ],
            },
            FakeProduct {
                id: "P2",
                name: "Sourdough",
                prices: vec![
                    price("S1", "FreshMart", 3.0, "800g"),
                    price("S2", "ValueShop", 3.4, "800g"),
                ],
            },
            FakeProduct {
                id: "P3",
                name: "Eggs",
                prices: vec![price("S1", "FreshMart", 2.5, "6 pack")],
            },
        ];

        let backend = Self {
            state: RefCell::new(FakeState::default()),
            catalog,
            requests: RefCell::new(Vec::new()),
            offline: Cell::new(false),
            next_id: Cell::new(0),
        };
        backend.create_account(SEEDED_EMAIL, "x", "Ada Shopper", None);
        backend
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Mint a valid token for an existing account without a request
    pub fn issue_token(&self, email: &str) -> String {
        let token = format!("srv-token-{}", self.next_id());
        self.state
            .borrow_mut()
            .tokens
            .insert(token.clone(), email.to_string());
        token
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{}{}", FAKE_BASE_URL, path);
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }

    /// Server-side basket of the seeded shopper
    pub fn basket(&self) -> BasketSnapshot {
        self.basket_of(SEEDED_EMAIL)
    }

    pub fn lists(&self) -> Vec<ShoppingList> {
        self.state.borrow().lists.clone()
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn create_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        location: Option<String>,
    ) -> UserProfile {
        let profile = UserProfile {
            id: format!("user-{}", self.next_id()),
            email: email.to_string(),
            full_name: full_name.to_string(),
            location,
            is_active: true,
            created_at: None,
        };
        self.state.borrow_mut().accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                profile: profile.clone(),
            },
        );
        profile
    }

    fn route(&self, request: &HttpRequest) -> HttpResponse {
        let path = request
            .url
            .strip_prefix(FAKE_BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match (request.method, segments.as_slice()) {
            (HttpMethod::Post, ["auth", "login"]) => self.login(request),
            (HttpMethod::Post, ["auth", "register"]) => self.register(request),
            (method, ["auth", "me"]) => self.with_user(request, |email| match method {
                HttpMethod::Get => self.profile(email),
                HttpMethod::Put => self.update_profile(email, request),
                _ => not_found("Not Found"),
            }),
            (_, ["basket", ..]) => {
                self.with_user(request, |email| self.basket_route(email, request, &segments[1..]))
            }
            (_, ["shopping-lists", ..]) => {
                self.with_user(request, |email| self.list_route(email, request, &segments[1..]))
            }
            _ => not_found("Not Found"),
        }
    }

    fn with_user(
        &self,
        request: &HttpRequest,
        handler: impl FnOnce(&str) -> HttpResponse,
    ) -> HttpResponse {
        let email = request
            .header("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.state.borrow().tokens.get(token).cloned());
        match email {
            Some(email) => handler(&email),
            None => error_response(401, "Could not validate credentials"),
        }
    }

    // -- auth ---------------------------------------------------------------

    fn login(&self, request: &HttpRequest) -> HttpResponse {
        let Some(credentials) = parse_body::<LoginRequest>(request) else {
            return error_response(422, "Invalid body");
        };
        let profile = self
            .state
            .borrow()
            .accounts
            .get(&credentials.email)
            .filter(|account| account.password == credentials.password)
            .map(|account| account.profile.clone());
        match profile {
            Some(profile) => self.token_response(profile),
            None => error_response(401, "Incorrect email or password"),
        }
    }

    fn register(&self, request: &HttpRequest) -> HttpResponse {
        let Some(body) = parse_body::<RegisterRequest>(request) else {
            return error_response(422, "Invalid body");
        };
        if self.state.borrow().accounts.contains_key(&body.email) {
            return error_response(400, "Email already registered");
        }
        let profile =
            self.create_account(&body.email, &body.password, &body.full_name, body.location);
        self.token_response(profile)
    }

    fn token_response(&self, profile: UserProfile) -> HttpResponse {
        let token = self.issue_token(&profile.email);
        ok(&json!({
            "access_token": token,
            "token_type": "bearer",
            "user": profile,
        }))
    }

    fn profile(&self, email: &str) -> HttpResponse {
        match self.state.borrow().accounts.get(email) {
            Some(account) => ok(&account.profile),
            None => error_response(401, "Could not validate credentials"),
        }
    }

    fn update_profile(&self, email: &str, request: &HttpRequest) -> HttpResponse {
        let Some(patch) = parse_body::<ProfileUpdate>(request) else {
            return error_response(422, "Invalid body");
        };
        let mut state = self.state.borrow_mut();
        let Some(account) = state.accounts.get_mut(email) else {
            return error_response(401, "Could not validate credentials");
        };
        if let Some(full_name) = patch.full_name {
            account.profile.full_name = full_name;
        }
        if let Some(location) = patch.location {
            account.profile.location = Some(location);
        }
        ok(&account.profile)
    }

    // -- basket -------------------------------------------------------------

    fn basket_route(&self, email: &str, request: &HttpRequest, rest: &[&str]) -> HttpResponse {
        match (request.method, rest) {
            (HttpMethod::Get, [""]) | (HttpMethod::Get, []) => ok(&self.basket_of(email)),
            (HttpMethod::Get, ["summary"]) => ok(&self.summary(email)),
            (HttpMethod::Delete, [""]) | (HttpMethod::Delete, []) => {
                self.state.borrow_mut().baskets.insert(email.to_string(), Vec::new());
                ok(&self.basket_of(email))
            }
            (HttpMethod::Post, ["items"]) => match parse_body::<AddBasketItem>(request) {
                Some(item) => self.add_basket_item(email, item),
                None => error_response(422, "Invalid body"),
            },
            (HttpMethod::Put, ["items", item_id]) => match parse_body::<UpdateBasketItem>(request) {
                Some(update) => self.edit_basket(email, item_id, |items, index| {
                    let item = &mut items[index];
                    item.quantity = update.quantity;
                    item.total_price = item.price * item.quantity;
                }),
                None => error_response(422, "Invalid body"),
            },
            (HttpMethod::Delete, ["items", item_id]) => {
                self.edit_basket(email, item_id, |items, index| {
                    items.remove(index);
                })
            }
            _ => not_found("Not Found"),
        }
    }

    fn add_basket_item(&self, email: &str, add: AddBasketItem) -> HttpResponse {
        let Some(product) = self.catalog.iter().find(|p| p.id == add.product_id) else {
            return not_found("Product not found");
        };
        let Some(price) = product
            .prices
            .iter()
            .find(|price| price.store_id == add.store_id)
        else {
            return not_found("Product not available at this store");
        };

        let new_id = format!("item-{}", self.next_id());
        {
            let mut state = self.state.borrow_mut();
            let items = state.baskets.entry(email.to_string()).or_default();
            match items
                .iter_mut()
                .find(|item| item.product_id == add.product_id && item.store_id == add.store_id)
            {
                Some(existing) => {
                    existing.quantity += add.quantity;
                    existing.total_price = existing.quantity * existing.price;
                }
                None => items.push(BasketItem {
                    id: new_id,
                    product_id: product.id.to_string(),
                    product_name: product.name.to_string(),
                    store_id: price.store_id.to_string(),
                    store_name: price.store_name.to_string(),
                    price: price.price,
                    unit: price.unit.to_string(),
                    quantity: add.quantity,
                    total_price: price.price * add.quantity,
                    added_at: None,
                }),
            }
        }
        HttpResponse::new(201, serialize(&self.basket_of(email)))
    }

    fn edit_basket(
        &self,
        email: &str,
        item_id: &str,
        edit: impl FnOnce(&mut Vec<BasketItem>, usize),
    ) -> HttpResponse {
        {
            let mut state = self.state.borrow_mut();
            let items = state.baskets.entry(email.to_string()).or_default();
            match items.iter().position(|item| item.id == item_id) {
                Some(index) => edit(items, index),
                None => return not_found("Item not found in basket"),
            }
        }
        ok(&self.basket_of(email))
    }

    fn basket_of(&self, email: &str) -> BasketSnapshot {
        let items = self
            .state
            .borrow()
            .baskets
            .get(email)
            .cloned()
            .unwrap_or_default();
        self.snapshot(items)
    }

    fn snapshot(&self, items: Vec<BasketItem>) -> BasketSnapshot {
        let total_cost: f64 = items.iter().map(|item| item.total_price).sum();
        let total_items: f64 = items.iter().map(|item| item.quantity).sum();

        let mut alternative_stores: BTreeMap<String, f64> = BTreeMap::new();
        for item in &items {
            let Some(product) = self.catalog.iter().find(|p| p.id == item.product_id) else {
                continue;
            };
            for price in product
                .prices
                .iter()
                .filter(|price| price.available && price.store_id != item.store_id)
            {
                *alternative_stores.entry(price.store_id.to_string()).or_insert(0.0) +=
                    price.price * item.quantity;
            }
        }
        for cost in alternative_stores.values_mut() {
            *cost = round2(*cost);
        }

        let estimated_savings = alternative_stores
            .values()
            .cloned()
            .reduce(f64::min)
            .map(|cheapest| (total_cost - cheapest).max(0.0));

        BasketSnapshot {
            id: None,
            user_id: None,
            items,
            total_items: total_items as u32,
            total_cost: round2(total_cost),
            estimated_savings,
            alternative_stores,
            created_at: None,
            updated_at: None,
        }
    }

    fn summary(&self, email: &str) -> BasketSummary {
        let basket = self.basket_of(email);
        let cheapest = basket
            .alternative_stores
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(store, cost)| (store.clone(), *cost));
        BasketSummary {
            total_cost: basket.total_cost,
            total_items: basket.total_items,
            estimated_savings: basket.estimated_savings,
            cheapest_alternative_store: cheapest.as_ref().map(|(store, _)| store.clone()),
            potential_savings: cheapest.map(|(_, cost)| round2(basket.total_cost - cost).max(0.0)),
        }
    }

    // -- shopping lists -----------------------------------------------------

    fn list_route(&self, email: &str, request: &HttpRequest, rest: &[&str]) -> HttpResponse {
        let user_id = match self.state.borrow().accounts.get(email) {
            Some(account) => account.profile.id.clone(),
            None => return error_response(401, "Could not validate credentials"),
        };

        match (request.method, rest) {
            (HttpMethod::Get, [""]) | (HttpMethod::Get, []) => {
                let lists: Vec<ShoppingList> = self
                    .state
                    .borrow()
                    .lists
                    .iter()
                    .filter(|list| list.user_id == user_id)
                    .cloned()
                    .collect();
                ok(&lists)
            }
            (HttpMethod::Post, [""]) | (HttpMethod::Post, []) => {
                let Some(new_list) = parse_body::<NewShoppingList>(request) else {
                    return error_response(422, "Invalid body");
                };
                let list = ShoppingList {
                    id: format!("list-{}", self.next_id()),
                    user_id,
                    name: new_list.name,
                    description: new_list.description,
                    items: Vec::new(),
                    total_estimated_cost: None,
                    total_actual_cost: None,
                    is_shared: false,
                    created_at: None,
                    updated_at: None,
                };
                self.state.borrow_mut().lists.push(list.clone());
                HttpResponse::new(201, serialize(&list))
            }
            (HttpMethod::Get, [list_id]) => self.edit_list(&user_id, list_id, |_| Ok(())),
            (HttpMethod::Put, [list_id]) => {
                let Some(patch) = parse_body::<ShoppingListPatch>(request) else {
                    return error_response(422, "Invalid body");
                };
                self.edit_list(&user_id, list_id, |list| {
                    if let Some(name) = patch.name {
                        list.name = name;
                    }
                    if let Some(description) = patch.description {
                        list.description = Some(description);
                    }
                    Ok(())
                })
            }
            (HttpMethod::Delete, [list_id]) => {
                let mut state = self.state.borrow_mut();
                let before = state.lists.len();
                state
                    .lists
                    .retain(|list| !(list.id == *list_id && list.user_id == user_id));
                if state.lists.len() == before {
                    not_found("Shopping list not found")
                } else {
                    HttpResponse::new(204, "")
                }
            }
            (HttpMethod::Post, [list_id, "items"]) => {
                let Some(new_item) = parse_body::<NewShoppingListItem>(request) else {
                    return error_response(422, "Invalid body");
                };
                let item = ShoppingListItem {
                    id: format!("li-{}", self.next_id()),
                    product_id: None,
                    product_name: new_item.product_name,
                    quantity: new_item.quantity,
                    unit: new_item.unit,
                    category: new_item.category,
                    notes: new_item.notes,
                    completed: false,
                    estimated_price: None,
                    actual_price: None,
                    store_preference: None,
                };
                self.edit_list(&user_id, list_id, |list| {
                    list.items.push(item);
                    Ok(())
                })
            }
            (HttpMethod::Put, [list_id, "items", item_id]) => {
                let Some(patch) = parse_body::<ShoppingListItemPatch>(request) else {
                    return error_response(422, "Invalid body");
                };
                self.edit_list(&user_id, list_id, |list| {
                    let item = list
                        .items
                        .iter_mut()
                        .find(|item| item.id == *item_id)
                        .ok_or("Item not found in shopping list")?;
                    if let Some(name) = patch.product_name {
                        item.product_name = name;
                    }
                    if let Some(quantity) = patch.quantity {
                        item.quantity = quantity;
                    }
                    if let Some(completed) = patch.completed {
                        item.completed = completed;
                    }
                    Ok(())
                })
            }
            (HttpMethod::Delete, [list_id, "items", item_id]) => {
                self.edit_list(&user_id, list_id, |list| {
                    let before = list.items.len();
                    list.items.retain(|item| item.id != *item_id);
                    if list.items.len() == before {
                        Err("Item not found in shopping list")
                    } else {
                        Ok(())
                    }
                })
            }
            _ => not_found("Not Found"),
        }
    }

    fn edit_list(
        &self,
        user_id: &str,
        list_id: &str,
        edit: impl FnOnce(&mut ShoppingList) -> Result<(), &'static str>,
    ) -> HttpResponse {
        let mut state = self.state.borrow_mut();
        let Some(list) = state
            .lists
            .iter_mut()
            .find(|list| list.id == list_id && list.user_id == user_id)
        else {
            return not_found("Shopping list not found");
        };
        match edit(&mut *list) {
            Ok(()) => ok(&*list),
            Err(detail) => not_found(detail),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline.get() {
            return Err(ApiError::Network("offline".into()));
        }
        Ok(self.route(&request))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_body<T: DeserializeOwned>(request: &HttpRequest) -> Option<T> {
    request
        .body
        .as_deref()
        .and_then(|body| serde_json::from_str(body).ok())
}

fn serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn ok<T: serde::Serialize>(value: &T) -> HttpResponse {
    HttpResponse::new(200, serialize(value))
}

fn error_response(status: u16, detail: &str) -> HttpResponse {
    HttpResponse::new(status, json!({ "detail": detail }).to_string())
}

fn not_found(detail: &str) -> HttpResponse {
    error_response(404, detail)
}
