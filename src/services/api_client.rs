// ============================================================================
// API CLIENT - HTTP communication only (stateless apart from the credential)
// ============================================================================
// No business logic here: every method maps to exactly one endpoint of the
// comparison API and returns the decoded body or an ApiError.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{
    AddBasketItem, AuthTokenResponse, BasketSnapshot, BasketSummary, CategorySuggestion,
    LoginRequest, NewShoppingList, NewShoppingListItem, ProfileUpdate, RegisterRequest,
    ShoppingList, ShoppingListItemPatch, ShoppingListPatch, UpdateBasketItem, UserProfile,
};
use crate::services::request_context::RequestContext;
use crate::services::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

type Query = Vec<(&'static str, String)>;

/// API client shared by every store. Clones share the transport and the
/// request context.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    context: RequestContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            context: RequestContext::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential slot read on every request
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, path));
        request.query = query
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        request.headers.push(("Accept".to_string(), "application/json".to_string()));
        if body.is_some() {
            request
                .headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(authorization) = self.context.authorization() {
            request.headers.push(authorization);
        }
        request.body = body;

        log::debug!("➡️ {} {}", method.as_str(), path);
        let response = self.transport.send(request).await?;

        if !response.ok() {
            let error = ApiError::from_response(response.status, &response.body);
            log::warn!("❌ {} {} -> {}", method.as_str(), path, error);
            return Err(error);
        }
        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, path, query, body).await?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, query, None).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.request(method, path, Vec::new(), Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, path, Vec::new(), None).await
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Profile for the attached credential
    pub async fn get_me(&self) -> Result<UserProfile, ApiError> {
        self.get("/auth/me", Vec::new()).await
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthTokenResponse, ApiError> {
        log::info!("🔐 Login for {}", credentials.email);
        self.send_json(HttpMethod::Post, "/auth/login", credentials).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthTokenResponse, ApiError> {
        log::info!("📝 Registering {}", request.email);
        self.send_json(HttpMethod::Post, "/auth/register", request).await
    }

    pub async fn update_me(&self, patch: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.send_json(HttpMethod::Put, "/auth/me", patch).await
    }

    // ------------------------------------------------------------------------
    // Basket
    // ------------------------------------------------------------------------

    pub async fn get_basket(&self) -> Result<BasketSnapshot, ApiError> {
        self.get("/basket/", Vec::new()).await
    }

    pub async fn add_basket_item(&self, item: &AddBasketItem) -> Result<BasketSnapshot, ApiError> {
        self.send_json(HttpMethod::Post, "/basket/items", item).await
    }

    pub async fn update_basket_item(
        &self,
        item_id: &str,
        quantity: f64,
    ) -> Result<BasketSnapshot, ApiError> {
        let path = format!("/basket/items/{}", item_id);
        self.send_json(HttpMethod::Put, &path, &UpdateBasketItem { quantity }).await
    }

    pub async fn remove_basket_item(&self, item_id: &str) -> Result<BasketSnapshot, ApiError> {
        self.delete(&format!("/basket/items/{}", item_id)).await
    }

    pub async fn clear_basket(&self) -> Result<BasketSnapshot, ApiError> {
        self.delete("/basket/").await
    }

    pub async fn get_basket_summary(&self) -> Result<BasketSummary, ApiError> {
        self.get("/basket/summary", Vec::new()).await
    }

    // ------------------------------------------------------------------------
    // Shopping lists
    // ------------------------------------------------------------------------

    pub async fn get_shopping_lists(&self) -> Result<Vec<ShoppingList>, ApiError> {
        self.get("/shopping-lists/", Vec::new()).await
    }

    pub async fn get_shopping_list(&self, list_id: &str) -> Result<ShoppingList, ApiError> {
        self.get(&format!("/shopping-lists/{}", list_id), Vec::new()).await
    }

    pub async fn create_shopping_list(
        &self,
        list: &NewShoppingList,
    ) -> Result<ShoppingList, ApiError> {
        self.send_json(HttpMethod::Post, "/shopping-lists/", list).await
    }

    pub async fn update_shopping_list(
        &self,
        list_id: &str,
        patch: &ShoppingListPatch,
    ) -> Result<ShoppingList, ApiError> {
        let path = format!("/shopping-lists/{}", list_id);
        self.send_json(HttpMethod::Put, &path, patch).await
    }

    /// Answers 204 with no body
    pub async fn delete_shopping_list(&self, list_id: &str) -> Result<(), ApiError> {
        let path = format!("/shopping-lists/{}", list_id);
        self.execute(HttpMethod::Delete, &path, Vec::new(), None).await?;
        Ok(())
    }

    pub async fn add_shopping_list_item(
        &self,
        list_id: &str,
        item: &NewShoppingListItem,
    ) -> Result<ShoppingList, ApiError> {
        let path = format!("/shopping-lists/{}/items", list_id);
        self.send_json(HttpMethod::Post, &path, item).await
    }

    pub async fn update_shopping_list_item(
        &self,
        list_id: &str,
        item_id: &str,
        patch: &ShoppingListItemPatch,
    ) -> Result<ShoppingList, ApiError> {
        let path = format!("/shopping-lists/{}/items/{}", list_id, item_id);
        self.send_json(HttpMethod::Put, &path, patch).await
    }

    pub async fn remove_shopping_list_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ShoppingList, ApiError> {
        self.delete(&format!("/shopping-lists/{}/items/{}", list_id, item_id))
            .await
    }

    pub async fn get_category_suggestions(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<CategorySuggestion>, ApiError> {
        let params = query
            .map(|q| vec![("q", q.to_string())])
            .unwrap_or_default();
        self.get("/shopping-lists/suggestions/categories", params).await
    }
}
