// ============================================================================
// CATALOG SERVICE - Read-only product / store search
// ============================================================================
// Outside the stateful core: nothing here touches the session or the basket.
// The category list changes rarely and is cached in memory.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use crate::error::ApiError;
use crate::models::{
    CategorySuggestion, NearbyStoreQuery, PriceHistory, Product, ProductPage, ProductQuery, Store,
    StoreFilter, StoreProductPage, StoreProductQuery,
};
use crate::services::api_client::ApiClient;

struct CategoriesCache {
    categories: Vec<String>,
    fetched_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    cache_ttl: Duration,
    categories: Rc<RefCell<Option<CategoriesCache>>>,
}

impl CatalogService {
    /// A negative TTL disables the cache; one too large for a `Duration`
    /// never expires.
    pub fn new(api: ApiClient, cache_hours: i64) -> Self {
        Self {
            api,
            cache_ttl: Duration::try_hours(cache_hours.max(0)).unwrap_or(Duration::MAX),
            categories: Rc::new(RefCell::new(None)),
        }
    }

    /// Search products. Signed-in users hit the authenticated endpoint,
    /// everyone else the guest one.
    pub async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let path = if self.api.context().has_credential() {
            "/products/search"
        } else {
            "/products/guest-search"
        };
        log::info!("🔍 Searching products: '{}' (page {})", query.q, query.page);
        let page: ProductPage = self.api.get(path, query.to_params()).await?;
        log::info!("✅ {} of {} products", page.products.len(), page.total);
        Ok(page)
    }

    pub async fn product(&self, product_id: &str) -> Result<Product, ApiError> {
        self.api
            .get(&format!("/products/{}", product_id), Vec::new())
            .await
    }

    /// Current price at every store stocking the product
    pub async fn price_history(&self, product_id: &str) -> Result<PriceHistory, ApiError> {
        self.api
            .get(&format!("/products/{}/price-history", product_id), Vec::new())
            .await
    }

    /// All product categories, served from cache while fresh
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        if let Some(cache) = self.categories.borrow().as_ref() {
            let age = Utc::now().signed_duration_since(cache.fetched_at);
            if age < self.cache_ttl {
                log::debug!("📋 Categories from cache ({} min old)", age.num_minutes());
                return Ok(cache.categories.clone());
            }
        }

        let categories: Vec<String> = self.api.get("/products/categories", Vec::new()).await?;
        log::info!("💾 {} categories cached", categories.len());
        *self.categories.borrow_mut() = Some(CategoriesCache {
            categories: categories.clone(),
            fetched_at: Utc::now(),
        });
        Ok(categories)
    }

    pub fn invalidate_categories(&self) {
        *self.categories.borrow_mut() = None;
    }

    pub async fn stores(&self, filter: &StoreFilter) -> Result<Vec<Store>, ApiError> {
        self.api.get("/stores/", filter.to_params()).await
    }

    pub async fn store(&self, store_id: &str) -> Result<Store, ApiError> {
        self.api.get(&format!("/stores/{}", store_id), Vec::new()).await
    }

    /// One store's products, priced at that store only
    pub async fn store_products(
        &self,
        store_id: &str,
        query: &StoreProductQuery,
    ) -> Result<StoreProductPage, ApiError> {
        let page: StoreProductPage = self
            .api
            .get(&format!("/stores/{}/products", store_id), query.to_params())
            .await?;
        log::info!("🏪 {}: {} of {} products", page.store_id, page.products.len(), page.total);
        Ok(page)
    }

    /// Stores within `radius_km`, nearest first as ordered by the server
    pub async fn nearby_stores(&self, query: &NearbyStoreQuery) -> Result<Vec<Store>, ApiError> {
        self.api.get("/stores/nearby/search", query.to_params()).await
    }

    pub async fn category_suggestions(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<CategorySuggestion>, ApiError> {
        self.api.get_category_suggestions(query).await
    }
}
