use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ProductPrice {
    pub store_id: String,
    pub store_name: String,
    pub price: f64,
    #[serde(default = "super::basket::default_unit")]
    pub unit: String,
    #[serde(default = "default_available")]
    pub availability: bool,
    #[serde(default)]
    pub promotion: Option<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub prices: Vec<ProductPrice>,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub cheapest_store: Option<String>,
}

/// One page of search results
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Current prices for one product. The server keeps no history yet and says
/// so in `message`.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PriceHistory {
    pub product_id: String,
    #[serde(default)]
    pub current_prices: Vec<ProductPrice>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Name,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Name => "name",
        }
    }
}

/// Product search parameters. `page` is 1-based; `per_page` is capped at 50
/// by the server.
#[derive(Clone, PartialEq, Debug)]
pub struct ProductQuery {
    pub q: String,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub store_ids: Vec<String>,
    pub sort_by: SortBy,
    pub page: u32,
    pub per_page: u32,
}

impl ProductQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            category: None,
            min_price: None,
            max_price: None,
            store_ids: Vec::new(),
            sort_by: SortBy::Relevance,
            page: 1,
            per_page: 12,
        }
    }

    /// Query-string pairs, skipping unset filters
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.q.clone())];
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(min) = self.min_price {
            params.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("max_price", max.to_string()));
        }
        if !self.store_ids.is_empty() {
            params.push(("store_ids", self.store_ids.join(",")));
        }
        params.push(("sort_by", self.sort_by.as_str().to_string()));
        params.push(("page", self.page.max(1).to_string()));
        params.push(("per_page", self.per_page.clamp(1, 50).to_string()));
        params
    }
}
