use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::product::Product;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct StoreLocation {
    pub address: String,
    pub city: String,
    pub postcode: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<StoreLocation>,
    #[serde(default)]
    pub delivery_available: bool,
    #[serde(default)]
    pub click_collect_available: bool,
    #[serde(default)]
    pub opening_hours: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default = "default_price_tier")]
    pub price_tier: String,
}

fn default_store_type() -> String {
    "supermarket".to_string()
}

fn default_price_tier() -> String {
    "medium".to_string()
}

impl Store {
    /// Closest location reported by the server, if distances were computed
    pub fn nearest_distance_km(&self) -> Option<f64> {
        self.locations
            .iter()
            .filter_map(|location| location.distance_km)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Filters for `GET /stores/`
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StoreFilter {
    pub location: Option<String>,
    pub delivery_only: bool,
    pub store_type: Option<String>,
    pub radius_km: Option<f64>,
}

impl StoreFilter {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if self.delivery_only {
            params.push(("delivery_only", "true".to_string()));
        }
        if let Some(store_type) = &self.store_type {
            params.push(("store_type", store_type.clone()));
        }
        if let Some(radius) = self.radius_km {
            params.push(("radius_km", radius.to_string()));
        }
        params
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct NearbyStoreQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub delivery_only: bool,
}

impl NearbyStoreQuery {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            radius_km: 10.0,
            delivery_only: false,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lat", self.lat.to_string()),
            ("lng", self.lng.to_string()),
            ("radius_km", self.radius_km.to_string()),
            ("delivery_only", self.delivery_only.to_string()),
        ]
    }
}

/// Paging for `GET /stores/{id}/products`. `per_page` is capped at 100.
#[derive(Clone, PartialEq, Debug)]
pub struct StoreProductQuery {
    pub category: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for StoreProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            page: 1,
            per_page: 20,
        }
    }
}

impl StoreProductQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        params.push(("page", self.page.max(1).to_string()));
        params.push(("per_page", self.per_page.clamp(1, 100).to_string()));
        params
    }
}

/// One store's range; each product carries only that store's price.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct StoreProductPage {
    pub store_id: String,
    pub products: Vec<Product>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
}
