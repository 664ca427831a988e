use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line of the basket, priced at a single store.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct BasketItem {
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    pub product_name: String,
    pub store_id: String,
    pub store_name: String,
    pub price: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub quantity: f64,
    pub total_price: f64,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub added_at: Option<NaiveDateTime>,
}

pub(crate) fn default_unit() -> String {
    "each".to_string()
}

/// Server-authoritative basket. Always replaced wholesale, never patched.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct BasketSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub items: Vec<BasketItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub estimated_savings: Option<f64>,
    /// store_id -> cost of buying the whole basket there
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub alternative_stores: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl BasketSnapshot {
    pub fn item(&self, item_id: &str) -> Option<&BasketItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AddBasketItem {
    pub product_id: String,
    pub store_id: String,
    pub quantity: f64,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UpdateBasketItem {
    pub quantity: f64,
}

/// Comparison payload from `/basket/summary`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct BasketSummary {
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub estimated_savings: Option<f64>,
    #[serde(default)]
    pub cheapest_alternative_store: Option<String>,
    #[serde(default)]
    pub potential_savings: Option<f64>,
}
