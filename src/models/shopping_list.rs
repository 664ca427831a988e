use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ShoppingListItem {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "super::basket::default_unit")]
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub actual_price: Option<f64>,
    #[serde(default)]
    pub store_preference: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

/// A named list owned by the user; replaced wholesale on every change.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ShoppingList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
    #[serde(default)]
    pub total_estimated_cost: Option<f64>,
    #[serde(default)]
    pub total_actual_cost: Option<f64>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl ShoppingList {
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct NewShoppingList {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ShoppingListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct NewShoppingListItem {
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewShoppingListItem {
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            quantity: 1.0,
            unit: "each".to_string(),
            category: None,
            notes: None,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ShoppingListItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct CategorySuggestion {
    pub category: String,
    pub suggested_unit: String,
    pub typical_quantity: f64,
}
