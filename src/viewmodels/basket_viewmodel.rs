// ============================================================================
// BASKET VIEWMODEL - Pure derivations for the basket and product views
// ============================================================================
// Nothing here talks to the server or mutates a store; views call these on
// the current snapshot.
// ============================================================================

use crate::models::{BasketItem, BasketSnapshot, Product, ProductPrice};

/// Smallest quantity the basket view lets the user set on a line.
pub const MIN_ITEM_QUANTITY: f64 = 0.1;

/// Basket lines bought at one store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup {
    pub store_id: String,
    pub store_name: String,
    pub items: Vec<BasketItem>,
    pub subtotal: f64,
}

/// Group basket lines by store, stores in order of first appearance.
pub fn group_by_store(snapshot: &BasketSnapshot) -> Vec<StoreGroup> {
    let mut groups: Vec<StoreGroup> = Vec::new();
    for item in &snapshot.items {
        match groups.iter_mut().find(|group| group.store_id == item.store_id) {
            Some(group) => {
                group.subtotal += item.total_price;
                group.items.push(item.clone());
            }
            None => groups.push(StoreGroup {
                store_id: item.store_id.clone(),
                store_name: item.store_name.clone(),
                items: vec![item.clone()],
                subtotal: item.total_price,
            }),
        }
    }
    groups
}

/// Cheapest price among the stores that currently stock the product
pub fn cheapest_offer(product: &Product) -> Option<&ProductPrice> {
    product
        .prices
        .iter()
        .filter(|price| price.availability)
        .min_by(|a, b| a.price.total_cmp(&b.price))
}

/// Store that would be cheapest for the whole basket, with its cost
pub fn cheapest_alternative(snapshot: &BasketSnapshot) -> Option<(&str, f64)> {
    snapshot
        .alternative_stores
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(store_id, cost)| (store_id.as_str(), *cost))
}

/// What switching everything to the cheapest alternative would save
pub fn potential_savings(snapshot: &BasketSnapshot) -> Option<f64> {
    cheapest_alternative(snapshot).map(|(_, cost)| (snapshot.total_cost - cost).max(0.0))
}

pub fn quantity_allowed(quantity: f64) -> bool {
    quantity.is_finite() && quantity >= MIN_ITEM_QUANTITY
}
