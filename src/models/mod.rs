pub mod auth;
pub mod basket;
pub mod product;
pub mod store;
pub mod shopping_list;

pub use auth::{AuthTokenResponse, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
pub use basket::{AddBasketItem, BasketItem, BasketSnapshot, BasketSummary, UpdateBasketItem};
pub use product::{PriceHistory, Product, ProductPage, ProductPrice, ProductQuery, SortBy};
pub use store::{
    NearbyStoreQuery, Store, StoreFilter, StoreLocation, StoreProductPage, StoreProductQuery,
};
pub use shopping_list::{
    CategorySuggestion, NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListPatch,
};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// The API emits naive ISO timestamps, sometimes with an offset. Anything
/// unparseable is treated as absent instead of failing the whole payload.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }))
}

/// `null` and a missing field both become `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
