pub mod basket_viewmodel;

pub use basket_viewmodel::{
    cheapest_alternative, cheapest_offer, group_by_store, potential_savings, quantity_allowed,
    StoreGroup, MIN_ITEM_QUANTITY,
};
