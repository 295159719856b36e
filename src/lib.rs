//! `EasyShop`
//!
//! `EasyShop` is a small storefront core: a product catalog, a cart and favorites
//! store, checkout pricing, and a pay-then-record checkout flow over injectable
//! payment and order-store collaborators.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod documents;
pub mod favorites;
pub mod observability;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod routes;
pub mod store;
