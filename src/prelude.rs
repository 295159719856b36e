//! `EasyShop` prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, QuantityChange},
    catalog::{Catalog, CatalogError, Category},
    checkout::{CheckoutError, CheckoutService, Customer, PlacedOrder},
    documents::{InMemoryOrderStore, OrderStore, OrderStoreError},
    favorites::{FavoriteToggle, Favorites},
    orders::{Order, OrderId, OrderStatus},
    payments::{
        PaymentError, PaymentGateway, PaymentOptions, PaymentReceipt, PaymentRequest, Prefill,
        SandboxPaymentGateway,
    },
    prices::{PriceError, discount_percent, parse_money, parse_price},
    pricing::{OrderSummary, PricingError},
    products::Product,
    receipt::ReceiptError,
    routes::{Route, RouteError},
    store::{CartAddition, Store, StoreError},
};
