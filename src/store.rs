//! Store
//!
//! Shopper state for one session: a cart and a favorites list over a borrowed
//! catalog. Mutations go through `&mut self`; nothing here is persisted.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartLine, QuantityChange},
    catalog::Catalog,
    favorites::{FavoriteToggle, Favorites},
    orders::{Order, OrderStatus, creation_time},
    pricing::{OrderSummary, PricingError},
    products::Product,
};

/// Errors raised by store mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The product is not in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(String),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(String),
}

/// Outcome of adding a product to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddition {
    /// A new line was created with quantity one.
    Added,

    /// An existing line was incremented.
    Increased {
        /// Quantity after the increment
        quantity: u32,
    },
}

/// Cart and favorites for one shopper.
#[derive(Debug)]
pub struct Store<'a> {
    catalog: &'a Catalog<'a>,
    cart: Cart<'a>,
    favorites: Favorites<'a>,
}

impl<'a> Store<'a> {
    /// Create an empty store over `catalog`.
    pub fn new(catalog: &'a Catalog<'a>) -> Self {
        Self {
            catalog,
            cart: Cart::new(catalog.currency()),
            favorites: Favorites::new(),
        }
    }

    /// Catalog the store sells from
    pub fn catalog(&self) -> &'a Catalog<'a> {
        self.catalog
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if the product is not in the
    /// catalog; the cart is unchanged.
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<CartAddition, StoreError> {
        let product = self.product(product_id)?;

        let addition = match self.cart.add(product) {
            1 => CartAddition::Added,
            quantity => CartAddition::Increased { quantity },
        };

        info!(product = product_id, ?addition, "added to cart");

        Ok(addition)
    }

    /// Remove a product's line from the cart.
    ///
    /// Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, product_id: &str) -> bool {
        let removed = self.cart.remove(product_id).is_some();

        debug!(product = product_id, removed, "removed from cart");

        removed
    }

    /// Set the quantity of a cart line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInCart`] if the product has no line.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<QuantityChange, StoreError> {
        let change = self
            .cart
            .set_quantity(product_id, quantity)
            .ok_or_else(|| StoreError::NotInCart(product_id.to_string()))?;

        debug!(product = product_id, ?change, "cart quantity changed");

        Ok(change)
    }

    /// Increase a cart line by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInCart`] if the product has no line.
    pub fn increment_quantity(&mut self, product_id: &str) -> Result<QuantityChange, StoreError> {
        let quantity = self.quantity_in_cart(product_id)?;

        self.set_quantity(product_id, quantity.saturating_add(1))
    }

    /// Decrease a cart line by one, removing it when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInCart`] if the product has no line.
    pub fn decrement_quantity(&mut self, product_id: &str) -> Result<QuantityChange, StoreError> {
        let quantity = self.quantity_in_cart(product_id)?;

        self.set_quantity(product_id, quantity.saturating_sub(1))
    }

    /// Mark a product as a favorite, or unmark it if it already is one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if the product is not in the
    /// catalog.
    pub fn toggle_favorite(&mut self, product_id: &str) -> Result<FavoriteToggle, StoreError> {
        let product = self.product(product_id)?;
        let toggle = self.favorites.toggle(product);

        info!(product = product_id, ?toggle, "favorite toggled");

        Ok(toggle)
    }

    /// Whether a product is a favorite.
    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.favorites.contains(product_id)
    }

    /// Whether a product is in the cart.
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.cart.contains(product_id)
    }

    /// Cart lines in insertion order
    pub fn cart_items(&self) -> &[CartLine<'a>] {
        self.cart.lines()
    }

    /// Favorite products
    pub fn favorite_items(&self) -> &[&'a Product<'a>] {
        self.favorites.products()
    }

    /// Cart
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        debug!("cart cleared");
    }

    /// Price the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the totals cannot be computed.
    pub fn summary(&self) -> Result<OrderSummary<'a>, PricingError> {
        self.cart.summary()
    }

    /// Turn the cart into an unpaid order and empty it.
    ///
    /// Returns `None` when the cart is empty. The order is not persisted.
    pub fn take_order(&mut self, user_id: &str, address: &str) -> Option<Order> {
        if self.cart.is_empty() {
            return None;
        }

        let order = Order::from_lines(
            user_id,
            address,
            self.cart.lines(),
            OrderStatus::Ordered,
            creation_time(),
        );

        self.clear_cart();

        info!(order = %order.id, items = order.item_count(), "order taken from cart");

        Some(order)
    }

    fn product(&self, product_id: &str) -> Result<&'a Product<'a>, StoreError> {
        let catalog = self.catalog;

        catalog.find(product_id).ok_or_else(|| {
            warn!(product = product_id, "unknown product");

            StoreError::ProductNotFound(product_id.to_string())
        })
    }

    fn quantity_in_cart(&self, product_id: &str) -> Result<u32, StoreError> {
        self.cart
            .find(product_id)
            .map(CartLine::quantity)
            .ok_or_else(|| StoreError::NotInCart(product_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn adding_twice_yields_one_line_of_two() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);

        assert_eq!(store.add_to_cart("1-1")?, CartAddition::Added);
        assert_eq!(
            store.add_to_cart("1-1")?,
            CartAddition::Increased { quantity: 2 }
        );

        assert_eq!(store.cart_items().len(), 1);
        assert_eq!(store.cart().find("1-1").map(CartLine::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn unknown_product_leaves_the_cart_untouched() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);
        store.add_to_cart("1-2")?;

        assert_eq!(
            store.add_to_cart("99-1"),
            Err(StoreError::ProductNotFound("99-1".to_string()))
        );
        assert_eq!(store.cart_items().len(), 1);

        Ok(())
    }

    #[test]
    fn remove_from_cart_reports_absence() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);
        store.add_to_cart("1-2")?;

        assert!(store.remove_from_cart("1-2"));
        assert!(!store.remove_from_cart("1-2"));
        assert!(!store.is_in_cart("1-2"));

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_the_line() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);
        store.add_to_cart("2-4")?;

        assert_eq!(store.set_quantity("2-4", 4)?, QuantityChange::Updated(4));
        assert_eq!(store.set_quantity("2-4", 0)?, QuantityChange::Removed);
        assert!(store.cart_items().is_empty());

        assert_eq!(
            store.set_quantity("2-4", 1),
            Err(StoreError::NotInCart("2-4".to_string()))
        );

        Ok(())
    }

    #[test]
    fn decrement_at_one_removes_the_line() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);
        store.add_to_cart("1-5")?;

        assert_eq!(store.increment_quantity("1-5")?, QuantityChange::Updated(2));
        assert_eq!(store.decrement_quantity("1-5")?, QuantityChange::Updated(1));
        assert_eq!(store.decrement_quantity("1-5")?, QuantityChange::Removed);
        assert!(matches!(
            store.decrement_quantity("1-5"),
            Err(StoreError::NotInCart(_))
        ));

        Ok(())
    }

    #[test]
    fn toggle_favorite_twice_restores_state() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);

        assert_eq!(store.toggle_favorite("3-2")?, FavoriteToggle::Added);
        assert!(store.is_favorite("3-2"));
        assert_eq!(store.favorite_items().len(), 1);

        assert_eq!(store.toggle_favorite("3-2")?, FavoriteToggle::Removed);
        assert!(!store.is_favorite("3-2"));
        assert!(store.favorite_items().is_empty());

        assert_eq!(
            store.toggle_favorite("nope"),
            Err(StoreError::ProductNotFound("nope".to_string()))
        );

        Ok(())
    }

    #[test]
    fn favorites_and_cart_are_independent() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);

        store.toggle_favorite("1-1")?;
        store.add_to_cart("1-1")?;
        store.clear_cart();

        assert!(store.is_favorite("1-1"));
        assert!(!store.is_in_cart("1-1"));

        Ok(())
    }

    #[test]
    fn take_order_drains_the_cart() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut store = Store::new(&catalog);

        assert!(store.take_order("guest", "12 MG Road").is_none());

        store.add_to_cart("1-1")?;
        store.add_to_cart("1-1")?;
        store.add_to_cart("1-3")?;

        let order = store
            .take_order("guest", "12 MG Road")
            .ok_or("expected an order")?;

        assert_eq!(order.status, OrderStatus::Ordered);
        assert_eq!(order.user_id, "guest");
        assert_eq!(order.quantity_of("1-1"), 2);
        assert_eq!(order.item_count(), 3);
        assert!(store.cart_items().is_empty());

        Ok(())
    }
}
