//! Cart

use rusty_money::iso::Currency;

use crate::{
    pricing::{OrderSummary, PricingError},
    products::Product,
};

/// One product in the cart with its requested quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    product: &'a Product<'a>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a new cart line.
    pub fn new(product: &'a Product<'a>, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Product on this line
    pub fn product(&self) -> &'a Product<'a> {
        self.product
    }

    /// Quantity, always at least one while the line is in a cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Outcome of changing a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated(u32),

    /// The quantity reached zero and the line was removed.
    Removed,
}

/// Cart
///
/// Holds at most one line per product identifier, in the order products
/// were first added.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    currency: &'static Currency,
    lines: Vec<CartLine<'a>>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    /// Add one unit of `product`, returning the line's new quantity.
    pub fn add(&mut self, product: &'a Product<'a>) -> u32 {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);

            return line.quantity;
        }

        self.lines.push(CartLine::new(product, 1));

        1
    }

    /// Set the quantity of the line for `id`; zero removes the line.
    ///
    /// Returns `None` if the product is not in the cart.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Option<QuantityChange> {
        if quantity == 0 {
            return self.remove(id).map(|_line| QuantityChange::Removed);
        }

        let line = self.line_mut(id)?;
        line.quantity = quantity;

        Some(QuantityChange::Updated(quantity))
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<CartLine<'a>> {
        let position = self.lines.iter().position(|line| line.product.id == id)?;

        Some(self.lines.remove(position))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Find the line for `id`.
    pub fn find(&self, id: &str) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    /// Whether the cart holds a line for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency the cart is priced in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Price the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the totals cannot be computed.
    pub fn summary(&self) -> Result<OrderSummary<'a>, PricingError> {
        OrderSummary::from_lines(&self.lines, self.currency)
    }

    fn line_mut(&mut self, id: &str) -> Option<&mut CartLine<'a>> {
        self.lines.iter_mut().find(|line| line.product.id == id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use super::*;

    fn products<'a>() -> [Product<'a>; 2] {
        [
            Product::new("phone", "Smartphone", Money::from_minor(12_000, INR)),
            Product::new("bat", "Cricket Bat", Money::from_minor(10_000, INR)),
        ]
    }

    #[test]
    fn adding_twice_increments_a_single_line() {
        let [phone, _] = products();
        let mut cart = Cart::new(INR);

        assert_eq!(cart.add(&phone), 1);
        assert_eq!(cart.add(&phone), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.find("phone").map(CartLine::quantity), Some(2));
    }

    #[test]
    fn lines_keep_insertion_order() {
        let [phone, bat] = products();
        let mut cart = Cart::new(INR);

        cart.add(&bat);
        cart.add(&phone);
        cart.add(&bat);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product().id.as_str()).collect();

        assert_eq!(ids, ["bat", "phone"]);
    }

    #[test]
    fn set_quantity_updates_in_place() {
        let [phone, _] = products();
        let mut cart = Cart::new(INR);
        cart.add(&phone);

        assert_eq!(cart.set_quantity("phone", 5), Some(QuantityChange::Updated(5)));
        assert_eq!(cart.find("phone").map(CartLine::quantity), Some(5));
    }

    #[test]
    fn set_quantity_zero_removes_the_line() {
        let [phone, bat] = products();
        let mut cart = Cart::new(INR);
        cart.add(&phone);
        cart.add(&bat);

        assert_eq!(cart.set_quantity("phone", 0), Some(QuantityChange::Removed));
        assert!(!cart.contains("phone"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn set_quantity_on_missing_line_is_none() {
        let mut cart = Cart::new(INR);

        assert_eq!(cart.set_quantity("phone", 3), None);
        assert_eq!(cart.set_quantity("phone", 0), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_returns_the_removed_line() {
        let [phone, _] = products();
        let mut cart = Cart::new(INR);
        cart.add(&phone);
        cart.add(&phone);

        let removed = cart.remove("phone");

        assert_eq!(removed.map(|line| line.quantity()), Some(2));
        assert!(cart.remove("phone").is_none());
    }

    #[test]
    fn summary_prices_every_line() -> TestResult {
        let [phone, bat] = products();
        let mut cart = Cart::new(INR);
        cart.add(&phone);
        cart.add(&bat);
        cart.add(&bat);

        let summary = cart.summary()?;

        assert_eq!(summary.subtotal, Money::from_minor(32_000, INR));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.summary()?.total, Money::from_minor(0, INR));

        Ok(())
    }
}
