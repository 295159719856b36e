//! Products

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::prices::discount_percent;

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier, unique within a catalog
    pub id: String,

    /// Product title
    pub title: String,

    /// Product description
    pub description: String,

    /// Selling price
    pub price: Money<'a, Currency>,

    /// List price the selling price is compared against
    pub list_price: Money<'a, Currency>,

    /// Category label
    pub category: String,

    /// Image references
    pub images: SmallVec<[String; 4]>,

    /// Extra attributes, in display order
    pub details: Vec<(String, String)>,
}

impl<'a> Product<'a> {
    /// Create a product with the given identifier, title and price.
    ///
    /// The list price starts out equal to the selling price.
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price,
            list_price: price,
            category: String::new(),
            images: SmallVec::new(),
            details: Vec::new(),
        }
    }

    /// Set the list price.
    #[must_use]
    pub fn with_list_price(mut self, list_price: Money<'a, Currency>) -> Self {
        self.list_price = list_price;
        self
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Percent saved against the list price, rounded down.
    pub fn discount_percent(&self) -> u32 {
        discount_percent(&self.price, &self.list_price)
    }

    /// Look up an extra attribute by name.
    pub fn detail(&self, name: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the product belongs to the named category, ignoring case.
    pub fn in_category(&self, name: &str) -> bool {
        self.category.to_lowercase() == name.to_lowercase()
    }

    /// Whether the title contains the query, ignoring case.
    pub fn title_contains(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use super::*;

    fn phone<'a>() -> Product<'a> {
        Product::new("1", "Smartphone", Money::from_minor(12_000, INR))
            .with_list_price(Money::from_minor(15_000, INR))
            .with_category("Electronics")
    }

    #[test]
    fn new_product_lists_at_its_price() {
        let product = Product::new("1", "Smartphone", Money::from_minor(12_000, INR));

        assert_eq!(product.list_price, product.price);
        assert_eq!(product.discount_percent(), 0);
    }

    #[test]
    fn discount_percent_compares_against_list_price() {
        assert_eq!(phone().discount_percent(), 20);
    }

    #[test]
    fn category_match_ignores_case() {
        let product = phone();

        assert!(product.in_category("electronics"));
        assert!(product.in_category("ELECTRONICS"));
        assert!(!product.in_category("Fashion"));
    }

    #[test]
    fn title_search_ignores_case() {
        let product = phone();

        assert!(product.title_contains("phone"));
        assert!(product.title_contains("SMART"));
        assert!(!product.title_contains("shoe"));
    }

    #[test]
    fn detail_looks_up_by_name() {
        let mut product = phone();
        product.details.push(("Brand".to_string(), "TechNova".to_string()));

        assert_eq!(product.detail("Brand"), Some("TechNova"));
        assert_eq!(product.detail("Colour"), None);
    }
}
