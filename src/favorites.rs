//! Favorites

use crate::products::Product;

/// Outcome of toggling a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The product was not a favorite and now is.
    Added,

    /// The product was a favorite and no longer is.
    Removed,
}

/// Products the shopper has marked, without quantities.
#[derive(Debug, Clone, Default)]
pub struct Favorites<'a> {
    products: Vec<&'a Product<'a>>,
}

impl<'a> Favorites<'a> {
    /// Create an empty favorites list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `product` if absent, remove it if present.
    pub fn toggle(&mut self, product: &'a Product<'a>) -> FavoriteToggle {
        match self.products.iter().position(|p| p.id == product.id) {
            Some(position) => {
                self.products.remove(position);

                FavoriteToggle::Removed
            }
            None => {
                self.products.push(product);

                FavoriteToggle::Added
            }
        }
    }

    /// Whether `id` is a favorite.
    pub fn contains(&self, id: &str) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// Favorite products, oldest first
    pub fn products(&self) -> &[&'a Product<'a>] {
        &self.products
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether there are no favorites
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
