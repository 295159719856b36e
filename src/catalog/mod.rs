//! Catalog
//!
//! The read-only product list every other part of the storefront looks
//! products up in. Lookups scan the list in display order and report a miss
//! as absence, never as an error.

use std::{fs, path::Path};

use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::fixtures::{CatalogFixture, repeat_products},
    prices::{PriceError, currency_for_code},
    products::Product,
};

pub mod fixtures;

/// Most products a catalog may hold once `rounds` are expanded
pub const MAX_PRODUCTS: usize = 100_000;

/// The catalog that ships with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../fixtures/catalog/easyshop.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown catalog currency
    #[error(transparent)]
    Currency(#[from] PriceError),

    /// A product price could not be parsed
    #[error("Invalid price for product {product}: {source}")]
    InvalidPrice {
        /// Product identifier
        product: String,

        /// Underlying parse error
        #[source]
        source: PriceError,
    },

    /// A product is priced in a different currency from the catalog
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an identifier
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Two categories share an identifier
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(u32),

    /// `rounds: 0` would produce an empty catalog
    #[error("Catalog rounds must be at least 1")]
    NoRounds,

    /// `rounds` would expand the catalog past [`MAX_PRODUCTS`]
    #[error("Catalog rounds {rounds} would exceed {max} products")]
    TooManyRounds {
        /// Requested rounds
        rounds: usize,

        /// Product limit
        max: usize,
    },
}

/// Category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Numeric identifier used in routes
    pub id: u32,

    /// Display name
    pub name: String,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    currency: &'static Currency,
    categories: Vec<Category>,
    products: Vec<Product<'a>>,
}

impl<'a> Catalog<'a> {
    /// Create a catalog from its parts.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if two products or two categories share an
    /// identifier, or if any price is in a currency other than `currency`.
    pub fn new(
        currency: &'static Currency,
        categories: Vec<Category>,
        products: Vec<Product<'a>>,
    ) -> Result<Self, CatalogError> {
        let mut category_ids = FxHashSet::default();

        for category in &categories {
            if !category_ids.insert(category.id) {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
        }

        let mut product_ids = FxHashSet::default();

        for product in &products {
            if !product_ids.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }

            for price in [&product.price, &product.list_price] {
                if price.currency() != currency {
                    return Err(CatalogError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        price.currency().iso_alpha_code.to_string(),
                    ));
                }
            }
        }

        Ok(Self {
            currency,
            categories,
            products,
        })
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled fixture is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed, or if
    /// the catalog it describes is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Load a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the text cannot be parsed or the catalog
    /// it describes is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        Self::from_fixture(fixture)
    }

    /// Build a catalog from a parsed fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a price or the currency is invalid, if
    /// `rounds` is zero or too large, or if identifiers collide.
    pub fn from_fixture(fixture: CatalogFixture) -> Result<Self, CatalogError> {
        let currency = currency_for_code(&fixture.currency)?;

        let base = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let products = match fixture.rounds {
            Some(0) => return Err(CatalogError::NoRounds),
            Some(rounds) => {
                if base.len().checked_mul(rounds).is_none_or(|total| total > MAX_PRODUCTS) {
                    return Err(CatalogError::TooManyRounds {
                        rounds,
                        max: MAX_PRODUCTS,
                    });
                }

                repeat_products(&base, rounds)
            }
            None => base,
        };

        let categories = fixture
            .categories
            .into_iter()
            .map(|category| Category {
                id: category.id,
                name: category.name,
            })
            .collect();

        let catalog = Self::new(currency, categories, products)?;

        debug!(
            products = catalog.len(),
            currency = currency.iso_alpha_code,
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Currency every product is priced in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// All products, in display order
    pub fn products(&self) -> &[Product<'a>] {
        &self.products
    }

    /// All categories
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by identifier.
    pub fn find(&self, id: &str) -> Option<&Product<'a>> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products in the named category, ignoring case.
    pub fn by_category(&self, name: &str) -> Vec<&Product<'a>> {
        self.products
            .iter()
            .filter(|product| product.in_category(name))
            .collect()
    }

    /// Find a category by its numeric identifier.
    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Products in the category with the given numeric identifier.
    ///
    /// An unknown identifier matches nothing.
    pub fn by_category_id(&self, id: u32) -> Vec<&Product<'a>> {
        self.category(id)
            .map(|category| self.by_category(&category.name))
            .unwrap_or_default()
    }

    /// Products whose title contains `query`, ignoring case.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Product<'a>> {
        let query = query.trim();

        if query.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|product| product.title_contains(query))
            .collect()
    }
}
