//! Catalog Fixtures

use serde::Deserialize;
use smallvec::SmallVec;

use crate::{catalog::CatalogError, prices::parse_money, products::Product};

/// Catalog as written in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO code every product is priced in (e.g. "INR")
    pub currency: String,

    /// Repeat the product list this many times, re-indexing identifiers
    #[serde(default)]
    pub rounds: Option<usize>,

    /// Category table
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,

    /// Base products, in display order
    pub products: Vec<ProductFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Numeric category identifier
    pub id: u32,

    /// Display name, matched against product category labels
    pub name: String,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// Product title
    pub title: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Selling price (e.g. "₹120" or "120 INR")
    pub price: String,

    /// List price; defaults to the selling price
    #[serde(default)]
    pub list_price: Option<String>,

    /// Category label
    pub category: String,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Extra attributes as `[name, value]` pairs
    #[serde(default)]
    pub details: Vec<(String, String)>,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price).map_err(|source| CatalogError::InvalidPrice {
            product: fixture.id.clone(),
            source,
        })?;

        let list_price = match fixture.list_price.as_deref() {
            Some(list_price) => {
                parse_money(list_price).map_err(|source| CatalogError::InvalidPrice {
                    product: fixture.id.clone(),
                    source,
                })?
            }
            None => price,
        };

        Ok(Product {
            id: fixture.id,
            title: fixture.title,
            description: fixture.description,
            price,
            list_price,
            category: fixture.category,
            images: SmallVec::from_vec(fixture.images),
            details: fixture.details,
        })
    }
}

/// Repeat `products` `rounds` times, naming each copy `"{round}-{position}"`.
pub(crate) fn repeat_products<'a>(products: &[Product<'a>], rounds: usize) -> Vec<Product<'a>> {
    (1..=rounds)
        .flat_map(|round| {
            products.iter().enumerate().map(move |(index, product)| Product {
                id: format!("{round}-{}", index + 1),
                ..product.clone()
            })
        })
        .collect()
}
