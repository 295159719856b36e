//! Command-line storefront

use std::io;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::{
    catalog::CatalogError,
    checkout::CheckoutError,
    config::{LoggingConfig, ShopConfig},
    documents::OrderStoreError,
    receipt::ReceiptError,
    routes::RouteError,
    store::StoreError,
};

mod catalog;
mod checkout;
mod open;

/// Errors raised by a storefront command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A cart or favorites change was rejected.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The route could not be parsed.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Checkout did not complete.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The order store failed.
    #[error(transparent)]
    OrderStore(#[from] OrderStoreError),

    /// A page could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Output could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// No category has this identifier.
    #[error("category {0} not found")]
    CategoryNotFound(u32),

    /// No product has this identifier.
    #[error("product {0} not found")]
    ProductNotFound(String),
}

/// Command-line storefront
#[derive(Debug, Parser)]
#[command(name = "easyshop", about = "EasyShop storefront", long_about = None)]
pub struct Cli {
    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Storefront settings
    #[command(flatten)]
    pub shop: ShopConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally filtered by category or title
    Catalog(catalog::CatalogArgs),

    /// Open a storefront page by route path
    Open(open::OpenArgs),

    /// Fill a cart and pay for it
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    /// Load configuration from `.env`, the environment and the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Run the selected command, writing pages to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if the command fails.
    pub async fn run(self, out: &mut impl io::Write) -> Result<(), CliError> {
        let catalog = self.shop.load_catalog()?;

        match self.command {
            Commands::Catalog(args) => catalog::run(&catalog, &args, out),
            Commands::Open(args) => open::run(&catalog, &args, out),
            Commands::Checkout(args) => checkout::run(&catalog, &self.shop, &args, out).await,
        }
    }
}
