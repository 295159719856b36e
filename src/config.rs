//! Configuration
//!
//! Command-line flags with environment fallbacks. A `.env` file in the
//! working directory is loaded before parsing.

use std::path::PathBuf;

use clap::Args;

use crate::{
    catalog::{Catalog, CatalogError},
    checkout::Customer,
    payments::{PaymentOptions, Prefill},
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Args)]
pub struct ShopConfig {
    /// Catalog YAML file; the bundled catalog is used when omitted
    #[arg(long, env = "EASYSHOP_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// User the orders are recorded for
    #[arg(long, env = "EASYSHOP_USER_ID", default_value = "guest", global = true)]
    pub user_id: String,

    /// Delivery address
    #[arg(
        long,
        env = "EASYSHOP_ADDRESS",
        default_value = "221B Baker Street, Mumbai",
        global = true
    )]
    pub address: String,

    /// Payment gateway key identifier
    #[arg(
        long,
        env = "EASYSHOP_PAYMENT_KEY_ID",
        default_value = "rzp_test_sandbox",
        hide_env_values = true,
        global = true
    )]
    pub payment_key_id: String,

    /// Email pre-filled in the payment sheet
    #[arg(
        long,
        env = "EASYSHOP_PREFILL_EMAIL",
        default_value = "user@example.com",
        global = true
    )]
    pub prefill_email: String,

    /// Phone number pre-filled in the payment sheet
    #[arg(
        long,
        env = "EASYSHOP_PREFILL_CONTACT",
        default_value = "9876543210",
        global = true
    )]
    pub prefill_contact: String,

    /// Make the sandbox payment gateway decline every payment
    #[arg(long, env = "EASYSHOP_DECLINE_PAYMENTS", default_value_t = false, global = true)]
    pub decline_payments: bool,

    /// Take the order store offline, so paid orders cannot be recorded
    #[arg(
        long,
        env = "EASYSHOP_ORDER_STORE_OFFLINE",
        default_value_t = false,
        global = true
    )]
    pub order_store_offline: bool,
}

impl ShopConfig {
    /// Load the configured catalog, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog<'static>, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::from_path(path),
            None => Catalog::builtin(),
        }
    }

    /// Merchant options for the payment sheet
    pub fn payment_options(&self) -> PaymentOptions {
        PaymentOptions {
            key_id: self.payment_key_id.clone(),
            prefill: Prefill {
                email: self.prefill_email.clone(),
                contact: self.prefill_contact.clone(),
            },
            ..PaymentOptions::default()
        }
    }

    /// Customer orders are placed for
    pub fn customer(&self) -> Customer {
        Customer {
            user_id: self.user_id.clone(),
            address: self.address.clone(),
        }
    }
}
