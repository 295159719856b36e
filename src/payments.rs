//! Payments
//!
//! The payment collaborator is an async port. [`SandboxPaymentGateway`]
//! stands in for the vendor SDK in the CLI and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use mockall::automock;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

/// Contact details shown pre-filled in the payment sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefill {
    /// Customer email
    pub email: String,

    /// Customer phone number
    pub contact: String,
}

impl Default for Prefill {
    fn default() -> Self {
        Self {
            email: "user@example.com".to_string(),
            contact: "9876543210".to_string(),
        }
    }
}

/// Merchant presentation passed with every payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOptions {
    /// Merchant key identifier
    pub key_id: String,

    /// Merchant display name
    pub merchant_name: String,

    /// Payment description
    pub description: String,

    /// Theme colour for the payment sheet
    pub theme_color: String,

    /// Merchant logo reference
    pub image: Option<String>,

    /// Pre-filled contact details
    pub prefill: Prefill,
}

impl Default for PaymentOptions {
    fn default() -> Self {
        Self {
            key_id: "rzp_test_sandbox".to_string(),
            merchant_name: "EasyShop".to_string(),
            description: "Order Payment".to_string(),
            theme_color: "#5C6BC0".to_string(),
            image: None,
            prefill: Prefill::default(),
        }
    }
}

/// A request to collect one payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor units
    pub amount: i64,

    /// ISO currency code
    pub currency: String,

    /// Merchant presentation
    pub options: PaymentOptions,
}

impl PaymentRequest {
    /// Request `amount` with the given merchant options.
    pub fn new(amount: &Money<'_, Currency>, options: &PaymentOptions) -> Self {
        Self {
            amount: amount.to_minor_units(),
            currency: amount.currency().iso_alpha_code.to_string(),
            options: options.clone(),
        }
    }
}

/// Proof of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Gateway payment identifier
    pub payment_id: String,
}

/// A payment the gateway did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("payment failed ({code}): {message}")]
pub struct PaymentError {
    /// Gateway error code
    pub code: i32,

    /// Gateway error message
    pub message: String,
}

impl PaymentError {
    /// The customer or issuer declined the payment.
    pub const DECLINED: i32 = 0;

    /// The amount was not payable.
    pub const INVALID_AMOUNT: i32 = 1;

    /// Create a payment error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Payment collaborator
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Collect the requested amount.
    async fn start_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// In-process gateway that approves every positive amount.
#[derive(Debug, Default)]
pub struct SandboxPaymentGateway {
    decline: bool,
    next_id: AtomicU64,
}

impl SandboxPaymentGateway {
    /// Create a sandbox gateway that approves payments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sandbox gateway that declines every payment.
    pub fn declining() -> Self {
        Self {
            decline: true,
            next_id: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl PaymentGateway for SandboxPaymentGateway {
    async fn start_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        if request.amount <= 0 {
            warn!(amount = request.amount, "refusing non-positive payment");

            return Err(PaymentError::new(
                PaymentError::INVALID_AMOUNT,
                format!("cannot collect {} {}", request.amount, request.currency),
            ));
        }

        if self.decline {
            warn!(amount = request.amount, "sandbox declined payment");

            return Err(PaymentError::new(
                PaymentError::DECLINED,
                "Payment declined by sandbox",
            ));
        }

        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let payment_id = format!("pay_sandbox_{sequence:06}");

        debug!(
            %payment_id,
            amount = request.amount,
            currency = %request.currency,
            merchant = %request.options.merchant_name,
            "sandbox approved payment"
        );

        Ok(PaymentReceipt { payment_id })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn request(minor: i64) -> PaymentRequest {
        PaymentRequest::new(&Money::from_minor(minor, INR), &PaymentOptions::default())
    }

    #[test]
    fn request_carries_minor_units_and_currency_code() {
        let request = request(21_240);

        assert_eq!(request.amount, 21_240);
        assert_eq!(request.currency, "INR");
        assert_eq!(request.options.merchant_name, "EasyShop");
        assert_eq!(request.options.prefill.contact, "9876543210");
    }

    #[tokio::test]
    async fn sandbox_issues_sequential_payment_ids() -> TestResult {
        let gateway = SandboxPaymentGateway::new();

        let first = gateway.start_payment(request(100)).await?;
        let second = gateway.start_payment(request(100)).await?;

        assert_eq!(first.payment_id, "pay_sandbox_000001");
        assert_eq!(second.payment_id, "pay_sandbox_000002");

        Ok(())
    }

    #[tokio::test]
    async fn sandbox_rejects_non_positive_amounts() {
        let gateway = SandboxPaymentGateway::new();

        let result = gateway.start_payment(request(0)).await;

        assert!(matches!(
            result,
            Err(PaymentError { code: PaymentError::INVALID_AMOUNT, .. })
        ));
    }

    #[tokio::test]
    async fn declining_sandbox_declines() {
        let gateway = SandboxPaymentGateway::declining();

        let result = gateway.start_payment(request(100)).await;

        assert!(matches!(
            result,
            Err(PaymentError { code: PaymentError::DECLINED, .. })
        ));
    }
}
