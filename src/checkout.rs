//! Checkout
//!
//! Pay, record, then clear. The cart is only emptied once the order has been
//! recorded; an order that was paid for but could not be recorded is reported
//! with its payment identifier so the caller can reconcile it.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    documents::{OrderStore, OrderStoreError},
    orders::{Order, OrderStatus, creation_time},
    payments::{PaymentError, PaymentGateway, PaymentOptions, PaymentRequest},
    pricing::{OrderSummary, PricingError},
    store::Store,
};

/// Errors raised while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to pay for.
    #[error("cart is empty")]
    EmptyCart,

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The payment did not complete; the cart is untouched.
    #[error(transparent)]
    PaymentFailed(#[from] PaymentError),

    /// The payment succeeded but the order could not be recorded; the cart is
    /// untouched.
    #[error("payment {payment_id} succeeded but order {} could not be recorded", .order.id)]
    PaidButNotRecorded {
        /// Gateway payment identifier
        payment_id: String,

        /// The order that was not recorded
        order: Box<Order>,

        /// Why recording failed
        #[source]
        source: OrderStoreError,
    },
}

/// Who is checking out and where the order goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// User identifier
    pub user_id: String,

    /// Delivery address
    pub address: String,
}

/// A paid and recorded order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder<'a> {
    /// Recorded order
    pub order: Order,

    /// Gateway payment identifier
    pub payment_id: String,

    /// What was charged
    pub summary: OrderSummary<'a>,
}

/// Checkout over a payment gateway and an order store.
#[derive(Debug)]
pub struct CheckoutService<P, S> {
    payments: P,
    orders: S,
    options: PaymentOptions,
}

impl<P: PaymentGateway, S: OrderStore> CheckoutService<P, S> {
    /// Create a checkout service.
    pub fn new(payments: P, orders: S, options: PaymentOptions) -> Self {
        Self {
            payments,
            orders,
            options,
        }
    }

    /// Payment gateway
    pub fn payments(&self) -> &P {
        &self.payments
    }

    /// Order store
    pub fn orders(&self) -> &S {
        &self.orders
    }

    /// Merchant options sent with every payment
    pub fn options(&self) -> &PaymentOptions {
        &self.options
    }

    /// Charge the cart total, record a confirmed order and empty the cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: nothing to pay for; no payment attempted.
    /// - [`CheckoutError::Pricing`]: the cart could not be priced.
    /// - [`CheckoutError::PaymentFailed`]: the gateway did not collect payment.
    /// - [`CheckoutError::PaidButNotRecorded`]: payment was collected but the
    ///   order store rejected the order.
    pub async fn pay<'a>(
        &self,
        store: &mut Store<'a>,
        customer: &Customer,
    ) -> Result<PlacedOrder<'a>, CheckoutError> {
        if store.cart_items().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = store.summary()?;
        let request = PaymentRequest::new(&summary.total, &self.options);

        let receipt = self
            .payments
            .start_payment(request)
            .await
            .inspect_err(|err| warn!(code = err.code, message = %err.message, "payment failed"))?;

        info!(payment = %receipt.payment_id, total = %summary.total, "payment succeeded");

        let order = Order::from_lines(
            customer.user_id.as_str(),
            customer.address.as_str(),
            store.cart_items(),
            OrderStatus::Confirmed,
            creation_time(),
        );

        if let Err(source) = self.orders.create_order(&order).await {
            warn!(
                payment = %receipt.payment_id,
                order = %order.id,
                error = %source,
                "payment succeeded but order was not recorded"
            );

            return Err(CheckoutError::PaidButNotRecorded {
                payment_id: receipt.payment_id,
                order: Box::new(order),
                source,
            });
        }

        store.clear_cart();

        Ok(PlacedOrder {
            order,
            payment_id: receipt.payment_id,
            summary,
        })
    }
}
