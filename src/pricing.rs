//! Pricing
//!
//! Checkout arithmetic over cart lines. Every amount is carried in minor
//! units; percentages are applied to minor units and rounded half away from
//! zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A line total does not fit in minor units.
    #[error("line total for product {0} overflowed")]
    Overflow(String),

    /// Percentage calculation could not be safely converted.
    #[error("percentage of {0} minor units overflowed")]
    PercentConversion(i64),
}

/// Checkout discount applied to the subtotal (10%).
pub fn discount_rate() -> Percentage {
    Percentage::from(0.10)
}

/// Tax applied to the discounted subtotal (18%).
pub fn tax_rate() -> Percentage {
    Percentage::from(0.18)
}

/// Price of one cart line: unit price times quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in `i64`
/// minor units.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let price = line.product().price;

    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or_else(|| PricingError::Overflow(line.product().id.clone()))?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Sum of every line total; zero in `currency` for an empty cart.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total overflowed.
/// - [`PricingError::Money`]: a line is priced in another currency.
pub fn subtotal<'a>(
    lines: &[CartLine<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line_total(line)?)?)
        })
}

/// Checkout discount on `subtotal`.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the discount cannot be
/// represented.
pub fn discount<'a>(subtotal: &Money<'a, Currency>) -> Result<Money<'a, Currency>, PricingError> {
    let minor = percent_of_minor(&discount_rate(), subtotal.to_minor_units())?;

    Ok(Money::from_minor(minor, subtotal.currency()))
}

/// Tax on the discounted subtotal.
///
/// # Errors
///
/// - [`PricingError::Money`]: the amounts are in different currencies.
/// - [`PricingError::PercentConversion`]: the tax cannot be represented.
pub fn tax<'a>(
    subtotal: &Money<'a, Currency>,
    discount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let taxable = subtotal.sub(*discount)?;
    let minor = percent_of_minor(&tax_rate(), taxable.to_minor_units())?;

    Ok(Money::from_minor(minor, subtotal.currency()))
}

/// Amount the customer pays: `subtotal - discount + tax`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if the amounts are in different
/// currencies.
pub fn total<'a>(
    subtotal: &Money<'a, Currency>,
    discount: &Money<'a, Currency>,
    tax: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    Ok(subtotal.sub(*discount)?.add(*tax)?)
}

/// Price breakdown shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary<'a> {
    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// Checkout discount
    pub discount: Money<'a, Currency>,

    /// Tax on the discounted subtotal
    pub tax: Money<'a, Currency>,

    /// Amount due
    pub total: Money<'a, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Price a set of cart lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any step of the calculation fails.
    pub fn from_lines(
        lines: &[CartLine<'a>],
        currency: &'a Currency,
    ) -> Result<Self, PricingError> {
        let subtotal = subtotal(lines, currency)?;
        let discount = discount(&subtotal)?;
        let tax = tax(&subtotal, &discount)?;
        let total = total(&subtotal, &discount, &tax)?;

        Ok(Self {
            subtotal,
            discount,
            tax,
            total,
        })
    }
}

/// Apply `percent` to an amount in minor units.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let amount = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion(minor))?;

    ((*percent) * Decimal::ONE)
        .checked_mul(amount)
        .ok_or(PricingError::PercentConversion(minor))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion(minor))
}
