//! Prices
//!
//! Display prices arrive as strings such as `"₹1,999"`. Two parsers live here:
//! [`parse_price`] keeps the lenient storefront behaviour (anything it cannot
//! read is worth zero), while [`parse_money`] is the strict parser used when a
//! catalog is ingested, so a malformed price fails the load instead of silently
//! pricing a product at zero.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised by the strict price parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount could not be read.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// The currency symbol or code is not one we price in.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Parse a display price leniently.
///
/// Every character that is not an ASCII digit or a decimal point is dropped
/// before parsing, so `"₹1,999"` reads as `1999`. Strings that still fail to
/// parse (`"free"`, `"1.2.3"`) are worth zero.
pub fn parse_price(s: &str) -> Decimal {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Parse a display price strictly into minor units.
///
/// Accepts a leading currency symbol (`"₹1,999"`, `"₹12.50"`) or a trailing
/// ISO code (`"199 INR"`). Thousands separators are allowed; more than two
/// fractional digits, signs and stray characters are not.
///
/// # Errors
///
/// - [`PriceError::InvalidPrice`]: the amount is empty or malformed.
/// - [`PriceError::UnknownCurrency`]: the symbol or code is not recognised.
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let trimmed = s.trim();

    let (amount, currency) = match trimmed.split_once(char::is_whitespace) {
        Some((amount, code)) => (amount, currency_for_code(code.trim())?),
        None => split_symbol(trimmed)?,
    };

    let minor_units = minor_units(amount).ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Resolve an ISO 4217 code to one of the currencies we price in.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for any other code.
pub fn currency_for_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code {
        "INR" => Ok(iso::INR),
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Percentage saved against the list price, as shown on the catalog badge.
///
/// Rounds down to whole percent points. A sale price at or above the list
/// price, or a zero list price, shows no badge (`0`).
pub fn discount_percent(price: &Money<'_, Currency>, list_price: &Money<'_, Currency>) -> u32 {
    let list = list_price.to_minor_units();
    let sale = price.to_minor_units();

    if list <= 0 || sale >= list {
        return 0;
    }

    let saved = (list - sale).saturating_mul(100) / list;

    u32::try_from(saved).unwrap_or(0)
}

fn split_symbol(s: &str) -> Result<(&str, &'static Currency), PriceError> {
    let symbols: [(&str, &'static Currency); 4] = [
        ("₹", iso::INR),
        ("£", iso::GBP),
        ("$", iso::USD),
        ("€", iso::EUR),
    ];

    symbols
        .into_iter()
        .find_map(|(symbol, currency)| {
            s.strip_prefix(symbol)
                .map(|amount| (amount.trim_start(), currency))
        })
        .ok_or_else(|| PriceError::UnknownCurrency(s.to_string()))
}

fn minor_units(amount: &str) -> Option<i64> {
    let cleaned: String = amount.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let minor = cleaned
        .parse::<Decimal>()
        .ok()?
        .checked_mul(Decimal::ONE_HUNDRED)?;

    if !minor.fract().is_zero() {
        return None;
    }

    minor.to_i64()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_strips_symbol_and_grouping() {
        assert_eq!(parse_price("₹1,999"), Decimal::from(1999));
        assert_eq!(parse_price("₹12.50"), Decimal::new(1250, 2));
    }

    #[test]
    fn parse_price_falls_back_to_zero() {
        assert_eq!(parse_price("free"), Decimal::ZERO);
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn parse_money_reads_symbol_prefixed_prices() -> TestResult {
        assert_eq!(parse_money("₹1,999")?, Money::from_minor(199_900, INR));
        assert_eq!(parse_money("₹12.50")?, Money::from_minor(1_250, INR));
        assert_eq!(parse_money("£3")?, Money::from_minor(300, GBP));

        Ok(())
    }

    #[test]
    fn parse_money_reads_code_suffixed_prices() -> TestResult {
        assert_eq!(parse_money("199 INR")?, Money::from_minor(19_900, INR));
        assert_eq!(parse_money("2.99 USD")?, Money::from_minor(299, USD));

        Ok(())
    }

    #[test]
    fn parse_money_rejects_malformed_amounts() {
        for input in ["₹", "₹free", "₹1.999", "₹-5", "₹1.2.3"] {
            assert!(
                matches!(parse_money(input), Err(PriceError::InvalidPrice(_))),
                "expected InvalidPrice for {input:?}"
            );
        }
    }

    #[test]
    fn parse_money_rejects_unknown_currencies() {
        assert_eq!(
            parse_money("120"),
            Err(PriceError::UnknownCurrency("120".to_string()))
        );
        assert_eq!(
            parse_money("120 XYZ"),
            Err(PriceError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn discount_percent_rounds_down() {
        let price = Money::from_minor(10_000, INR);
        let list_price = Money::from_minor(30_000, INR);

        assert_eq!(discount_percent(&price, &list_price), 66);
    }

    #[test]
    fn discount_percent_is_zero_without_a_saving() {
        let price = Money::from_minor(500, INR);

        assert_eq!(discount_percent(&price, &Money::from_minor(500, INR)), 0);
        assert_eq!(discount_percent(&price, &Money::from_minor(400, INR)), 0);
        assert_eq!(discount_percent(&price, &Money::from_minor(0, INR)), 0);
    }
}
