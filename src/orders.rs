//! Orders

use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;

/// Order identifier: milliseconds since the Unix epoch at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Derive an identifier from a creation time.
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        Self(timestamp.as_millisecond().to_string())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static LAST_CREATED: AtomicI64 = AtomicI64::new(i64::MIN);

/// Creation time for a new order.
///
/// Each call returns a millisecond strictly later than every earlier call in
/// this process, so orders created in the same millisecond still get distinct
/// identifiers.
pub fn creation_time() -> Timestamp {
    creation_time_at(Timestamp::now())
}

fn creation_time_at(now: Timestamp) -> Timestamp {
    let millis = now.as_millisecond();

    let previous = LAST_CREATED
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(millis.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);

    let issued = millis.max(previous.saturating_add(1));

    if issued == millis {
        return now;
    }

    Timestamp::from_millisecond(issued).unwrap_or(now)
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Taken from the cart without payment.
    Ordered,

    /// Paid for and recorded.
    Confirmed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Ordered => f.write_str("ORDERED"),
            OrderStatus::Confirmed => f.write_str("CONFIRMED"),
        }
    }
}

/// Order record, shaped like the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    pub id: OrderId,

    /// Customer the order belongs to
    pub user_id: String,

    /// Quantity ordered per product identifier
    pub items: BTreeMap<String, u32>,

    /// Order status
    pub status: OrderStatus,

    /// Delivery address
    pub address: String,

    /// Creation time
    pub date: Timestamp,
}

impl Order {
    /// Build an order from cart lines, identified by its creation time.
    pub fn from_lines(
        user_id: impl Into<String>,
        address: impl Into<String>,
        lines: &[CartLine<'_>],
        status: OrderStatus,
        date: Timestamp,
    ) -> Self {
        let items = lines
            .iter()
            .map(|line| (line.product().id.clone(), line.quantity()))
            .collect();

        Self {
            id: OrderId::from_timestamp(date),
            user_id: user_id.into(),
            items,
            status,
            address: address.into(),
            date,
        }
    }

    /// Total number of units across every product
    pub fn item_count(&self) -> u64 {
        self.items.values().map(|quantity| u64::from(*quantity)).sum()
    }

    /// Quantity ordered of `product_id`, zero if absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items.get(product_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use serde_json::json;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn order() -> Result<Order, jiff::Error> {
        let phone = Product::new("1-1", "Smartphone", Money::from_minor(12_000, INR));
        let bat = Product::new("1-3", "Cricket Bat", Money::from_minor(10_000, INR));
        let lines = [CartLine::new(&phone, 2), CartLine::new(&bat, 1)];

        let date = Timestamp::from_millisecond(1_700_000_000_123)?;

        Ok(Order::from_lines(
            "guest",
            "12 MG Road",
            &lines,
            OrderStatus::Confirmed,
            date,
        ))
    }

    #[test]
    fn order_id_is_the_creation_millisecond() -> TestResult {
        let order = order()?;

        assert_eq!(order.id.as_str(), "1700000000123");
        assert_eq!(order.id.to_string(), "1700000000123");

        Ok(())
    }

    #[test]
    fn creation_times_never_repeat_within_a_millisecond() -> TestResult {
        let now = Timestamp::from_millisecond(1_700_000_000_123)?;

        let first = creation_time_at(now);
        let second = creation_time_at(now);

        assert!(first >= now);
        assert!(second > first);
        assert_ne!(OrderId::from_timestamp(first), OrderId::from_timestamp(second));

        Ok(())
    }

    #[test]
    fn order_counts_units_per_product() -> TestResult {
        let order = order()?;

        assert_eq!(order.item_count(), 3);
        assert_eq!(order.quantity_of("1-1"), 2);
        assert_eq!(order.quantity_of("9-9"), 0);

        Ok(())
    }

    #[test]
    fn order_serializes_to_document_shape() -> TestResult {
        let document = serde_json::to_value(order()?)?;

        assert_eq!(document["id"], json!("1700000000123"));
        assert_eq!(document["userId"], json!("guest"));
        assert_eq!(document["items"], json!({ "1-1": 2, "1-3": 1 }));
        assert_eq!(document["status"], json!("CONFIRMED"));
        assert_eq!(document["address"], json!("12 MG Road"));
        assert!(document["date"].is_string());

        let decoded: Order = serde_json::from_value(document)?;

        assert_eq!(decoded, order()?);

        Ok(())
    }
}
