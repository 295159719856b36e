//! Documents
//!
//! The order collection of the document store, expressed as an async port.
//! [`InMemoryOrderStore`] keeps orders as JSON documents keyed by order id and
//! pushes each user's order list to subscribers after every write.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::orders::{Order, OrderId};

/// Errors raised by the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order with this identifier was already recorded.
    #[error("order {0} already exists")]
    AlreadyExists(OrderId),

    /// The store could not be reached.
    #[error("order store is unavailable")]
    Unavailable,

    /// A document could not be encoded or decoded.
    #[error(transparent)]
    Document(#[from] serde_json::Error),
}

/// Order collection
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Record a new order.
    async fn create_order(&self, order: &Order) -> Result<(), OrderStoreError>;

    /// A user's orders, newest first.
    async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderStoreError>;

    /// Watch a user's orders, newest first.
    ///
    /// The receiver starts with the current list and sees a new list after
    /// every recorded order.
    fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<Vec<Order>>, OrderStoreError>;
}

/// Order store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    collection: Mutex<Collection>,
    offline: AtomicBool,
}

/// Stored documents and the live feeds that mirror them.
///
/// Both sit behind one lock so a feed is always published the list that
/// includes the write that triggered it.
#[derive(Debug, Default)]
struct Collection {
    documents: FxHashMap<String, Value>,
    feeds: FxHashMap<String, watch::Sender<Vec<Order>>>,
}

impl Collection {
    fn orders_for(&self, user_id: &str) -> Result<Vec<Order>, OrderStoreError> {
        let mut orders = self
            .documents
            .values()
            .filter(|document| document.get("userId").and_then(Value::as_str) == Some(user_id))
            .map(|document| serde_json::from_value::<Order>(document.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        orders.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(orders)
    }
}

impl InMemoryOrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`OrderStoreError::Unavailable`] until
    /// switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);

        debug!(offline, "order store availability changed");
    }

    /// Number of stored orders across all users
    pub fn len(&self) -> usize {
        self.collection().documents.len()
    }

    /// Whether no orders are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collection(&self) -> MutexGuard<'_, Collection> {
        self.collection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<(), OrderStoreError> {
        if self.offline.load(Ordering::Relaxed) {
            warn!("order store is offline");

            return Err(OrderStoreError::Unavailable);
        }

        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: &Order) -> Result<(), OrderStoreError> {
        self.ensure_online()?;

        let document = serde_json::to_value(order)?;

        {
            let mut collection = self.collection();

            if collection.documents.contains_key(order.id.as_str()) {
                return Err(OrderStoreError::AlreadyExists(order.id.clone()));
            }

            collection.documents.insert(order.id.to_string(), document);

            if let Some(feed) = collection.feeds.get(&order.user_id) {
                feed.send_replace(collection.orders_for(&order.user_id)?);
            }
        }

        info!(order = %order.id, user = %order.user_id, "order recorded");

        Ok(())
    }

    async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderStoreError> {
        self.ensure_online()?;

        self.collection().orders_for(user_id)
    }

    fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<Vec<Order>>, OrderStoreError> {
        self.ensure_online()?;

        let mut collection = self.collection();

        if let Some(feed) = collection.feeds.get(user_id) {
            return Ok(feed.subscribe());
        }

        let (feed, receiver) = watch::channel(collection.orders_for(user_id)?);
        collection.feeds.insert(user_id.to_string(), feed);

        Ok(receiver)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::orders::OrderStatus;

    use super::*;

    fn order(user_id: &str, millis: i64) -> Result<Order, jiff::Error> {
        let date = Timestamp::from_millisecond(millis)?;

        Ok(Order {
            id: OrderId::from_timestamp(date),
            user_id: user_id.to_string(),
            items: BTreeMap::from([("1-1".to_string(), 1)]),
            status: OrderStatus::Confirmed,
            address: "12 MG Road".to_string(),
            date,
        })
    }

    #[tokio::test]
    async fn list_orders_filters_by_user_newest_first() -> TestResult {
        let store = InMemoryOrderStore::new();

        store.create_order(&order("guest", 1_000)?).await?;
        store.create_order(&order("guest", 3_000)?).await?;
        store.create_order(&order("other", 2_000)?).await?;

        let ids: Vec<String> = store
            .list_orders("guest")
            .await?
            .iter()
            .map(|order| order.id.to_string())
            .collect();

        assert_eq!(ids, ["3000", "1000"]);
        assert_eq!(store.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_order_ids_are_rejected() -> TestResult {
        let store = InMemoryOrderStore::new();
        let order = order("guest", 1_000)?;

        store.create_order(&order).await?;
        let result = store.create_order(&order).await;

        assert!(matches!(result, Err(OrderStoreError::AlreadyExists(id)) if id == order.id));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() -> TestResult {
        let store = InMemoryOrderStore::new();
        store.set_offline(true);

        let result = store.create_order(&order("guest", 1_000)?).await;

        assert!(matches!(result, Err(OrderStoreError::Unavailable)));
        assert!(store.is_empty());

        store.set_offline(false);
        store.create_order(&order("guest", 1_000)?).await?;

        assert_eq!(store.list_orders("guest").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn subscribers_see_every_new_order() -> TestResult {
        let store = InMemoryOrderStore::new();
        store.create_order(&order("guest", 1_000)?).await?;

        let mut orders = store.subscribe("guest")?;

        assert_eq!(orders.borrow_and_update().len(), 1);

        store.create_order(&order("guest", 2_000)?).await?;
        orders.changed().await?;

        let latest: Vec<String> = orders
            .borrow_and_update()
            .iter()
            .map(|order| order.id.to_string())
            .collect();

        assert_eq!(latest, ["2000", "1000"]);

        Ok(())
    }

    #[tokio::test]
    async fn other_users_orders_do_not_notify() -> TestResult {
        let store = InMemoryOrderStore::new();
        let orders = store.subscribe("guest")?;

        store.create_order(&order("other", 1_000)?).await?;

        assert!(!orders.has_changed()?);
        assert!(orders.borrow().is_empty());

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_leave_subscribers_with_the_full_list() -> TestResult {
        for _ in 0..50 {
            let store = Arc::new(InMemoryOrderStore::new());
            let orders = store.subscribe("guest")?;

            let mut writers = Vec::new();

            for millis in 1_000..1_016 {
                let store = Arc::clone(&store);
                let order = order("guest", millis)?;

                writers.push(tokio::spawn(async move { store.create_order(&order).await }));
            }

            for writer in writers {
                writer.await??;
            }

            assert_eq!(store.len(), 16);
            assert_eq!(orders.borrow().len(), 16);
        }

        Ok(())
    }

    #[tokio::test]
    async fn late_subscribers_start_from_the_latest_list() -> TestResult {
        let store = InMemoryOrderStore::new();
        let early = store.subscribe("guest")?;

        store.create_order(&order("guest", 1_000)?).await?;

        let late = store.subscribe("guest")?;

        assert_eq!(late.borrow().len(), 1);
        assert_eq!(*late.borrow(), *early.borrow());

        Ok(())
    }
}
