//! redb-based storage for orders and their event history
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Current order record |
//! | `events` | `(order_id, sequence)` | `OrderEvent` (JSON) | Append-only history |
//! | `sequence_counter` | `&str` | `u64` | Global event sequence and order id counter |
//!
//! # Concurrency
//!
//! redb allows one write transaction at a time. [`OrderStorage::save_order`]
//! reads the stored version and writes the new record inside the same write
//! transaction, so two writers holding the same expected version can never
//! both commit.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::order::{Order, OrderEvent};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Table for events: key = (order_id, sequence), value = JSON-serialized OrderEvent
const EVENTS_TABLE: TableDefinition<(i64, u64), &[u8]> = TableDefinition::new("events");

/// Table for counters: key = "seq" or "order_id", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";
const ORDER_ID_KEY: &str = "order_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order {order_id} is at version {actual}, expected {expected}")]
    StaleOrderState {
        order_id: i64,
        expected: u64,
        actual: u64,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    pub order_count: u64,
    pub event_count: u64,
    pub current_sequence: u64,
}

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    /// Open or create the database at the given path
    ///
    /// Commits are durable once `commit()` returns (redb default durability).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(EVENTS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
            if seq_table.get(ORDER_ID_KEY)?.is_none() {
                seq_table.insert(ORDER_ID_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Counters ==========

    fn next_counter(txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Get current event sequence (read-only)
    pub fn current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    // ========== Orders ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Orders placed with a concession, oldest first
    pub fn orders_for_concession(&self, concession_id: i64) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.concession_id == concession_id {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    /// Persist a new order with its creation events
    ///
    /// Assigns the order id, version 1, and event sequence numbers.
    pub fn insert_order(
        &self,
        mut order: Order,
        mut events: Vec<OrderEvent>,
    ) -> StorageResult<(Order, Vec<OrderEvent>)> {
        let txn = self.db.begin_write()?;

        let order_id = Self::next_counter(&txn, ORDER_ID_KEY)? as i64;
        order.id = order_id;
        order.version = 1;
        for event in &mut events {
            event.order_id = order_id;
            event.sequence = Self::next_counter(&txn, SEQUENCE_KEY)?;
        }

        Self::store_order(&txn, &order)?;
        Self::store_events(&txn, &events)?;
        txn.commit()?;

        tracing::debug!(order_id, event_count = events.len(), "Order inserted");
        Ok((order, events))
    }

    /// Compare-and-swap save
    ///
    /// Fails with [`StorageError::StaleOrderState`] unless the stored version
    /// equals `expected_version`. On success the stored version becomes
    /// `expected_version + 1` and `events` are appended with fresh sequences.
    pub fn save_order(
        &self,
        mut order: Order,
        expected_version: u64,
        mut events: Vec<OrderEvent>,
    ) -> StorageResult<(Order, Vec<OrderEvent>)> {
        let txn = self.db.begin_write()?;

        let actual = {
            let table = txn.open_table(ORDERS_TABLE)?;
            let stored = table.get(order.id)?;
            match stored {
                Some(value) => serde_json::from_slice::<Order>(value.value())?.version,
                None => return Err(StorageError::OrderNotFound(order.id)),
            }
        };
        if actual != expected_version {
            // Dropping the transaction aborts it
            return Err(StorageError::StaleOrderState {
                order_id: order.id,
                expected: expected_version,
                actual,
            });
        }

        order.version = expected_version + 1;
        for event in &mut events {
            event.order_id = order.id;
            event.sequence = Self::next_counter(&txn, SEQUENCE_KEY)?;
        }

        Self::store_order(&txn, &order)?;
        Self::store_events(&txn, &events)?;
        txn.commit()?;

        Ok((order, events))
    }

    fn store_order(txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id, value.as_slice())?;
        Ok(())
    }

    // ========== Events ==========

    fn store_events(txn: &WriteTransaction, events: &[OrderEvent]) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        for event in events {
            let value = serde_json::to_vec(event)?;
            table.insert((event.order_id, event.sequence), value.as_slice())?;
        }
        Ok(())
    }

    /// Get all events for an order, in sequence order
    pub fn events_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.range((order_id, 0u64)..=(order_id, u64::MAX))? {
            let (_key, value) = result?;
            let event: OrderEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }
        Ok(events)
    }

    /// Get storage statistics
    pub fn stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let events = read_txn.open_table(EVENTS_TABLE)?;
        let sequence = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            order_count: orders.len()?,
            event_count: events.len()?,
            current_sequence: sequence
                .get(SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{
        Actor, EventPayload, OrderPayment, OrderStatus, ProofRequirement,
    };

    fn new_order(concession_id: i64) -> Order {
        Order {
            id: 0,
            customer_id: 42,
            concession_id,
            concession_name: "Grill".to_string(),
            line_items: vec![],
            total_amount: Decimal::from(120),
            requested_time: None,
            serving_days: Default::default(),
            status: OrderStatus::Pending,
            payment: OrderPayment {
                payment_mode_id: 1,
                label: "Cash".to_string(),
                details: String::new(),
                proof_requirement: ProofRequirement::NotRequired,
            },
            proof: None,
            reason: None,
            version: 0,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    fn submitted() -> OrderEvent {
        OrderEvent::new(
            0,
            0,
            Actor::Customer(42),
            1_000,
            EventPayload::OrderSubmitted {
                total_amount: Decimal::from(120),
                item_count: 1,
                requested_time: None,
            },
        )
    }

    fn accepted() -> OrderEvent {
        OrderEvent::new(0, 0, Actor::Concession(7), 2_000, EventPayload::OrderAccepted)
    }

    #[test]
    fn test_insert_assigns_ids_and_sequences() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let (first, events) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.version, 1);
        assert_eq!(events[0].order_id, 1);
        assert_eq!(events[0].sequence, 1);

        let (second, events) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(events[0].sequence, 2);

        assert_eq!(storage.get_order(1).unwrap(), Some(first));
        assert!(storage.get_order(99).unwrap().is_none());
    }

    #[test]
    fn test_save_bumps_version() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let (order, _) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();

        let mut confirmed = order.clone();
        confirmed.status = OrderStatus::Confirmed;
        let (saved, events) = storage.save_order(confirmed, 1, vec![accepted()]).unwrap();

        assert_eq!(saved.version, 2);
        assert_eq!(events[0].order_id, order.id);
        assert_eq!(storage.get_order(order.id).unwrap().unwrap().status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_stale_save_rejected_and_nothing_written() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let (order, _) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();

        let mut confirmed = order.clone();
        confirmed.status = OrderStatus::Confirmed;
        storage.save_order(confirmed.clone(), 1, vec![accepted()]).unwrap();

        let err = storage.save_order(confirmed, 1, vec![accepted()]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::StaleOrderState {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert_eq!(storage.events_for_order(order.id).unwrap().len(), 2);
        assert_eq!(storage.current_sequence().unwrap(), 2);
    }

    #[test]
    fn test_save_unknown_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let mut ghost = new_order(7);
        ghost.id = 5;
        assert!(matches!(
            storage.save_order(ghost, 1, vec![]),
            Err(StorageError::OrderNotFound(5))
        ));
    }

    #[test]
    fn test_events_are_per_order_and_ordered() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let (a, _) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        let (b, _) = storage.insert_order(new_order(8), vec![submitted()]).unwrap();
        storage.save_order(a.clone(), 1, vec![accepted()]).unwrap();

        let history = storage.events_for_order(a.id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.windows(2).all(|w| w[0].sequence < w[1].sequence));
        assert_eq!(storage.events_for_order(b.id).unwrap().len(), 1);
    }

    #[test]
    fn test_orders_for_concession_and_stats() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        storage.insert_order(new_order(8), vec![submitted()]).unwrap();
        storage.insert_order(new_order(7), vec![submitted()]).unwrap();

        let ids: Vec<i64> = storage
            .orders_for_concession(7)
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let stats = storage.stats().unwrap();
        assert_eq!(
            stats,
            StorageStats {
                order_count: 3,
                event_count: 3,
                current_sequence: 3
            }
        );
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");
        {
            let storage = OrderStorage::open(&path).unwrap();
            storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        }
        let storage = OrderStorage::open(&path).unwrap();
        assert!(storage.get_order(1).unwrap().is_some());
        let (next, _) = storage.insert_order(new_order(7), vec![submitted()]).unwrap();
        assert_eq!(next.id, 2);
    }
}
