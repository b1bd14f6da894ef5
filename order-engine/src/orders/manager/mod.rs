//! OrdersManager - entry point for order submission and lifecycle actions
//!
//! Every mutation follows the same flow:
//!
//! ```text
//! transition(order_id, expected_version, action, actor)
//!     ├─ 1. Load the stored order
//!     ├─ 2. Reject early if the caller's version is stale
//!     ├─ 3. Decide + apply (pure, see lifecycle)
//!     ├─ 4. Compare-and-swap save with the event (one redb transaction)
//!     └─ 5. Broadcast the stamped event
//! ```
//!
//! The version check in step 2 is only a shortcut. The authoritative check
//! is the compare-and-swap in step 4, so two racing callers holding the same
//! version can never both succeed.

mod error;
pub use error::*;

use super::lifecycle::apply_transition;
use super::proof::record_proof;
use super::storage::OrderStorage;
use super::submission::build_order;
use super::traits::{ActionContext, OrderError};
use crate::catalog::CatalogStore;
use crate::core::{DEFAULT_EVENT_CHANNEL_CAPACITY, EngineConfig};
use crate::pricing::calculate_price;
use chrono::FixedOffset;
use shared::order::{
    Actor, CartGroup, Order, OrderAction, OrderEvent, PriceCalculation, ProofSubmission,
    Selection,
};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Order engine facade
pub struct OrdersManager {
    storage: OrderStorage,
    catalog: Arc<dyn CatalogStore>,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Business time zone used for serving-day checks
    offset: FixedOffset,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("catalog", &"<dyn CatalogStore>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("offset", &self.offset)
            .finish()
    }
}

impl Clone for OrdersManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            catalog: self.catalog.clone(),
            event_tx: self.event_tx.clone(),
            offset: self.offset,
        }
    }
}

impl OrdersManager {
    /// Open the order database under the configured work directory
    pub fn new(config: &EngineConfig, catalog: Arc<dyn CatalogStore>) -> ManagerResult<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db_path = config.db_path();
        let storage = OrderStorage::open(&db_path)?;
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        tracing::info!(db_path = %db_path.display(), "OrdersManager started");
        Ok(Self {
            storage,
            catalog,
            event_tx,
            offset: config.business_offset(),
        })
    }

    /// Create a manager over existing storage
    pub fn with_storage(
        storage: OrderStorage,
        catalog: Arc<dyn CatalogStore>,
        offset: FixedOffset,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            catalog,
            event_tx,
            offset,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    fn context(&self, actor: Actor) -> ActionContext {
        ActionContext::new(actor, now_millis(), self.offset)
    }

    fn broadcast(&self, events: Vec<OrderEvent>) {
        for event in events {
            if self.event_tx.send(event).is_err() {
                tracing::warn!("Event broadcast failed: no active receivers");
                break;
            }
        }
    }

    // ========== Queries ==========

    pub fn get_order(&self, order_id: i64) -> ManagerResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or(ManagerError::Order(OrderError::OrderNotFound(order_id)))
    }

    /// Recorded events of an order, oldest first
    pub fn order_history(&self, order_id: i64) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.events_for_order(order_id)?)
    }

    pub fn orders_for_concession(&self, concession_id: i64) -> ManagerResult<Vec<Order>> {
        Ok(self.storage.orders_for_concession(concession_id)?)
    }

    /// Price a selection against the current catalog
    pub fn price_menu_item(
        &self,
        menu_item_id: i64,
        selection: &Selection,
        quantity: u32,
    ) -> ManagerResult<PriceCalculation> {
        let item = self
            .catalog
            .get_menu_item(menu_item_id)
            .ok_or(OrderError::MenuItemNotFound(menu_item_id))?;
        Ok(calculate_price(&item, selection, quantity)?)
    }

    // ========== Commands ==========

    /// Place one concession's cart group as a PENDING order
    ///
    /// `requested_time` of `None` means as soon as possible.
    pub fn submit_order(
        &self,
        customer_id: i64,
        group: &CartGroup,
        requested_time: Option<i64>,
    ) -> ManagerResult<Order> {
        let concession_id = group
            .concession_id
            .ok_or_else(|| OrderError::IncompleteCartGroup("concession is unknown".to_string()))?;

        for cart_item in &group.items {
            let item = self
                .catalog
                .get_menu_item(cart_item.menu_item_id)
                .ok_or(OrderError::MenuItemNotFound(cart_item.menu_item_id))?;
            if !item.is_available {
                return Err(OrderError::MenuItemUnavailable(item.id).into());
            }
            if item.concession_id != concession_id {
                return Err(OrderError::IncompleteCartGroup(format!(
                    "menu item {} belongs to another concession",
                    item.id
                ))
                .into());
            }
        }

        let payment_mode = self
            .catalog
            .get_concession_payment_mode(concession_id)
            .ok_or(OrderError::PaymentModeNotFound(concession_id))?;

        let ctx = self.context(Actor::Customer(customer_id));
        let (order, event) = build_order(group, &payment_mode, requested_time, &ctx)?;
        let (order, events) = self.storage.insert_order(order, vec![event])?;

        tracing::info!(
            order_id = order.id,
            customer_id,
            concession_id,
            total = %order.total_amount,
            "Order submitted"
        );
        self.broadcast(events);
        Ok(order)
    }

    /// Apply a lifecycle action to an order held at `expected_version`
    pub fn transition(
        &self,
        order_id: i64,
        expected_version: u64,
        action: OrderAction,
        actor: Actor,
    ) -> ManagerResult<Order> {
        let current = self.get_order(order_id)?;
        if current.version != expected_version {
            return Err(OrderError::StaleOrderState {
                order_id,
                expected: expected_version,
                actual: current.version,
            }
            .into());
        }

        let ctx = self.context(actor);
        let (next, event) = apply_transition(&current, &action, &ctx)?;
        let (saved, events) = self.storage.save_order(next, expected_version, vec![event])?;
        self.broadcast(events);
        Ok(saved)
    }

    /// Record payment proof for an order held at `expected_version`
    pub fn submit_proof(
        &self,
        order_id: i64,
        expected_version: u64,
        customer_id: i64,
        submission: ProofSubmission,
    ) -> ManagerResult<Order> {
        let current = self.get_order(order_id)?;
        if current.version != expected_version {
            return Err(OrderError::StaleOrderState {
                order_id,
                expected: expected_version,
                actual: current.version,
            }
            .into());
        }

        let ctx = self.context(Actor::Customer(customer_id));
        let (next, event) = record_proof(&current, submission, &ctx)?;
        let (saved, events) = self.storage.save_order(next, expected_version, vec![event])?;
        self.broadcast(events);
        Ok(saved)
    }
}
