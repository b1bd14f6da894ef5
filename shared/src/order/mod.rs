//! Order Module
//!
//! Types for order composition and the order lifecycle:
//! - Types: selections, price breakdowns, cart lines/groups, actions
//! - Snapshot: the persisted order record and its status
//! - Events: immutable facts recorded after each change

pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{Order, OrderPayment, OrderStatus, ProofRequirement};
pub use types::*;
