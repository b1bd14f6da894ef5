//! Order lifecycle module
//!
//! - **traits**: action/applier traits and the order error type
//! - **actions**: one handler per lifecycle action
//! - **appliers**: one applier per event type
//! - **lifecycle**: transition table and the pure `apply_transition`
//! - **proof**: payment proof sub-protocol
//! - **submission**: cart group to PENDING order
//! - **storage**: redb persistence with compare-and-swap saves
//! - **manager**: `OrdersManager` tying the above together
//!
//! # Architecture
//!
//! ```text
//! Action → OrdersManager → decide + apply → Storage (redb, CAS)
//!                                              ↓
//!                                          Broadcast
//!                                              ↓
//!                                       All Subscribers
//! ```

// `traits` must come first: enum_dispatch needs the trait definitions
// before the enums that dispatch to them.
pub mod traits;

pub mod actions;
pub mod appliers;
pub mod lifecycle;
pub mod manager;
pub mod proof;
pub mod storage;
pub mod submission;

// Re-exports
pub use lifecycle::{apply_event, apply_transition, authorize, decide, target_status};
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use proof::{ensure_proof, record_proof, validate_submission};
pub use storage::{OrderStorage, StorageError, StorageStats};
pub use submission::{build_order, placement_blocker};
pub use traits::{ActionContext, EventApplier, OrderActionHandler, OrderError, OrderResult};

// Re-export shared types for convenience
pub use shared::order::{
    Actor, EventPayload, Order, OrderAction, OrderActionKind, OrderEvent, OrderEventType,
    OrderStatus,
};
