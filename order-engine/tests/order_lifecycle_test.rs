//! End-to-end order flows through `OrdersManager`
//!
//! Catalog → pricing → cart grouping → submission → lifecycle → storage.

use chrono::FixedOffset;
use order_engine::{
    EngineConfig, MemoryCatalog, OrderStorage, OrdersManager, build_cart_groups,
    validate_category_adjustment,
};
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{
    AddOn, CategoryItemPrice, MenuItem, OptionTarget, PaymentMode, ProofMode, SelectionMode,
    ServingDay, VariationGroup, VariationOption,
};
use shared::order::{
    Actor, CartGroup, CartItem, CartItemStatus, Order, OrderAction, OrderEventType, OrderStatus,
    ProofSubmission, Selection,
};
use std::sync::{Arc, Barrier};

const GRILL: i64 = 7;
const CUSTOMER: i64 = 42;
// Monday 2024-01-01 23:30 UTC
const MONDAY: i64 = 1_704_151_800_000;
const DAY: i64 = 86_400_000;

fn menu_item(id: i64, name: &str, price: i64, days: &[ServingDay]) -> MenuItem {
    MenuItem {
        id,
        concession_id: GRILL,
        name: name.to_string(),
        base_price: Decimal::from(price),
        is_available: true,
        categories: vec![],
        variation_groups: vec![],
        add_ons: vec![],
        serving_days: days.iter().copied().collect(),
    }
}

fn chicken_meal() -> MenuItem {
    let mut item = menu_item(10, "Chicken Meal", 100, &ServingDay::ALL);
    item.variation_groups.push(VariationGroup {
        id: 1,
        name: "Drink".to_string(),
        selection_mode: SelectionMode::SingleItem,
        specificity: false,
        max_selections: None,
        options: vec![VariationOption {
            id: 1,
            name: "Iced Tea".to_string(),
            price_adjustment: Decimal::from(-30),
            target: OptionTarget::MenuItem(11),
        }],
    });
    item.add_ons.push(AddOn {
        id: 5,
        name: "Extra Rice".to_string(),
        price: Decimal::from(20),
    });
    item
}

fn catalog(mode: PaymentMode) -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog
        .upsert_menu_item(menu_item(11, "Iced Tea", 35, &ServingDay::ALL))
        .unwrap();
    catalog.upsert_menu_item(chicken_meal()).unwrap();
    catalog
        .upsert_menu_item(menu_item(12, "Tuesday Sisig", 80, &[ServingDay::Tuesday]))
        .unwrap();
    catalog.set_payment_mode(GRILL, mode);
    catalog
}

fn manager(mode: PaymentMode) -> OrdersManager {
    OrdersManager::with_storage(
        OrderStorage::open_in_memory().unwrap(),
        Arc::new(catalog(mode)),
        FixedOffset::east_opt(0).unwrap(),
    )
}

fn cart_item(manager: &OrdersManager, id: i64, item: &MenuItem, selection: Selection, qty: u32) -> CartItem {
    CartItem {
        id,
        menu_item_id: item.id,
        concession_id: Some(item.concession_id),
        concession_name: Some("Grill".to_string()),
        name: item.name.clone(),
        quantity: qty,
        pricing: Some(manager.price_menu_item(item.id, &selection, qty).unwrap()),
        status: CartItemStatus::Available,
        serving_days: item.serving_days.clone(),
    }
}

fn meal_group(manager: &OrdersManager) -> CartGroup {
    let selection = Selection::new().choose(1, 1).toggle_add_on(5, true);
    let item = cart_item(manager, 1, &chicken_meal(), selection, 2);
    build_cart_groups(&[item]).remove(0)
}

fn grill() -> Actor {
    Actor::Concession(GRILL)
}

fn place(manager: &OrdersManager) -> Order {
    manager.submit_order(CUSTOMER, &meal_group(manager), None).unwrap()
}

#[test]
fn test_item_pricing_with_variation_and_add_on() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let selection = Selection::new().choose(1, 1).toggle_add_on(5, true);

    let pricing = manager.price_menu_item(10, &selection, 2).unwrap();
    assert_eq!(pricing.unit_price, Decimal::from(90));
    assert_eq!(pricing.total_price, Decimal::from(180));
}

#[test]
fn test_category_adjustment_flags_items_made_free() {
    let items = vec![
        CategoryItemPrice {
            id: 1,
            name: "Fries".to_string(),
            base_price: Decimal::from(40),
        },
        CategoryItemPrice {
            id: 2,
            name: "Nachos".to_string(),
            base_price: Decimal::from(60),
        },
    ];

    let result = validate_category_adjustment(&items, Some("-50"));
    assert!(result.has_issue);
    assert_eq!(result.affected_items.len(), 1);
    assert_eq!(result.affected_items[0].id, 1);
    assert_eq!(result.affected_items[0].adjusted_price, Decimal::ZERO);
    assert!(result.message.unwrap().contains("Fries"));
}

#[test]
fn test_decline_without_reason_keeps_pending() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let order = place(&manager);

    let err = manager
        .transition(order.id, 1, OrderAction::Decline { reason: None }, grill())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReasonRequired);

    let stored = manager.get_order(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.version, 1);
}

#[test]
fn test_mark_ready_waits_for_proof() {
    let manager = manager(PaymentMode::with_proof(2, "GCash", ProofMode::Text));
    let order = place(&manager);
    let order = manager.transition(order.id, 1, OrderAction::Accept, grill()).unwrap();

    let err = manager
        .transition(order.id, order.version, OrderAction::MarkReady, grill())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProofRequired);

    let order = manager
        .submit_proof(
            order.id,
            order.version,
            CUSTOMER,
            ProofSubmission::Text {
                reference: "GC-2024-0001".to_string(),
            },
        )
        .unwrap();
    let order = manager
        .transition(order.id, order.version, OrderAction::MarkReady, grill())
        .unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accepts_one_wins() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let order = place(&manager);
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let manager = manager.clone();
            let barrier = barrier.clone();
            tokio::task::spawn_blocking(move || {
                barrier.wait();
                manager.transition(order.id, 1, OrderAction::Accept, grill())
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    let loser = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(loser.code(), ErrorCode::StaleOrderState);

    let stored = manager.get_order(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Confirmed);
    assert_eq!(stored.version, 2);
    assert_eq!(manager.order_history(order.id).unwrap().len(), 2);
}

#[test]
fn test_terminal_orders_reject_every_action() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));

    let completed = {
        let o = place(&manager);
        let o = manager.transition(o.id, 1, OrderAction::Accept, grill()).unwrap();
        let o = manager.transition(o.id, 2, OrderAction::MarkReady, grill()).unwrap();
        manager.transition(o.id, 3, OrderAction::Complete, grill()).unwrap()
    };
    let declined = {
        let o = place(&manager);
        let decline = OrderAction::Decline {
            reason: Some("out of chicken".to_string()),
        };
        manager.transition(o.id, 1, decline, grill()).unwrap()
    };
    let cancelled = {
        let o = place(&manager);
        let o = manager.transition(o.id, 1, OrderAction::Accept, grill()).unwrap();
        let cancel = OrderAction::Cancel {
            reason: Some("customer did not show".to_string()),
        };
        manager.transition(o.id, 2, cancel, grill()).unwrap()
    };

    let actions = [
        OrderAction::Accept,
        OrderAction::Decline {
            reason: Some("x".to_string()),
        },
        OrderAction::Reschedule {
            requested_time: Some(MONDAY),
        },
        OrderAction::MarkReady,
        OrderAction::Cancel {
            reason: Some("x".to_string()),
        },
        OrderAction::Complete,
    ];

    for order in [completed, declined, cancelled] {
        assert!(order.status.is_terminal());
        for action in &actions {
            let err = manager
                .transition(order.id, order.version, action.clone(), grill())
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidTransition, "{} {:?}", order.status, action);
        }
        let stored = manager.get_order(order.id).unwrap();
        assert_eq!(stored, order);
    }
}

#[test]
fn test_reschedule_checks_serving_days() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let sisig = menu_item(12, "Tuesday Sisig", 80, &[ServingDay::Tuesday]);
    let group = build_cart_groups(&[cart_item(&manager, 1, &sisig, Selection::new(), 1)]).remove(0);

    let err = manager.submit_order(CUSTOMER, &group, Some(MONDAY)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ServingDayMismatch);

    let order = manager
        .submit_order(CUSTOMER, &group, Some(MONDAY + DAY))
        .unwrap();
    assert_eq!(order.requested_time, Some(MONDAY + DAY));

    let err = manager
        .transition(
            order.id,
            1,
            OrderAction::Reschedule {
                requested_time: Some(MONDAY + 2 * DAY),
            },
            grill(),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ServingDayMismatch);

    let order = manager
        .transition(
            order.id,
            1,
            OrderAction::Reschedule {
                requested_time: Some(MONDAY + 8 * DAY),
            },
            grill(),
        )
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.requested_time, Some(MONDAY + 8 * DAY));
}

#[test]
fn test_other_concession_cannot_act() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let order = place(&manager);

    let err = manager
        .transition(order.id, 1, OrderAction::Accept, Actor::Concession(99))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PermissionDenied);

    let err = manager
        .transition(order.id, 1, OrderAction::Accept, Actor::Customer(CUSTOMER))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PermissionDenied);
}

#[test]
fn test_orders_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::with_overrides(dir.path().to_string_lossy(), 0);

    let order_id = {
        let manager = OrdersManager::new(
            &config,
            Arc::new(catalog(PaymentMode::without_proof(1, "Cash"))),
        )
        .unwrap();
        let order = place(&manager);
        manager.transition(order.id, 1, OrderAction::Accept, grill()).unwrap();
        order.id
    };

    let manager = OrdersManager::new(
        &config,
        Arc::new(catalog(PaymentMode::without_proof(1, "Cash"))),
    )
    .unwrap();
    let order = manager.get_order(order_id).unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.version, 2);

    let types: Vec<OrderEventType> = manager
        .order_history(order_id)
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![OrderEventType::OrderSubmitted, OrderEventType::OrderAccepted]
    );

    // A fresh order after reopen must not reuse the id
    let next = place(&manager);
    assert!(next.id > order_id);
}

#[tokio::test]
async fn test_subscribers_see_committed_events_in_order() {
    let manager = manager(PaymentMode::without_proof(1, "Cash"));
    let mut rx = manager.subscribe();

    let order = place(&manager);
    manager.transition(order.id, 1, OrderAction::Accept, grill()).unwrap();
    // Rejected actions publish nothing
    let err = manager
        .transition(order.id, 2, OrderAction::Complete, grill())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.event_type, OrderEventType::OrderSubmitted);
    assert_eq!(second.event_type, OrderEventType::OrderAccepted);
    assert!(first.sequence < second.sequence);
    assert!(rx.try_recv().is_err());
}
