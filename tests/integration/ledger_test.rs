//! Integration tests for the gift card ledger.

use futures::future::join_all;
use rust_decimal::Decimal;

use cardvault_core::error::ErrorKind;
use cardvault_core::types::{GiftCardId, ResourceRef};
use cardvault_entity::share::ShareCapabilities;
use cardvault_service::ShareRecipient;

use crate::helpers::{TestApp, assert_kind, ctx, money, today};

#[tokio::test]
async fn test_debit_refund_scenario() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "100.00").await;
    let ledger = &app.services.ledger;

    let first = ledger
        .create_transaction(&ctx(&owner), gc.id, money("60.00"), "Books", today())
        .await
        .expect("first debit");

    let err = assert_kind(
        ledger
            .create_transaction(&ctx(&owner), gc.id, money("50.00"), "More books", today())
            .await,
        ErrorKind::InsufficientBalance,
    );
    assert!(err.message.contains("40.00"), "message: {}", err.message);

    let balance = ledger.balance(&ctx(&owner), gc.id).await.expect("balance");
    assert_eq!(balance.current, money("40.00"));

    ledger
        .delete_transaction(&ctx(&owner), gc.id, first.id)
        .await
        .expect("delete");

    let balance = ledger.balance(&ctx(&owner), gc.id).await.expect("balance");
    assert_eq!(balance.current, money("100.00"));
    assert_eq!(balance.spent, Decimal::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_full_debits_allow_exactly_one() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "75.50").await;

    let attempts = (0..8).map(|i| {
        let ledger = app.services.ledger.clone();
        let ctx = ctx(&owner);
        let id = gc.id;
        async move {
            ledger
                .create_transaction(&ctx, id, money("75.50"), &format!("attempt {i}"), today())
                .await
        }
    });
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind == ErrorKind::InsufficientBalance))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(refused, 7);

    let balance = app
        .services
        .ledger
        .balance(&ctx(&owner), gc.id)
        .await
        .expect("balance");
    assert_eq!(balance.current, Decimal::ZERO);
}

#[tokio::test]
async fn test_balance_never_negative_after_mixed_operations() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "50.00").await;
    let ledger = &app.services.ledger;
    let ctx = ctx(&owner);

    let mut created = Vec::new();
    for amount in ["10.00", "15.25", "30.00", "24.75", "0.01"] {
        if let Ok(tx) = ledger
            .create_transaction(&ctx, gc.id, money(amount), "", today())
            .await
        {
            created.push(tx);
        }
        let balance = ledger.balance(&ctx, gc.id).await.expect("balance");
        assert!(balance.current >= Decimal::ZERO);
    }
    assert_eq!(created.len(), 3);

    ledger
        .delete_transaction(&ctx, gc.id, created[1].id)
        .await
        .expect("delete");

    let active = ledger
        .list_transactions(&ctx, gc.id, false)
        .await
        .expect("list");
    let spent: Decimal = active.iter().map(|t| t.amount).sum();
    let balance = ledger.balance(&ctx, gc.id).await.expect("balance");
    assert_eq!(balance.current, money("50.00") - spent);
    assert_eq!(balance.current, money("15.25"));

    let all = ledger
        .list_transactions(&ctx, gc.id, true)
        .await
        .expect("list");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "20.00").await;
    let ledger = &app.services.ledger;

    let tx = ledger
        .create_transaction(&ctx(&owner), gc.id, money("5.00"), "Coffee", today())
        .await
        .expect("debit");
    ledger
        .delete_transaction(&ctx(&owner), gc.id, tx.id)
        .await
        .expect("first delete");

    assert_kind(
        ledger.delete_transaction(&ctx(&owner), gc.id, tx.id).await,
        ErrorKind::NotFound,
    );
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "20.00").await;

    for amount in ["0", "-1.00", "0.001"] {
        assert_kind(
            app.services
                .ledger
                .create_transaction(&ctx(&owner), gc.id, money(amount), "", today())
                .await,
            ErrorKind::InvalidAmount,
        );
    }
}

#[tokio::test]
async fn test_transaction_capability_is_required() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let viewer = app.create_user("viewer@example.com").await;
    let spender = app.create_user("spender@example.com").await;
    let gc = app.create_gift_card(&owner, "30.00").await;
    let resource = ResourceRef::GiftCard(gc.id);

    for (user, can_edit_transactions) in [(&viewer, false), (&spender, true)] {
        app.services
            .shares
            .create_share(
                &ctx(&owner),
                resource,
                ShareRecipient::User(user.id),
                ShareCapabilities::GiftCard {
                    can_edit: false,
                    can_delete: false,
                    can_edit_transactions,
                },
            )
            .await
            .expect("share");
    }

    assert_kind(
        app.services
            .ledger
            .create_transaction(&ctx(&viewer), gc.id, money("1.00"), "", today())
            .await,
        ErrorKind::AccessDenied,
    );
    app.services
        .ledger
        .create_transaction(&ctx(&spender), gc.id, money("1.00"), "", today())
        .await
        .expect("spender may debit");

    let balance = app
        .services
        .ledger
        .balance(&ctx(&viewer), gc.id)
        .await
        .expect("viewer may read balance");
    assert_eq!(balance.current, money("29.00"));
}

#[tokio::test]
async fn test_unknown_gift_card_is_not_found() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;

    assert_kind(
        app.services
            .ledger
            .create_transaction(&ctx(&owner), GiftCardId::new(), money("1.00"), "", today())
            .await,
        ErrorKind::NotFound,
    );
}
