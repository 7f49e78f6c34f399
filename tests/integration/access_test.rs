//! Integration tests for access resolution and resource deletion.

use cardvault_core::error::ErrorKind;
use cardvault_core::types::{CardId, ResourceKind, ResourceRef};
use cardvault_entity::share::ShareCapabilities;
use cardvault_service::ShareRecipient;

use crate::helpers::{TestApp, assert_kind, ctx, money, today};

#[tokio::test]
async fn test_owner_has_every_permission() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "10.00").await;

    let perms = app
        .services
        .access
        .check_gift_card_access(owner.id, gc.id)
        .await
        .expect("access");
    assert!(perms.is_owner);
    assert!(perms.can_view && perms.can_edit && perms.can_delete);
    assert!(perms.can_edit_transactions);
}

#[tokio::test]
async fn test_stranger_is_denied_and_missing_is_not_found() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let stranger = app.create_user("stranger@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Library", None)
        .await
        .expect("card");

    let denied = assert_kind(
        app.services.access.check_card_access(stranger.id, card.id).await,
        ErrorKind::AccessDenied,
    );
    let missing = assert_kind(
        app.services
            .access
            .check_card_access(stranger.id, CardId::new())
            .await,
        ErrorKind::NotFound,
    );

    let (denied, missing) = (denied.conceal(), missing.conceal());
    assert_eq!(denied.kind, missing.kind);
    assert_eq!(denied.message, missing.message);
}

#[tokio::test]
async fn test_delete_requires_delete_capability() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let editor = app.create_user("editor@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Cinema", None)
        .await
        .expect("card");
    let resource = ResourceRef::Card(card.id);

    app.services
        .shares
        .create_share(
            &ctx(&owner),
            resource,
            ShareRecipient::User(editor.id),
            ShareCapabilities::Card {
                can_edit: true,
                can_delete: false,
            },
        )
        .await
        .expect("share");

    assert_kind(
        app.services
            .resources
            .delete_resource(&ctx(&editor), resource)
            .await,
        ErrorKind::AccessDenied,
    );
}

#[tokio::test]
async fn test_deleting_gift_card_cascades() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let gc = app.create_gift_card(&owner, "40.00").await;
    let resource = ResourceRef::GiftCard(gc.id);

    app.services
        .shares
        .create_share(
            &ctx(&owner),
            resource,
            ShareRecipient::User(friend.id),
            ShareCapabilities::read_only(ResourceKind::GiftCard),
        )
        .await
        .expect("share");
    app.services
        .ledger
        .create_transaction(&ctx(&owner), gc.id, money("12.00"), "Lunch", today())
        .await
        .expect("debit");
    app.services
        .favorites
        .toggle_favorite(&ctx(&friend), ResourceKind::GiftCard, gc.id.0)
        .await
        .expect("favorite");

    app.services
        .resources
        .delete_resource(&ctx(&owner), resource)
        .await
        .expect("delete");

    assert!(
        app.repos
            .shares
            .list_for_resource(resource)
            .await
            .expect("shares")
            .is_empty()
    );
    assert!(
        app.repos
            .ledger
            .list_transactions(gc.id, true)
            .await
            .expect("transactions")
            .is_empty()
    );
    assert!(
        app.repos
            .favorites
            .find(friend.id, resource)
            .await
            .expect("favorite")
            .is_none()
    );
    assert_kind(
        app.services.access.check_gift_card_access(owner.id, gc.id).await,
        ErrorKind::NotFound,
    );
}
