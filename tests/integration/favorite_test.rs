//! Integration tests for the favorite toggle.

use cardvault_core::error::ErrorKind;
use cardvault_core::types::{ResourceKind, ResourceRef};
use cardvault_entity::share::ShareCapabilities;
use cardvault_service::ShareRecipient;

use crate::helpers::{TestApp, assert_kind, ctx};

#[tokio::test]
async fn test_toggle_twice_restores_original_state() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Coffee club", None)
        .await
        .expect("card");
    let favorites = &app.services.favorites;

    assert!(
        !favorites
            .is_favorite(&ctx(&owner), ResourceKind::Card, card.id.0)
            .await
            .expect("read")
    );
    assert!(
        favorites
            .toggle_favorite(&ctx(&owner), ResourceKind::Card, card.id.0)
            .await
            .expect("toggle")
    );
    assert!(
        !favorites
            .toggle_favorite(&ctx(&owner), ResourceKind::Card, card.id.0)
            .await
            .expect("toggle")
    );
    assert!(
        !favorites
            .is_favorite(&ctx(&owner), ResourceKind::Card, card.id.0)
            .await
            .expect("read")
    );
}

#[tokio::test]
async fn test_toggle_three_times_reuses_the_marker() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let gc = app.create_gift_card(&owner, "10.00").await;
    let resource = ResourceRef::GiftCard(gc.id);
    let favorites = &app.services.favorites;

    favorites
        .toggle_favorite(&ctx(&owner), ResourceKind::GiftCard, gc.id.0)
        .await
        .expect("toggle");
    let original = app
        .repos
        .favorites
        .find(owner.id, resource)
        .await
        .expect("find")
        .expect("marker exists");

    favorites
        .toggle_favorite(&ctx(&owner), ResourceKind::GiftCard, gc.id.0)
        .await
        .expect("toggle");
    let now = favorites
        .toggle_favorite(&ctx(&owner), ResourceKind::GiftCard, gc.id.0)
        .await
        .expect("toggle");
    assert!(now);

    let restored = app
        .repos
        .favorites
        .find(owner.id, resource)
        .await
        .expect("find")
        .expect("marker exists");
    assert_eq!(restored.id, original.id);
    assert_eq!(restored.created_at, original.created_at);
    assert!(restored.deleted_at.is_none());
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let voucher = app
        .services
        .resources
        .create_voucher(&ctx(&owner), "Spring sale", "SPRING10", None)
        .await
        .expect("voucher");
    app.services
        .shares
        .create_share(
            &ctx(&owner),
            ResourceRef::Voucher(voucher.id),
            ShareRecipient::User(friend.id),
            ShareCapabilities::Voucher,
        )
        .await
        .expect("share");

    assert!(
        app.services
            .favorites
            .toggle_favorite(&ctx(&friend), ResourceKind::Voucher, voucher.id.0)
            .await
            .expect("recipient may favorite")
    );
    assert!(
        !app.services
            .favorites
            .is_favorite(&ctx(&owner), ResourceKind::Voucher, voucher.id.0)
            .await
            .expect("read")
    );
}

#[tokio::test]
async fn test_favorite_requires_view_access() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let stranger = app.create_user("stranger@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Gym", None)
        .await
        .expect("card");

    assert_kind(
        app.services
            .favorites
            .toggle_favorite(&ctx(&stranger), ResourceKind::Card, card.id.0)
            .await,
        ErrorKind::AccessDenied,
    );
}
