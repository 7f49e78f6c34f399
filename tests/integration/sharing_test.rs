//! Integration tests for share management.

use cardvault_core::error::ErrorKind;
use cardvault_core::types::{ResourceKind, ResourceRef};
use cardvault_entity::share::ShareCapabilities;
use cardvault_service::ShareRecipient;

use crate::helpers::{TestApp, assert_kind, ctx};

fn card_caps(can_edit: bool) -> ShareCapabilities {
    ShareCapabilities::Card {
        can_edit,
        can_delete: false,
    }
}

#[tokio::test]
async fn test_duplicate_share_is_conflict() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Coffee club", None)
        .await
        .expect("card");
    let resource = ResourceRef::Card(card.id);
    let recipient = ShareRecipient::Email("friend@example.com".into());

    app.services
        .shares
        .create_share(&ctx(&owner), resource, recipient.clone(), card_caps(false))
        .await
        .expect("first share");

    assert_kind(
        app.services
            .shares
            .create_share(&ctx(&owner), resource, recipient, card_caps(true))
            .await,
        ErrorKind::Conflict,
    );
}

#[tokio::test]
async fn test_share_recipient_lookup_is_case_insensitive() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Gym", None)
        .await
        .expect("card");

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            ResourceRef::Card(card.id),
            ShareRecipient::Email("  Friend@Example.COM ".into()),
            card_caps(false),
        )
        .await
        .expect("share");
    assert_eq!(share.shared_with, friend.id);
}

#[tokio::test]
async fn test_unknown_recipient_is_user_not_found() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Library", None)
        .await
        .expect("card");

    assert_kind(
        app.services
            .shares
            .create_share(
                &ctx(&owner),
                ResourceRef::Card(card.id),
                ShareRecipient::Email("nobody@example.com".into()),
                card_caps(false),
            )
            .await,
        ErrorKind::UserNotFound,
    );
}

#[tokio::test]
async fn test_self_share_is_rejected() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Library", None)
        .await
        .expect("card");

    assert_kind(
        app.services
            .shares
            .create_share(
                &ctx(&owner),
                ResourceRef::Card(card.id),
                ShareRecipient::User(owner.id),
                card_caps(true),
            )
            .await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_voucher_share_is_always_read_only() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let voucher = app
        .services
        .resources
        .create_voucher(&ctx(&owner), "Spring sale", "SPRING10", None)
        .await
        .expect("voucher");
    let resource = ResourceRef::Voucher(voucher.id);

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            resource,
            ShareRecipient::User(friend.id),
            ShareCapabilities::Card {
                can_edit: true,
                can_delete: true,
            },
        )
        .await
        .expect("share");
    assert_eq!(share.capabilities, ShareCapabilities::Voucher);

    let perms = app
        .services
        .access
        .check_voucher_access(friend.id, voucher.id)
        .await
        .expect("access");
    assert!(perms.can_view);
    assert!(!perms.can_edit);
    assert!(!perms.can_delete);

    assert_kind(
        app.services
            .shares
            .update_share(&ctx(&owner), share.id, ShareCapabilities::Voucher)
            .await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_mismatched_capabilities_are_rejected() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Museum", None)
        .await
        .expect("card");

    assert_kind(
        app.services
            .shares
            .create_share(
                &ctx(&owner),
                ResourceRef::Card(card.id),
                ShareRecipient::User(friend.id),
                ShareCapabilities::GiftCard {
                    can_edit: true,
                    can_delete: false,
                    can_edit_transactions: true,
                },
            )
            .await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_only_owner_manages_shares() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let editor = app.create_user("editor@example.com").await;
    let third = app.create_user("third@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Cinema", None)
        .await
        .expect("card");
    let resource = ResourceRef::Card(card.id);

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            resource,
            ShareRecipient::User(editor.id),
            card_caps(true),
        )
        .await
        .expect("share");

    assert_kind(
        app.services
            .shares
            .create_share(
                &ctx(&editor),
                resource,
                ShareRecipient::User(third.id),
                card_caps(false),
            )
            .await,
        ErrorKind::AccessDenied,
    );
    assert_kind(
        app.services
            .shares
            .update_share(&ctx(&editor), share.id, card_caps(false))
            .await,
        ErrorKind::AccessDenied,
    );
    assert_kind(
        app.services.shares.list_shares(&ctx(&editor), resource).await,
        ErrorKind::AccessDenied,
    );
    assert_kind(
        app.services.shares.revoke_share(&ctx(&third), share.id).await,
        ErrorKind::AccessDenied,
    );
}

#[tokio::test]
async fn test_update_changes_effective_permissions() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Bakery", None)
        .await
        .expect("card");

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            ResourceRef::Card(card.id),
            ShareRecipient::User(friend.id),
            card_caps(false),
        )
        .await
        .expect("share");

    let perms = app
        .services
        .access
        .check_card_access(friend.id, card.id)
        .await
        .expect("access");
    assert!(!perms.can_edit);

    app.services
        .shares
        .update_share(&ctx(&owner), share.id, card_caps(true))
        .await
        .expect("update");

    let perms = app
        .services
        .access
        .check_card_access(friend.id, card.id)
        .await
        .expect("access");
    assert!(perms.can_edit);
    assert!(!perms.is_owner);
}

#[tokio::test]
async fn test_revoke_removes_access_and_is_audited() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Pool", None)
        .await
        .expect("card");
    let resource = ResourceRef::Card(card.id);

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            resource,
            ShareRecipient::User(friend.id),
            card_caps(false),
        )
        .await
        .expect("share");
    app.services
        .shares
        .revoke_share(&ctx(&owner), share.id)
        .await
        .expect("revoke");

    assert_kind(
        app.services.access.check_card_access(friend.id, card.id).await,
        ErrorKind::AccessDenied,
    );

    let actions: Vec<String> = app
        .repos
        .audit_log
        .list_for_resource(resource)
        .await
        .expect("audit")
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        ["resource.create", "share.create", "share.revoke"]
    );
}

#[tokio::test]
async fn test_recipient_may_leave_a_share() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let friend = app.create_user("friend@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Zoo", None)
        .await
        .expect("card");

    let share = app
        .services
        .shares
        .create_share(
            &ctx(&owner),
            ResourceRef::Card(card.id),
            ShareRecipient::User(friend.id),
            card_caps(false),
        )
        .await
        .expect("share");

    app.services
        .shares
        .revoke_share(&ctx(&friend), share.id)
        .await
        .expect("recipient revokes");
    assert!(
        app.services
            .shares
            .list_shared_with_me(&ctx(&friend), None)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn test_list_shares_in_creation_order() {
    let app = TestApp::new();
    let owner = app.create_user("owner@example.com").await;
    let card = app
        .services
        .resources
        .create_card(&ctx(&owner), "Market", None)
        .await
        .expect("card");
    let resource = ResourceRef::Card(card.id);

    let mut expected = Vec::new();
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        let user = app.create_user(email).await;
        app.services
            .shares
            .create_share(
                &ctx(&owner),
                resource,
                ShareRecipient::User(user.id),
                card_caps(false),
            )
            .await
            .expect("share");
        expected.push(user.id);
    }

    let listed: Vec<_> = app
        .services
        .shares
        .list_shares(&ctx(&owner), resource)
        .await
        .expect("list")
        .into_iter()
        .map(|s| s.shared_with)
        .collect();
    assert_eq!(listed, expected);

    let with_me = app
        .services
        .shares
        .list_shared_with_me(&ctx_of(&app, "b@example.com").await, Some(ResourceKind::Card))
        .await
        .expect("list");
    assert_eq!(with_me.len(), 1);
    assert_eq!(with_me[0].resource, resource);
}

async fn ctx_of(app: &TestApp, email: &str) -> cardvault_service::RequestContext {
    let user = app
        .repos
        .users
        .find_by_email(email)
        .await
        .expect("lookup")
        .expect("user exists");
    ctx(&user)
}
