//! Shared test helpers for integration tests.

use rust_decimal::Decimal;

use cardvault_core::config::LedgerConfig;
use cardvault_core::error::{AppError, ErrorKind};
use cardvault_database::Repositories;
use cardvault_entity::resource::GiftCard;
use cardvault_entity::user::{CreateUser, User};
use cardvault_service::{RequestContext, Services};

/// Test application context
pub struct TestApp {
    /// Repositories, for direct reads
    pub repos: Repositories,
    /// Services under test
    pub services: Services,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub fn new() -> Self {
        let repos = Repositories::memory();
        let services = Services::new(&repos, LedgerConfig::default());
        Self { repos, services }
    }

    /// Register a user
    pub async fn create_user(&self, email: &str) -> User {
        self.repos
            .users
            .create(&CreateUser {
                email: email.to_string(),
                display_name: None,
            })
            .await
            .expect("Failed to create user")
    }

    /// Create a gift card owned by `owner`
    pub async fn create_gift_card(&self, owner: &User, initial_balance: &str) -> GiftCard {
        self.services
            .resources
            .create_gift_card(
                &ctx(owner),
                "Bookshop",
                "GC-0001",
                money(initial_balance),
            )
            .await
            .expect("Failed to create gift card")
    }
}

/// A request context acting as `user`
pub fn ctx(user: &User) -> RequestContext {
    RequestContext::new(user.id)
}

/// Parse a decimal literal
pub fn money(raw: &str) -> Decimal {
    raw.parse().expect("valid decimal")
}

/// Today's date for transaction rows
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Assert that `result` failed with `kind`
pub fn assert_kind<T: std::fmt::Debug>(result: Result<T, AppError>, kind: ErrorKind) -> AppError {
    match result {
        Ok(v) => panic!("expected {kind}, got Ok({v:?})"),
        Err(e) => {
            assert_eq!(e.kind, kind, "unexpected error: {e}");
            e
        }
    }
}
