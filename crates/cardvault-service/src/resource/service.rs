//! Creation and deletion of cards, vouchers and gift cards.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use cardvault_auth::{AccessResolver, Capability};
use cardvault_core::error::AppError;
use cardvault_core::events::AuditAction;
use cardvault_core::result::AppResult;
use cardvault_core::types::ResourceRef;
use cardvault_database::repositories::ResourceRepository;
use cardvault_entity::resource::{Card, GiftCard, NewCard, NewGiftCard, NewVoucher, Voucher};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Creates resources owned by the caller and deletes them.
#[derive(Debug, Clone)]
pub struct ResourceService {
    /// Resource storage.
    resource_repo: Arc<dyn ResourceRepository>,
    /// Permission checks.
    access: AccessResolver,
    /// Audit trail.
    audit: AuditRecorder,
}

fn require_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    Ok(name.to_string())
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(
        resource_repo: Arc<dyn ResourceRepository>,
        access: AccessResolver,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            resource_repo,
            access,
            audit,
        }
    }

    /// Creates a loyalty card owned by the caller.
    pub async fn create_card(
        &self,
        ctx: &RequestContext,
        name: &str,
        card_number: Option<String>,
    ) -> AppResult<Card> {
        let data = NewCard {
            owner_id: Some(ctx.user_id),
            name: require_name(name)?,
            card_number,
        };
        let card = ctx.run(self.resource_repo.create_card(&data)).await?;

        info!(user_id = %ctx.user_id, card_id = %card.id, "Card created");
        self.audit
            .record(ctx, AuditAction::ResourceCreated, card.id.into(), &card)
            .await;
        Ok(card)
    }

    /// Creates a voucher owned by the caller.
    pub async fn create_voucher(
        &self,
        ctx: &RequestContext,
        name: &str,
        code: &str,
        expires_on: Option<NaiveDate>,
    ) -> AppResult<Voucher> {
        let data = NewVoucher {
            owner_id: Some(ctx.user_id),
            name: require_name(name)?,
            code: code.trim().to_string(),
            expires_on,
        };
        let voucher = ctx.run(self.resource_repo.create_voucher(&data)).await?;

        info!(user_id = %ctx.user_id, voucher_id = %voucher.id, "Voucher created");
        self.audit
            .record(ctx, AuditAction::ResourceCreated, voucher.id.into(), &voucher)
            .await;
        Ok(voucher)
    }

    /// Creates a gift card owned by the caller. The initial balance must be
    /// a non-negative amount of whole cents.
    pub async fn create_gift_card(
        &self,
        ctx: &RequestContext,
        name: &str,
        code: &str,
        initial_balance: Decimal,
    ) -> AppResult<GiftCard> {
        if initial_balance < Decimal::ZERO {
            return Err(AppError::invalid_amount("Initial balance must not be negative"));
        }
        if initial_balance.normalize().scale() > crate::ledger::amount::MAX_SCALE {
            return Err(AppError::invalid_amount(format!(
                "Initial balance {initial_balance} has fractional cents"
            )));
        }

        let data = NewGiftCard {
            owner_id: Some(ctx.user_id),
            name: require_name(name)?,
            code: code.trim().to_string(),
            initial_balance,
        };
        let gift_card = ctx.run(self.resource_repo.create_gift_card(&data)).await?;

        info!(
            user_id = %ctx.user_id,
            gift_card_id = %gift_card.id,
            initial_balance = %gift_card.initial_balance,
            "Gift card created"
        );
        self.audit
            .record(
                ctx,
                AuditAction::ResourceCreated,
                gift_card.id.into(),
                &gift_card,
            )
            .await;
        Ok(gift_card)
    }

    /// Deletes a resource, cascading to its shares, transactions and
    /// favorites. Requires `can_delete`.
    pub async fn delete_resource(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
    ) -> AppResult<()> {
        let snapshot = ctx
            .run(async {
                self.access
                    .check_access(ctx.user_id, resource)
                    .await?
                    .require(Capability::Delete)?;

                let snapshot = self.snapshot(resource).await?;
                if !self.resource_repo.delete(resource).await? {
                    return Err(AppError::not_found(format!("Resource {resource} not found")));
                }
                Ok(snapshot)
            })
            .await?;

        info!(user_id = %ctx.user_id, resource = %resource, "Resource deleted");
        self.audit
            .record(ctx, AuditAction::ResourceDeleted, resource, &snapshot)
            .await;
        Ok(())
    }

    async fn snapshot(&self, resource: ResourceRef) -> AppResult<Value> {
        let value = match resource {
            ResourceRef::Card(id) => self
                .resource_repo
                .find_card(id)
                .await?
                .map(serde_json::to_value),
            ResourceRef::Voucher(id) => self
                .resource_repo
                .find_voucher(id)
                .await?
                .map(serde_json::to_value),
            ResourceRef::GiftCard(id) => self
                .resource_repo
                .find_gift_card(id)
                .await?
                .map(serde_json::to_value),
        };
        match value {
            Some(v) => Ok(v?),
            None => Err(AppError::not_found(format!("Resource {resource} not found"))),
        }
    }
}
