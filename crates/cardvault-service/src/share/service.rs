//! Share CRUD service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use cardvault_auth::{AccessResolver, Capability};
use cardvault_core::error::AppError;
use cardvault_core::events::AuditAction;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceKind, ResourceRef, ShareId, UserId};
use cardvault_database::repositories::{ShareRepository, UserRepository};
use cardvault_entity::share::{NewShare, Share, ShareCapabilities};
use cardvault_entity::user::User;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Who a resource is being shared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareRecipient {
    /// Look the recipient up by email address.
    Email(String),
    /// A known user ID.
    User(UserId),
}

/// Manages share creation, update, revocation, and listing.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share repository.
    share_repo: Arc<dyn ShareRepository>,
    /// User directory for recipient lookup.
    user_repo: Arc<dyn UserRepository>,
    /// Permission checks.
    access: AccessResolver,
    /// Audit trail.
    audit: AuditRecorder,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        share_repo: Arc<dyn ShareRepository>,
        user_repo: Arc<dyn UserRepository>,
        access: AccessResolver,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            share_repo,
            user_repo,
            access,
            audit,
        }
    }

    /// Shares `resource` with `recipient`.
    ///
    /// Only the owner may share. Voucher shares are stored read-only
    /// whatever `capabilities` says; for other kinds the capability
    /// variant must match the resource kind.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
        recipient: ShareRecipient,
        capabilities: ShareCapabilities,
    ) -> AppResult<Share> {
        let share = ctx
            .run(async {
                self.access
                    .check_access(ctx.user_id, resource)
                    .await?
                    .require(Capability::Own)?;

                let capabilities = capabilities
                    .normalized_for(resource.kind())
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Capabilities for a {} cannot be applied to a {}",
                            capabilities.kind(),
                            resource.kind()
                        ))
                    })?;

                let recipient = self.find_recipient(&recipient).await?;
                if recipient.id == ctx.user_id {
                    return Err(AppError::validation("Cannot share a resource with yourself"));
                }

                self.share_repo
                    .create(&NewShare {
                        resource,
                        shared_with: recipient.id,
                        capabilities,
                    })
                    .await
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource = %resource,
            shared_with = %share.shared_with,
            "Share created"
        );
        self.audit
            .record(ctx, AuditAction::ShareCreated, resource, &share)
            .await;

        Ok(share)
    }

    /// Replaces the capability bits of a card or gift card share.
    pub async fn update_share(
        &self,
        ctx: &RequestContext,
        share_id: ShareId,
        capabilities: ShareCapabilities,
    ) -> AppResult<Share> {
        let share = ctx
            .run(async {
                let existing = self.load_share(share_id).await?;
                self.access
                    .check_access(ctx.user_id, existing.resource)
                    .await?
                    .require(Capability::Own)?;

                let kind = existing.resource.kind();
                if kind == ResourceKind::Voucher {
                    return Err(AppError::validation(
                        "Voucher shares are read-only and cannot be updated",
                    ));
                }
                if capabilities.kind() != kind {
                    return Err(AppError::validation(format!(
                        "Capabilities for a {} cannot be applied to a {kind}",
                        capabilities.kind()
                    )));
                }

                self.share_repo
                    .update_capabilities(share_id, capabilities)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Share {share_id} not found")))
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            capabilities = ?share.capabilities,
            "Share updated"
        );
        self.audit
            .record(ctx, AuditAction::ShareUpdated, share.resource, &share)
            .await;

        Ok(share)
    }

    /// Revokes a share. The owner may revoke any share of the resource;
    /// a recipient may revoke their own share.
    pub async fn revoke_share(&self, ctx: &RequestContext, share_id: ShareId) -> AppResult<()> {
        let share = ctx
            .run(async {
                let share = self.load_share(share_id).await?;
                if share.shared_with != ctx.user_id {
                    self.access
                        .check_access(ctx.user_id, share.resource)
                        .await?
                        .require(Capability::Own)?;
                }

                if !self.share_repo.delete(share_id).await? {
                    return Err(AppError::not_found(format!("Share {share_id} not found")));
                }
                Ok(share)
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource = %share.resource,
            "Share revoked"
        );
        self.audit
            .record(ctx, AuditAction::ShareRevoked, share.resource, &share)
            .await;

        Ok(())
    }

    /// Lists every share of `resource`, oldest first. Owner only.
    pub async fn list_shares(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
    ) -> AppResult<Vec<Share>> {
        ctx.run(async {
            self.access
                .check_access(ctx.user_id, resource)
                .await?
                .require(Capability::Own)?;
            self.share_repo.list_for_resource(resource).await
        })
        .await
    }

    /// Lists shares granted to the caller, optionally of one kind.
    pub async fn list_shared_with_me(
        &self,
        ctx: &RequestContext,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Share>> {
        ctx.run(self.share_repo.list_shared_with(ctx.user_id, kind))
            .await
    }

    async fn load_share(&self, share_id: ShareId) -> AppResult<Share> {
        self.share_repo
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share {share_id} not found")))
    }

    async fn find_recipient(&self, recipient: &ShareRecipient) -> AppResult<User> {
        let user = match recipient {
            ShareRecipient::Email(email) => self.user_repo.find_by_email(email).await?,
            ShareRecipient::User(id) => self.user_repo.find_by_id(*id).await?,
        };
        user.ok_or_else(|| match recipient {
            ShareRecipient::Email(email) => {
                AppError::user_not_found(format!("No user with email '{email}'"))
            }
            ShareRecipient::User(id) => AppError::user_not_found(format!("User {id} not found")),
        })
    }
}
