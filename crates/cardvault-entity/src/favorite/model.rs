//! Favorite entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cardvault_core::types::{FavoriteId, ResourceKind, ResourceRef, UserId};

/// A user's favorite marker on a resource. Soft-deletable; restoring keeps
/// the original id and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    /// Unique favorite identifier.
    pub id: FavoriteId,
    /// The user who favorited.
    pub user_id: UserId,
    /// Kind of the favorited resource.
    pub resource_kind: ResourceKind,
    /// ID of the favorited resource.
    pub resource_id: Uuid,
    /// When the resource was first favorited.
    pub created_at: DateTime<Utc>,
    /// When the marker was last removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// The favorited resource.
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::from_parts(self.resource_kind, self.resource_id)
    }
}

/// Where a (user, resource) pair sits in the favorite toggle.
#[derive(Debug, Clone)]
pub enum FavoriteState {
    /// No marker has ever been stored.
    Absent,
    /// The resource is favorited.
    Active(Favorite),
    /// A marker exists but was removed.
    SoftDeleted(Favorite),
}

impl FavoriteState {
    /// Classify a stored marker, or its absence.
    pub fn from_row(row: Option<Favorite>) -> Self {
        match row {
            None => Self::Absent,
            Some(f) if f.deleted_at.is_some() => Self::SoftDeleted(f),
            Some(f) => Self::Active(f),
        }
    }

    /// Whether the resource is currently favorited.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}
