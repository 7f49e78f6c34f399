use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::UserId;
use cardvault_entity::user::model::{CreateUser, User, normalize_email};

use super::MemoryStore;
use crate::repositories::UserRepository;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.state.emails.get(&normalize_email(email)).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        match self.state.emails.entry(normalize_email(&data.email)) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "A user with email '{}' already exists",
                data.email.trim()
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    id: UserId::new(),
                    email: data.email.trim().to_string(),
                    display_name: data.display_name.clone(),
                    created_at: Utc::now(),
                };
                slot.insert(user.id);
                self.state.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }
}
