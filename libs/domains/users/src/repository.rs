use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::changeset::ChangeSet;
use crate::error::{UserError, UserResult};
use crate::filter::NormalizedFilters;
use crate::models::User;

/// One window of matching users plus the total they were drawn from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_count: u64,
}

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a fully built user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// List matching users, newest first
    async fn list(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>>;

    /// Count matching users, ignoring pagination
    async fn count(&self, filters: &NormalizedFilters) -> UserResult<u64>;

    /// Count and fetch one window against the same snapshot. The fetch is
    /// skipped when `offset` is at or past the total.
    async fn list_page(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<UserPage>;

    /// Apply a change set; `NotFound` if the user does not exist
    async fn update(&self, id: Uuid, changes: &ChangeSet) -> UserResult<User>;

    /// Delete a user by ID, returning whether anything was removed
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(UserError::Persistence(format!(
                "User {} already exists",
                user.id
            )));
        }
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(window(matching(&users, filters), offset, limit))
    }

    async fn count(&self, filters: &NormalizedFilters) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| filters.matches(u)).count() as u64)
    }

    async fn list_page(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<UserPage> {
        let users = self.users.read().await;
        let matched = matching(&users, filters);
        let total_count = matched.len() as u64;

        Ok(UserPage {
            users: window(matched, offset, limit),
            total_count,
        })
    }

    async fn update(&self, id: Uuid, changes: &ChangeSet) -> UserResult<User> {
        let mut users = self.users.write().await;

        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        changes.apply_to(user);

        tracing::info!(user_id = %id, fields = changes.len(), "Updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        let deleted = users.remove(&id).is_some();

        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }

        Ok(deleted)
    }
}

/// Matching users, newest first; v7 ids break ties in creation order
fn matching(users: &HashMap<Uuid, User>, filters: &NormalizedFilters) -> Vec<User> {
    let mut result: Vec<User> = users
        .values()
        .filter(|u| filters.matches(u))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    result
}

fn window(users: Vec<User>, offset: u64, limit: u64) -> Vec<User> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    users.into_iter().skip(offset).take(limit).collect()
}
