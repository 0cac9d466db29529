use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::changeset;
use crate::error::{UserError, UserResult};
use crate::events::{TracingEventSink, UserEvent, UserEventSink};
use crate::filter;
use crate::models::{CreateUser, ListUsersQuery, UpdateUser, User};
use crate::pagination::{PageLimits, PageMeta, PageRequest, PageWindow};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    events: Arc<dyn UserEventSink>,
    limits: PageLimits,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            events: Arc::new(TracingEventSink),
            limits: PageLimits::default(),
        }
    }

    pub fn with_event_sink(mut self, sink: impl UserEventSink) -> Self {
        self.events = Arc::new(sink);
        self
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    /// Create a new user; blank names are rejected before anything is stored
    #[instrument(name = "users.create", skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if input.first_name.trim().is_empty() {
            return Err(UserError::Validation(
                "first_name must not be empty".to_string(),
            ));
        }
        if input.last_name.trim().is_empty() {
            return Err(UserError::Validation(
                "last_name must not be empty".to_string(),
            ));
        }

        let user = self.repository.create(User::new(input)).await?;

        self.events.emit(&UserEvent::Created {
            id: user.id,
            at: user.created_at,
        });
        Ok(user)
    }

    /// Get a user by ID
    #[instrument(name = "users.get", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// List users matching the query, newest first.
    ///
    /// The total and the window come from one repository snapshot, so the
    /// metadata always describes the rows returned.
    #[instrument(name = "users.list", skip(self, query))]
    pub async fn list_users(&self, query: ListUsersQuery) -> UserResult<(Vec<User>, PageMeta)> {
        let filters = filter::normalize(
            query.first_name.as_deref().unwrap_or_default(),
            query.last_name.as_deref().unwrap_or_default(),
        );
        let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());

        let window = PageWindow::resolve(request, &self.limits);

        let page = self
            .repository
            .list_page(&filters, window.offset, window.limit)
            .await?;
        let meta = window.meta(page.total_count);

        tracing::debug!(
            total_count = page.total_count,
            page = meta.page,
            returned = page.users.len(),
            "Listed users"
        );
        Ok((page.users, meta))
    }

    /// Apply a partial update
    #[instrument(name = "users.update", skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let changes = changeset::merge(&input)?;

        let user = self.repository.update(id, &changes).await?;

        if !changes.is_empty() {
            self.events.emit(&UserEvent::Updated {
                id,
                fields: changes.fields(),
                at: user.updated_at,
            });
        }
        Ok(user)
    }

    /// Delete a user
    #[instrument(name = "users.delete", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        self.events.emit(&UserEvent::Deleted { id, at: Utc::now() });
        Ok(())
    }
}
