//! Shared application state.

use domain_users::{PgUserRepository, TracingEventSink, UserService};
use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Cloned into every router that needs it; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    pub users: UserService<PgUserRepository>,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> Self {
        let users = UserService::new(PgUserRepository::new(db.clone()))
            .with_event_sink(TracingEventSink)
            .with_page_limits(config.pagination.limits());

        Self { config, db, users }
    }
}
