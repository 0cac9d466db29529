//! Users Domain
//!
//! This module provides a complete domain implementation for managing users:
//! create, fetch, filtered and paginated listing, partial update and delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, filters, pagination, change sets, events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory / PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! // Create repository and service
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod changeset;
pub mod entity;
pub mod error;
pub mod events;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use changeset::{ChangeSet, UserField};
pub use error::{UserError, UserResult};
pub use events::{RecordingEventSink, TracingEventSink, UserEvent, UserEventSink};
pub use filter::{Contains, NormalizedFilters};
pub use models::{CreateUser, ListUsersQuery, ListUsersResponse, UpdateUser, User};
pub use pagination::{PageLimits, PageMeta, PageRequest, PageWindow, Pagination};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserPage, UserRepository};
pub use service::UserService;
