use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::pagination::PageMeta;

/// User entity - a person managed by this service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, assigned on creation
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Contact email (stored as given)
    pub email: Option<String>,
    /// Contact phone (stored as given)
    pub phone: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user with a fresh identity from validated input.
    ///
    /// Names are trimmed; blank email/phone are stored as absent.
    pub fn new(input: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: non_blank(input.email),
            phone: non_blank(input.phone),
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub phone: Option<String>,
}

/// DTO for a partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUser {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub phone: Option<String>,
}

/// Query parameters for listing users.
///
/// `page` and `limit` are kept as raw strings: a non-numeric value falls
/// back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Case-insensitive substring match on first name
    pub first_name: Option<String>,
    /// Case-insensitive substring match on last name
    pub last_name: Option<String>,
    /// 1-based page number (default 1)
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Page size (default 10, capped)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListUsersResponse {
    pub data: Vec<User>,
    pub meta: PageMeta,
}
