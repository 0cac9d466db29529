//! Partial-update merging.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};
use utoipa::ToSchema;

use crate::error::{UserError, UserResult};
use crate::models::{UpdateUser, User};

/// Mutable user fields
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    Phone,
}

/// Sparse set of field changes for a single user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeMap<UserField, String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: UserField) -> Option<&str> {
        self.changes.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserField, &str)> {
        self.changes.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn fields(&self) -> Vec<UserField> {
        self.changes.keys().copied().collect()
    }

    /// Apply the changes in place. `updated_at` is only touched when
    /// something changes.
    pub fn apply_to(&self, user: &mut User) {
        if self.is_empty() {
            return;
        }

        for (field, value) in self.iter() {
            match field {
                UserField::FirstName => user.first_name = value.to_string(),
                UserField::LastName => user.last_name = value.to_string(),
                UserField::Email => user.email = Some(value.to_string()),
                UserField::Phone => user.phone = Some(value.to_string()),
            }
        }
        user.updated_at = Utc::now();
    }
}

/// Build the minimal change set for an update request.
///
/// A present but blank first or last name is rejected. Blank email or phone
/// values are dropped, never written.
pub fn merge(input: &UpdateUser) -> UserResult<ChangeSet> {
    let mut changes = BTreeMap::new();

    let required = [
        (UserField::FirstName, &input.first_name),
        (UserField::LastName, &input.last_name),
    ];
    for (field, value) in required {
        if let Some(value) = value {
            let value = value.trim();
            if value.is_empty() {
                return Err(UserError::Validation(format!("{} must not be empty", field)));
            }
            changes.insert(field, value.to_string());
        }
    }

    let optional = [
        (UserField::Email, &input.email),
        (UserField::Phone, &input.phone),
    ];
    for (field, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            changes.insert(field, value.to_string());
        }
    }

    Ok(ChangeSet { changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_email_only() {
        let cs = merge(&UpdateUser {
            email: some("new@example.com"),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(cs.fields(), vec![UserField::Email]);
        assert_eq!(cs.get(UserField::Email), Some("new@example.com"));
    }

    #[test]
    fn test_blank_first_name_rejected() {
        let err = merge(&UpdateUser {
            first_name: some("   "),
            email: some("x@y.z"),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, UserError::Validation(msg) if msg.contains("first_name")));
    }

    #[test]
    fn test_blank_last_name_rejected() {
        let result = merge(&UpdateUser {
            last_name: some(""),
            ..Default::default()
        });
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[test]
    fn test_blank_contacts_ignored() {
        let cs = merge(&UpdateUser {
            email: some(""),
            phone: some("  "),
            ..Default::default()
        })
        .unwrap();
        assert!(cs.is_empty());
    }

    #[test]
    fn test_apply_to_only_touches_present_fields() {
        let mut user = User::new(CreateUser {
            first_name: "Anna".to_string(),
            last_name: "Smith".to_string(),
            email: some("old@example.com"),
            phone: some("123"),
        });
        let before = user.clone();

        let cs = merge(&UpdateUser {
            last_name: some(" Jones "),
            ..Default::default()
        })
        .unwrap();
        cs.apply_to(&mut user);

        assert_eq!(user.last_name, "Jones");
        assert_eq!(user.first_name, before.first_name);
        assert_eq!(user.email, before.email);
        assert_eq!(user.phone, before.phone);
        assert!(user.updated_at >= before.updated_at);
    }

    #[test]
    fn test_empty_change_set_is_noop() {
        let mut user = User::new(CreateUser {
            first_name: "Anna".to_string(),
            last_name: "Smith".to_string(),
            email: None,
            phone: None,
        });
        let before = user.clone();

        ChangeSet::default().apply_to(&mut user);
        assert_eq!(user, before);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(UserField::FirstName.to_string(), "first_name");
        assert_eq!(UserField::Phone.as_ref(), "phone");
    }
}
