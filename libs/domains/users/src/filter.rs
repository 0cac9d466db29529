//! Listing filters.
//!
//! Raw query values are normalized once into [`NormalizedFilters`], which both
//! repository implementations consume: the in-memory store through
//! [`Contains::matches`] and PostgreSQL through [`Contains::like_pattern`].

/// Case-insensitive substring predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    needle: String,
}

impl Contains {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle })
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Matches against the trimmed, lowercased stored value.
    pub fn matches(&self, stored: &str) -> bool {
        stored.trim().to_lowercase().contains(&self.needle)
    }

    /// `LIKE` pattern for the needle, with `\`, `%` and `_` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);
        pattern.push('%');
        for c in self.needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Canonical filter set for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFilters {
    pub first_name: Option<Contains>,
    pub last_name: Option<Contains>,
}

impl NormalizedFilters {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }

    pub fn matches(&self, user: &crate::models::User) -> bool {
        let first = self
            .first_name
            .as_ref()
            .is_none_or(|f| f.matches(&user.first_name));
        let last = self
            .last_name
            .as_ref()
            .is_none_or(|f| f.matches(&user.last_name));
        first && last
    }
}

/// Normalize raw filter input. Never fails; blank input means "no filter".
pub fn normalize(first_name: &str, last_name: &str) -> NormalizedFilters {
    NormalizedFilters {
        first_name: Contains::new(first_name),
        last_name: Contains::new(last_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateUser, User};

    fn user(first: &str, last: &str) -> User {
        User::new(CreateUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
        })
    }

    #[test]
    fn test_blank_input_is_no_filter() {
        let filters = normalize("", "   ");
        assert!(filters.is_empty());
        assert!(filters.matches(&user("Tom", "Jones")));
    }

    #[test]
    fn test_needle_is_trimmed_and_lowercased() {
        let filter = Contains::new("  AnN ").unwrap();
        assert_eq!(filter.needle(), "ann");
    }

    #[test]
    fn test_first_name_substring_match() {
        let filters = normalize("ann", "");

        assert!(filters.matches(&user("Anna", "Smith")));
        assert!(filters.matches(&user("Joanna", "Smith")));
        assert!(!filters.matches(&user("Tom", "Smith")));
    }

    #[test]
    fn test_both_filters_must_match() {
        let filters = normalize("ann", "SMI");

        assert!(filters.matches(&user("Anna", "Smith")));
        assert!(!filters.matches(&user("Anna", "Jones")));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(Contains::new("ann").unwrap().like_pattern(), "%ann%");
        assert_eq!(
            Contains::new("50%_off\\").unwrap().like_pattern(),
            "%50\\%\\_off\\\\%"
        );
    }
}
