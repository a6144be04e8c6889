use chrono::{DateTime, Utc};

use storecms_core::{AdminId, DomainError, DomainResult};

/// An admin account. Admins own stores; there is no role hierarchy —
/// ownership is the authorization boundary.
///
/// # Invariants
/// - Email is stored trimmed and lowercased; it must look like an email.
/// - Username is non-empty after trimming.
/// - `password_hash` is an argon2 PHC string, never the raw password.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }

        Ok(Self {
            id: AdminId::new(),
            username,
            email: normalize_email(email.into())?,
            password_hash: password_hash.into(),
            created_at,
        })
    }
}

/// Trim + lowercase, with a basic shape check.
pub fn normalize_email(email: String) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_admin_normalizes_email() {
        let admin = Admin::new("alice", "  Alice@Example.COM ", "$argon2$x", Utc::now()).unwrap();
        assert_eq!(admin.email, "alice@example.com");
        assert_eq!(admin.username, "alice");
    }

    #[test]
    fn create_admin_rejects_bad_email() {
        let result = Admin::new("alice", "not-an-email", "$argon2$x", Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_admin_rejects_blank_username() {
        let result = Admin::new("  ", "alice@example.com", "$argon2$x", Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
