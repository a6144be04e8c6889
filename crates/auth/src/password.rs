use argon2::{Argon2, PasswordHasher};
use password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least 8 characters")]
    Weak,

    #[error(transparent)]
    Hash(#[from] password_hash::Error),
}

/// Signup-time password policy.
pub fn validate_policy(password: &str) -> Result<(), PasswordError> {
    if password.len() < 8 {
        return Err(PasswordError::Weak);
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_short() {
        assert!(matches!(validate_policy("short"), Err(PasswordError::Weak)));
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        validate_policy("correct horse battery").unwrap();
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
