use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// PHC string (`$argon2id$...`) for storing in `users.password_hash`.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow::anyhow!("stored password hash is malformed: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_password_verifies_against_its_hash() {
        let hash = hash_password("lent2026").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("lent2026", &hash).unwrap());
        assert!(!verify_password("lent2025", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("rice-bowl").unwrap();
        let b = hash_password("rice-bowl").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("rice-bowl", &a).unwrap());
        assert!(verify_password("rice-bowl", &b).unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error_not_a_mismatch() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("stored password hash is malformed"));

        let err = verify_password("anything", "").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("stored password hash is malformed"));
    }
}
