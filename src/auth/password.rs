use std::sync::OnceLock;

use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hash `plain` with Argon2id and a fresh salt; the result is a PHC string.
pub fn hash(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash error");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// Check `plain` against a stored PHC string. Errors only on a corrupt hash.
pub fn verify(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Burn the same work as a real check, for usernames that do not exist.
pub fn verify_dummy(plain: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    if let Some(stored) = DUMMY.get_or_init(|| hash("dummy-password").ok()) {
        let _ = verify(plain, stored);
    }
}

// Run Argon2 on the blocking pool, off the async workers.

pub async fn hash_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash(&plain))
        .await
        .context("password hash task")?
}

pub async fn verify_blocking(plain: String, stored: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify(&plain, &stored))
        .await
        .context("password verify task")?
}

pub async fn verify_dummy_blocking(plain: String) {
    let _ = tokio::task::spawn_blocking(move || verify_dummy(&plain)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_not_the_password() {
        let stored = hash("p@ss").unwrap();
        assert_ne!(stored, "p@ss");
        assert!(stored.starts_with("$argon2"));
        assert!(verify("p@ss", &stored).unwrap());
        assert!(!verify("p@sS", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash("hunter22").unwrap(), hash("hunter22").unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert!(verify("anything", "plaintext-from-an-old-row").is_err());
    }

    #[tokio::test]
    async fn blocking_wrappers_agree_with_sync_versions() {
        let stored = hash_blocking("p@ss".to_string()).await.unwrap();
        assert!(verify_blocking("p@ss".into(), stored.clone()).await.unwrap());
        assert!(!verify_blocking("nope".into(), stored).await.unwrap());
        assert!(verify_blocking("p@ss".into(), "garbage".into()).await.is_err());
        verify_dummy_blocking("x".into()).await;
    }

    #[test]
    fn dummy_verification_does_not_panic() {
        verify_dummy("whatever");
        verify_dummy("");
    }
}
