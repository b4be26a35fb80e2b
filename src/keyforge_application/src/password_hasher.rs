use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use keyforge_core::Password;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Failed to compute password hash: {0}")]
    Unexpected(String),
}

/// Argon2id password hashing. Stateless; hashing and verification run on
/// the blocking pool so the async scheduler is never stalled by the
/// memory-hard computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Produces a salted PHC-encoded hash. Failure here means the hashing
    /// environment is broken, not that the input was bad.
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    pub async fn hash(&self, password: Password) -> Result<Secret<String>, PasswordHashError> {
        let current_span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let salt = SaltString::generate(rand_core::OsRng);
                Argon2::new(
                    Algorithm::Argon2id,
                    Version::V0x13,
                    Params::new(15000, 2, 1, None)
                        .map_err(|e| PasswordHashError::Unexpected(e.to_string()))?,
                )
                .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                .map(|hash| Secret::from(hash.to_string()))
                .map_err(|e| PasswordHashError::Unexpected(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHashError::Unexpected(e.to_string()))?
    }

    /// Recomputes with the parameters embedded in `stored_hash` and compares
    /// in constant time. Any mismatch, including a malformed stored hash,
    /// comes back as `false` rather than an error.
    #[tracing::instrument(name = "Verifying password hash", skip_all)]
    pub async fn verify(&self, candidate: Password, stored_hash: Secret<String>) -> bool {
        let current_span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let Ok(expected) = PasswordHash::new(stored_hash.expose_secret()) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(candidate.as_ref().expose_secret().as_bytes(), &expected)
                    .is_ok()
            })
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> Password {
        Password::parse(Secret::from(raw.to_owned())).unwrap()
    }

    #[tokio::test]
    async fn hash_verifies_against_original_plaintext() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash(password("Abc12345!")).await.unwrap();
        assert!(hasher.verify(password("Abc12345!"), hash).await);
    }

    #[tokio::test]
    async fn hash_never_equals_the_plaintext() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash(password("Abc12345!")).await.unwrap();
        assert_ne!(hash.expose_secret(), "Abc12345!");
        assert!(hash.expose_secret().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn two_hashes_of_the_same_password_differ() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash(password("Abc12345!")).await.unwrap();
        let second = hasher.hash(password("Abc12345!")).await.unwrap();
        assert_ne!(first.expose_secret(), second.expose_secret());
    }

    #[tokio::test]
    async fn wrong_password_fails_verification() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash(password("Abc12345!")).await.unwrap();
        assert!(!hasher.verify(password("Xyz98765?"), hash).await);
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_a_mismatch_not_an_error() {
        let hasher = PasswordHasher::new();
        assert!(
            !hasher
                .verify(password("Abc12345!"), Secret::from("not-a-hash".to_owned()))
                .await
        );
    }
}
