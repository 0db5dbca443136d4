use std::sync::Arc;

use auth::PasswordHasher;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Password;

/// Runs Argon2 work on the blocking thread pool.
#[derive(Clone)]
pub struct BlockingHasher {
    hasher: Arc<PasswordHasher>,
}

impl BlockingHasher {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            hasher: Arc::new(hasher),
        }
    }

    /// Hash a plaintext password.
    ///
    /// # Errors
    /// * `Hashing` - Argon2 rejected the input
    /// * `Unknown` - Blocking task panicked or was cancelled
    pub async fn hash(&self, password: &Password) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Task join error: {}", e)))?
            .map_err(UserError::from)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A failed blocking task counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                false
            })
    }
}

impl Default for BlockingHasher {
    fn default() -> Self {
        Self::new(PasswordHasher::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = BlockingHasher::default();
        let password = Password::new("pass_word!".to_string()).unwrap();

        let hash = hasher.hash(&password).await.unwrap();

        assert_ne!(hash, "pass_word!");
        assert!(hasher.verify("pass_word!", &hash).await);
        assert!(!hasher.verify("pass_word?", &hash).await);
        assert!(!hasher.verify("", &hash).await);
    }
}
