//! bcrypt hashing, run on the blocking pool so request handlers stay responsive.

use crate::database::StoreError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, StoreError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| StoreError::Hash(e.to_string()))?
        .map_err(|e| StoreError::Hash(e.to_string()))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("password123", 4).await.unwrap();
        assert!(verify_password("password123", &hash).await);
        assert!(!verify_password("wrong", &hash).await);
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        assert!(!verify_password("password123", "not-a-hash").await);
    }
}
