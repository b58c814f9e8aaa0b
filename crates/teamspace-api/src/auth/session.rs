//! Opaque session tokens
//!
//! The raw token only travels to the client; the backend stores its SHA-256
//! hex digest.

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use teamspace_core::models::Session;
use teamspace_core::AppError;
use teamspace_db::SessionStore;
use uuid::Uuid;

const TOKEN_BYTES: usize = 32;

/// 32 random bytes, hex encoded
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issued session: the raw token for the client and the stored record
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Create a session for `user_id` that expires after `ttl_hours`.
pub async fn open_session(
    sessions: &dyn SessionStore,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<IssuedSession, AppError> {
    let token = generate_session_token();
    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("Session TTL out of range: {}h", ttl_hours)))?;
    let session = sessions
        .create_session(user_id, &hash_session_token(&token), expires_at)
        .await?;

    tracing::debug!(user_id = %user_id, session_id = %session.id, "Session opened");
    Ok(IssuedSession { token, session })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_session_token());
    }

    #[tokio::test]
    async fn out_of_range_ttl_is_an_error() {
        let store = teamspace_db::MemoryStore::new();
        let err = open_session(&store, Uuid::new_v4(), i64::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        let issued = open_session(&store, Uuid::new_v4(), 1).await.unwrap();
        assert!(issued.session.expires_at > Utc::now());
    }

    #[test]
    fn hash_is_stable_sha256_hex() {
        assert_eq!(
            hash_session_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
