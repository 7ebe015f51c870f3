use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::user::models::UserId;
use crate::user::errors::TokenError;

/// Record of issued reset tokens, keyed by JWT ID.
///
/// The signature proves a token was minted here; the ledger makes it
/// single-use.
#[async_trait]
pub trait ResetTokenLedger: Send + Sync + 'static {
    /// Remember a freshly issued token, dropping consumed and expired entries.
    async fn record(
        &self,
        jti: Uuid,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenError>;

    /// Atomically mark an unconsumed, unexpired entry as consumed.
    ///
    /// # Returns
    /// `true` if this call consumed the entry
    async fn consume(
        &self,
        jti: Uuid,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError>;
}

pub struct PostgresResetTokenLedger {
    pool: PgPool,
}

impl PostgresResetTokenLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResetTokenLedger for PostgresResetTokenLedger {
    async fn record(
        &self,
        jti: Uuid,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenError> {
        sqlx::query(
            r#"
            DELETE FROM password_reset_tokens
            WHERE consumed_at IS NOT NULL OR expires_at <= $1
            "#,
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| TokenError::StorageFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(jti)
        .bind(user_id.0)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TokenError::StorageFailed(e.to_string()))?;

        Ok(())
    }

    async fn consume(
        &self,
        jti: Uuid,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        let result = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET consumed_at = $3
            WHERE jti = $1
              AND user_id = $2
              AND consumed_at IS NULL
              AND expires_at > $3
            "#,
        )
        .bind(jti)
        .bind(user_id.0)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| TokenError::StorageFailed(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

#[derive(Default)]
pub struct InMemoryResetTokenLedger {
    entries: Mutex<HashMap<Uuid, LedgerEntry>>,
}

impl InMemoryResetTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResetTokenLedger for InMemoryResetTokenLedger {
    async fn record(
        &self,
        jti: Uuid,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenError> {
        let mut entries = self.entries.lock().await;
        let now = Utc::now();
        entries.retain(|_, entry| !entry.consumed && entry.expires_at > now);

        if entries.contains_key(&jti) {
            return Err(TokenError::StorageFailed(format!("duplicate jti {}", jti)));
        }

        entries.insert(
            jti,
            LedgerEntry {
                user_id: *user_id,
                expires_at,
                consumed: false,
            },
        );
        Ok(())
    }

    async fn consume(
        &self,
        jti: Uuid,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        let mut entries = self.entries.lock().await;

        match entries.get_mut(&jti) {
            Some(entry)
                if entry.user_id == *user_id && !entry.consumed && entry.expires_at > now =>
            {
                entry.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
