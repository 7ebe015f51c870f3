use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::ledger::ResetTokenLedger;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::PasswordResetTokens;
use crate::user::errors::TokenError;

/// Password-reset tokens as signed JWTs whose IDs are tracked in a ledger.
pub struct SignedResetTokens<L>
where
    L: ResetTokenLedger,
{
    authenticator: Arc<Authenticator>,
    ledger: Arc<L>,
    lifetime: Duration,
}

impl<L> SignedResetTokens<L>
where
    L: ResetTokenLedger,
{
    pub fn new(authenticator: Arc<Authenticator>, ledger: Arc<L>, lifetime: Duration) -> Self {
        Self {
            authenticator,
            ledger,
            lifetime,
        }
    }
}

#[async_trait]
impl<L> PasswordResetTokens for SignedResetTokens<L>
where
    L: ResetTokenLedger,
{
    async fn create_password_reset_token(&self, user_id: &UserId) -> Result<String, TokenError> {
        let issued = self
            .authenticator
            .issue_token(&user_id.to_string(), TokenKind::PasswordReset, self.lifetime)
            .map_err(|e| TokenError::IssuanceFailed(e.to_string()))?;

        let jti = Uuid::parse_str(&issued.claims.jti)
            .map_err(|e| TokenError::IssuanceFailed(e.to_string()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(issued.claims.exp, 0)
            .ok_or_else(|| TokenError::IssuanceFailed("expiration out of range".to_string()))?;

        self.ledger.record(jti, user_id, expires_at).await?;

        Ok(issued.token)
    }

    async fn validate_password_reset_token(
        &self,
        token: &str,
        user_id: &UserId,
    ) -> Result<bool, TokenError> {
        let claims = match self
            .authenticator
            .validate_token(token, TokenKind::PasswordReset)
        {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "Reset token failed verification");
                return Ok(false);
            }
        };

        if claims.sub != user_id.to_string() {
            return Ok(false);
        }

        let Ok(jti) = Uuid::parse_str(&claims.jti) else {
            return Ok(false);
        };

        self.ledger.consume(jti, user_id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use auth::TokenLifetimes;

    use super::*;
    use crate::outbound::reset_tokens::ledger::InMemoryResetTokenLedger;

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(
            b"test_secret_key_at_least_32_bytes!",
            TokenLifetimes::default(),
        ))
    }

    fn tokens(lifetime: Duration) -> SignedResetTokens<InMemoryResetTokenLedger> {
        SignedResetTokens::new(
            authenticator(),
            Arc::new(InMemoryResetTokenLedger::new()),
            lifetime,
        )
    }

    #[tokio::test]
    async fn test_token_is_single_use() {
        let tokens = tokens(Duration::minutes(30));
        let user_id = UserId::new();

        let token = tokens.create_password_reset_token(&user_id).await.unwrap();

        assert!(tokens
            .validate_password_reset_token(&token, &user_id)
            .await
            .unwrap());
        assert!(!tokens
            .validate_password_reset_token(&token, &user_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_token_bound_to_user() {
        let tokens = tokens(Duration::minutes(30));
        let user_id = UserId::new();

        let token = tokens.create_password_reset_token(&user_id).await.unwrap();

        assert!(!tokens
            .validate_password_reset_token(&token, &UserId::new())
            .await
            .unwrap());
        // The failed attempt does not consume the token
        assert!(tokens
            .validate_password_reset_token(&token, &user_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let tokens = tokens(Duration::minutes(-5));
        let user_id = UserId::new();

        let token = tokens.create_password_reset_token(&user_id).await.unwrap();

        assert!(!tokens
            .validate_password_reset_token(&token, &user_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_access_token_rejected() {
        let tokens = tokens(Duration::minutes(30));
        let user_id = UserId::new();
        let pair = authenticator()
            .issue_token_pair(&user_id.to_string())
            .unwrap();

        assert!(!tokens
            .validate_password_reset_token(&pair.access_token, &user_id)
            .await
            .unwrap());
        assert!(!tokens
            .validate_password_reset_token("garbage", &user_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unrecorded_token_rejected() {
        let tokens = tokens(Duration::minutes(30));
        let user_id = UserId::new();

        // Correctly signed but never recorded in this ledger
        let issued = authenticator()
            .issue_token(
                &user_id.to_string(),
                TokenKind::PasswordReset,
                Duration::minutes(30),
            )
            .unwrap();

        assert!(!tokens
            .validate_password_reset_token(&issued.token, &user_id)
            .await
            .unwrap());
    }
}
