use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Purpose a token was minted for.
///
/// Encoded in every token so a refresh or password-reset token can never be
/// replayed where an access token is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    PasswordReset,
}

/// JWT claims carried by every token this crate issues.
///
/// Standard RFC 7519 registered claims plus the token kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID, random per token
    pub jti: String,

    /// What the token may be used for
    pub kind: TokenKind,
}

impl Claims {
    /// Create claims for a subject that expire `ttl` from now.
    ///
    /// A fresh random `jti` is generated, so two tokens minted for the same
    /// subject within the same second still differ.
    pub fn issue(subject: impl ToString, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        }
    }
}
