use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenKind;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token type reported alongside every issued pair.
pub const BEARER: &str = "bearer";

/// Lifetimes of the tokens minted at login.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(30),
        }
    }
}

/// Authentication coordinator combining password verification and JWT issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

/// Bearer credentials returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// A signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `lifetimes` - Access and refresh token lifetimes
    pub fn new(jwt_secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            lifetimes,
        }
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a fresh access/refresh pair for a subject.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        let access = self.issue_token(subject, TokenKind::Access, self.lifetimes.access)?;
        let refresh = self.issue_token(subject, TokenKind::Refresh, self.lifetimes.refresh)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: BEARER.to_string(),
        })
    }

    /// Mint a single token of the given kind.
    pub fn issue_token(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::issue(subject, kind, ttl);
        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken { token, claims })
    }

    /// Exchange a refresh token for a new access token.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<IssuedToken, JwtError> {
        let claims = self.validate_token(refresh_token, TokenKind::Refresh)?;
        self.issue_token(&claims.sub, TokenKind::Access, self.lifetimes.access)
    }

    /// Validate and decode a token, requiring a specific kind.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `WrongKind` - Token was minted for another purpose
    /// * `DecodingFailed` - Signature invalid or token malformed
    pub fn validate_token(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.jwt_handler.decode(token)?;

        if claims.kind != expected {
            return Err(JwtError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(
            b"test_secret_key_at_least_32_bytes!",
            TokenLifetimes::default(),
        )
    }

    #[test]
    fn test_verify_password_success() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("secret1").unwrap();

        assert_eq!(authenticator.verify_password("secret1", &hash), Ok(()));
    }

    #[test]
    fn test_verify_password_invalid() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("secret1").unwrap();

        assert_eq!(
            authenticator.verify_password("wrongpw", &hash),
            Err(AuthenticationError::InvalidCredentials)
        );
    }

    #[test]
    fn test_issue_token_pair() {
        let authenticator = authenticator();

        let pair = authenticator.issue_token_pair("user123").unwrap();
        assert_eq!(pair.token_type, "bearer");
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = authenticator
            .validate_token(&pair.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(access.sub, "user123");

        let refresh = authenticator
            .validate_token(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.sub, "user123");
    }

    #[test]
    fn test_successive_pairs_differ() {
        let authenticator = authenticator();

        let first = authenticator.issue_token_pair("user123").unwrap();
        let second = authenticator.issue_token_pair("user123").unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_validate_rejects_wrong_kind() {
        let authenticator = authenticator();
        let pair = authenticator.issue_token_pair("user123").unwrap();

        let result = authenticator.validate_token(&pair.refresh_token, TokenKind::Access);
        assert_eq!(
            result,
            Err(JwtError::WrongKind {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            })
        );
    }

    #[test]
    fn test_refresh_access_token() {
        let authenticator = authenticator();
        let pair = authenticator.issue_token_pair("user123").unwrap();

        let issued = authenticator
            .refresh_access_token(&pair.refresh_token)
            .unwrap();
        assert_eq!(issued.claims.sub, "user123");
        assert_eq!(issued.claims.kind, TokenKind::Access);

        // An access token cannot be used to refresh
        assert!(authenticator
            .refresh_access_token(&pair.access_token)
            .is_err());
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here", TokenKind::Access);
        assert!(result.is_err());
    }
}
