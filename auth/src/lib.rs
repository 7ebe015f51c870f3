//! Authentication utilities library
//!
//! Provides the credential primitives used by the account service:
//! - Password hashing (Argon2id)
//! - JWT encoding and decoding with typed claims
//! - Bearer token pair issuance (access + refresh) and single-purpose tokens
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Login Flow
//! ```
//! use auth::{Authenticator, TokenKind, TokenLifetimes};
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     TokenLifetimes::default(),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a bearer pair
//! auth.verify_password("password123", &hash).unwrap();
//! let pair = auth.issue_token_pair("user123").unwrap();
//! assert_eq!(pair.token_type, "bearer");
//!
//! // Validate the access token
//! let claims = auth.validate_token(&pair.access_token, TokenKind::Access).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use authenticator::TokenLifetimes;
pub use authenticator::TokenPair;
pub use authenticator::BEARER;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
