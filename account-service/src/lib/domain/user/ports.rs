use async_trait::async_trait;
use auth::IssuedToken;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::ConfirmPasswordResetCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::MailError;
use crate::user::errors::TokenError;
use crate::user::errors::UserError;

/// Port for the account operations exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a fresh bearer token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown login or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, UserError>;

    /// Issue a reset token and mail it to the matching user.
    ///
    /// # Errors
    /// * `NotFoundByLogin` - No user with that username or email
    /// * `PasswordResetUnavailable` - Token issuance or mail delivery failed
    async fn request_password_reset(&self, username_or_email: &str) -> Result<(), UserError>;

    /// Replace a user's password after verifying a reset token.
    ///
    /// # Errors
    /// * `PasswordsDoNotMatch` - Passwords missing or different
    /// * `InvalidResetToken` - Token is invalid, expired or already used
    /// * `NotFound` - User does not exist
    async fn confirm_password_reset(
        &self,
        command: ConfirmPasswordResetCommand,
    ) -> Result<(), UserError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, expired or not a refresh token
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, UserError>;

    /// Retrieve user by identifier, failing when absent.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username unique constraint violated
    /// * `EmailAlreadyExists` - Email unique constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}

/// Issuer of short-lived, single-use password-reset tokens.
#[async_trait]
pub trait PasswordResetTokens: Send + Sync + 'static {
    /// Issue a new reset token bound to `user_id`.
    async fn create_password_reset_token(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Check a token against `user_id`, consuming it when valid.
    ///
    /// # Returns
    /// `true` exactly once per issued token, while unexpired
    async fn validate_password_reset_token(
        &self,
        token: &str,
        user_id: &UserId,
    ) -> Result<bool, TokenError>;
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send password-reset instructions carrying `token` and `user_id`.
    async fn send_reset_mail(
        &self,
        email: &EmailAddress,
        token: &str,
        user_id: &UserId,
    ) -> Result<(), MailError>;
}
