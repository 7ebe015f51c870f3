use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for first/last name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("Name must not be empty")]
    Empty,
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error raised by a password-reset token issuer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to issue password reset token: {0}")]
    IssuanceFailed(String),

    #[error("Password reset token storage failed: {0}")]
    StorageFailed(String),
}

/// Error raised by a mail transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("Failed to deliver mail to {recipient}: {reason}")]
    DeliveryFailed { recipient: String, reason: String },
}

/// Top-level error for all account operations.
///
/// Display strings are the messages returned to HTTP clients.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Input validation
    #[error("Username is required")]
    InvalidUsername(#[from] UsernameError),

    #[error("Email is not valid")]
    InvalidEmail(#[from] EmailError),

    #[error("Firstname is required")]
    InvalidFirstname(PersonNameError),

    #[error("Lastname is required")]
    InvalidLastname(PersonNameError),

    #[error("Password is too short")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    #[error("Unable to verify token")]
    InvalidResetToken,

    // Conflicts
    #[error("Username is already taken")]
    UsernameAlreadyExists(String),

    #[error("Email is already taken")]
    EmailAlreadyExists(String),

    // Authentication
    #[error("Wrong credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken(String),

    // Lookups
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("A user with that username or email not found!")]
    NotFoundByLogin(String),

    // Infrastructure errors
    #[error("Unable to process password reset request")]
    PasswordResetUnavailable(String),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<TokenError> for UserError {
    fn from(err: TokenError) -> Self {
        UserError::PasswordResetUnavailable(err.to_string())
    }
}

impl From<MailError> for UserError {
    fn from(err: MailError) -> Self {
        UserError::PasswordResetUnavailable(err.to_string())
    }
}
