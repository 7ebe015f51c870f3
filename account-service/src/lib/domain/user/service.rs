use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::IssuedToken;
use auth::JwtError;
use chrono::Utc;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::ConfirmPasswordResetCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::Mailer;
use crate::user::ports::PasswordResetTokens;
use crate::user::ports::UserRepository;

/// Domain service implementing registration, login and password reset.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR, RT, ML>
where
    UR: UserRepository,
    RT: PasswordResetTokens,
    ML: Mailer,
{
    repository: Arc<UR>,
    reset_tokens: Arc<RT>,
    mailer: Arc<ML>,
    authenticator: Arc<Authenticator>,
}

impl<UR, RT, ML> AuthService<UR, RT, ML>
where
    UR: UserRepository,
    RT: PasswordResetTokens,
    ML: Mailer,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `reset_tokens` - Password-reset token issuer
    /// * `mailer` - Outbound mail transport
    /// * `authenticator` - Password hashing and bearer token issuance
    pub fn new(
        repository: Arc<UR>,
        reset_tokens: Arc<RT>,
        mailer: Arc<ML>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            reset_tokens,
            mailer,
            authenticator,
        }
    }

    /// Email match wins over username match.
    async fn find_by_login(&self, username_or_email: &str) -> Result<Option<User>, UserError> {
        if let Some(user) = self.repository.find_by_email(username_or_email).await? {
            return Ok(Some(user));
        }
        self.repository.find_by_username(username_or_email).await
    }
}

#[async_trait]
impl<UR, RT, ML> AuthServicePort for AuthService<UR, RT, ML>
where
    UR: UserRepository,
    RT: PasswordResetTokens,
    ML: Mailer,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.as_str().to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            firstname: command.firstname,
            lastname: command.lastname,
            password_hash,
            date_joined: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, UserError> {
        let Some(user) = self.find_by_login(&command.username_or_email).await? else {
            tracing::warn!("Login rejected: unknown username or email");
            return Err(UserError::InvalidCredentials);
        };

        match self
            .authenticator
            .verify_password(&command.password, &user.password_hash)
        {
            Ok(()) => {}
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                return Err(UserError::InvalidCredentials);
            }
            Err(AuthenticationError::PasswordError(e)) => return Err(e.into()),
            Err(AuthenticationError::JwtError(e)) => return Err(e.into()),
        }

        let tokens = self.authenticator.issue_token_pair(&user.id.to_string())?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedUser { user, tokens })
    }

    async fn request_password_reset(&self, username_or_email: &str) -> Result<(), UserError> {
        let user = self
            .find_by_login(username_or_email)
            .await?
            .ok_or_else(|| UserError::NotFoundByLogin(username_or_email.to_string()))?;

        let token = self
            .reset_tokens
            .create_password_reset_token(&user.id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Password reset token issuance failed");
                UserError::from(e)
            })?;

        self.mailer
            .send_reset_mail(&user.email, &token, &user.id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Password reset mail failed");
                UserError::from(e)
            })?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        command: ConfirmPasswordResetCommand,
    ) -> Result<(), UserError> {
        // Inputs are checked before the token so a typo never burns a token.
        let password = match (command.password_1, command.password_2) {
            (Some(first), Some(second)) if !first.is_empty() && first == second => second,
            _ => return Err(UserError::PasswordsDoNotMatch),
        };

        let Ok(user_id) = UserId::from_string(&command.user_id) else {
            return Err(UserError::InvalidResetToken);
        };

        if !self
            .reset_tokens
            .validate_password_reset_token(&command.token, &user_id)
            .await?
        {
            tracing::warn!(user_id = %user_id, "Password reset token rejected");
            return Err(UserError::InvalidResetToken);
        }

        let mut user = self.get_user(&user_id).await?;
        user.password_hash = self.authenticator.hash_password(&password)?;
        self.repository.update(user).await?;

        tracing::info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, UserError> {
        self.authenticator
            .refresh_access_token(refresh_token)
            .map_err(|e| match e {
                JwtError::EncodingFailed(_) => UserError::Token(e),
                _ => UserError::InvalidToken(e.to_string()),
            })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
