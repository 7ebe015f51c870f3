use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::Mailer;
use crate::user::errors::MailError;

/// Mailer that emits reset instructions as structured log events.
///
/// Stands in for an SMTP relay in development; the link it logs is the one a
/// real message would carry.
pub struct LoggingMailer {
    link_base_url: String,
}

impl LoggingMailer {
    pub fn new(link_base_url: impl Into<String>) -> Self {
        Self {
            link_base_url: link_base_url.into(),
        }
    }

    pub fn reset_link(&self, token: &str, user_id: &UserId) -> String {
        format!(
            "{}/password-reset/{}/{}/confirm",
            self.link_base_url.trim_end_matches('/'),
            token,
            user_id
        )
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_reset_mail(
        &self,
        email: &EmailAddress,
        token: &str,
        user_id: &UserId,
    ) -> Result<(), MailError> {
        tracing::info!(
            recipient = %email,
            user_id = %user_id,
            link = %self.reset_link(token, user_id),
            "Password reset mail"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link() {
        let mailer = LoggingMailer::new("https://accounts.example.com/");
        let user_id = UserId::new();

        assert_eq!(
            mailer.reset_link("abc.def.ghi", &user_id),
            format!(
                "https://accounts.example.com/password-reset/abc.def.ghi/{}/confirm",
                user_id
            )
        );
    }

    #[tokio::test]
    async fn test_send_reset_mail_succeeds() {
        let mailer = LoggingMailer::new("http://localhost:8080");
        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();

        assert!(mailer
            .send_reset_mail(&email, "token", &UserId::new())
            .await
            .is_ok());
    }
}
