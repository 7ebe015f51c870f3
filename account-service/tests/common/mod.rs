use std::sync::Arc;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::Mailer;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::reset_tokens::InMemoryResetTokenLedger;
use account_service::outbound::reset_tokens::SignedResetTokens;
use account_service::user::errors::MailError;
use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenLifetimes;
use serde_json::json;
use serde_json::Value;
use tokio::sync::Mutex;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// A reset mail as the service handed it to the transport.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub email: String,
    pub token: String,
    pub user_id: String,
}

/// Mailer that keeps every message in memory.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub async fn last(&self) -> Option<SentMail> {
        self.sent.lock().await.last().cloned()
    }

    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_reset_mail(
        &self,
        email: &EmailAddress,
        token: &str,
        user_id: &UserId,
    ) -> Result<(), MailError> {
        self.sent.lock().await.push(SentMail {
            email: email.to_string(),
            token: token.to_string(),
            user_id: user_id.to_string(),
        });
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, TokenLifetimes::default()));
        let mailer = Arc::new(RecordingMailer::default());
        let reset_tokens = Arc::new(SignedResetTokens::new(
            Arc::clone(&authenticator),
            Arc::new(InMemoryResetTokenLedger::new()),
            chrono::Duration::minutes(30),
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            reset_tokens,
            Arc::clone(&mailer),
            Arc::clone(&authenticator),
        ));

        let router = create_router(auth_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            mailer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Response {
        self.post("/register")
            .json(&json!({
                "username": username,
                "email": email,
                "firstname": "Alice",
                "lastname": "Liddell",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username_or_email: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&json!({
                "username_or_email": username_or_email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn request_reset(&self, username_or_email: &str) -> reqwest::Response {
        self.post("/password-reset-request")
            .json(&json!({ "username_or_email": username_or_email }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn confirm_reset(&self, token: &str, user_id: &str, body: Value) -> reqwest::Response {
        self.post(&format!("/password-reset/{}/{}/confirm", token, user_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}
