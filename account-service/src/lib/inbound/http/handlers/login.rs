use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let command = LoginCommand {
        username_or_email: body.username_or_email,
        password: body.password,
    };

    state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username_or_email: String,
    #[serde(default)]
    password: String,
}

/// User fields at the top level, alongside the issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    #[serde(flatten)]
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<&AuthenticatedUser> for LoginResponseData {
    fn from(authenticated: &AuthenticatedUser) -> Self {
        Self {
            user: (&authenticated.user).into(),
            access_token: authenticated.tokens.access_token.clone(),
            refresh_token: authenticated.tokens.refresh_token.clone(),
            token_type: authenticated.tokens.token_type.clone(),
        }
    }
}
