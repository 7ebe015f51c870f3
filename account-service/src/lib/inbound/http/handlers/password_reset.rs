use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::ConfirmPasswordResetCommand;
use crate::inbound::http::router::AppState;

pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequestBody>,
) -> Result<ApiSuccess<String>, ApiError> {
    state
        .auth_service
        .request_password_reset(&body.username_or_email)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "An email has been sent with instructions to reset your password.".to_string(),
    ))
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Path((token, user_id)): Path<(String, String)>,
    Json(body): Json<ConfirmPasswordResetBody>,
) -> Result<ApiSuccess<String>, ApiError> {
    let command = ConfirmPasswordResetCommand {
        token,
        user_id,
        password_1: body.password_1,
        password_2: body.password_2,
    };

    state
        .auth_service
        .confirm_password_reset(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Password Reset Successfully".to_string(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequestBody {
    #[serde(default)]
    username_or_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmPasswordResetBody {
    #[serde(default)]
    password_1: Option<String>,
    #[serde(default)]
    password_2: Option<String>,
}
