use std::collections::HashMap;

use axum::extract::State;
use serde::Deserialize;

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::database::models::user::normalize_email;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/local/login - exchange credentials for a JWT
///
/// An absent email and an unknown one look the same to the client.
pub async fn login_post(State(state): State<AppState>, JsonBody(input): JsonBody<LoginRequest>) -> ApiResult<String> {
    let user = match normalize_email(input.email.as_deref()) {
        Some(email) => state.users.find_by_email(&email).await?,
        None => None,
    };
    let user = user.ok_or_else(|| ApiError::not_found("user not found"))?;

    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            let field_errors = HashMap::from([("password".to_string(), "is required".to_string())]);
            ApiError::unprocessable_entity("password is required", field_errors)
        })?;

    if !verify_password(password, user.password.clone()).await? {
        tracing::debug!(user_id = %user.id, "login rejected");
        return Err(ApiError::forbidden("password is not correct"));
    }

    let token = generate_jwt(&Claims::new(user.id))?;
    Ok(ApiResponse::success(token).message("user logged"))
}
