use axum::extract::State;

use crate::auth::hash_password;
use crate::database::models::{NewUser, RegisterUser, User};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

/// POST /auth/local/register - create an account with a bcrypt-hashed password
pub async fn register_post(State(state): State<AppState>, JsonBody(input): JsonBody<RegisterUser>) -> ApiResult<User> {
    let valid = input.validate()?;
    let password_hash = hash_password(valid.password).await?;

    let user = state
        .users
        .create(NewUser {
            email: valid.email,
            password_hash,
            name: valid.name,
        })
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::created(user).message("user created"))
}
