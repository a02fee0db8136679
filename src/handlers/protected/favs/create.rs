use axum::{extract::State, Extension};

use crate::database::models::{FavsList, NewFavs};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// POST /api/favs - create a list owned by the caller
pub async fn favs_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<NewFavs>,
) -> ApiResult<FavsList> {
    let favs = state.favs.create(input, user.id).await?;
    tracing::info!(favs_id = %favs.id, owner = %user.id, "favs list created");

    Ok(ApiResponse::created(favs).message("favs created"))
}
