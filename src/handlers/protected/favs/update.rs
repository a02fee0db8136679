use axum::{extract::State, Extension};

use super::LoadedFavs;
use crate::database::models::{FavsList, FavsPatch};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

/// PUT /api/favs/:id - merge the supplied top-level fields; `list` is replaced whole
pub async fn favs_update(
    State(state): State<AppState>,
    Extension(LoadedFavs(favs)): Extension<LoadedFavs>,
    JsonBody(patch): JsonBody<FavsPatch>,
) -> ApiResult<FavsList> {
    let updated = state.favs.update_by_id(favs.id, patch).await?;
    Ok(ApiResponse::success(updated).message("favs list has been updated"))
}
