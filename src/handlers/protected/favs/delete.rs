use axum::{extract::State, Extension};

use super::LoadedFavs;
use crate::database::models::FavsList;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// DELETE /api/favs/:id - returns the removed document
pub async fn favs_delete(
    State(state): State<AppState>,
    Extension(LoadedFavs(favs)): Extension<LoadedFavs>,
) -> ApiResult<FavsList> {
    let removed = state.favs.delete_by_id(favs.id).await?;
    tracing::info!(favs_id = %removed.id, "favs list removed");

    Ok(ApiResponse::success(removed).message("favs list has been removed"))
}
