use axum::{extract::State, Extension};

use crate::database::models::FavsList;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/favs - every list of the caller, 204 when there are none
pub async fn favs_list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<FavsList>> {
    let lists = state.favs.find_all_by_owner(user.id).await?;
    Ok(ApiResponse::success(lists))
}
