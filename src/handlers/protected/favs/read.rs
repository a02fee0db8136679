use axum::Extension;

use super::LoadedFavs;
use crate::database::models::FavsList;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/favs/:id
pub async fn favs_read(Extension(LoadedFavs(favs)): Extension<LoadedFavs>) -> ApiResult<FavsList> {
    Ok(ApiResponse::success(favs))
}
