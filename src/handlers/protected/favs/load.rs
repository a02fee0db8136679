use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::database::models::FavsList;
use crate::error::ApiError;
use crate::state::AppState;

/// The list addressed by `:id`, resolved before the handler runs
#[derive(Debug, Clone)]
pub struct LoadedFavs(pub FavsList);

/// Resolve `:id` into a `LoadedFavs` request extension.
///
/// A malformed id surfaces as the store's cast error (500), a well-formed id
/// with no document as 404 "favs list not found".
pub async fn load_favs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.favs.find_by_id(&id).await {
        Ok(favs) => {
            request.extensions_mut().insert(LoadedFavs(favs));
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
