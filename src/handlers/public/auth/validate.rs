use axum::extract::Path;

use crate::auth::{validate_jwt, Claims};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /auth/local/validate/:token - decode a token the server issued
pub async fn validate_get(Path(token): Path<String>) -> ApiResult<Claims> {
    let claims = validate_jwt(&token)?;
    Ok(ApiResponse::success(claims).message("verified token"))
}
