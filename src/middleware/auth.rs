use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

use crate::auth::{validate_jwt, AuthError};
use crate::error::ApiError;

/// Caller identity extracted from a verified JWT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: ObjectId,
}

/// JWT authentication middleware that validates tokens and extracts the caller
pub async fn jwt_auth_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let token = match extract_jwt_from_headers(&headers) {
        Ok(token) => token,
        Err(msg) => return ApiError::unauthorized(msg).into_response(),
    };

    let user = match authenticate(token) {
        Ok(user) => user,
        Err(err) => {
            tracing::debug!("Rejected bearer token: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn authenticate(token: &str) -> Result<AuthUser, AuthError> {
    let claims = validate_jwt(token)?;
    Ok(AuthUser { id: claims.user_id()? })
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(token.trim()),
        None => Err("Authorization header must use Bearer token format"),
    }
}
