use axum::extract::State;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Favs API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Favorites lists REST backend",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/auth/local/register, /auth/local/login, /auth/local/validate/:token (public)",
            "favs": "/api/favs[/:id] (protected)",
        }
    })))
}

/// GET /health - 503 while the database cannot be reached
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.database.health_check().await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "database": state.database.backend().to_string(),
    })))
}
