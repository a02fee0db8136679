pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected::favs, public};
use crate::state::AppState;

/// Build the full router: public routes, `/auth/local`, and the protected `/api`
pub fn app(state: AppState) -> Router {
    let settings = config::config();

    let mut router = Router::new()
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .nest("/auth/local", auth_routes())
        .nest("/api", api_routes(state.clone()))
        .with_state(state);

    if settings.security.enable_cors {
        router = router.layer(cors_layer(&settings.security.cors_origins));
    }
    if settings.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
        .route("/validate/:token", get(auth::validate_get))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/favs", get(favs::favs_list).post(favs::favs_create))
        .merge(favs_item_routes(state))
        .layer(from_fn(middleware::jwt_auth_middleware))
}

/// Routes addressing one list; the load-gate only runs once a route matched
fn favs_item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/favs/:id",
            get(favs::favs_read).put(favs::favs_update).delete(favs::favs_delete),
        )
        .route_layer(from_fn_with_state(state, favs::load_favs))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
