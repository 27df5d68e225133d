use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router.
///
/// Two routes only: the invocation endpoint and the liveness probe. CORS is
/// permissive, matching the upstream callers this service fronts.
pub fn create_router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/invocations", post(crate::api::handlers::invoke))
        .route("/ping", get(crate::api::handlers::ping))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
