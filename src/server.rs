use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, TOTAL_COUNT_HEADER};
use crate::state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        // Protected
        .merge(record_routes(state.clone()))
        .merge(account_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn record_routes(state: AppState) -> Router<AppState> {
    use protected::records;

    Router::new()
        .route("/records", get(records::list).post(records::post))
        .route(
            "/records/:id",
            get(records::get)
                .put(records::put)
                .patch(records::patch)
                .delete(records::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn account_routes(state: AppState) -> Router<AppState> {
    use protected::{profile, users};

    Router::new()
        .route("/profile", get(profile::get).put(profile::put))
        .route("/users", get(users::list))
        .route("/users/:id", get(users::get))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER)])
        .allow_credentials(true)
}

/// Serve the app on an already-bound listener until `shutdown` resolves
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
