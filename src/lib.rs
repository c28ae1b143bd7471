pub mod auth;
pub mod capability;
pub mod config;
pub mod directory;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notice;
pub mod pending;
pub mod policy;
pub mod rate_limit;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthService;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config, auth: Arc<dyn AuthService>) -> Router {
    router(Arc::new(AppState::new(config, auth)))
}

/// The full application around an already assembled state.
pub fn router(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    let pages = Router::new()
        .merge(views::view_routes())
        .merge(routes::form_routes())
        .layer(axum::middleware::from_fn(redirect_unauthorized));

    Router::new()
        .merge(pages)
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
