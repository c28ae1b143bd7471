use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::auth::AuthError;
use crate::notice::Notice;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Upstream(AuthError),
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    notice: Option<Notice>,
    status: u16,
    title: String,
    message: String,
}

#[derive(Template)]
#[template(path = "restricted.html")]
pub(crate) struct RestrictedTemplate {
    pub(crate) notice: Option<Notice>,
    pub(crate) message: String,
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::Upstream(err) => write!(f, "Upstream Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Insufficient role renders the restricted-access page in place
            AppError::Forbidden(msg) => {
                let page = RestrictedTemplate {
                    notice: None,
                    message: msg.clone(),
                };
                return (
                    StatusCode::FORBIDDEN,
                    Html(page.render().unwrap_or_default()),
                )
                    .into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Upstream(err) => {
                tracing::error!("Auth service error: {err}");
                (StatusCode::BAD_GATEWAY, err.message())
            }
        };

        let page = ErrorTemplate {
            notice: None,
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };
        (status, Html(page.render().unwrap_or_default())).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Upstream(err)
    }
}
