use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::notice::{self, Notice};
use crate::session::CurrentSession;
use crate::state::SharedState;
use crate::views::{ProviderLink, provider_links};

#[derive(Template)]
#[template(path = "auth/login.html")]
pub(crate) struct LoginTemplate {
    pub notice: Option<Notice>,
    pub providers: Vec<ProviderLink>,
}

#[derive(Template)]
#[template(path = "auth/login_error.html")]
struct LoginErrorTemplate {
    notice: Option<Notice>,
    error: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    notice: Option<Notice>,
    providers: Vec<ProviderLink>,
    min_password_length: usize,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
pub(crate) struct ForgotPasswordTemplate {
    pub notice: Option<Notice>,
    pub email_sent: bool,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
pub(crate) struct ResetPasswordTemplate {
    pub notice: Option<Notice>,
    pub token: String,
    pub success: bool,
    pub min_password_length: usize,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
}

pub async fn login_page(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<LoginQuery>,
    jar: CookieJar,
) -> Response {
    // Already signed in
    if session.is_some() {
        return Redirect::to("/profile").into_response();
    }

    let (jar, flashed) = notice::take(jar);
    let notice = flashed.or_else(|| match q.error.as_deref() {
        Some("session_expired") => Some(Notice::error(
            "Your session has expired. Please sign in again.",
        )),
        _ => None,
    });

    let template = LoginTemplate {
        notice,
        providers: provider_links(&state.config.oauth_providers),
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

pub async fn login_error_page(Query(q): Query<LoginQuery>) -> impl IntoResponse {
    let template = LoginErrorTemplate {
        notice: None,
        error: q
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "unknown_error".to_string()),
    };
    Html(template.render().unwrap_or_default())
}

pub async fn register_page(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
) -> Response {
    if session.is_some() {
        return Redirect::to("/profile").into_response();
    }

    let (jar, notice) = notice::take(jar);
    let template = RegisterTemplate {
        notice,
        providers: provider_links(&state.config.oauth_providers),
        min_password_length: state.config.min_password_length,
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

pub async fn forgot_password_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, notice) = notice::take(jar);
    let template = ForgotPasswordTemplate {
        notice,
        email_sent: false,
    };
    (jar, Html(template.render().unwrap_or_default()))
}

pub async fn reset_password_page(
    State(state): State<SharedState>,
    Query(q): Query<ResetQuery>,
) -> Response {
    let Some(token) = q.token.filter(|t| !t.trim().is_empty()) else {
        return Redirect::to("/auth/login").into_response();
    };

    let template = ResetPasswordTemplate {
        notice: None,
        token,
        success: false,
        min_password_length: state.config.min_password_length,
    };
    Html(template.render().unwrap_or_default()).into_response()
}
