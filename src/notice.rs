//! Transient notifications shown once on the next rendered page.
//!
//! A form handler stores a [`Notice`] in a short-lived cookie before
//! redirecting; the page that renders next takes it out again.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "sassfa_notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

/// Queue `notice` for the next page view.
pub fn flash(jar: CookieJar, notice: &Notice, secure: bool) -> CookieJar {
    let payload = match serde_json::to_vec(notice) {
        Ok(bytes) => hex::encode(bytes),
        Err(e) => {
            tracing::warn!("Failed to encode notice: {e}");
            return jar;
        }
    };

    let cookie = Cookie::build((FLASH_COOKIE, payload))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(1))
        .build();
    jar.add(cookie)
}

/// Take the pending notice, if any, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };

    let notice = hex::decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Notice>(&bytes).ok());

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, notice)
}

/// Flash `notice` and redirect to `to`.
pub fn redirect_with(jar: CookieJar, notice: &Notice, secure: bool, to: &str) -> Response {
    (flash(jar, notice, secure), Redirect::to(to)).into_response()
}
