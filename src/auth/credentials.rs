use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};

/// The browser's credentials, forwarded untouched to the auth service.
///
/// The app never inspects the session cookie itself; it only relays the
/// `Cookie` header so the service can recognise the caller.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    cookie: Option<HeaderValue>,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let parts: Vec<&str> = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        if parts.is_empty() {
            return Self::default();
        }

        // HTTP/2 clients may split cookies over several headers
        let cookie = HeaderValue::from_str(&parts.join("; ")).ok();
        Self { cookie }
    }

    pub fn from_cookie(cookie: &str) -> Self {
        Self {
            cookie: HeaderValue::from_str(cookie).ok(),
        }
    }

    pub fn cookie_header(&self) -> Option<&HeaderValue> {
        self.cookie.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.cookie.is_none()
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Credentials::from_headers(&parts.headers))
    }
}
