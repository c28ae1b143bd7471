use std::convert::Infallible;

use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponseParts, ResponseParts};

/// `Set-Cookie` values issued by the auth service, relayed to the browser.
#[derive(Debug, Clone, Default)]
pub struct AuthCookies(pub Vec<HeaderValue>);

impl FromIterator<HeaderValue> for AuthCookies {
    fn from_iter<I: IntoIterator<Item = HeaderValue>>(iter: I) -> Self {
        AuthCookies(iter.into_iter().collect())
    }
}

impl IntoResponseParts for AuthCookies {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for value in self.0 {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}
