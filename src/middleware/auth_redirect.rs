use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

pub const LOGIN_EXPIRED: &str = "/auth/login?error=session_expired";

/// Middleware that redirects 401 responses to the login page.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        Redirect::to(LOGIN_EXPIRED).into_response()
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/private", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/public", get(|| async { "hello" }))
            .layer(axum::middleware::from_fn(redirect_unauthorized))
    }

    #[tokio::test]
    async fn unauthorized_becomes_login_redirect() {
        let res = app()
            .oneshot(HttpRequest::builder().uri("/private").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], LOGIN_EXPIRED);
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let res = app()
            .oneshot(HttpRequest::builder().uri("/public").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
