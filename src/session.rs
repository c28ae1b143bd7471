//! Session resolution for incoming requests.
//!
//! The auth service is the only authority on sessions. Any failure to reach
//! it or to understand its answer is treated as "no session".

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;

use crate::auth::{AuthService, Credentials};
use crate::error::AppError;
use crate::models::Session;
use crate::state::SharedState;

/// The request's session, if the auth service recognises its credentials.
///
/// Resolved at most once per request; later extractions reuse the value
/// cached in the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// A session that must be present. Rejects with `Unauthorized`, which the
/// redirect middleware turns into a trip to the login page.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

pub async fn resolve(auth: &dyn AuthService, credentials: &Credentials) -> Option<Session> {
    if credentials.is_empty() {
        return None;
    }

    match auth.get_session(credentials).await {
        Ok(Some(session)) if session.is_expired(Utc::now()) => {
            tracing::debug!(
                user = %session.user.id,
                expires_at = ?session.expires_at,
                "Session past its expiry, treating request as anonymous"
            );
            None
        }
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Session lookup failed, treating request as anonymous: {e}");
            None
        }
    }
}

impl FromRequestParts<SharedState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentSession>() {
            return Ok(cached.clone());
        }

        let credentials = Credentials::from_headers(&parts.headers);
        let resolved = CurrentSession(resolve(state.auth.as_ref(), &credentials).await);
        parts.extensions.insert(resolved.clone());
        Ok(resolved)
    }
}

impl FromRequestParts<SharedState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let session = match CurrentSession::from_request_parts(parts, state).await {
            Ok(CurrentSession(session)) => session,
            Err(never) => match never {},
        };
        session
            .map(RequireSession)
            .ok_or_else(|| AppError::Unauthorized("Session expired".to_string()))
    }
}
