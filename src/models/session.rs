use chrono::{DateTime, Utc};

use crate::auth::Credentials;
use crate::error::AppError;
use crate::models::{Role, User};

/// A server-verified association between the current request and a user.
///
/// Fetched once per request and dropped with the response. It keeps the
/// forwarded credentials so handlers can call the auth service on the
/// user's behalf.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub expires_at: Option<DateTime<Utc>>,
    pub credentials: Credentials,
}

impl Session {
    /// A session without an expiry is taken at the service's word.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}
