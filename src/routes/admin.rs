use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::capability::Capability;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Role, Session, User};
use crate::notice::{self, Notice};
use crate::policy;
use crate::routes::IN_PROGRESS;
use crate::session::RequireSession;
use crate::state::SharedState;

const DASHBOARD: &str = "/admin/dashboard";

#[derive(Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub role: String,
}

/// Fresh user list; guards are never evaluated against form data.
async fn current_users(state: &SharedState, session: &Session) -> Result<Vec<User>, Notice> {
    state
        .auth
        .list_users(&session.credentials, "name")
        .await
        .map_err(|e| {
            tracing::warn!("Failed to load users: {e}");
            Notice::error(e.message())
        })
}

pub async fn delete_user(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    Path(user_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    session.require_role(&[Role::Admin])?;
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, DASHBOARD)
    };

    let Some(_guard) = state.in_flight.begin(&session.user.id, "delete-user") else {
        return Ok(back(jar, Notice::error(IN_PROGRESS)));
    };

    let users = match current_users(&state, &session).await {
        Ok(users) => users,
        Err(notice) => return Ok(back(jar, notice)),
    };
    let Some(target) = users.iter().find(|u| u.id == user_id) else {
        return Ok(back(jar, Notice::error("User not found")));
    };

    if let Err(denial) = policy::check_delete(&session.user, target) {
        tracing::warn!(
            actor = %session.user.id,
            subject = %target.id,
            "Refusing user deletion: {denial}"
        );
        return Ok(back(jar, Notice::error(denial.to_string())));
    }

    let notice = match state.auth.remove_user(&session.credentials, &target.id).await {
        Ok(()) => {
            audit::log_event(
                Some(&session.user),
                "admin.user_deleted",
                Some(&target.id),
                Some(&target.email),
            );
            Notice::success("User deleted successfully")
        }
        Err(e) => {
            tracing::warn!(subject = %target.id, "User deletion failed: {e}");
            Notice::error(e.message())
        }
    };
    Ok(back(jar, notice))
}

pub async fn set_role(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    Path(user_id): Path<String>,
    jar: CookieJar,
    Form(form): Form<RoleForm>,
) -> Result<Response, AppError> {
    session.require_role(&[Role::Admin])?;
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, DASHBOARD)
    };

    let Ok(role) = form.role.parse::<Role>() else {
        return Ok(back(jar, Notice::error("Unknown role")));
    };

    if !state
        .capabilities
        .has_capability(&session, Capability::SetRole)
        .await
    {
        tracing::warn!(actor = %session.user.id, "Role change denied by capability check");
        return Ok(back(jar, Notice::error("Forbidden")));
    }

    let Some(_guard) = state.in_flight.begin(&session.user.id, "set-role") else {
        return Ok(back(jar, Notice::error(IN_PROGRESS)));
    };

    let users = match current_users(&state, &session).await {
        Ok(users) => users,
        Err(notice) => return Ok(back(jar, notice)),
    };
    let Some(target) = users.iter().find(|u| u.id == user_id) else {
        return Ok(back(jar, Notice::error("User not found")));
    };

    if let Err(denial) = policy::check_role_change(&session.user, target, role, &users) {
        tracing::warn!(
            actor = %session.user.id,
            subject = %target.id,
            "Refusing role change: {denial}"
        );
        return Ok(back(jar, Notice::error(denial.to_string())));
    }

    let notice = match state
        .auth
        .set_role(&session.credentials, &target.id, role)
        .await
    {
        Ok(()) => {
            audit::log_event(
                Some(&session.user),
                "admin.role_changed",
                Some(&target.id),
                Some(role.as_str()),
            );
            Notice::success("User role updated")
        }
        Err(e) => {
            tracing::warn!(subject = %target.id, "Role change failed: {e}");
            Notice::error(e.message())
        }
    };
    Ok(back(jar, notice))
}
