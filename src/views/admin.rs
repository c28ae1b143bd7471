use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;

use crate::directory::{self, DirectoryStats};
use crate::error::{AppError, RestrictedTemplate};
use crate::models::{Role, User};
use crate::notice::{self, Notice};
use crate::session::RequireSession;
use crate::state::SharedState;
use crate::views::Viewer;

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct DashboardTemplate {
    notice: Option<Notice>,
    viewer: Viewer,
    stats: DirectoryStats,
    query: String,
    rows: Vec<UserRow>,
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    initials: String,
    avatar: Option<String>,
    role: String,
    is_admin: bool,
    verified: bool,
    joined: String,
    is_current: bool,
    can_delete: bool,
    can_change_role: bool,
    next_role: String,
    role_action: &'static str,
}

impl UserRow {
    fn new(user: &User, current_user_id: &str) -> Self {
        let is_current = user.id == current_user_id;
        let (next_role, role_action) = match user.role {
            Role::Admin => (Role::User, "Demote to User"),
            Role::User => (Role::Admin, "Promote to Admin"),
        };

        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            initials: user.initials(),
            avatar: user.avatar().map(str::to_string),
            role: user.role.to_string(),
            is_admin: user.is_admin(),
            verified: user.email_verified,
            joined: user.joined(),
            is_current,
            can_delete: !user.is_admin() && !is_current,
            can_change_role: !is_current,
            next_role: next_role.to_string(),
            role_action,
        }
    }
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn dashboard(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    Query(params): Query<DashboardQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::Admin])?;

    let users = state.auth.list_users(&session.credentials, "name").await?;

    let rows = directory::visible(&users, &params.q)
        .into_iter()
        .map(|user| UserRow::new(user, &session.user.id))
        .collect();

    let (jar, notice) = notice::take(jar);
    let template = DashboardTemplate {
        notice,
        viewer: Viewer::from(&session.user),
        stats: DirectoryStats::collect(&users, Utc::now()),
        query: params.q,
        rows,
    };
    Ok((jar, Html(template.render().unwrap_or_default())))
}

pub async fn unauthorized() -> impl IntoResponse {
    let template = RestrictedTemplate {
        notice: None,
        message: "Administrator access required".to_string(),
    };
    (
        StatusCode::FORBIDDEN,
        Html(template.render().unwrap_or_default()),
    )
}
