pub mod admin;
pub mod auth;
pub mod home;
pub mod profile;

use axum::Router;
use axum::routing::get;

use crate::auth::OAuthProvider;
use crate::models::User;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home::index))
        // Auth views
        .route("/auth/login", get(auth::login_page))
        .route("/auth/login/error", get(auth::login_error_page))
        .route("/auth/register", get(auth::register_page))
        .route("/auth/forgot-password", get(auth::forgot_password_page))
        .route("/auth/reset-password", get(auth::reset_password_page))
        // Account
        .route("/profile", get(profile::show))
        // Admin
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/unauthorized", get(admin::unauthorized))
}

/// Social sign-in button.
pub(crate) struct ProviderLink {
    pub slug: &'static str,
    pub label: &'static str,
}

pub(crate) fn provider_links(providers: &[OAuthProvider]) -> Vec<ProviderLink> {
    providers
        .iter()
        .map(|p| ProviderLink {
            slug: p.as_str(),
            label: p.label(),
        })
        .collect()
}

/// The signed-in user as shown in headers and account menus.
pub(crate) struct Viewer {
    pub name: String,
    pub first_name: String,
    pub email: String,
    pub initials: String,
    pub avatar: Option<String>,
    pub role: String,
    pub is_admin: bool,
    pub email_verified: bool,
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            first_name: user.first_name().to_string(),
            email: user.email.clone(),
            initials: user.initials(),
            avatar: user.avatar().map(str::to_string),
            role: user.role.to_string(),
            is_admin: user.is_admin(),
            email_verified: user.email_verified,
        }
    }
}
