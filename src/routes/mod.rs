pub mod account;
pub mod admin;
pub mod auth;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

/// Shown when an identical submission from the same actor is still running.
pub(crate) const IN_PROGRESS: &str = "A request is already in progress";

pub fn form_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::sign_in))
        .route("/auth/register", post(auth::register))
        .route("/auth/oauth/{provider}", post(auth::oauth))
        .route("/auth/magic-link", post(auth::magic_link))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/sign-out", post(auth::sign_out))
        // Account
        .route("/profile", post(account::update_profile))
        .route("/profile/password", post(account::change_password))
        // Admin
        .route("/admin/users/{id}/role", post(admin::set_role))
        .route("/admin/users/{id}/delete", post(admin::delete_user))
}
