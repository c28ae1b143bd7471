use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::{PasswordChange, ProfileUpdate};
use crate::middleware::audit;
use crate::notice::{self, Notice};
use crate::routes::IN_PROGRESS;
use crate::session::RequireSession;
use crate::state::SharedState;
use crate::validation;

const PROFILE: &str = "/profile";

#[derive(Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn update_profile(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Response {
    let secure = state.config.secure_cookies();

    if let Err(msg) = validation::profile_update(&form.name, &form.image) {
        return notice::redirect_with(jar, &Notice::error(msg), secure, PROFILE);
    }

    let Some(_guard) = state.in_flight.begin(&session.user.id, "update-profile") else {
        return notice::redirect_with(jar, &Notice::error(IN_PROGRESS), secure, PROFILE);
    };

    let name = form.name.trim();
    let update = ProfileUpdate {
        name: (!name.is_empty()).then(|| name.to_string()),
        image: form.image.trim().to_string(),
    };

    match state.auth.update_user(&session.credentials, &update).await {
        Ok(cookies) => {
            audit::log_event(
                Some(&session.user),
                "user.profile_updated",
                Some(&session.user.id),
                update.name.as_deref(),
            );
            let jar = notice::flash(
                jar,
                &Notice::success("Profile updated successfully"),
                secure,
            );
            (cookies, jar, Redirect::to(PROFILE)).into_response()
        }
        Err(e) => {
            tracing::warn!(user_id = %session.user.id, "Profile update failed: {e}");
            notice::redirect_with(jar, &Notice::error(e.message()), secure, PROFILE)
        }
    }
}

pub async fn change_password(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    jar: CookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let secure = state.config.secure_cookies();

    if let Err(msg) = validation::password_change(
        &form.current_password,
        &form.new_password,
        state.config.min_password_length,
    ) {
        return notice::redirect_with(jar, &Notice::error(msg), secure, PROFILE);
    }

    let Some(_guard) = state.in_flight.begin(&session.user.id, "change-password") else {
        return notice::redirect_with(jar, &Notice::error(IN_PROGRESS), secure, PROFILE);
    };

    let change = PasswordChange {
        current_password: form.current_password,
        new_password: form.new_password,
        revoke_other_sessions: true,
    };

    match state.auth.change_password(&session.credentials, &change).await {
        Ok(cookies) => {
            audit::log_event(
                Some(&session.user),
                "user.password_changed",
                Some(&session.user.id),
                None,
            );
            let jar = notice::flash(
                jar,
                &Notice::success("Password changed successfully"),
                secure,
            );
            (cookies, jar, Redirect::to(PROFILE)).into_response()
        }
        Err(e) => {
            tracing::info!(user_id = %session.user.id, "Password change failed: {e}");
            notice::redirect_with(jar, &Notice::error(e.message()), secure, PROFILE)
        }
    }
}
