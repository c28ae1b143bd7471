use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::{
    AuthError, Credentials, EmailSignIn, EmailSignUp, MagicLinkSignIn, OAuthProvider,
    PasswordReset, PasswordResetRequest, SocialSignIn,
};
use crate::middleware::audit;
use crate::notice::{self, Notice};
use crate::routes::IN_PROGRESS;
use crate::state::SharedState;
use crate::validation;
use crate::views::auth::{ForgotPasswordTemplate, ResetPasswordTemplate};

const AFTER_SIGN_IN: &str = "/profile";
const OAUTH_ERROR_PAGE: &str = "/auth/login/error";

#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn too_many(retry_after: u64) -> Notice {
    let minutes = retry_after.div_ceil(60).max(1);
    Notice::error(format!(
        "Too many attempts. Please try again in {minutes} minute(s)."
    ))
}

pub async fn sign_in(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, "/auth/login")
    };

    if let Err(msg) = validation::sign_in(&form.email, &form.password) {
        return back(jar, Notice::error(msg));
    }
    let email = form.email.trim().to_string();

    if let Err(retry_after) = state.sign_in_limiter.check(&email) {
        tracing::warn!(email = %email, "Sign-in rate limited");
        return back(jar, too_many(retry_after));
    }

    let Some(_guard) = state.in_flight.begin(&email, "sign-in") else {
        return back(jar, Notice::error(IN_PROGRESS));
    };

    let req = EmailSignIn {
        email: email.clone(),
        password: form.password,
        callback_url: AFTER_SIGN_IN.to_string(),
    };

    match state.auth.sign_in_email(&req).await {
        Ok(cookies) => {
            state.sign_in_limiter.reset(&email);
            audit::log_event(None, "user.sign_in", None, Some(&email));
            let jar = notice::flash(jar, &Notice::success("Welcome back!"), secure);
            (cookies, jar, Redirect::to(AFTER_SIGN_IN)).into_response()
        }
        Err(e) => {
            if matches!(e, AuthError::Rejected { .. }) {
                state.sign_in_limiter.record(&email);
            }
            tracing::info!(email = %email, "Sign-in failed: {e}");
            back(jar, Notice::error(e.message()))
        }
    }
}

pub async fn register(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, "/auth/register")
    };

    if let Err(msg) = validation::registration(
        &form.name,
        &form.email,
        &form.password,
        &form.confirm_password,
        state.config.min_password_length,
    ) {
        return back(jar, Notice::error(msg));
    }
    let email = form.email.trim().to_string();

    let Some(_guard) = state.in_flight.begin(&email, "register") else {
        return back(jar, Notice::error(IN_PROGRESS));
    };

    let req = EmailSignUp {
        name: form.name.trim().to_string(),
        email: email.clone(),
        password: form.password,
        callback_url: AFTER_SIGN_IN.to_string(),
    };

    match state.auth.sign_up_email(&req).await {
        Ok(cookies) => {
            audit::log_event(None, "user.register", None, Some(&email));
            let jar = notice::flash(
                jar,
                &Notice::success("Account created! Welcome aboard!"),
                secure,
            );
            (cookies, jar, Redirect::to(AFTER_SIGN_IN)).into_response()
        }
        Err(e) => {
            tracing::info!(email = %email, "Registration failed: {e}");
            back(jar, Notice::error(e.message()))
        }
    }
}

pub async fn oauth(
    State(state): State<SharedState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Response {
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, "/auth/login")
    };

    let provider = match provider.parse::<OAuthProvider>() {
        Ok(p) if state.config.oauth_enabled(p) => p,
        _ => return back(jar, Notice::error("This sign-in provider is not available")),
    };

    let req = SocialSignIn {
        provider,
        callback_url: AFTER_SIGN_IN.to_string(),
        error_callback_url: OAUTH_ERROR_PAGE.to_string(),
    };

    match state.auth.sign_in_social(&req).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            tracing::warn!(provider = %provider, "Social sign-in failed: {e}");
            back(jar, Notice::error(e.message()))
        }
    }
}

pub async fn magic_link(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<EmailForm>,
) -> Response {
    let secure = state.config.secure_cookies();
    let back = |jar: CookieJar, notice: Notice| {
        notice::redirect_with(jar, &notice, secure, "/auth/login")
    };

    let email = form.email.trim().to_string();
    if email.is_empty() {
        return back(jar, Notice::error("Please enter your email."));
    }
    if let Err(msg) = validation::email(&email) {
        return back(jar, Notice::error(msg));
    }

    if let Err(retry_after) = state.email_limiter.check(&email) {
        tracing::warn!(email = %email, "Magic link rate limited");
        return back(jar, too_many(retry_after));
    }

    let Some(_guard) = state.in_flight.begin(&email, "magic-link") else {
        return back(jar, Notice::error(IN_PROGRESS));
    };

    let req = MagicLinkSignIn {
        name: validation::local_part(&email).to_string(),
        email: email.clone(),
        callback_url: AFTER_SIGN_IN.to_string(),
    };

    match state.auth.sign_in_magic_link(&req).await {
        Ok(()) => {
            state.email_limiter.record(&email);
            back(jar, Notice::success("Check your email for the magic link!"))
        }
        Err(e) => {
            tracing::info!(email = %email, "Magic link request failed: {e}");
            back(jar, Notice::error(e.message()))
        }
    }
}

fn forgot_page(notice: Notice, email_sent: bool) -> Response {
    let template = ForgotPasswordTemplate {
        notice: Some(notice),
        email_sent,
    };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Form(form): Form<EmailForm>,
) -> Response {
    let email = form.email.trim().to_string();
    if let Err(msg) = validation::email(&email) {
        return forgot_page(Notice::error(msg), false);
    }

    if let Err(retry_after) = state.email_limiter.check(&email) {
        tracing::warn!(email = %email, "Password reset request rate limited");
        return forgot_page(too_many(retry_after), false);
    }

    let Some(_guard) = state.in_flight.begin(&email, "forgot-password") else {
        return forgot_page(Notice::error(IN_PROGRESS), false);
    };

    let req = PasswordResetRequest {
        email: email.clone(),
        redirect_to: "/auth/reset-password".to_string(),
    };

    match state.auth.request_password_reset(&req).await {
        Ok(()) => {
            state.email_limiter.record(&email);
            audit::log_event(None, "user.password_reset_requested", None, Some(&email));
            forgot_page(Notice::success("Reset link sent! Check your email."), true)
        }
        Err(e) => {
            tracing::info!(email = %email, "Password reset request failed: {e}");
            forgot_page(Notice::error(e.message()), false)
        }
    }
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let min_password_length = state.config.min_password_length;
    let page = |notice: Notice, success: bool, token: String| {
        let template = ResetPasswordTemplate {
            notice: Some(notice),
            token,
            success,
            min_password_length,
        };
        Html(template.render().unwrap_or_default()).into_response()
    };

    let token = form.token.trim().to_string();
    if let Err(msg) = validation::password_reset(
        &token,
        &form.password,
        &form.confirm_password,
        min_password_length,
    ) {
        return page(Notice::error(msg), false, token);
    }

    let Some(_guard) = state.in_flight.begin(&token, "reset-password") else {
        return page(Notice::error(IN_PROGRESS), false, token);
    };

    let req = PasswordReset {
        new_password: form.password,
        token: token.clone(),
    };

    match state.auth.reset_password(&req).await {
        Ok(()) => {
            audit::log_event(None, "user.password_reset", None, None);
            page(Notice::success("Password reset successfully!"), true, String::new())
        }
        Err(e) => {
            tracing::info!("Password reset failed: {e}");
            page(Notice::error(e.message()), false, token)
        }
    }
}

pub async fn sign_out(
    State(state): State<SharedState>,
    credentials: Credentials,
    jar: CookieJar,
) -> Response {
    let secure = state.config.secure_cookies();

    match state.auth.sign_out(&credentials).await {
        Ok(cookies) => {
            let jar = notice::flash(
                jar,
                &Notice::success("You've logged out. See you soon!"),
                secure,
            );
            (cookies, jar, Redirect::to("/auth/login")).into_response()
        }
        Err(e) => {
            tracing::warn!("Sign-out failed: {e}");
            notice::redirect_with(jar, &Notice::error(e.message()), secure, "/")
        }
    }
}
