//! Port to the external authentication service.
//!
//! Every identity operation (sessions, sign-in, password flows, admin user
//! management, permission checks) lives behind [`AuthService`]. The app
//! ships [`HttpAuthService`] for a Better-Auth compatible HTTP API; tests
//! substitute an in-memory implementation.

pub mod client;
pub mod cookies;
pub mod credentials;
pub mod error;
pub mod requests;

use async_trait::async_trait;

pub use client::HttpAuthService;
pub use cookies::AuthCookies;
pub use credentials::Credentials;
pub use error::AuthError;
pub use requests::{
    EmailSignIn, EmailSignUp, MagicLinkSignIn, OAuthProvider, PasswordChange, PasswordReset,
    PasswordResetRequest, Permissions, ProfileUpdate, SocialSignIn,
};

use crate::models::{Role, Session, User};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// `Ok(None)` when the credentials carry no valid session.
    async fn get_session(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError>;

    async fn sign_in_email(&self, req: &EmailSignIn) -> Result<AuthCookies, AuthError>;

    async fn sign_up_email(&self, req: &EmailSignUp) -> Result<AuthCookies, AuthError>;

    /// Returns the provider authorization URL the browser must visit.
    async fn sign_in_social(&self, req: &SocialSignIn) -> Result<String, AuthError>;

    async fn sign_in_magic_link(&self, req: &MagicLinkSignIn) -> Result<(), AuthError>;

    async fn request_password_reset(&self, req: &PasswordResetRequest) -> Result<(), AuthError>;

    async fn reset_password(&self, req: &PasswordReset) -> Result<(), AuthError>;

    async fn update_user(
        &self,
        credentials: &Credentials,
        req: &ProfileUpdate,
    ) -> Result<AuthCookies, AuthError>;

    async fn change_password(
        &self,
        credentials: &Credentials,
        req: &PasswordChange,
    ) -> Result<AuthCookies, AuthError>;

    async fn sign_out(&self, credentials: &Credentials) -> Result<AuthCookies, AuthError>;

    async fn list_users(
        &self,
        credentials: &Credentials,
        sort_by: &str,
    ) -> Result<Vec<User>, AuthError>;

    async fn set_role(
        &self,
        credentials: &Credentials,
        user_id: &str,
        role: Role,
    ) -> Result<(), AuthError>;

    /// Whether the caller identified by `credentials` holds every permission.
    async fn has_permission(
        &self,
        credentials: &Credentials,
        permissions: &Permissions,
    ) -> Result<bool, AuthError>;

    async fn remove_user(&self, credentials: &Credentials, user_id: &str)
    -> Result<(), AuthError>;
}
