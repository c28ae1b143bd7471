use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Github,
    Google,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Github => "github",
            OAuthProvider::Google => "google",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OAuthProvider::Github => "GitHub",
            OAuthProvider::Google => "Google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(OAuthProvider::Github),
            "google" => Ok(OAuthProvider::Google),
            other => Err(format!("Unsupported OAuth provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailSignIn {
    pub email: String,
    pub password: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailSignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialSignIn {
    pub provider: OAuthProvider,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    #[serde(rename = "errorCallbackURL")]
    pub error_callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MagicLinkSignIn {
    pub email: String,
    pub name: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub new_password: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub revoke_other_sessions: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRole {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUser {
    pub user_id: String,
}

/// Resource → actions map understood by the service's access-control plugin,
/// e.g. `{"user": ["set-role"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Permissions(BTreeMap<String, Vec<String>>);

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, resource: &str, actions: &[&str]) -> Self {
        self.0
            .entry(resource.to_string())
            .or_default()
            .extend(actions.iter().map(|a| a.to_string()));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionCheck<'a> {
    pub permissions: &'a Permissions,
}
