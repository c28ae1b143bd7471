use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{COOKIE, ORIGIN, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::requests::{PermissionCheck, RemoveUser, SetRole};
use crate::auth::{
    AuthCookies, AuthError, AuthService, Credentials, EmailSignIn, EmailSignUp, MagicLinkSignIn,
    PasswordChange, PasswordReset, PasswordResetRequest, Permissions, ProfileUpdate, SocialSignIn,
};
use crate::models::{Role, Session, User};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`AuthService`] backed by a Better-Auth compatible HTTP API.
///
/// The base URL points at the service's auth mount, e.g.
/// `http://localhost:3001/api/auth`. No request timeout is set; the service's
/// own timeouts apply. Only connecting is bounded so an unreachable service
/// fails fast.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    base_url: Url,
    origin: String,
    inner: reqwest::Client,
}

#[derive(Deserialize)]
struct SessionEnvelope {
    session: SessionRecord,
    user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct SocialRedirect {
    url: Option<String>,
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct PermissionAnswer {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpAuthService {
    pub fn new(base_url: &str, origin: &str) -> Result<Self, AuthError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| AuthError::InvalidUrl(format!("{base_url}: {e}")))?;

        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            origin: origin.trim_end_matches('/').to_string(),
            inner,
        })
    }

    fn url(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AuthError::InvalidUrl(format!("{path}: {e}")))
    }

    fn request(&self, method: Method, url: Url, credentials: Option<&Credentials>) -> RequestBuilder {
        let mut req = self.inner.request(method, url).header(ORIGIN, &self.origin);
        if let Some(cookie) = credentials.and_then(Credentials::cookie_header) {
            req = req.header(COOKIE, cookie.clone());
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, AuthError> {
        let res = req
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        check_error(res).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        body: &B,
    ) -> Result<Response, AuthError> {
        let url = self.url(path)?;
        tracing::debug!("POST {url}");
        self.send(self.request(Method::POST, url, credentials).json(body))
            .await
    }

    async fn get(&self, url: Url, credentials: Option<&Credentials>) -> Result<Response, AuthError> {
        tracing::debug!("GET {url}");
        self.send(self.request(Method::GET, url, credentials)).await
    }
}

async fn check_error(res: Response) -> Result<Response, AuthError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(AuthError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, AuthError> {
    res.json::<T>()
        .await
        .map_err(|e| AuthError::Decode(e.to_string()))
}

fn relayed_cookies(res: &Response) -> AuthCookies {
    res.headers().get_all(SET_COOKIE).iter().cloned().collect()
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn get_session(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError> {
        let res = self.get(self.url("get-session")?, Some(credentials)).await?;
        let envelope: Option<SessionEnvelope> = decode(res).await?;

        Ok(envelope.map(|env| Session {
            user: env.user,
            expires_at: env.session.expires_at,
            credentials: credentials.clone(),
        }))
    }

    async fn sign_in_email(&self, req: &EmailSignIn) -> Result<AuthCookies, AuthError> {
        let res = self.post("sign-in/email", None, req).await?;
        Ok(relayed_cookies(&res))
    }

    async fn sign_up_email(&self, req: &EmailSignUp) -> Result<AuthCookies, AuthError> {
        let res = self.post("sign-up/email", None, req).await?;
        Ok(relayed_cookies(&res))
    }

    async fn sign_in_social(&self, req: &SocialSignIn) -> Result<String, AuthError> {
        let res = self.post("sign-in/social", None, req).await?;
        let redirect: SocialRedirect = decode(res).await?;
        redirect
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AuthError::Decode("social sign-in returned no redirect URL".to_string()))
    }

    async fn sign_in_magic_link(&self, req: &MagicLinkSignIn) -> Result<(), AuthError> {
        self.post("sign-in/magic-link", None, req).await?;
        Ok(())
    }

    async fn request_password_reset(&self, req: &PasswordResetRequest) -> Result<(), AuthError> {
        self.post("forget-password", None, req).await?;
        Ok(())
    }

    async fn reset_password(&self, req: &PasswordReset) -> Result<(), AuthError> {
        self.post("reset-password", None, req).await?;
        Ok(())
    }

    async fn update_user(
        &self,
        credentials: &Credentials,
        req: &ProfileUpdate,
    ) -> Result<AuthCookies, AuthError> {
        let res = self.post("update-user", Some(credentials), req).await?;
        Ok(relayed_cookies(&res))
    }

    async fn change_password(
        &self,
        credentials: &Credentials,
        req: &PasswordChange,
    ) -> Result<AuthCookies, AuthError> {
        let res = self.post("change-password", Some(credentials), req).await?;
        Ok(relayed_cookies(&res))
    }

    async fn sign_out(&self, credentials: &Credentials) -> Result<AuthCookies, AuthError> {
        let res = self
            .post("sign-out", Some(credentials), &serde_json::json!({}))
            .await?;
        Ok(relayed_cookies(&res))
    }

    async fn list_users(
        &self,
        credentials: &Credentials,
        sort_by: &str,
    ) -> Result<Vec<User>, AuthError> {
        let mut url = self.url("admin/list-users")?;
        url.query_pairs_mut().append_pair("sortBy", sort_by);

        let res = self.get(url, Some(credentials)).await?;
        let list: UserList = decode(res).await?;
        Ok(list.users)
    }

    async fn set_role(
        &self,
        credentials: &Credentials,
        user_id: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        let body = SetRole {
            user_id: user_id.to_string(),
            role,
        };
        self.post("admin/set-role", Some(credentials), &body).await?;
        Ok(())
    }

    async fn has_permission(
        &self,
        credentials: &Credentials,
        permissions: &Permissions,
    ) -> Result<bool, AuthError> {
        let res = self
            .post(
                "admin/has-permission",
                Some(credentials),
                &PermissionCheck { permissions },
            )
            .await?;
        let answer: PermissionAnswer = decode(res).await?;
        Ok(answer.success && answer.error.is_none())
    }

    async fn remove_user(
        &self,
        credentials: &Credentials,
        user_id: &str,
    ) -> Result<(), AuthError> {
        let body = RemoveUser {
            user_id: user_id.to_string(),
        };
        self.post("admin/remove-user", Some(credentials), &body)
            .await?;
        Ok(())
    }
}
