#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::HeaderValue;
use chrono::{Duration, Utc};
use reqwest::{Client, Response};
use uuid::Uuid;

use sassfa::auth::{
    AuthCookies, AuthError, AuthService, Credentials, EmailSignIn, EmailSignUp, MagicLinkSignIn,
    OAuthProvider, PasswordChange, PasswordReset, PasswordResetRequest, Permissions,
    ProfileUpdate, SocialSignIn,
};
use sassfa::config::Config;
use sassfa::models::{Role, Session, User};

pub const SESSION_COOKIE: &str = "better-auth.session_token";
pub const PASSWORD: &str = "password123";

/// How the fake answers `admin/has-permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAnswer {
    Grant,
    Deny,
    Fail,
}

/// In-memory stand-in for the external auth service. Every call is
/// recorded so tests can assert which upstream operations were issued.
pub struct FakeAuthService {
    users: Mutex<Vec<User>>,
    sessions: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    permission: Mutex<PermissionAnswer>,
    sessions_down: Mutex<bool>,
    sessions_expired: Mutex<bool>,
    listed_roles: Mutex<HashMap<String, Role>>,
}

impl FakeAuthService {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            sessions: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            permission: Mutex::new(PermissionAnswer::Grant),
            sessions_down: Mutex::new(false),
            sessions_expired: Mutex::new(false),
            listed_roles: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_user(&self, id: &str, name: &str, email: &str, role: Role) {
        self.users.lock().unwrap().push(User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            image: None,
            email_verified: true,
            created_at: Some(Utc::now() - Duration::days(30)),
        });
    }

    /// Open a session for `user_id` and return the browser's Cookie header.
    pub fn login_as(&self, user_id: &str) -> String {
        let token = Uuid::now_v7().simple().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(token.clone(), user_id.to_string());
        format!("{SESSION_COOKIE}={token}")
    }

    pub fn set_permission(&self, answer: PermissionAnswer) {
        *self.permission.lock().unwrap() = answer;
    }

    pub fn fail_session_lookups(&self) {
        *self.sessions_down.lock().unwrap() = true;
    }

    /// Sessions come back with an expiry already in the past.
    pub fn expire_sessions(&self) {
        *self.sessions_expired.lock().unwrap() = true;
    }

    /// Report `role` for `user_id` in user listings only, as when another
    /// admin changed it after the caller's session was resolved.
    pub fn list_role_as(&self, user_id: &str, role: Role) {
        self.listed_roles
            .lock()
            .unwrap()
            .insert(user_id.to_string(), role);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c == op || c.starts_with(&format!("{op}:")))
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn token(credentials: &Credentials) -> Option<String> {
        let header = credentials.cookie_header()?.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
    }

    fn caller(&self, credentials: &Credentials) -> Option<User> {
        let token = Self::token(credentials)?;
        let user_id = self.sessions.lock().unwrap().get(&token).cloned()?;
        self.user(&user_id)
    }

    fn open_session(&self, user_id: &str) -> AuthCookies {
        let cookie = self.login_as(user_id);
        AuthCookies(vec![
            HeaderValue::from_str(&format!("{cookie}; Path=/; HttpOnly; SameSite=Lax")).unwrap(),
        ])
    }

    fn unauthorized() -> AuthError {
        AuthError::Rejected {
            status: 401,
            message: "Unauthorized".to_string(),
        }
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn get_session(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError> {
        self.record("get_session");
        if *self.sessions_down.lock().unwrap() {
            return Err(AuthError::Transport("connection refused".to_string()));
        }
        let expires_at = if *self.sessions_expired.lock().unwrap() {
            Utc::now() - Duration::minutes(1)
        } else {
            Utc::now() + Duration::days(7)
        };
        Ok(self.caller(credentials).map(|user| Session {
            user,
            expires_at: Some(expires_at),
            credentials: credentials.clone(),
        }))
    }

    async fn sign_in_email(&self, req: &EmailSignIn) -> Result<AuthCookies, AuthError> {
        self.record(format!("sign_in_email:{}", req.email));
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == req.email)
            .cloned();
        match user {
            Some(user) if req.password == PASSWORD => Ok(self.open_session(&user.id)),
            _ => Err(AuthError::Rejected {
                status: 401,
                message: "Invalid email or password".to_string(),
            }),
        }
    }

    async fn sign_up_email(&self, req: &EmailSignUp) -> Result<AuthCookies, AuthError> {
        self.record(format!("sign_up_email:{}", req.email));
        if self.users.lock().unwrap().iter().any(|u| u.email == req.email) {
            return Err(AuthError::Rejected {
                status: 422,
                message: "User already exists".to_string(),
            });
        }
        let id = Uuid::now_v7().to_string();
        self.add_user(&id, &req.name, &req.email, Role::User);
        Ok(self.open_session(&id))
    }

    async fn sign_in_social(&self, req: &SocialSignIn) -> Result<String, AuthError> {
        self.record(format!("sign_in_social:{}", req.provider));
        let host = match req.provider {
            OAuthProvider::Github => "github.com",
            OAuthProvider::Google => "accounts.google.com",
        };
        Ok(format!("https://{host}/oauth/authorize?state=test"))
    }

    async fn sign_in_magic_link(&self, req: &MagicLinkSignIn) -> Result<(), AuthError> {
        self.record(format!("sign_in_magic_link:{}:{}", req.email, req.name));
        Ok(())
    }

    async fn request_password_reset(&self, req: &PasswordResetRequest) -> Result<(), AuthError> {
        self.record(format!("request_password_reset:{}", req.email));
        Ok(())
    }

    async fn reset_password(&self, req: &PasswordReset) -> Result<(), AuthError> {
        self.record(format!("reset_password:{}", req.token));
        if req.token == "expired" {
            return Err(AuthError::Rejected {
                status: 400,
                message: "Invalid token".to_string(),
            });
        }
        Ok(())
    }

    async fn update_user(
        &self,
        credentials: &Credentials,
        update: &ProfileUpdate,
    ) -> Result<AuthCookies, AuthError> {
        let caller = self.caller(credentials).ok_or_else(Self::unauthorized)?;
        self.record(format!(
            "update_user:{}:{}",
            update.name.as_deref().unwrap_or("-"),
            update.image
        ));
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == caller.id) {
            if let Some(name) = &update.name {
                user.name = name.clone();
            }
            user.image = Some(update.image.clone()).filter(|i| !i.is_empty());
        }
        Ok(AuthCookies::default())
    }

    async fn change_password(
        &self,
        credentials: &Credentials,
        change: &PasswordChange,
    ) -> Result<AuthCookies, AuthError> {
        self.caller(credentials).ok_or_else(Self::unauthorized)?;
        self.record("change_password");
        if change.current_password != PASSWORD {
            return Err(AuthError::Rejected {
                status: 400,
                message: "Invalid password".to_string(),
            });
        }
        Ok(AuthCookies::default())
    }

    async fn sign_out(&self, credentials: &Credentials) -> Result<AuthCookies, AuthError> {
        self.record("sign_out");
        if let Some(token) = Self::token(credentials) {
            self.sessions.lock().unwrap().remove(&token);
        }
        Ok(AuthCookies(vec![HeaderValue::from_static(
            "better-auth.session_token=; Path=/; Max-Age=0",
        )]))
    }

    async fn list_users(
        &self,
        credentials: &Credentials,
        sort_by: &str,
    ) -> Result<Vec<User>, AuthError> {
        self.caller(credentials).ok_or_else(Self::unauthorized)?;
        self.record(format!("list_users:{sort_by}"));
        let listed = self.listed_roles.lock().unwrap();
        let mut users = self.users.lock().unwrap().clone();
        for user in &mut users {
            if let Some(role) = listed.get(&user.id) {
                user.role = *role;
            }
        }
        Ok(users)
    }

    async fn set_role(
        &self,
        credentials: &Credentials,
        user_id: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        self.caller(credentials).ok_or_else(Self::unauthorized)?;
        self.record(format!("set_role:{user_id}:{role}"));
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.role = role;
        }
        Ok(())
    }

    async fn has_permission(
        &self,
        _credentials: &Credentials,
        permissions: &Permissions,
    ) -> Result<bool, AuthError> {
        let body = serde_json::to_value(permissions).unwrap();
        let resources: Vec<&str> = body
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        self.record(format!("has_permission:{}", resources.join(",")));
        match *self.permission.lock().unwrap() {
            PermissionAnswer::Grant => Ok(true),
            PermissionAnswer::Deny => Ok(false),
            PermissionAnswer::Fail => Err(AuthError::Transport("timed out".to_string())),
        }
    }

    async fn remove_user(&self, credentials: &Credentials, user_id: &str) -> Result<(), AuthError> {
        self.caller(credentials).ok_or_else(Self::unauthorized)?;
        self.record(format!("remove_user:{user_id}"));
        self.users.lock().unwrap().retain(|u| u.id != user_id);
        Ok(())
    }
}

/// A running test server backed by a [`FakeAuthService`].
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub auth: Arc<FakeAuthService>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut req = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            req = req.header("cookie", cookie);
        }
        req.send().await.expect("get request failed")
    }

    pub async fn post_form(
        &self,
        path: &str,
        cookie: Option<&str>,
        form: &[(&str, &str)],
    ) -> Response {
        let mut req = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            req = req.header("cookie", cookie);
        }
        req.send().await.expect("post request failed")
    }

    /// Seed an admin ("admin-1") and a regular user ("user-1"), returning
    /// their cookies.
    pub fn seed(&self) -> (String, String) {
        self.auth
            .add_user("admin-1", "Grace Hopper", "grace@example.com", Role::Admin);
        self.auth
            .add_user("user-1", "Ada Lovelace", "ada@example.com", Role::User);
        (self.auth.login_as("admin-1"), self.auth.login_as("user-1"))
    }
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Message of the notice flashed by a redirecting response.
pub fn flashed(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|c| c.strip_prefix("sassfa_notice="))
        .and_then(|c| c.split(';').next())
        .and_then(|hexed| hex::decode(hexed).ok())
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .and_then(|v| v["message"].as_str().map(str::to_string))
}

pub fn test_config() -> Config {
    Config {
        auth_url: "http://auth.invalid/api/auth".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:3000".to_string(),
        min_password_length: 8,
        oauth_providers: vec![OAuthProvider::Github, OAuthProvider::Google],
        max_body_size: 65_536,
        log_level: "warn".to_string(),
    }
}

/// Spawn the app on a random port.
pub async fn spawn_app() -> TestApp {
    let auth = Arc::new(FakeAuthService::new());
    let app = sassfa::build_app(test_config(), auth.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client, auth }
}
