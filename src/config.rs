use std::net::IpAddr;

use crate::auth::OAuthProvider;

#[derive(Debug, Clone)]
pub struct Config {
    pub auth_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub min_password_length: usize,
    pub oauth_providers: Vec<OAuthProvider>,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let auth_url = env_required("SASSFA_AUTH_URL")?;

        let host: IpAddr = env_or("SASSFA_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SASSFA_HOST: {e}"))?;

        let port: u16 = env_or("SASSFA_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SASSFA_PORT: {e}"))?;

        let base_url = env_or("SASSFA_BASE_URL", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let min_password_length: usize = env_or("SASSFA_MIN_PASSWORD_LENGTH", "8")
            .parse()
            .map_err(|e| format!("Invalid SASSFA_MIN_PASSWORD_LENGTH: {e}"))?;
        if min_password_length == 0 {
            return Err("SASSFA_MIN_PASSWORD_LENGTH must be at least 1".to_string());
        }

        let oauth_providers: Vec<OAuthProvider> = env_or("SASSFA_OAUTH_PROVIDERS", "github,google")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|e| format!("Invalid SASSFA_OAUTH_PROVIDERS entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_body_size: usize = env_or("SASSFA_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid SASSFA_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("SASSFA_LOG_LEVEL", "info");

        Ok(Config {
            auth_url,
            host,
            port,
            base_url,
            min_password_length,
            oauth_providers,
            max_body_size,
            log_level,
        })
    }

    /// Cookies set by the app itself are `Secure` when served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    pub fn oauth_enabled(&self, provider: OAuthProvider) -> bool {
        self.oauth_providers.contains(&provider)
    }
}
