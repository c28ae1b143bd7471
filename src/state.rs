use std::sync::Arc;

use crate::auth::AuthService;
use crate::capability::{CapabilityCheck, RemoteCapabilities};
use crate::config::Config;
use crate::pending::InFlight;
use crate::rate_limit::AttemptLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn AuthService>,
    pub capabilities: Arc<dyn CapabilityCheck>,
    pub in_flight: InFlight,
    pub sign_in_limiter: AttemptLimiter,
    pub email_limiter: AttemptLimiter,
}

impl AppState {
    pub fn new(config: Config, auth: Arc<dyn AuthService>) -> Self {
        Self {
            config,
            capabilities: Arc::new(RemoteCapabilities::new(auth.clone())),
            auth,
            in_flight: InFlight::new(),
            sign_in_limiter: AttemptLimiter::sign_in(),
            email_limiter: AttemptLimiter::email(),
        }
    }
}
