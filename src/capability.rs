use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{AuthService, Permissions};
use crate::models::Session;

/// Named actions gated by the auth service's access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `user:set-role`
    SetRole,
    /// `posts:update` and `posts:delete` on every post
    ManageAllPosts,
}

impl Capability {
    pub fn permissions(self) -> Permissions {
        match self {
            Capability::SetRole => Permissions::new().grant("user", &["set-role"]),
            Capability::ManageAllPosts => Permissions::new().grant("posts", &["update", "delete"]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::SetRole => "user:set-role",
            Capability::ManageAllPosts => "posts:update,delete",
        }
    }
}

/// Answers whether an actor may perform a capability.
///
/// Implementations must return `true` only on an explicit grant; errors and
/// ambiguous answers are a denial.
#[async_trait]
pub trait CapabilityCheck: Send + Sync {
    async fn has_capability(&self, actor: &Session, capability: Capability) -> bool;
}

/// Asks the auth service, on the actor's own credentials.
pub struct RemoteCapabilities {
    auth: Arc<dyn AuthService>,
}

impl RemoteCapabilities {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl CapabilityCheck for RemoteCapabilities {
    async fn has_capability(&self, actor: &Session, capability: Capability) -> bool {
        match self
            .auth
            .has_permission(&actor.credentials, &capability.permissions())
            .await
        {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(
                    "Capability check {} for user {} failed, denying: {e}",
                    capability.as_str(),
                    actor.user.id
                );
                false
            }
        }
    }
}
