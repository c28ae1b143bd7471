use crate::models::User;

/// Record an audit event on the `audit` tracing target. Called explicitly
/// in handlers after a mutation succeeds.
pub fn log_event(actor: Option<&User>, action: &str, target_id: Option<&str>, details: Option<&str>) {
    let actor_id = actor.map(|u| u.id.as_str()).unwrap_or("anonymous");
    tracing::info!(
        target: "audit",
        actor = actor_id,
        action,
        subject = target_id.unwrap_or("-"),
        details = details.unwrap_or(""),
        "audit event"
    );
}
