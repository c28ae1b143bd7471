use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Submissions currently in flight, keyed by (actor, action).
///
/// A second identical submission is turned away until the first finishes.
/// Different actions, or different actors, never block each other.
pub struct InFlight {
    active: DashMap<(String, &'static str), Instant>,
}

/// Releases the slot on drop.
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    key: (String, &'static str),
}

impl InFlight {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    pub fn begin(&self, actor: &str, action: &'static str) -> Option<InFlightGuard<'_>> {
        let key = (actor.to_lowercase(), action);
        match self.active.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!(
                    "Rejecting duplicate {action} submission, first started {:?} ago",
                    entry.get().elapsed()
                );
                None
            }
            Entry::Vacant(entry) => {
                entry.insert(Instant::now());
                Some(InFlightGuard {
                    registry: self,
                    key,
                })
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.active.remove(&self.key);
    }
}
