//! Deriving the admin dashboard's view of the user list.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Role, User};

/// Users whose name, email or id contain `query`, case-insensitively.
/// A blank query keeps every user; otherwise the query is matched as typed,
/// surrounding whitespace included.
pub fn filter<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    if query.trim().is_empty() {
        return users.iter().collect();
    }
    let query = query.to_lowercase();

    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&query)
                || user.email.to_lowercase().contains(&query)
                || user.id.to_lowercase().contains(&query)
        })
        .collect()
}

/// Stable partition: admins first, each group keeps its incoming order.
pub fn admins_first<'a>(users: Vec<&'a User>) -> Vec<&'a User> {
    let (mut admins, regular): (Vec<_>, Vec<_>) =
        users.into_iter().partition(|user| user.role == Role::Admin);
    admins.extend(regular);
    admins
}

/// The rows the dashboard shows for `query`.
pub fn visible<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    admins_first(filter(users, query))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total: usize,
    pub admins: usize,
    pub regular: usize,
    pub verified: usize,
    pub new_this_week: usize,
}

impl DirectoryStats {
    pub fn collect(users: &[User], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);

        Self {
            total: users.len(),
            admins: users.iter().filter(|u| u.role == Role::Admin).count(),
            regular: users.iter().filter(|u| u.role == Role::User).count(),
            verified: users.iter().filter(|u| u.email_verified).count(),
            new_this_week: users
                .iter()
                .filter(|u| u.created_at.is_some_and(|at| at >= week_ago))
                .count(),
        }
    }
}
