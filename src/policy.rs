//! Server-side guards for destructive admin actions.
//!
//! These run on every request against a freshly fetched user list; the
//! dashboard's disabled buttons are cosmetic.

use std::fmt;

use crate::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAdmin,
    DeleteSelf,
    DeleteAdmin,
    ChangeOwnRole,
    RoleUnchanged,
    LastAdmin,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Denial::NotAdmin => "Forbidden",
            Denial::DeleteSelf => "You cannot delete your own account",
            Denial::DeleteAdmin => "Administrators cannot be deleted",
            Denial::ChangeOwnRole => "You cannot change your own role",
            Denial::RoleUnchanged => "User already has this role",
            Denial::LastAdmin => "Cannot demote the last remaining administrator",
        };
        f.write_str(msg)
    }
}

pub fn check_delete(actor: &User, target: &User) -> Result<(), Denial> {
    if !actor.is_admin() {
        return Err(Denial::NotAdmin);
    }
    if actor.id == target.id {
        return Err(Denial::DeleteSelf);
    }
    if target.is_admin() {
        return Err(Denial::DeleteAdmin);
    }
    Ok(())
}

/// `users` is the current full user list, used to count remaining admins.
pub fn check_role_change(
    actor: &User,
    target: &User,
    new_role: Role,
    users: &[User],
) -> Result<(), Denial> {
    if !actor.is_admin() {
        return Err(Denial::NotAdmin);
    }
    if actor.id == target.id {
        return Err(Denial::ChangeOwnRole);
    }
    if target.role == new_role {
        return Err(Denial::RoleUnchanged);
    }
    if target.is_admin() && new_role != Role::Admin {
        let admins = users.iter().filter(|u| u.is_admin()).count();
        if admins <= 1 {
            return Err(Denial::LastAdmin);
        }
    }
    Ok(())
}
