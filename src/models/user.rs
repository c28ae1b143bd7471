use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Coarse access level attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Lenient parse used for data coming back from the auth service.
    /// Anything that is not recognisably an admin role is a plain user.
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::from_wire).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Avatar URL, ignoring blank values the service may store.
    pub fn avatar(&self) -> Option<&str> {
        self.image.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn joined(&self) -> String {
        self.created_at
            .map(|at| at.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_deserializes_leniently() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "role": "admin",
            "emailVerified": true,
            "createdAt": "2026-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.email_verified);

        let missing: User =
            serde_json::from_value(json!({ "id": "u2", "email": "b@example.com", "role": null }))
                .unwrap();
        assert_eq!(missing.role, Role::User);
        assert_eq!(missing.joined(), "N/A");
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("ADMIN"));
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn form_role_must_match_exactly() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("user".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!(" ADMIN ".parse::<Role>().is_err());

        // Wire decoding stays lenient
        let role: Role = serde_json::from_value(json!("admin")).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn presentation_helpers() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "grace hopper",
            "email": "grace@example.com",
            "image": "  ",
            "createdAt": "2026-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.initials(), "GR");
        assert_eq!(user.first_name(), "grace");
        assert_eq!(user.avatar(), None);
        assert_eq!(user.joined(), "Jan 5, 2026");
    }
}
