use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MagasinId, UserId};

/// Caller classification.
///
/// Stored as free text in the `users` table; anything that is not one of the
/// three known roles (including an empty string) parses to [`Role::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employe,
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "employe" => Self::Employe,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employe => "employe",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this role may create, modify or remove planning entries.
    #[must_use]
    pub const fn can_write_plannings(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity attached to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub magasin_id: Option<MagasinId>,
}

impl Caller {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            magasin_id: None,
        }
    }

    #[must_use]
    pub const fn with_magasin(mut self, magasin_id: Option<MagasinId>) -> Self {
        self.magasin_id = magasin_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("Manager"), Role::Manager);
        assert_eq!(Role::parse(" employe "), Role::Employe);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(Role::parse(""), Role::Unknown);
        assert_eq!(Role::parse("employee"), Role::Unknown);
        assert_eq!(Role::parse("superuser"), Role::Unknown);
    }

    #[test]
    fn only_admin_and_manager_write() {
        assert!(Role::Admin.can_write_plannings());
        assert!(Role::Manager.can_write_plannings());
        assert!(!Role::Employe.can_write_plannings());
        assert!(!Role::Unknown.can_write_plannings());
    }

    #[test]
    fn unrecognized_role_deserializes_to_unknown() {
        let role: Role = serde_json::from_str("\"stagiaire\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }
}
