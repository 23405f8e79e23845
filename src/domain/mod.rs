//! Domain types for shift planning with strong typing.
//!
//! Identifiers are newtypes so that a user id can never be passed where a
//! store id is expected. Caller identity and role scoping live in the
//! submodules.

pub mod role;
pub mod scope;

pub use role::{Caller, Role};
pub use scope::{Scope, ScopeRegistry};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a user account (assignee, creator or caller).
    ///
    /// ```rust
    /// use planning_api::domain::UserId;
    ///
    /// let id = UserId::new(42);
    /// assert_eq!(id.value(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    UserId
);

entity_id!(
    /// Identifier of a store (magasin).
    MagasinId
);

entity_id!(
    /// Identifier of a planning entry.
    PlanningId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_i32() {
        let id = MagasinId::from(7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(PlanningId::new(3).value(), 3);
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&UserId::new(5)).unwrap();
        assert_eq!(json, "5");

        let parsed: PlanningId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, PlanningId::new(12));
    }
}
