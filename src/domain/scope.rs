//! Role-keyed visibility rules for planning entries.
//!
//! Each role maps to a function that turns the caller into a [`Scope`]. The
//! scope is then rendered as a query condition by the persistence layer or
//! checked in memory for single records. Roles without a registered rule see
//! nothing.

use std::collections::HashMap;

use super::{Caller, MagasinId, Role, UserId};

/// The set of planning entries a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Magasin(MagasinId),
    User(UserId),
    Nothing,
}

impl Scope {
    /// Checks a single record against this scope.
    #[must_use]
    pub fn permits(&self, user: UserId, magasin: MagasinId) -> bool {
        match self {
            Self::All => true,
            Self::Magasin(id) => *id == magasin,
            Self::User(id) => *id == user,
            Self::Nothing => false,
        }
    }
}

pub type ScopeRule = fn(&Caller) -> Scope;

fn admin_scope(_caller: &Caller) -> Scope {
    Scope::All
}

fn manager_scope(caller: &Caller) -> Scope {
    caller.magasin_id.map_or(Scope::Nothing, Scope::Magasin)
}

fn employe_scope(caller: &Caller) -> Scope {
    Scope::User(caller.id)
}

#[derive(Debug, Clone)]
pub struct ScopeRegistry {
    rules: HashMap<Role, ScopeRule>,
}

impl ScopeRegistry {
    /// A registry with no rules; every caller resolves to [`Scope::Nothing`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn register(&mut self, role: Role, rule: ScopeRule) -> &mut Self {
        self.rules.insert(role, rule);
        self
    }

    #[must_use]
    pub fn resolve(&self, caller: &Caller) -> Scope {
        self.rules
            .get(&caller.role)
            .map_or(Scope::Nothing, |rule| rule(caller))
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Role::Admin, admin_scope)
            .register(Role::Manager, manager_scope)
            .register(Role::Employe, employe_scope);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role, magasin: Option<i32>) -> Caller {
        Caller::new(UserId::new(42), "someone@example.com", role)
            .with_magasin(magasin.map(MagasinId::new))
    }

    #[test]
    fn admin_sees_everything() {
        let scope = ScopeRegistry::default().resolve(&caller(Role::Admin, None));
        assert_eq!(scope, Scope::All);
        assert!(scope.permits(UserId::new(1), MagasinId::new(99)));
    }

    #[test]
    fn manager_is_bound_to_own_store() {
        let registry = ScopeRegistry::default();
        let scope = registry.resolve(&caller(Role::Manager, Some(7)));
        assert_eq!(scope, Scope::Magasin(MagasinId::new(7)));
        assert!(scope.permits(UserId::new(1), MagasinId::new(7)));
        assert!(!scope.permits(UserId::new(1), MagasinId::new(9)));
    }

    #[test]
    fn manager_without_store_sees_nothing() {
        let scope = ScopeRegistry::default().resolve(&caller(Role::Manager, None));
        assert_eq!(scope, Scope::Nothing);
    }

    #[test]
    fn employe_sees_own_entries_regardless_of_store() {
        let scope = ScopeRegistry::default().resolve(&caller(Role::Employe, Some(7)));
        assert_eq!(scope, Scope::User(UserId::new(42)));
        assert!(scope.permits(UserId::new(42), MagasinId::new(9)));
        assert!(!scope.permits(UserId::new(43), MagasinId::new(7)));
    }

    #[test]
    fn unknown_role_sees_nothing() {
        let scope = ScopeRegistry::default().resolve(&caller(Role::Unknown, Some(7)));
        assert_eq!(scope, Scope::Nothing);
        assert!(!scope.permits(UserId::new(42), MagasinId::new(7)));
    }

    #[test]
    fn new_roles_plug_in_without_touching_callers() {
        let mut registry = ScopeRegistry::default();
        registry.register(Role::Unknown, |_| Scope::All);
        assert_eq!(registry.resolve(&caller(Role::Unknown, None)), Scope::All);
    }
}
