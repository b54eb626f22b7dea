//! Admin role hierarchy and role policy.
//!
//! The console uses a strict three-tier hierarchy: every admin account
//! holds exactly one role, and most operations are gated on a minimum
//! role. Non-hierarchical allow-lists use [`Role::in_set`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of an admin account.
///
/// Ordering is the permission hierarchy: `Viewer < Manager < Admin`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Viewer,
    Manager,
    Admin,
}

impl Role {
    /// Numeric rank within the hierarchy: viewer 0, manager 1, admin 2.
    pub fn rank(self) -> u8 {
        match self {
            Role::Viewer => 0,
            Role::Manager => 1,
            Role::Admin => 2,
        }
    }

    /// True iff this role's rank meets or exceeds `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Exact-membership check against an allow-list. Used for
    /// multi-role gates that are not strictly hierarchical.
    pub fn in_set(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }

    /// Parse a stored role string. Unknown strings yield `None`, which
    /// every policy check treats as failing (an unknown role never
    /// satisfies anything).
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Viewer" => Some(Role::Viewer),
            "Manager" => Some(Role::Manager),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Canonical string form, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "Viewer",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 3] = [Role::Viewer, Role::Manager, Role::Admin];

    #[test]
    fn hierarchy_is_total() {
        for a in ALL {
            for b in ALL {
                if a.rank() > b.rank() {
                    assert!(a.satisfies(b), "{a} should satisfy {b}");
                    assert!(!b.satisfies(a), "{b} should not satisfy {a}");
                }
            }
        }
    }

    #[test]
    fn every_role_satisfies_itself() {
        for r in ALL {
            assert!(r.satisfies(r));
        }
    }

    #[test]
    fn allow_list_is_exact_membership() {
        // Admin outranks Manager but is not in a manager-only list.
        assert!(!Role::Admin.in_set(&[Role::Manager]));
        assert!(Role::Manager.in_set(&[Role::Manager, Role::Viewer]));
        assert!(!Role::Viewer.in_set(&[]));
    }

    #[test]
    fn parse_roundtrip() {
        for r in ALL {
            assert_eq!(Role::parse(r.as_str()), Some(r));
        }
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        assert_eq!(Role::parse("Superuser"), None);
        assert_eq!(Role::parse("admin"), None); // case-sensitive
        assert_eq!(Role::parse(""), None);
    }
}
