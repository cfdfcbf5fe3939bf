//! Capability resolution for the admin console.
//!
//! A [`RoleDescriptor`] is supplied by an external store and is only read here.
//! Three capabilities are derived from it: admin, edit and delete. The resolver
//! borrows the descriptor per call and keeps nothing between calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role name and permission tag that both grant admin rights
pub const ADMIN: &str = "admin";
/// Permission tag granting edit rights
pub const EDIT: &str = "edit";
/// Permission tag granting delete rights
pub const DELETE: &str = "delete";

/// The current actor as described by the role store
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RoleDescriptor {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl RoleDescriptor {
    pub fn new<I, S>(username: &str, role: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// The three derived capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub admin: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Capabilities {
    /// No capabilities at all, used when no descriptor is available
    pub const NONE: Capabilities = Capabilities {
        admin: false,
        edit: false,
        delete: false,
    };
}

/// Resolves capabilities for an explicitly passed role descriptor
#[derive(Debug, Clone, Copy)]
pub struct CapabilityResolver<'a> {
    role: Option<&'a RoleDescriptor>,
}

impl<'a> CapabilityResolver<'a> {
    pub fn new(role: Option<&'a RoleDescriptor>) -> Self {
        Self { role }
    }

    /// `role == "admin"` or `"admin"` in permissions
    pub fn is_admin(&self) -> bool {
        self.role
            .is_some_and(|r| r.role == ADMIN || r.has_permission(ADMIN))
    }

    pub fn can_edit(&self) -> bool {
        self.role.is_some_and(|r| r.has_permission(EDIT)) || self.is_admin()
    }

    pub fn can_delete(&self) -> bool {
        self.role.is_some_and(|r| r.has_permission(DELETE)) || self.is_admin()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            admin: self.is_admin(),
            edit: self.can_edit(),
            delete: self.can_delete(),
        }
    }
}

pub fn is_admin(role: Option<&RoleDescriptor>) -> bool {
    CapabilityResolver::new(role).is_admin()
}

pub fn can_edit(role: Option<&RoleDescriptor>) -> bool {
    CapabilityResolver::new(role).can_edit()
}

pub fn can_delete(role: Option<&RoleDescriptor>) -> bool {
    CapabilityResolver::new(role).can_delete()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(role: &str, perms: &[&str]) -> RoleDescriptor {
        RoleDescriptor::new("tester", role, perms.iter().copied())
    }

    #[test]
    fn test_absent_role_has_no_capabilities() {
        let resolver = CapabilityResolver::new(None);
        assert!(!resolver.is_admin());
        assert!(!resolver.can_edit());
        assert!(!resolver.can_delete());
        assert_eq!(resolver.capabilities(), Capabilities::NONE);
    }

    #[test]
    fn test_admin_by_role_name() {
        let r = role("admin", &[]);
        assert!(is_admin(Some(&r)));
        assert!(can_edit(Some(&r)));
        assert!(can_delete(Some(&r)));
    }

    #[test]
    fn test_admin_by_permission() {
        let r = role("viewer", &["read", "admin"]);
        assert!(is_admin(Some(&r)));
        assert!(can_edit(Some(&r)));
        assert!(can_delete(Some(&r)));
    }

    #[test]
    fn test_non_admin_never_admin() {
        for perms in [
            &[][..],
            &["read"][..],
            &["edit", "delete"][..],
            &["Admin"][..],
            &["administrator"][..],
        ] {
            for name in ["viewer", "Admin", "", "admins"] {
                let r = role(name, perms);
                assert!(!is_admin(Some(&r)), "{name} {perms:?}");
            }
        }
    }

    #[test]
    fn test_edit_without_delete() {
        let r = role("traffic", &["read", "edit"]);
        let caps = CapabilityResolver::new(Some(&r)).capabilities();
        assert_eq!(
            caps,
            Capabilities {
                admin: false,
                edit: true,
                delete: false
            }
        );
    }

    #[test]
    fn test_delete_without_edit() {
        let r = role("cleanup", &["delete"]);
        assert!(!can_edit(Some(&r)));
        assert!(can_delete(Some(&r)));
    }

    #[test]
    fn test_descriptor_from_json() {
        let r: RoleDescriptor = serde_json::from_str(
            r#"{"username":"sara","role":"officer","permissions":["read","edit","edit"]}"#,
        )
        .unwrap();
        assert_eq!(r.username, "sara");
        assert_eq!(r.permissions.len(), 2);
        assert!(can_edit(Some(&r)));
    }

    #[test]
    fn test_descriptor_missing_fields_default_empty() {
        let r: RoleDescriptor = serde_json::from_str(r#"{"username":"x"}"#).unwrap();
        assert_eq!(CapabilityResolver::new(Some(&r)).capabilities(), Capabilities::NONE);
    }
}
