//! Permission Definitions
//!
//! Static role → permission table. Permission strings are `resource:action`
//! with action `view` or `manage`; `resource:*` covers both and `*` covers
//! everything.

use shared::models::Role;

/// Every resource guarded by a permission
pub const RESOURCES: &[&str] = &[
    "customers",
    "halls",
    "billing_items",
    "catering_vendors",
    "dinner_packages",
    "bookings",
    "quotations",
    "payments",
    "devotees",
    "settings",
    "users",
    "dashboard",
];

pub const SUPER_ADMIN_PERMISSIONS: &[&str] = &["*"];

pub const ADMIN_PERMISSIONS: &[&str] = &[
    "customers:*",
    "halls:*",
    "billing_items:*",
    "catering_vendors:*",
    "dinner_packages:*",
    "bookings:*",
    "quotations:*",
    "payments:*",
    "devotees:*",
    "settings:*",
    "users:*",
    "dashboard:*",
];

pub const MANAGER_PERMISSIONS: &[&str] = &[
    "customers:*",
    "bookings:*",
    "quotations:*",
    "payments:*",
    "devotees:*",
    "halls:view",
    "billing_items:view",
    "dinner_packages:view",
    "catering_vendors:view",
    "settings:view",
    "dashboard:view",
];

pub const STAFF_PERMISSIONS: &[&str] = &[
    "customers:view",
    "customers:manage",
    "devotees:view",
    "devotees:manage",
    "bookings:view",
    "quotations:view",
    "payments:view",
    "halls:view",
    "billing_items:view",
    "dinner_packages:view",
    "catering_vendors:view",
    "dashboard:view",
];

/// Granted permission patterns for a role
pub fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Manager => MANAGER_PERMISSIONS,
        Role::Staff => STAFF_PERMISSIONS,
    }
}

/// Whether a single granted pattern covers the required permission
pub fn grants(pattern: &str, required: &str) -> bool {
    if pattern == "*" || pattern == required {
        return true;
    }
    match pattern.strip_suffix(":*") {
        Some(resource) => required
            .split_once(':')
            .is_some_and(|(required_resource, _)| required_resource == resource),
        None => false,
    }
}

pub fn role_has_permission(role: Role, required: &str) -> bool {
    permissions_for(role).iter().any(|p| grants(p, required))
}

/// Expanded `resource:action` list for display (`GET /api/auth/me`)
pub fn effective_permissions(role: Role) -> Vec<String> {
    RESOURCES
        .iter()
        .flat_map(|resource| {
            ["view", "manage"]
                .into_iter()
                .map(move |action| format!("{resource}:{action}"))
        })
        .filter(|permission| role_has_permission(role, permission))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_patterns() {
        assert!(grants("*", "bookings:manage"));
        assert!(grants("bookings:*", "bookings:manage"));
        assert!(grants("bookings:view", "bookings:view"));
        assert!(!grants("bookings:view", "bookings:manage"));
        assert!(!grants("bookings:*", "booking_items:view"));
        assert!(!grants("book:*", "bookings:view"));
    }

    #[test]
    fn test_super_admin_has_everything() {
        assert!(role_has_permission(Role::SuperAdmin, "users:manage"));
        assert!(role_has_permission(Role::SuperAdmin, "anything:else"));
    }

    #[test]
    fn test_admin_manages_users_and_settings() {
        assert!(role_has_permission(Role::Admin, "users:manage"));
        assert!(role_has_permission(Role::Admin, "settings:manage"));
        assert!(!role_has_permission(Role::Admin, "unknown:view"));
    }

    #[test]
    fn test_manager_is_read_only_on_catalog() {
        assert!(role_has_permission(Role::Manager, "bookings:manage"));
        assert!(role_has_permission(Role::Manager, "payments:manage"));
        assert!(role_has_permission(Role::Manager, "halls:view"));
        assert!(!role_has_permission(Role::Manager, "halls:manage"));
        assert!(!role_has_permission(Role::Manager, "settings:manage"));
        assert!(!role_has_permission(Role::Manager, "users:view"));
    }

    #[test]
    fn test_staff_permissions() {
        assert!(role_has_permission(Role::Staff, "customers:manage"));
        assert!(role_has_permission(Role::Staff, "devotees:manage"));
        assert!(role_has_permission(Role::Staff, "bookings:view"));
        assert!(!role_has_permission(Role::Staff, "bookings:manage"));
        assert!(!role_has_permission(Role::Staff, "payments:manage"));
        assert!(!role_has_permission(Role::Staff, "settings:view"));
    }

    #[test]
    fn test_effective_permissions() {
        let staff = effective_permissions(Role::Staff);
        assert!(staff.contains(&"customers:manage".to_string()));
        assert!(!staff.contains(&"bookings:manage".to_string()));
        assert_eq!(staff.len(), STAFF_PERMISSIONS.len());

        let root = effective_permissions(Role::SuperAdmin);
        assert_eq!(root.len(), RESOURCES.len() * 2);
    }
}
