//! Role-based access control gate
//!
//! A pure predicate over (role, resource, action) plus the self-scoping
//! rules for list operations and actor resolution for role-sensitive
//! identities. Admins are unrestricted; staff may create and edit stock
//! records but never delete products or users; coordinators and plain users
//! are read-mostly and only ever act as themselves.

use uuid::Uuid;

use shared::models::Role;

use crate::error::{AppError, AppResult};

/// Resources the gate knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Product,
    Category,
    Brand,
    Firm,
    Purchase,
    Sell,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::Category => "category",
            ResourceKind::Brand => "brand",
            ResourceKind::Firm => "firm",
            ResourceKind::Purchase => "purchase",
            ResourceKind::Sell => "sell",
            ResourceKind::User => "user",
        }
    }
}

/// Actions the gate decides on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    View,
    Create,
    Edit,
    Delete,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::View => "view",
            AccessAction::Create => "create",
            AccessAction::Edit => "edit",
            AccessAction::Delete => "delete",
        }
    }
}

/// Whether a caller with `role` may perform `action` on `resource`.
pub fn can_access(role: Role, resource: ResourceKind, action: AccessAction) -> bool {
    use AccessAction::*;
    use ResourceKind::*;

    match role {
        Role::Admin => true,
        Role::Staff => match action {
            View => true,
            Create | Edit => matches!(resource, Product | Purchase | Sell),
            // Staff may undo stock records it manages, never products or users
            Delete => matches!(resource, Purchase | Sell),
        },
        Role::Coordinator | Role::User => match action {
            View => true,
            // Own purchases/sells only; ownership is checked separately
            Create | Edit | Delete => matches!(resource, Purchase | Sell),
        },
    }
}

/// Whether list operations on `resource` must be filtered to records owned
/// by the caller. Product and catalog lists are globally visible to any
/// authenticated role.
pub fn scopes_to_self(role: Role, resource: ResourceKind) -> bool {
    match role {
        Role::Admin | Role::Staff => false,
        Role::Coordinator | Role::User => matches!(
            resource,
            ResourceKind::Purchase | ResourceKind::Sell | ResourceKind::User
        ),
    }
}

/// Resolve the buyer/seller identity for a stock mutation. Admins may act
/// on behalf of someone else; every other role acts as itself.
pub fn resolve_actor(role: Role, caller: Uuid, requested: Option<Uuid>) -> AppResult<Uuid> {
    match requested {
        None => Ok(caller),
        Some(id) if id == caller => Ok(caller),
        Some(id) if role.is_admin() => Ok(id),
        Some(_) => Err(AppError::Forbidden(
            "Only admins may act on behalf of another user".to_string(),
        )),
    }
}

/// Gate check that turns a denial into the `Forbidden` error handlers
/// propagate.
pub fn ensure(role: Role, resource: ResourceKind, action: AccessAction) -> AppResult<()> {
    if can_access(role, resource, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role {} may not {} {} records",
            role.as_str(),
            action.as_str(),
            resource.as_str()
        )))
    }
}

/// Ownership check for mutations on an existing purchase/sell record by a
/// self-scoped role.
pub fn ensure_owner(role: Role, caller: Uuid, owner: Uuid, recorded_by: Uuid) -> AppResult<()> {
    if !scopes_to_self(role, ResourceKind::Purchase) {
        return Ok(());
    }
    if caller == owner || caller == recorded_by {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Record belongs to another user".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_unrestricted() {
        for resource in [
            ResourceKind::Product,
            ResourceKind::Category,
            ResourceKind::Brand,
            ResourceKind::Firm,
            ResourceKind::Purchase,
            ResourceKind::Sell,
            ResourceKind::User,
        ] {
            for action in [
                AccessAction::View,
                AccessAction::Create,
                AccessAction::Edit,
                AccessAction::Delete,
            ] {
                assert!(can_access(Role::Admin, resource, action));
            }
        }
    }

    #[test]
    fn test_staff_may_manage_stock_records() {
        assert!(can_access(Role::Staff, ResourceKind::Product, AccessAction::Create));
        assert!(can_access(Role::Staff, ResourceKind::Product, AccessAction::Edit));
        assert!(can_access(Role::Staff, ResourceKind::Purchase, AccessAction::Create));
        assert!(can_access(Role::Staff, ResourceKind::Sell, AccessAction::Edit));
        assert!(can_access(Role::Staff, ResourceKind::Sell, AccessAction::Delete));
    }

    #[test]
    fn test_staff_may_not_delete_products_or_users() {
        assert!(!can_access(Role::Staff, ResourceKind::Product, AccessAction::Delete));
        assert!(!can_access(Role::Staff, ResourceKind::User, AccessAction::Delete));
        assert!(!can_access(Role::Staff, ResourceKind::User, AccessAction::Edit));
        assert!(!can_access(Role::Staff, ResourceKind::Category, AccessAction::Delete));
    }

    #[test]
    fn test_user_cannot_delete_product() {
        // A plain user deleting a product must be rejected outright
        assert!(!can_access(Role::User, ResourceKind::Product, AccessAction::Delete));
        assert!(ensure(Role::User, ResourceKind::Product, AccessAction::Delete).is_err());
    }

    #[test]
    fn test_read_mostly_roles_view_everything() {
        for role in [Role::Coordinator, Role::User] {
            assert!(can_access(role, ResourceKind::Product, AccessAction::View));
            assert!(can_access(role, ResourceKind::Category, AccessAction::View));
            assert!(!can_access(role, ResourceKind::Product, AccessAction::Edit));
            assert!(!can_access(role, ResourceKind::Brand, AccessAction::Create));
            assert!(can_access(role, ResourceKind::Sell, AccessAction::Create));
        }
    }

    #[test]
    fn test_self_scoping() {
        assert!(!scopes_to_self(Role::Admin, ResourceKind::Purchase));
        assert!(!scopes_to_self(Role::Staff, ResourceKind::Sell));
        assert!(scopes_to_self(Role::User, ResourceKind::Purchase));
        assert!(scopes_to_self(Role::Coordinator, ResourceKind::Sell));
        assert!(scopes_to_self(Role::User, ResourceKind::User));
        // Catalog lists stay global for everyone
        assert!(!scopes_to_self(Role::User, ResourceKind::Product));
        assert!(!scopes_to_self(Role::Coordinator, ResourceKind::Category));
    }

    #[test]
    fn test_resolve_actor() {
        let caller = Uuid::new_v4();
        let other = Uuid::new_v4();

        // Default: act as yourself
        assert_eq!(resolve_actor(Role::User, caller, None).unwrap(), caller);
        assert_eq!(
            resolve_actor(Role::Staff, caller, Some(caller)).unwrap(),
            caller
        );

        // Admins may substitute an identity
        assert_eq!(
            resolve_actor(Role::Admin, caller, Some(other)).unwrap(),
            other
        );

        // Everyone else may not
        for role in [Role::Staff, Role::Coordinator, Role::User] {
            assert!(resolve_actor(role, caller, Some(other)).is_err());
        }
    }

    #[test]
    fn test_ensure_owner() {
        let caller = Uuid::new_v4();
        let other = Uuid::new_v4();

        // Admin and staff skip ownership checks
        assert!(ensure_owner(Role::Admin, caller, other, other).is_ok());
        assert!(ensure_owner(Role::Staff, caller, other, other).is_ok());

        // Self-scoped roles must own the record one way or the other
        assert!(ensure_owner(Role::User, caller, caller, other).is_ok());
        assert!(ensure_owner(Role::User, caller, other, caller).is_ok());
        assert!(ensure_owner(Role::User, caller, other, other).is_err());
    }
}
