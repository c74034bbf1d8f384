//! Common types used across the platform

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lookup table mapping entity ids to display names.
///
/// Passed explicitly into resolution code; never ambient state.
pub type NameLookup = HashMap<Uuid, String>;

/// A reference to a named entity (category, brand, firm, user) as it may
/// appear on a record: already joined with its name, a bare id that needs a
/// lookup, a denormalized display string, or nothing at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NameRef {
    /// Id plus display name already known.
    Resolved { id: Uuid, name: String },
    /// Bare id that must be resolved through a lookup table.
    Unresolved { id: Uuid },
    /// Denormalized display string with no backing id.
    Named { name: String },
    /// Nothing recorded.
    Missing,
}

impl NameRef {
    /// Build a reference from the raw fields of a record, resolving against
    /// the lookup table once. Resolution priority: id found in the lookup,
    /// then bare id, then denormalized string, then `Missing`.
    pub fn resolve_with(
        id: Option<Uuid>,
        denormalized: Option<&str>,
        lookup: &NameLookup,
    ) -> Self {
        match (id, denormalized) {
            (Some(id), _) if lookup.contains_key(&id) => NameRef::Resolved {
                id,
                name: lookup[&id].clone(),
            },
            (Some(id), None) => NameRef::Unresolved { id },
            (_, Some(name)) => NameRef::Named {
                name: name.to_string(),
            },
            (None, None) => NameRef::Missing,
        }
    }

    /// Display name, or the given sentinel when the reference never resolved.
    pub fn display_or<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            NameRef::Resolved { name, .. } | NameRef::Named { name } => name,
            NameRef::Unresolved { .. } | NameRef::Missing => sentinel,
        }
    }

    /// The backing id, when one is known.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            NameRef::Resolved { id, .. } | NameRef::Unresolved { id } => Some(*id),
            _ => None,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(id: Uuid, name: &str) -> NameLookup {
        let mut map = NameLookup::new();
        map.insert(id, name.to_string());
        map
    }

    #[test]
    fn test_resolve_prefers_lookup_over_denormalized() {
        let id = Uuid::new_v4();
        let lookup = lookup_with(id, "Electronics");
        let r = NameRef::resolve_with(Some(id), Some("Old Name"), &lookup);
        assert_eq!(r.display_or("Unknown"), "Electronics");
    }

    #[test]
    fn test_resolve_falls_back_to_denormalized_string() {
        let id = Uuid::new_v4();
        let lookup = NameLookup::new();
        let r = NameRef::resolve_with(Some(id), Some("Groceries"), &lookup);
        assert_eq!(r.display_or("Unknown"), "Groceries");
    }

    #[test]
    fn test_unresolved_id_uses_sentinel() {
        let id = Uuid::new_v4();
        let lookup = NameLookup::new();
        let r = NameRef::resolve_with(Some(id), None, &lookup);
        assert_eq!(r, NameRef::Unresolved { id });
        assert_eq!(r.display_or("Unknown Category"), "Unknown Category");
    }

    #[test]
    fn test_missing_reference() {
        let lookup = NameLookup::new();
        let r = NameRef::resolve_with(None, None, &lookup);
        assert_eq!(r, NameRef::Missing);
        assert_eq!(r.display_or("Unknown Brand"), "Unknown Brand");
        assert_eq!(r.id(), None);
    }
}
