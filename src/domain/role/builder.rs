//! Editable role catalogs

use std::collections::BTreeMap;

#[cfg(test)]
use mockall::automock;

/// Role token mapped to a human-readable label
pub type RoleCatalog = BTreeMap<String, String>;

/// Source of the roles the current actor is allowed to see and edit
#[cfg_attr(test, automock)]
pub trait EditableRolesBuilder: Send + Sync {
    /// Roles the actor may edit, keyed by role token
    fn roles(&self) -> RoleCatalog;
}

/// Builder over a fixed catalog
#[derive(Debug, Clone, Default)]
pub struct StaticRolesBuilder {
    catalog: RoleCatalog,
}

impl StaticRolesBuilder {
    pub fn new(catalog: RoleCatalog) -> Self {
        Self { catalog }
    }

    /// Catalog where every role is its own label
    pub fn from_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = roles
            .into_iter()
            .map(|role| {
                let role = role.into();
                (role.clone(), role)
            })
            .collect();

        Self { catalog }
    }
}

impl EditableRolesBuilder for StaticRolesBuilder {
    fn roles(&self) -> RoleCatalog {
        self.catalog.clone()
    }
}

impl<B: EditableRolesBuilder + ?Sized> EditableRolesBuilder for std::sync::Arc<B> {
    fn roles(&self) -> RoleCatalog {
        (**self).roles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_builder_from_roles() {
        let builder = StaticRolesBuilder::from_roles(["ROLE_USER", "ROLE_EDITOR"]);
        let roles = builder.roles();

        assert_eq!(roles.len(), 2);
        assert_eq!(roles.get("ROLE_USER").map(String::as_str), Some("ROLE_USER"));
        assert!(roles.contains_key("ROLE_EDITOR"));
    }

    #[test]
    fn test_static_builder_keeps_labels() {
        let mut catalog = RoleCatalog::new();
        catalog.insert("ROLE_USER".to_string(), "User".to_string());

        let builder = StaticRolesBuilder::new(catalog);
        assert_eq!(builder.roles()["ROLE_USER"], "User");
    }

    #[test]
    fn test_shared_builder_delegates() {
        let builder = std::sync::Arc::new(StaticRolesBuilder::from_roles(["ROLE_USER"]));
        assert!(builder.roles().contains_key("ROLE_USER"));
    }
}
