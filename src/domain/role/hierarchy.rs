//! Role hierarchy and the hierarchy-backed editable roles builder

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use super::builder::{EditableRolesBuilder, RoleCatalog};

/// Role granted every role known to the hierarchy
pub const ROLE_SUPER_ADMIN: &str = "ROLE_SUPER_ADMIN";

/// Directed role hierarchy: a role implies each of its children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleHierarchy {
    implied: BTreeMap<String, Vec<String>>,
}

impl RoleHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `role` implies `children`, merging with earlier declarations
    pub fn with_role<I, S>(mut self, role: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.implied.entry(role.into()).or_default();

        for child in children {
            let child = child.into();
            if !entry.contains(&child) {
                entry.push(child);
            }
        }

        self
    }

    /// Roles directly implied by `role`
    pub fn children(&self, role: &str) -> &[String] {
        self.implied.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every role named by the hierarchy, as parent or child
    pub fn all_roles(&self) -> BTreeSet<String> {
        self.implied
            .iter()
            .flat_map(|(role, children)| std::iter::once(role).chain(children))
            .cloned()
            .collect()
    }

    /// Roles held directly plus every role reachable through the hierarchy
    pub fn reachable_roles<S: AsRef<str>>(&self, roles: &[S]) -> BTreeSet<String> {
        let mut reached = BTreeSet::new();
        let mut queue: VecDeque<String> = roles.iter().map(|r| r.as_ref().to_string()).collect();

        while let Some(role) = queue.pop_front() {
            if !reached.insert(role.clone()) {
                continue;
            }

            for child in self.children(&role) {
                if !reached.contains(child) {
                    queue.push_back(child.clone());
                }
            }
        }

        reached
    }

    fn label(&self, role: &str) -> String {
        let children = self.children(role);

        if children.is_empty() {
            role.to_string()
        } else {
            format!("{}: {}", role, children.join(", "))
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for RoleHierarchy {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |hierarchy, (role, children)| {
                hierarchy.with_role(role, children)
            })
    }
}

/// Editable roles derived from the actor's own roles
///
/// An actor holding the super-admin role (directly or through the hierarchy)
/// may edit every role the hierarchy knows. Anyone else may edit the known
/// roles they are granted themselves.
#[derive(Debug, Clone)]
pub struct HierarchyRolesBuilder {
    hierarchy: RoleHierarchy,
    actor_roles: Vec<String>,
    super_admin_role: String,
}

impl HierarchyRolesBuilder {
    pub fn new(hierarchy: RoleHierarchy, actor_roles: Vec<String>) -> Self {
        Self {
            hierarchy,
            actor_roles,
            super_admin_role: ROLE_SUPER_ADMIN.to_string(),
        }
    }

    pub fn with_super_admin_role(mut self, role: impl Into<String>) -> Self {
        self.super_admin_role = role.into();
        self
    }
}

impl EditableRolesBuilder for HierarchyRolesBuilder {
    fn roles(&self) -> RoleCatalog {
        let known = self.hierarchy.all_roles();
        let granted = self.hierarchy.reachable_roles(&self.actor_roles);

        let editable: Vec<&String> = if granted.contains(&self.super_admin_role) {
            known.iter().collect()
        } else {
            known.intersection(&granted).collect()
        };

        debug!(
            actor_roles = ?self.actor_roles,
            editable = editable.len(),
            "Resolved editable roles"
        );

        editable
            .into_iter()
            .map(|role| (role.clone(), self.hierarchy.label(role)))
            .collect()
    }
}
