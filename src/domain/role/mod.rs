//! Role domain
//!
//! Role tokens, the role hierarchy, editable role catalogs, and the
//! reconciliation of submitted roles with roles hidden from an edit form.

mod builder;
mod hierarchy;
mod transformer;
mod validation;

pub use builder::{EditableRolesBuilder, RoleCatalog, StaticRolesBuilder};
pub use hierarchy::{HierarchyRolesBuilder, RoleHierarchy, ROLE_SUPER_ADMIN};
pub use transformer::{restore_hidden_roles, DataTransformer, RestoreRolesTransformer};
pub use validation::{validate_role, validate_roles, RoleValidationError};

#[cfg(test)]
pub use builder::MockEditableRolesBuilder;
