//! Domain layer - Core entities, rules, and repository traits

pub mod error;
pub mod role;
pub mod user;

pub use error::DomainError;
pub use role::{
    restore_hidden_roles, DataTransformer, EditableRolesBuilder, HierarchyRolesBuilder,
    RestoreRolesTransformer, RoleCatalog, RoleHierarchy, StaticRolesBuilder,
};
pub use user::{User, UserRepository};
