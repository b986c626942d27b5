//! Role reconciliation for edit forms that only expose editable roles
//!
//! An edit form lists the roles the acting user may grant. Roles the user
//! holds outside that list are hidden from the form and must be restored when
//! the submission is mapped back onto the model.

use std::collections::HashSet;

use tracing::debug;

use super::builder::{EditableRolesBuilder, RoleCatalog};
use crate::domain::DomainError;

/// Bidirectional value mapping between a model field and its form widget
pub trait DataTransformer {
    type Model;
    type View;

    /// Model value to view value
    fn transform(&self, value: Option<Self::Model>) -> Result<Option<Self::View>, DomainError>;

    /// Submitted view value back to a model value
    fn reverse_transform(&self, value: Option<Self::View>)
        -> Result<Option<Self::Model>, DomainError>;
}

/// Merge submitted roles with the original roles hidden from the form
///
/// Returns `selected ∪ (original − keys(editable))`. Selected roles come first
/// in submission order, followed by hidden roles in their original order; a
/// role never appears twice.
pub fn restore_hidden_roles(
    original: &[String],
    selected: Option<Vec<String>>,
    editable: &RoleCatalog,
) -> Vec<String> {
    let hidden = original
        .iter()
        .filter(|role| !editable.contains_key(role.as_str()))
        .cloned();

    let mut seen = HashSet::new();

    selected
        .unwrap_or_default()
        .into_iter()
        .chain(hidden)
        .filter(|role| seen.insert(role.clone()))
        .collect()
}

/// Stateful transformer bound to one form-binding cycle
///
/// `set_original_roles` must run before either direction is used.
#[derive(Debug)]
pub struct RestoreRolesTransformer<B: EditableRolesBuilder> {
    roles_builder: B,
    original_roles: Option<Vec<String>>,
}

impl<B: EditableRolesBuilder> RestoreRolesTransformer<B> {
    pub fn new(roles_builder: B) -> Self {
        Self {
            roles_builder,
            original_roles: None,
        }
    }

    /// Start a binding cycle with the user's full role list
    pub fn set_original_roles(&mut self, original_roles: Option<Vec<String>>) {
        self.original_roles = Some(original_roles.unwrap_or_default());
    }

    pub fn original_roles(&self) -> Option<&[String]> {
        self.original_roles.as_deref()
    }

    pub fn roles_builder(&self) -> &B {
        &self.roles_builder
    }

    /// Pass the current roles through to the editable widget
    pub fn present(&self, roles: Option<Vec<String>>) -> Result<Option<Vec<String>>, DomainError> {
        self.require_original_roles()?;
        Ok(roles)
    }

    /// Rebuild the full role list from the submitted selection
    pub fn reconcile(&self, selected: Option<Vec<String>>) -> Result<Vec<String>, DomainError> {
        let original = self.require_original_roles()?;
        let editable = self.roles_builder.roles();
        let roles = restore_hidden_roles(original, selected, &editable);

        debug!(
            original = original.len(),
            editable = editable.len(),
            reconciled = roles.len(),
            "Reconciled submitted roles"
        );

        Ok(roles)
    }

    fn require_original_roles(&self) -> Result<&[String], DomainError> {
        self.original_roles
            .as_deref()
            .ok_or_else(|| DomainError::invalid_state("original roles are not set"))
    }
}

impl<B: EditableRolesBuilder> DataTransformer for RestoreRolesTransformer<B> {
    type Model = Vec<String>;
    type View = Vec<String>;

    fn transform(&self, value: Option<Vec<String>>) -> Result<Option<Vec<String>>, DomainError> {
        self.present(value)
    }

    fn reverse_transform(
        &self,
        value: Option<Vec<String>>,
    ) -> Result<Option<Vec<String>>, DomainError> {
        self.reconcile(value).map(Some)
    }
}
