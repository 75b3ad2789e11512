// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::assignment::RoleAssignment;
use crate::error::StoreError;
use crate::item::ItemRef;
use crate::principal::PrincipalId;
use crate::role::{RoleDefinition, RoleType};

/// Access to items, their role assignments and the role-definition catalog of their container.
///
/// The role assignments of an item are read and written through an [`ItemTransaction`] obtained
/// with `begin`, which groups the mutations of one item so that they either _all_ occur or _none_
/// occur. A commit fails if the item was written after the transaction began, so the state read
/// through the transaction is the state the mutations apply to.
pub trait ItemStore {
    type Transaction<'a>: ItemTransaction
    where
        Self: 'a;

    /// Look up the role definition of the given well-known type in the item's container catalog.
    fn role_definition(
        &self,
        item: &ItemRef,
        role_type: RoleType,
    ) -> Result<Option<RoleDefinition>, StoreError>;

    /// Start a transaction for a single item, capturing its current role assignments.
    fn begin(&self, item: &ItemRef) -> Result<Self::Transaction<'_>, StoreError>;
}

/// Staged mutations of a single item.
///
/// Dropping a transaction without calling `commit` discards all staged mutations.
pub trait ItemTransaction {
    /// Returns `true` if the item holds its own role assignments instead of inheriting them from
    /// its list.
    fn has_unique_role_assignments(&self) -> Result<bool, StoreError>;

    /// Effective role assignments of the item, inherited or item-local, including staged
    /// mutations.
    fn role_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError>;

    /// Materialise the inherited role assignments into an item-local copy.
    fn break_role_inheritance(&mut self) -> Result<(), StoreError>;

    /// Replace the entire role set of the principal's assignment.
    fn replace_role_set(
        &mut self,
        principal: PrincipalId,
        roles: Vec<RoleDefinition>,
    ) -> Result<(), StoreError>;

    /// Add a new assignment. Fails if the principal is already bound on the item.
    fn add_assignment(&mut self, assignment: RoleAssignment) -> Result<(), StoreError>;

    /// Remove the principal's assignment.
    ///
    /// Returns `true` when the removal occurred and `false` when the principal had no assignment,
    /// which is not an error.
    fn remove_assignment(&mut self, principal: PrincipalId) -> Result<bool, StoreError>;

    /// Persist all staged mutations.
    fn commit(self) -> Result<(), StoreError>;
}
