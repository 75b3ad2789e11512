// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converge the role assignments of an item towards its designated principal.
//!
//! After reconciliation the designated principal holds at least the [`TARGET_ROLE`] on the item,
//! every other principal holding anything below the [`HIGH_PRIVILEGE_FLOOR`] is removed and
//! grants at or above the floor are left exactly as they were.
//!
//! [`HIGH_PRIVILEGE_FLOOR`]: crate::role::HIGH_PRIVILEGE_FLOOR
use tracing::{debug, trace};

use crate::assignment::RoleAssignment;
use crate::error::ReconcileError;
use crate::item::ItemRef;
use crate::principal::PrincipalId;
use crate::resolver::lookup_principal;
use crate::role::TARGET_ROLE;
use crate::traits::{ItemStore, ItemTransaction, PrincipalDirectory};

/// Deltas required to bring an item in line with the policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Materialise the inherited assignments before mutating them.
    pub break_inheritance: bool,

    /// Principals whose role set is overwritten with the target role. Only ever the designated
    /// principal.
    pub replace: Vec<PrincipalId>,

    /// Principal which gets a new assignment with the target role.
    pub add: Option<PrincipalId>,

    /// Principals whose assignment is removed.
    pub remove: Vec<PrincipalId>,
}

impl ReconcilePlan {
    /// Compute the deltas from the item's current assignments in a single scan.
    pub fn compute(
        has_unique_role_assignments: bool,
        assignments: &[RoleAssignment],
        principal: Option<PrincipalId>,
    ) -> Self {
        let mut plan = ReconcilePlan {
            break_inheritance: !has_unique_role_assignments,
            ..Default::default()
        };

        let mut principal_found = false;
        for assignment in assignments {
            let is_high_privilege = assignment.is_high_privilege();

            if Some(assignment.principal_id()) == principal {
                // High grants of the designated principal are never downgraded.
                if !is_high_privilege && !assignment.is_exactly(TARGET_ROLE) {
                    plan.replace.push(assignment.principal_id());
                }
                principal_found = true;
            } else if !is_high_privilege {
                plan.remove.push(assignment.principal_id());
            }
        }

        if !principal_found {
            plan.add = principal;
        }

        plan
    }

    /// Returns `true` if the item already satisfies the policy.
    pub fn is_empty(&self) -> bool {
        !self.break_inheritance
            && self.replace.is_empty()
            && self.add.is_none()
            && self.remove.is_empty()
    }
}

/// Reconcile the role assignments of `item` for the designated `principal`.
///
/// The store handle is expected to be elevated already. The plan is computed from the
/// assignments read through the item's transaction, so a write landing after they were read
/// makes the commit fail with [`StoreError::Conflict`] instead of persisting a stale plan.
///
/// All deltas are staged in that one transaction: the inheritance break, role set replacements
/// and the addition come first, the removals last. Nothing is persisted if any step fails.
///
/// The designated principal is only looked up in the directory when a new assignment has to be
/// added for it. An existing assignment for an id the directory no longer knows is kept without
/// a lookup.
///
/// [`StoreError::Conflict`]: crate::StoreError::Conflict
pub fn reconcile<S>(
    store: &S,
    item: &ItemRef,
    principal: Option<PrincipalId>,
) -> Result<ReconcilePlan, ReconcileError>
where
    S: ItemStore + PrincipalDirectory,
{
    let target_role = store
        .role_definition(item, TARGET_ROLE)?
        .ok_or(ReconcileError::MissingRoleDefinition(TARGET_ROLE))?;

    let mut tx = store.begin(item)?;
    let plan = ReconcilePlan::compute(
        tx.has_unique_role_assignments()?,
        &tx.role_assignments()?,
        principal,
    );
    debug!(%item, ?principal, ?plan, "reconcile role assignments");

    // Dropping the transaction leaves the item untouched.
    if plan.is_empty() {
        return Ok(plan);
    }

    let added = match plan.add {
        Some(id) => Some(lookup_principal(store, id)?),
        None => None,
    };

    if plan.break_inheritance {
        trace!(%item, "break role inheritance");
        tx.break_role_inheritance()?;
    }

    for id in &plan.replace {
        trace!(%item, principal = %id, role = %TARGET_ROLE, "replace role set");
        tx.replace_role_set(*id, vec![target_role.clone()])?;
    }

    if let Some(principal) = added {
        trace!(%item, principal = %principal.id, role = %TARGET_ROLE, "add role assignment");
        tx.add_assignment(RoleAssignment::new(principal, vec![target_role.clone()]))?;
    }

    for id in &plan.remove {
        trace!(%item, principal = %id, "remove role assignment");
        tx.remove_assignment(*id)?;
    }

    tx.commit()?;

    Ok(plan)
}
