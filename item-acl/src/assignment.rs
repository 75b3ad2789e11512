// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::principal::{Principal, PrincipalId};
use crate::role::{RoleDefinition, RoleType};

/// Binding of one principal to a set of role definitions on a single item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub principal: Principal,
    pub roles: Vec<RoleDefinition>,
}

impl RoleAssignment {
    pub fn new(principal: Principal, roles: Vec<RoleDefinition>) -> Self {
        Self { principal, roles }
    }

    /// Identifier of the bound principal. Assignments on an item are unique by this id.
    pub fn principal_id(&self) -> PrincipalId {
        self.principal.id
    }

    /// Returns `true` if at least one bound role is at or above the high-privilege floor.
    pub fn is_high_privilege(&self) -> bool {
        self.roles.iter().any(RoleDefinition::is_high_privilege)
    }

    /// Returns `true` if the assignment binds exactly one role of the given type.
    pub fn is_exactly(&self, role_type: RoleType) -> bool {
        matches!(self.roles.as_slice(), [role] if role.role_type == role_type)
    }
}
