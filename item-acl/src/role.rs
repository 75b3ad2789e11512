// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Well-known permission levels of a role definition. Greater levels are assumed to also contain
/// all lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleType {
    /// Limited access to selected resources.
    Guest,

    /// Permission to view items.
    Reader,

    /// Permission to view, add, update and delete items.
    Contributor,

    /// Permission to change the structure and layout of a container.
    WebDesigner,

    /// Full control.
    Administrator,
}

/// Role types at or above this level are considered "high privilege" and are never pruned by
/// reconciliation.
pub const HIGH_PRIVILEGE_FLOOR: RoleType = RoleType::WebDesigner;

/// Role granted to the designated principal of an item when no higher grant already covers them.
pub const TARGET_ROLE: RoleType = RoleType::Contributor;

impl RoleType {
    /// Returns `true` if this level is at or above [`HIGH_PRIVILEGE_FLOOR`].
    pub fn is_high_privilege(&self) -> bool {
        *self >= HIGH_PRIVILEGE_FLOOR
    }
}

impl Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoleType::Guest => "guest",
            RoleType::Reader => "reader",
            RoleType::Contributor => "contributor",
            RoleType::WebDesigner => "web designer",
            RoleType::Administrator => "administrator",
        };

        write!(f, "{}", s)
    }
}

/// A named permission level taken from the role-definition catalog of a container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: u32,
    pub name: String,
    pub role_type: RoleType,
}

impl RoleDefinition {
    pub fn new(id: u32, name: &str, role_type: RoleType) -> Self {
        Self {
            id,
            name: name.to_owned(),
            role_type,
        }
    }

    pub fn is_high_privilege(&self) -> bool {
        self.role_type.is_high_privilege()
    }
}
