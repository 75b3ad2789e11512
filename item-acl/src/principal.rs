// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a user or group. Identifiers are unique across both directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub i32);

impl Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(PrincipalId)
    }
}

/// Directory a principal was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    User,
    Group,
}

/// Which directories a name lookup should search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrincipalScope {
    Users,
    Groups,
    All,
}

impl PrincipalScope {
    pub fn contains(&self, kind: PrincipalKind) -> bool {
        matches!(
            (self, kind),
            (PrincipalScope::All, _)
                | (PrincipalScope::Users, PrincipalKind::User)
                | (PrincipalScope::Groups, PrincipalKind::Group)
        )
    }
}

/// A user or group which can be bound to roles on an item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub kind: PrincipalKind,
    pub name: String,
}

impl Principal {
    pub fn user(id: i32, name: &str) -> Self {
        Self {
            id: PrincipalId(id),
            kind: PrincipalKind::User,
            name: name.to_owned(),
        }
    }

    pub fn group(id: i32, name: &str) -> Self {
        Self {
            id: PrincipalId(id),
            kind: PrincipalKind::Group,
            name: name.to_owned(),
        }
    }
}
