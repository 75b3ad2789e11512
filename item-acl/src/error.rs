// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::ParseIntError;

use thiserror::Error;

use crate::item::{ItemRef, ListId};
use crate::principal::PrincipalId;
use crate::role::RoleType;

/// Failures of the underlying item and assignment store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("site {0} does not exist")]
    SiteNotFound(String),

    #[error("list {0} does not exist")]
    ListNotFound(ListId),

    #[error("item {0} does not exist")]
    ItemNotFound(ItemRef),

    #[error("role assignments of item {0} are inherited, break the inheritance first")]
    InheritedAssignments(ItemRef),

    #[error("access denied: store mutations require elevated rights")]
    AccessDenied,

    #[error("principal {0} already has a role assignment on this item")]
    DuplicateAssignment(PrincipalId),

    #[error("item {0} was modified concurrently")]
    Conflict(ItemRef),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failures of the principal directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user {0} cannot be found")]
    UserNotFound(PrincipalId),

    #[error("group {0} cannot be found")]
    GroupNotFound(PrincipalId),

    #[error("principal directory unavailable: {0}")]
    Unavailable(String),
}

/// Failures while deriving the designated principal from item data.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("field {field} holds \"{value}\" which is not a principal id: {source}")]
    Format {
        field: String,
        value: String,
        source: ParseIntError,
    },

    #[error("\"{name}\" does not resolve to exactly one user or group")]
    AmbiguousOrNotFound { name: String },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Failures while converging the role assignments of an item.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("role definition for {0} is missing from the catalog")]
    MissingRoleDefinition(RoleType),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Any failure of a single item notification. The message is surfaced as-is to the user whose
/// write triggered the notification.
#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl From<StoreError> for ReceiverError {
    fn from(err: StoreError) -> Self {
        ReceiverError::Reconcile(ReconcileError::Store(err))
    }
}
