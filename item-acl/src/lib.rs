// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keep the role assignments of list items converged towards one designated principal.
//!
//! Whenever an item of a tracked list is added or updated, the principal responsible for it is
//! derived from the item's fields and granted at least the `Contributor` role on the item. Grants
//! of other principals survive only if they are at least `WebDesigner`, everything below is
//! removed.
//!
//! ## Principal resolution
//!
//! How the responsible principal is encoded depends on the kind of record:
//!
//! - Document records carry a plain numeric id in a text field.
//! - Task records carry a people field holding either `"<id>;#<name>"` or a bare name, the
//!   latter is looked up in the site's principal directory.
//!
//! ## Reconciliation
//!
//! Items inheriting their permissions from the list first get an item-local copy of the
//! inherited assignments. Then a single scan over the assignments decides which role sets are
//! overwritten, which assignment is added and which are removed. All of it is written in one
//! transaction with elevated rights, so that the triggering user never observes a half-converged
//! item.
//!
//! Any failure cancels the triggering write and hands the error message to the host, which shows
//! it to the user. Nothing is retried.
//!
//! ## Host interfaces
//!
//! The item store, principal directory and elevation mechanism are provided by the host through
//! the traits in [`traits`]. An in-memory implementation of all of them is available as
//! [`MemoryStore`] behind the `memory` feature flag, which is enabled by default.
mod assignment;
pub mod config;
mod error;
mod item;
#[cfg(feature = "memory")]
pub mod memory;
mod principal;
pub mod receiver;
pub mod reconciler;
pub mod resolver;
mod role;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;

pub use assignment::RoleAssignment;
pub use config::{Config, ListBinding};
pub use error::{DirectoryError, ReceiverError, ReconcileError, ResolveError, StoreError};
pub use item::{ItemEvent, ItemFields, ItemKind, ItemNotification, ItemRef, ListId};
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use principal::{Principal, PrincipalId, PrincipalKind, PrincipalScope};
pub use receiver::{ItemEventReceiver, Outcome};
pub use reconciler::{ReconcilePlan, reconcile};
pub use resolver::{PrincipalResolver, ResolveStrategy, lookup_principal};
pub use role::{HIGH_PRIVILEGE_FLOOR, RoleDefinition, RoleType, TARGET_ROLE};
