// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use crate::assignment::RoleAssignment;
use crate::item::{ItemRef, ListId};
use crate::memory::{ItemState, MemoryStore};
use crate::principal::Principal;
use crate::role::{RoleDefinition, RoleType};

pub const SITE: &str = "site-a";
pub const WEB: &str = "/meetings";
pub const DOCUMENTS: &str = "documents";
pub const TASKS: &str = "tasks";

/// Number of items pre-populated in each test list.
pub const ITEMS_PER_LIST: u32 = 3;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Role definition of the given type as found in the default catalog.
pub fn role(role_type: RoleType) -> RoleDefinition {
    match role_type {
        RoleType::Guest => RoleDefinition::new(1, "Limited Access", role_type),
        RoleType::Reader => RoleDefinition::new(2, "Read", role_type),
        RoleType::Contributor => RoleDefinition::new(3, "Contribute", role_type),
        RoleType::WebDesigner => RoleDefinition::new(4, "Design", role_type),
        RoleType::Administrator => RoleDefinition::new(5, "Full Control", role_type),
    }
}

/// Assignment binding the principal to the default definitions of the given role types.
pub fn assignment(principal: &Principal, role_types: &[RoleType]) -> RoleAssignment {
    RoleAssignment::new(
        principal.clone(),
        role_types.iter().copied().map(role).collect(),
    )
}

pub fn jane() -> Principal {
    Principal::user(42, "Jane Doe")
}

pub fn max() -> Principal {
    Principal::user(7, "Max Mustermann")
}

pub fn owners() -> Principal {
    Principal::group(100, "Owners")
}

pub fn visitors() -> Principal {
    Principal::group(101, "Visitors")
}

/// A site with two lists, "documents" and "tasks", which both grant full control to the owners
/// group and read access to the visitors group. Every list holds a few inheriting items.
#[derive(Debug)]
pub struct TestSite {
    pub store: MemoryStore,
}

impl TestSite {
    pub fn new() -> Self {
        Self::with_catalog(&[
            RoleType::Guest,
            RoleType::Reader,
            RoleType::Contributor,
            RoleType::WebDesigner,
            RoleType::Administrator,
        ])
    }

    /// Site whose catalog only knows the given role types.
    pub fn with_catalog(role_types: &[RoleType]) -> Self {
        let store = MemoryStore::new(SITE);

        for principal in [jane(), max(), owners(), visitors()] {
            store.add_principal(principal);
        }

        for role_type in role_types {
            store.add_role_definition(role(*role_type));
        }

        let site = Self { store };
        for list in [DOCUMENTS, TASKS] {
            let list = ListId::new(list);
            site.store.add_list(&list, site.list_assignments());
            for id in 1..=ITEMS_PER_LIST {
                site.store
                    .put_item(&ItemRef::new(SITE, WEB, &list, id), ItemState::default())
                    .expect("list exists");
            }
        }

        site
    }

    /// Assignments every list hands down to its inheriting items.
    pub fn list_assignments(&self) -> Vec<RoleAssignment> {
        vec![
            assignment(&owners(), &[RoleType::Administrator]),
            assignment(&visitors(), &[RoleType::Reader]),
        ]
    }

    pub fn document(&self, id: u32) -> ItemRef {
        ItemRef::new(SITE, WEB, &ListId::new(DOCUMENTS), id)
    }

    pub fn task(&self, id: u32) -> ItemRef {
        ItemRef::new(SITE, WEB, &ListId::new(TASKS), id)
    }

    /// Give the item its own role assignments, detached from the list.
    pub fn set_assignments(&self, item: &ItemRef, assignments: Vec<RoleAssignment>) {
        self.store
            .put_item(
                item,
                ItemState {
                    assignments: Some(assignments),
                    version: 0,
                },
            )
            .expect("list exists");
    }

    /// Returns `true` if the item no longer inherits its assignments from the list.
    pub fn has_unique_role_assignments(&self, item: &ItemRef) -> bool {
        let state = self.store.item_state(item).expect("item exists");
        state.assignments.is_some()
    }

    /// Current assignments of the item, sorted by principal id.
    pub fn assignments(&self, item: &ItemRef) -> Vec<RoleAssignment> {
        let state = self.store.item_state(item).expect("item exists");
        let mut assignments = state.assignments.expect("item has unique assignments");
        assignments.sort_by_key(RoleAssignment::principal_id);
        assignments
    }
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}
