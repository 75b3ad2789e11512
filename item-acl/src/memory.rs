// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory site holding lists, items, their role assignments and the principal directory.
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::assignment::RoleAssignment;
use crate::error::{DirectoryError, StoreError};
use crate::item::{ItemRef, ListId};
use crate::principal::{Principal, PrincipalId, PrincipalKind, PrincipalScope};
use crate::role::{RoleDefinition, RoleType};
use crate::traits::{Elevation, ItemStore, ItemTransaction, PrincipalDirectory};

/// Stored state of a single list item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
    /// Item-local role assignments. `None` while the item inherits from its list.
    pub assignments: Option<Vec<RoleAssignment>>,

    /// Bumped on every committed write.
    pub version: u64,
}

#[derive(Clone, Debug, Default)]
struct ListState {
    assignments: Vec<RoleAssignment>,
    items: HashMap<u32, ItemState>,
}

/// An in-memory site.
#[derive(Clone, Debug)]
pub struct InnerMemoryStore {
    site: String,
    principals: BTreeMap<PrincipalId, Principal>,
    catalog: Vec<RoleDefinition>,
    lists: HashMap<ListId, ListState>,
}

impl InnerMemoryStore {
    fn list(&self, list: &ListId) -> Result<&ListState, StoreError> {
        self.lists
            .get(list)
            .ok_or_else(|| StoreError::ListNotFound(list.clone()))
    }

    fn item(&self, item: &ItemRef) -> Result<&ItemState, StoreError> {
        if item.site != self.site {
            return Err(StoreError::ItemNotFound(item.clone()));
        }

        self.list(&item.list)?
            .items
            .get(&item.id)
            .ok_or_else(|| StoreError::ItemNotFound(item.clone()))
    }

    fn item_mut(&mut self, item: &ItemRef) -> Result<&mut ItemState, StoreError> {
        if item.site != self.site {
            return Err(StoreError::ItemNotFound(item.clone()));
        }

        self.lists
            .get_mut(&item.list)
            .ok_or_else(|| StoreError::ListNotFound(item.list.clone()))?
            .items
            .get_mut(&item.id)
            .ok_or_else(|| StoreError::ItemNotFound(item.clone()))
    }

    fn effective_assignments(&self, item: &ItemRef) -> Result<Vec<RoleAssignment>, StoreError> {
        match &self.item(item)?.assignments {
            Some(assignments) => Ok(assignments.clone()),
            None => Ok(self.list(&item.list)?.assignments.clone()),
        }
    }
}

/// An in-memory site implementing all host interfaces of the reconciler.
///
/// `MemoryStore` wraps an `InnerMemoryStore` with an `RwLock` and `Arc`. Reads are always
/// allowed, writes only through a handle obtained from [`Elevation::run_elevated`].
#[derive(Debug)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
    elevated: bool,
}

/// Clones share the same site but never the elevation of the original handle.
impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            elevated: false,
        }
    }
}

impl MemoryStore {
    /// Create an empty site.
    pub fn new(site: &str) -> Self {
        let inner = InnerMemoryStore {
            site: site.to_owned(),
            principals: BTreeMap::new(),
            catalog: Vec::new(),
            lists: HashMap::new(),
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
            elevated: false,
        }
    }

    /// Obtain a read-lock on the store.
    pub fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }

    /// Returns `true` if this handle was handed out by `run_elevated`.
    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// Register a user or group in the site's directory.
    pub fn add_principal(&self, principal: Principal) {
        self.write_store()
            .principals
            .insert(principal.id, principal);
    }

    /// Register a role definition in the site's catalog.
    pub fn add_role_definition(&self, definition: RoleDefinition) {
        self.write_store().catalog.push(definition);
    }

    /// Create a list whose items inherit the given role assignments.
    pub fn add_list(&self, list: &ListId, assignments: Vec<RoleAssignment>) {
        self.write_store().lists.insert(
            list.clone(),
            ListState {
                assignments,
                items: HashMap::new(),
            },
        );
    }

    /// Insert or overwrite an item. The list must exist.
    pub fn put_item(&self, item: &ItemRef, state: ItemState) -> Result<(), StoreError> {
        let mut store = self.write_store();
        if item.site != store.site {
            return Err(StoreError::SiteNotFound(item.site.clone()));
        }

        store
            .lists
            .get_mut(&item.list)
            .ok_or_else(|| StoreError::ListNotFound(item.list.clone()))?
            .items
            .insert(item.id, state);
        Ok(())
    }

    /// Current state of an item.
    pub fn item_state(&self, item: &ItemRef) -> Result<ItemState, StoreError> {
        self.read_store().item(item).cloned()
    }

    /// Committed role assignments of an item, inherited or item-local.
    pub fn effective_assignments(
        &self,
        item: &ItemRef,
    ) -> Result<Vec<RoleAssignment>, StoreError> {
        self.read_store().effective_assignments(item)
    }
}

impl ItemStore for MemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn role_definition(
        &self,
        item: &ItemRef,
        role_type: RoleType,
    ) -> Result<Option<RoleDefinition>, StoreError> {
        let store = self.read_store();
        store.item(item)?;

        let definition = store
            .catalog
            .iter()
            .find(|definition| definition.role_type == role_type);
        Ok(definition.cloned())
    }

    fn begin(&self, item: &ItemRef) -> Result<Self::Transaction<'_>, StoreError> {
        if !self.elevated {
            return Err(StoreError::AccessDenied);
        }

        let (version, inherited, staged) = {
            let store = self.read_store();
            let state = store.item(item)?;
            let inherited = store.list(&item.list)?.assignments.clone();
            (state.version, inherited, state.assignments.clone())
        };

        Ok(MemoryTransaction {
            store: self,
            item: item.clone(),
            version,
            inherited,
            staged,
        })
    }
}

/// Transaction staging the role assignments of a single item.
///
/// The assignments are copied when the transaction begins. Reads see that copy, mutations are
/// applied to it and only written back on `commit`. The commit fails with `StoreError::Conflict`
/// if the item was written by someone else in the meantime.
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    item: ItemRef,
    version: u64,
    inherited: Vec<RoleAssignment>,
    staged: Option<Vec<RoleAssignment>>,
}

impl MemoryTransaction<'_> {
    fn local_assignments(&mut self) -> Result<&mut Vec<RoleAssignment>, StoreError> {
        self.staged
            .as_mut()
            .ok_or_else(|| StoreError::InheritedAssignments(self.item.clone()))
    }
}

impl ItemTransaction for MemoryTransaction<'_> {
    fn has_unique_role_assignments(&self) -> Result<bool, StoreError> {
        Ok(self.staged.is_some())
    }

    fn role_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError> {
        Ok(self.staged.as_ref().unwrap_or(&self.inherited).clone())
    }

    fn break_role_inheritance(&mut self) -> Result<(), StoreError> {
        if self.staged.is_none() {
            self.staged = Some(self.inherited.clone());
        }
        Ok(())
    }

    fn replace_role_set(
        &mut self,
        principal: PrincipalId,
        roles: Vec<RoleDefinition>,
    ) -> Result<(), StoreError> {
        let item = self.item.clone();
        let assignment = self
            .local_assignments()?
            .iter_mut()
            .find(|assignment| assignment.principal_id() == principal)
            .ok_or_else(|| {
                StoreError::Backend(format!("principal {principal} is not bound on item {item}"))
            })?;
        assignment.roles = roles;
        Ok(())
    }

    fn add_assignment(&mut self, assignment: RoleAssignment) -> Result<(), StoreError> {
        let assignments = self.local_assignments()?;
        let principal = assignment.principal_id();
        if assignments
            .iter()
            .any(|existing| existing.principal_id() == principal)
        {
            return Err(StoreError::DuplicateAssignment(principal));
        }

        assignments.push(assignment);
        Ok(())
    }

    fn remove_assignment(&mut self, principal: PrincipalId) -> Result<bool, StoreError> {
        let assignments = self.local_assignments()?;
        let before = assignments.len();
        assignments.retain(|assignment| assignment.principal_id() != principal);
        Ok(assignments.len() != before)
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut store = self.store.write_store();
        let state = store.item_mut(&self.item)?;
        if state.version != self.version {
            return Err(StoreError::Conflict(self.item));
        }

        state.assignments = self.staged;
        state.version += 1;
        Ok(())
    }
}

impl PrincipalDirectory for MemoryStore {
    fn user_by_id(&self, id: PrincipalId) -> Result<Principal, DirectoryError> {
        match self.read_store().principals.get(&id) {
            Some(principal) if principal.kind == PrincipalKind::User => Ok(principal.clone()),
            _ => Err(DirectoryError::UserNotFound(id)),
        }
    }

    fn group_by_id(&self, id: PrincipalId) -> Result<Principal, DirectoryError> {
        match self.read_store().principals.get(&id) {
            Some(principal) if principal.kind == PrincipalKind::Group => Ok(principal.clone()),
            _ => Err(DirectoryError::GroupNotFound(id)),
        }
    }

    fn resolve_principal(
        &self,
        input: &str,
        scope: PrincipalScope,
        exact_match: bool,
    ) -> Result<Option<PrincipalId>, DirectoryError> {
        let input = input.trim().to_lowercase();
        let store = self.read_store();
        let mut matches = store.principals.values().filter(|principal| {
            let name = principal.name.to_lowercase();
            let name_matches = if exact_match {
                name == input
            } else {
                name.contains(&input)
            };
            scope.contains(principal.kind) && name_matches
        });

        match (matches.next(), matches.next()) {
            (Some(principal), None) => Ok(Some(principal.id)),
            _ => Ok(None),
        }
    }
}

impl Elevation for MemoryStore {
    type Store = MemoryStore;

    fn run_elevated<T, E, F>(&self, site: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Store) -> Result<T, E>,
        E: From<StoreError>,
    {
        if self.read_store().site != site {
            return Err(StoreError::SiteNotFound(site.to_owned()).into());
        }

        let mut elevated = MemoryStore {
            inner: self.inner.clone(),
            elevated: true,
        };
        f(&mut elevated)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::assignment::RoleAssignment;
    use crate::error::StoreError;
    use crate::principal::{Principal, PrincipalId, PrincipalScope};
    use crate::role::RoleType;
    use crate::test_utils::{SITE, TestSite, role};
    use crate::traits::{Elevation, ItemStore, ItemTransaction, PrincipalDirectory};

    #[test]
    fn writes_require_elevation() {
        let site = TestSite::new();
        let item = site.document(1);

        let store = site.store.clone();
        assert_matches!(store.begin(&item), Err(StoreError::AccessDenied));

        let escaped = site
            .store
            .run_elevated(SITE, |store| Ok::<_, StoreError>(store.clone()))
            .unwrap();
        assert!(!escaped.is_elevated());

        site.store
            .run_elevated(SITE, |store| {
                assert!(store.is_elevated());
                store.begin(&item).map(|_| ())
            })
            .unwrap();

        // The elevated handle does not outlive the callback.
        assert!(!site.store.is_elevated());
    }

    #[test]
    fn unknown_site_cannot_be_elevated() {
        let site = TestSite::new();
        let result: Result<(), StoreError> = site.store.run_elevated("elsewhere", |_| Ok(()));
        assert_matches!(result, Err(StoreError::SiteNotFound(ref name)) if name == "elsewhere");
    }

    #[test]
    fn inheriting_items_see_list_assignments() {
        let site = TestSite::new();
        let item = site.document(1);

        assert_eq!(
            site.store.effective_assignments(&item).unwrap(),
            site.list_assignments()
        );

        site.store
            .run_elevated(SITE, |store| {
                let mut tx = store.begin(&item)?;
                assert!(!tx.has_unique_role_assignments()?);
                assert_eq!(tx.role_assignments()?, site.list_assignments());

                // Reads include staged mutations.
                tx.break_role_inheritance()?;
                tx.remove_assignment(PrincipalId(101))?;
                assert!(tx.has_unique_role_assignments()?);
                assert_eq!(tx.role_assignments()?, site.list_assignments()[..1].to_vec());
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn reads_see_state_at_begin() {
        let site = TestSite::new();
        let item = site.document(1);

        let result = site.store.run_elevated(SITE, |store| {
            let tx = store.begin(&item)?;

            site.store.run_elevated(SITE, |other| {
                let mut second = other.begin(&item)?;
                second.break_role_inheritance()?;
                second.remove_assignment(PrincipalId(100))?;
                second.commit()
            })?;

            // The other writer's commit is not visible to the open transaction, which therefore
            // cannot commit anymore.
            assert!(!tx.has_unique_role_assignments()?);
            assert_eq!(tx.role_assignments()?, site.list_assignments());
            tx.commit()
        });

        assert_matches!(result, Err(StoreError::Conflict(_)));
        assert_eq!(
            site.store.item_state(&item).unwrap().assignments,
            Some(site.list_assignments()[1..].to_vec())
        );
    }

    #[test]
    fn uncommitted_transactions_are_discarded() {
        let site = TestSite::new();
        let item = site.document(1);

        site.store
            .run_elevated(SITE, |store| {
                let mut tx = store.begin(&item)?;

                // Mutating inherited assignments is refused.
                assert_matches!(
                    tx.remove_assignment(PrincipalId(100)),
                    Err(StoreError::InheritedAssignments(_))
                );

                tx.break_role_inheritance()?;
                assert!(tx.remove_assignment(PrincipalId(100))?);
                assert!(!tx.remove_assignment(PrincipalId(100))?);
                Ok::<_, StoreError>(())
            })
            .unwrap();

        let state = site.store.item_state(&item).unwrap();
        assert_eq!(state.assignments, None);
        assert_eq!(state.version, 0);
    }

    #[test]
    fn committed_transactions_are_visible() {
        let site = TestSite::new();
        let item = site.document(1);

        site.store
            .run_elevated(SITE, |store| {
                let mut tx = store.begin(&item)?;
                tx.break_role_inheritance()?;
                tx.add_assignment(RoleAssignment::new(
                    Principal::user(42, "Jane Doe"),
                    vec![role(RoleType::Contributor)],
                ))?;
                assert_matches!(
                    tx.add_assignment(RoleAssignment::new(
                        Principal::user(42, "Jane Doe"),
                        vec![role(RoleType::Reader)],
                    )),
                    Err(StoreError::DuplicateAssignment(PrincipalId(42)))
                );
                tx.commit()
            })
            .unwrap();

        let state = site.store.item_state(&item).unwrap();
        assert_eq!(state.version, 1);
        assert_eq!(
            state.assignments.unwrap().len(),
            site.list_assignments().len() + 1
        );
    }

    #[test]
    fn concurrent_commit_conflicts() {
        let site = TestSite::new();
        let item = site.document(1);

        let result = site.store.run_elevated(SITE, |store| {
            let mut first = store.begin(&item)?;
            first.break_role_inheritance()?;

            // A second writer commits while the first transaction is still open.
            site.store.run_elevated(SITE, |other| {
                let mut second = other.begin(&item)?;
                second.break_role_inheritance()?;
                second.commit()
            })?;

            first.commit()
        });

        assert_matches!(result, Err(StoreError::Conflict(_)));
        assert_eq!(site.store.item_state(&item).unwrap().version, 1);
    }

    #[test]
    fn name_resolution() {
        let site = TestSite::new();
        site.store.add_principal(Principal::user(50, "Sam Smith"));
        site.store.add_principal(Principal::user(51, "Sam Jones"));

        let directory = &site.store;
        assert_eq!(
            directory
                .resolve_principal("jane doe", PrincipalScope::All, true)
                .unwrap(),
            Some(PrincipalId(42))
        );
        assert_eq!(
            directory
                .resolve_principal("Jane Doe", PrincipalScope::Groups, true)
                .unwrap(),
            None
        );

        // Several partial matches are as good as none.
        assert_eq!(
            directory
                .resolve_principal("Sam", PrincipalScope::All, false)
                .unwrap(),
            None
        );
        assert_eq!(
            directory
                .resolve_principal("Sam", PrincipalScope::All, true)
                .unwrap(),
            None
        );
        assert_eq!(
            directory
                .resolve_principal("Jones", PrincipalScope::Users, false)
                .unwrap(),
            Some(PrincipalId(51))
        );
    }
}
