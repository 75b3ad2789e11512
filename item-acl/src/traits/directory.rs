// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::DirectoryError;
use crate::principal::{Principal, PrincipalId, PrincipalScope};

/// Lookups against the user and group directories of a site.
pub trait PrincipalDirectory {
    /// Get a user by id.
    fn user_by_id(&self, id: PrincipalId) -> Result<Principal, DirectoryError>;

    /// Get a group by id.
    fn group_by_id(&self, id: PrincipalId) -> Result<Principal, DirectoryError>;

    /// Resolve a display or login name to a principal id.
    ///
    /// Returns `None` when the name matches no principal, or more than one, within the given
    /// scope. Errors are reserved for failures of the directory itself.
    fn resolve_principal(
        &self,
        input: &str,
        scope: PrincipalScope,
        exact_match: bool,
    ) -> Result<Option<PrincipalId>, DirectoryError>;
}
