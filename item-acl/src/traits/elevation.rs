// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::StoreError;
use crate::traits::{ItemStore, PrincipalDirectory};

/// Run code with administrative rights, regardless of the rights of the user who triggered it.
///
/// The elevated handle only lives for the duration of the callback. It is released on every
/// exit path, including errors.
pub trait Elevation {
    type Store: ItemStore + PrincipalDirectory;

    /// Open the given site with administrative rights and pass the elevated store handle to `f`.
    fn run_elevated<T, E, F>(&self, site: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Store) -> Result<T, E>,
        E: From<StoreError>;
}
