// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces of the host environment the reconciler is driven by.
mod directory;
mod elevation;
mod store;

pub use directory::PrincipalDirectory;
pub use elevation::Elevation;
pub use store::{ItemStore, ItemTransaction};
