// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derive the designated principal of an item from its field values.
use tracing::trace;

use crate::config::Config;
use crate::error::{DirectoryError, ResolveError};
use crate::item::{ItemFields, ItemKind};
use crate::principal::{Principal, PrincipalId, PrincipalScope};
use crate::traits::PrincipalDirectory;

/// Separator between the id and display name of a resolved people-field value (`"7;#Jane Doe"`).
const LOOKUP_SEPARATOR: char = ';';

/// How the designated principal is encoded in an item's fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// The field holds a plain numeric principal id.
    DirectNumeric { field: String },

    /// The field holds `"<id>;#<name>"`, or a bare name which still needs to be looked up in the
    /// principal directory.
    CompoundOrLookup { field: String },
}

impl ResolveStrategy {
    /// Strategy for records of the given kind, reading from the fields named in `config`.
    pub fn for_kind(kind: ItemKind, config: &Config) -> Self {
        match kind {
            ItemKind::DocumentRecord => ResolveStrategy::DirectNumeric {
                field: config.document_id_field.clone(),
            },
            ItemKind::TaskRecord => ResolveStrategy::CompoundOrLookup {
                field: config.task_assignee_field.clone(),
            },
        }
    }

    fn field(&self) -> &str {
        match self {
            ResolveStrategy::DirectNumeric { field } => field,
            ResolveStrategy::CompoundOrLookup { field } => field,
        }
    }
}

/// Resolves the designated principal of an item.
#[derive(Clone, Debug)]
pub struct PrincipalResolver {
    strategy: ResolveStrategy,
}

impl PrincipalResolver {
    pub fn new(strategy: ResolveStrategy) -> Self {
        Self { strategy }
    }

    pub fn for_kind(kind: ItemKind, config: &Config) -> Self {
        Self::new(ResolveStrategy::for_kind(kind, config))
    }

    pub fn strategy(&self) -> &ResolveStrategy {
        &self.strategy
    }

    /// Returns the designated principal's id, or `None` if the item does not name one.
    ///
    /// The directory is only consulted for bare names in compound fields.
    pub fn resolve<D>(
        &self,
        fields: &ItemFields,
        directory: &D,
    ) -> Result<Option<PrincipalId>, ResolveError>
    where
        D: PrincipalDirectory,
    {
        let field = self.strategy.field();
        let Some(value) = fields.text(field) else {
            return Ok(None);
        };

        let principal = match &self.strategy {
            ResolveStrategy::DirectNumeric { .. } => parse_id(field, value)?,
            ResolveStrategy::CompoundOrLookup { .. } => match value.split_once(LOOKUP_SEPARATOR) {
                Some((id, _)) => parse_id(field, id)?,
                None => {
                    trace!(field, name = value, "looking up principal by name");
                    directory
                        .resolve_principal(value, PrincipalScope::All, true)?
                        .ok_or_else(|| ResolveError::AmbiguousOrNotFound {
                            name: value.to_owned(),
                        })?
                }
            },
        };

        Ok(Some(principal))
    }
}

fn parse_id(field: &str, value: &str) -> Result<PrincipalId, ResolveError> {
    value.parse().map_err(|source| ResolveError::Format {
        field: field.to_owned(),
        value: value.to_owned(),
        source,
    })
}

/// Find the principal behind an id, trying the user directory first and the group directory
/// second.
///
/// If neither knows the id, the failure of the user lookup is returned.
pub fn lookup_principal<D>(directory: &D, id: PrincipalId) -> Result<Principal, DirectoryError>
where
    D: PrincipalDirectory,
{
    match directory.user_by_id(id) {
        Ok(user) => Ok(user),
        Err(user_err) => directory.group_by_id(id).map_err(|_| user_err),
    }
}
