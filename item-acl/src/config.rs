// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration of the item event receiver.
//!
//! `Config` names the fields the designated principal is read from and binds the tracked lists
//! to the item kind their records are of.
use serde::{Deserialize, Serialize};

use crate::item::{ItemKind, ListId};

/// Default field holding the numeric principal id of document records.
pub const DEFAULT_DOCUMENT_ID_FIELD: &str = "OrganizationalIDNumber";

/// Default people field of task records.
pub const DEFAULT_TASK_ASSIGNEE_FIELD: &str = "AssignedTo";

/// Binds a tracked list to the kind of records it holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBinding {
    pub list: ListId,
    pub kind: ItemKind,
}

/// Configuration parameters for the item event receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text field of document records which holds the designated principal's id.
    pub document_id_field: String,

    /// People field of task records which holds the assignee.
    pub task_assignee_field: String,

    /// Lists whose items are reconciled. Notifications for any other list are acknowledged
    /// without touching the item.
    pub bindings: Vec<ListBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_id_field: DEFAULT_DOCUMENT_ID_FIELD.to_owned(),
            task_assignee_field: DEFAULT_TASK_ASSIGNEE_FIELD.to_owned(),
            bindings: vec![],
        }
    }
}

impl Config {
    /// Track the given list as holding records of `kind`.
    pub fn bind(mut self, list: &ListId, kind: ItemKind) -> Self {
        self.bindings.retain(|binding| &binding.list != list);
        self.bindings.push(ListBinding {
            list: list.clone(),
            kind,
        });
        self
    }

    /// Kind of records held by the list, if it is tracked.
    pub fn kind_of(&self, list: &ListId) -> Option<ItemKind> {
        self.bindings
            .iter()
            .find(|binding| &binding.list == list)
            .map(|binding| binding.kind)
    }
}
