// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identifier of a tracked list (the container items live in).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListId(pub String);

impl ListId {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of an item: the site and web it belongs to, its list and its id within that list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub site: String,
    pub web: String,
    pub list: ListId,
    pub id: u32,
}

impl ItemRef {
    pub fn new(site: &str, web: &str, list: &ListId, id: u32) -> Self {
        Self {
            site: site.to_owned(),
            web: web.to_owned(),
            list: list.clone(),
            id,
        }
    }
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.web, self.list, self.id)
    }
}

/// How an item encodes "who is responsible" for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Document records carry a plain numeric principal id in a text field.
    DocumentRecord,

    /// Task records carry a people field which is either `"<id>;#<name>"` or a bare name.
    TaskRecord,
}

/// Write events the host pipeline notifies about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEvent {
    Added,
    Updated,
}

/// Field values of an item, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields(BTreeMap<String, String>);

impl ItemFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_owned(), value.to_owned());
    }

    /// Text value of a field. Absent and empty fields both read as `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ItemFields {
    fn from(fields: [(&str, &str); N]) -> Self {
        fields
            .into_iter()
            .fold(ItemFields::new(), |fields, (name, value)| {
                fields.with(name, value)
            })
    }
}

/// Notification delivered by the host pipeline after an item was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNotification {
    pub event: ItemEvent,
    pub item: ItemRef,
    pub fields: ItemFields,
}
