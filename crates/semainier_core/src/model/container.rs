//! Container records: lists and sublists.
//!
//! Containers exist so the ordering engine has a (list, sublist) scope to
//! keep dense and so deletes cascade onto owned activities. Their own CRUD
//! surface (naming, colors, screen order) belongs to the application layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a list.
pub type ListId = Uuid;

/// Stable identifier for a sublist.
pub type SublistId = Uuid;

/// Top-level activity container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub uuid: ListId,
    pub name: String,
}

impl List {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Optional second-level scope inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sublist {
    pub uuid: SublistId,
    pub list_uuid: ListId,
    pub name: String,
}

impl Sublist {
    pub fn new(list_uuid: ListId, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            list_uuid,
            name: name.into(),
        }
    }
}
