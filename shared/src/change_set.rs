//! The ordered set of items that currently differ from their baseline.

use crate::error::StateError;
use crate::item::ItemRecord;
use crate::{ItemId, ItemPayload};

/// Ordered, duplicate-free collection of dirty item ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    members: Vec<ItemId>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; returns false if it was already a member
    pub fn add(&mut self, id: ItemId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.push(id);
        tracing::debug!(item_id = id, "item added to change set");
        true
    }

    /// Remove an item; returns false if it was not a member
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != id);
        let removed = self.members.len() != before;
        if removed {
            tracing::debug!(item_id = id, "item removed from change set");
        }
        removed
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.members.iter().copied()
    }

    /// Serialize every member, all or nothing.
    ///
    /// The first member whose cost does not parse aborts the whole list.
    pub fn to_payload_list<'a, F>(&self, lookup: F) -> Result<Vec<ItemPayload>, StateError>
    where
        F: Fn(ItemId) -> Option<&'a ItemRecord>,
    {
        self.members
            .iter()
            .map(|&id| {
                let item = lookup(id).ok_or(StateError::UnknownItem(id))?;
                item.to_sync_payload()
                    .map_err(|source| StateError::InvalidAmount {
                        title: item.title().to_string(),
                        source,
                    })
            })
            .collect()
    }
}
