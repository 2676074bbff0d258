//! Collection Store: the local, ordered copy of the remote collection.
//!
//! All operations are synchronous and total. Identifiers are unique across
//! the sequence at all times, whatever the input.

use std::collections::HashSet;

use tracing::warn;

use crate::types::{Item, ItemId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStore {
    items: Vec<Item>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, keeping the given order. Later
    /// duplicates of an id are dropped.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        let mut seen = HashSet::with_capacity(items.len());
        let before = items.len();
        self.items = items.into_iter().filter(|item| seen.insert(item.id)).collect();
        if self.items.len() != before {
            warn!(dropped = before - self.items.len(), "duplicate ids in listing");
        }
    }

    /// Append at the end. If the id is already present the stored record is
    /// replaced in place and `false` is returned.
    pub fn append(&mut self, item: Item) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item;
                false
            }
            None => {
                self.items.push(item);
                true
            }
        }
    }

    /// Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn snapshot(&self) -> &[Item] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }
}
