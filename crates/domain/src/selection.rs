//! Selection set — stores chosen for manual batch dispatch.
//!
//! A plain set of store ids; insertion order is irrelevant. Eligibility
//! rules (stores with an automation in flight cannot be selected) live at
//! the coordinator call site, which is the only place that knows the
//! current status of each store.

use std::collections::HashSet;

use crate::id::StoreId;

/// Stores currently picked for a manual batch dispatch.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: HashSet<StoreId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership for one store. Returns whether the store is selected
    /// after the call.
    pub fn toggle(&mut self, id: &StoreId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Replace the selection with the given stores.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a StoreId>) {
        self.ids = ids.into_iter().cloned().collect();
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &StoreId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Snapshot of the selected ids.
    #[must_use]
    pub fn ids(&self) -> Vec<StoreId> {
        self.ids.iter().cloned().collect()
    }
}
