#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::element::{CanvasElement, ElementId};
use crate::geom::Bounds;
use crate::store::ElementStore;

/// The active selection: an insertion-ordered, duplicate-free list of ids.
///
/// The selection holds ids only. Ids whose element has been deleted are
/// filtered out of every read and dropped by `retain_existing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `ids` (duplicates collapse to the first).
    pub fn select(&mut self, ids: &[ElementId]) {
        self.ids.clear();
        self.add(ids);
    }

    /// Append ids not already selected, preserving their order.
    pub fn add(&mut self, ids: &[ElementId]) {
        for id in ids {
            if !self.ids.contains(id) {
                self.ids.push(*id);
            }
        }
    }

    /// Deselect one id. Returns whether it was selected.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids whose element no longer exists.
    pub fn retain_existing(&mut self, store: &ElementStore) {
        self.ids.retain(|id| store.contains(id));
    }

    /// Selected ids that still exist, in selection order.
    #[must_use]
    pub fn ids(&self, store: &ElementStore) -> Vec<ElementId> {
        self.ids.iter().copied().filter(|id| store.contains(id)).collect()
    }

    /// The first selected element that still exists.
    #[must_use]
    pub fn primary<'a>(&self, store: &'a ElementStore) -> Option<&'a CanvasElement> {
        self.ids.iter().find_map(|id| store.get(id))
    }

    /// The selected element, if exactly one live element is selected.
    #[must_use]
    pub fn single<'a>(&self, store: &'a ElementStore) -> Option<&'a CanvasElement> {
        let mut live = self.ids.iter().filter_map(|id| store.get(id));
        match (live.next(), live.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// Number of raw entries, including any not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Axis-aligned box covering every listed element that exists, using each
/// element's rotated corners. `None` if none of the ids exist.
#[must_use]
pub fn bounding_box(store: &ElementStore, ids: &[ElementId]) -> Option<Bounds> {
    ids.iter().filter_map(|id| store.get(id)).map(CanvasElement::bounds).reduce(Bounds::union)
}
