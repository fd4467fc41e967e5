#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::element::{CanvasElement, ElementId, ElementSpec, GroupId};
use crate::geom::Point;
use crate::store::ElementStore;

/// One copied element, keyed by the id it had when copied.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    pub source_id: ElementId,
    pub element: CanvasElement,
}

/// Deep snapshots of copied elements, held outside the document.
///
/// Entries are kept in the paint order they had when copied, and survive
/// pastes so the same content can be pasted repeatedly.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<ClipboardEntry>,
}

impl Clipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the listed elements, replacing previous contents. Unknown ids
    /// are skipped; locked elements are copied like any other. Returns the
    /// number of elements copied. Copying nothing leaves the clipboard as is.
    pub fn copy(&mut self, store: &ElementStore, ids: &[ElementId]) -> usize {
        let entries: Vec<ClipboardEntry> = store
            .in_paint_order(ids)
            .into_iter()
            .filter_map(|id| store.get(&id))
            .map(|el| ClipboardEntry { source_id: el.id, element: el.clone() })
            .collect();
        if entries.is_empty() {
            return 0;
        }
        self.entries = entries;
        self.entries.len()
    }

    /// Copy, then delete whatever the store will let go of. Returns the ids
    /// that were removed; locked elements are copied but stay in place.
    pub fn cut(&mut self, store: &mut ElementStore, ids: &[ElementId]) -> Vec<ElementId> {
        if self.copy(store, ids) == 0 {
            return Vec::new();
        }
        store.delete_elements(ids)
    }

    /// Recreate every entry as a new element, shifted by `offset` from the
    /// original and stacked on top in the original relative order.
    ///
    /// Group ids are remapped so pasted copies never join the source group:
    /// groups with two or more copied members get a fresh shared id, lone
    /// members lose theirs. Returns the new ids; empty when nothing is
    /// copied.
    pub fn paste(&self, store: &mut ElementStore, offset: Point) -> Vec<ElementId> {
        if self.entries.is_empty() {
            return Vec::new();
        }

        let mut group_sizes: HashMap<GroupId, usize> = HashMap::new();
        for entry in &self.entries {
            if let Some(gid) = entry.element.group_id() {
                *group_sizes.entry(gid).or_default() += 1;
            }
        }
        let remap: HashMap<GroupId, GroupId> =
            group_sizes.into_iter().filter(|(_, n)| *n >= 2).map(|(gid, _)| (gid, Uuid::new_v4())).collect();

        let mut new_ids = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let source = &entry.element;
            let id = store.add_element(ElementSpec::from_element(source, offset));
            let group = source.group_id().and_then(|gid| remap.get(&gid).copied());
            store.set_group(&id, group);
            new_ids.push(id);
        }
        info!(count = new_ids.len(), "pasted elements");
        new_ids
    }

    #[must_use]
    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
