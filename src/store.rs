//! Element store: the single owner of every element on a canvas.
//!
//! The store is plain CRUD over the document plus the queries other
//! components build on. It never rejects expected input: unknown ids and
//! locked elements are skipped and reported through return values, so that
//! a UI event referencing an element another event already removed is a
//! harmless no-op.
//!
//! Paint order is `(z_index, insertion sequence)`. New elements always land
//! one above the current top `z_index`. When caller-supplied z values leave
//! no room at either end of the `i64` range, the store renumbers every
//! element contiguously in paint order first.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::element::{CanvasElement, ElementId, ElementPatch, ElementSpec, ElementType, GroupId};
use crate::geom::Point;

/// Errors raised when loading externally supplied elements.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
}

struct Entry {
    seq: u64,
    element: CanvasElement,
}

/// In-memory store of canvas elements.
pub struct ElementStore {
    entries: HashMap<ElementId, Entry>,
    next_seq: u64,
    top_z: i64,
    renumbered: Vec<ElementId>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new(), next_seq: 0, top_z: 0, renumbered: Vec::new() }
    }

    // --- Mutations ---

    /// Insert a new element on top of the z-order and return its fresh id.
    pub fn add_element(&mut self, spec: ElementSpec) -> ElementId {
        let mut id = Uuid::new_v4();
        while self.entries.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let z_index = self.next_top_z();
        let element = CanvasElement {
            id,
            position: spec.position,
            size: spec.size.non_negative(),
            rotation: spec.rotation,
            z_index,
            locked: spec.locked,
            flip_x: spec.flip_x,
            flip_y: spec.flip_y,
            metadata: Default::default(),
            payload: spec.payload,
        };
        debug!(%id, kind = ?element.element_type(), z = element.z_index, "element added");
        self.push(element);
        id
    }

    /// Insert a fully formed element, keeping its id and `z_index`. Used to
    /// restore persisted documents.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if an element with the same id already exists.
    pub fn insert_existing(&mut self, element: CanvasElement) -> Result<(), StoreError> {
        if self.entries.contains_key(&element.id) {
            warn!(id = %element.id, "refusing to insert duplicate element id");
            return Err(StoreError::DuplicateId(element.id));
        }
        self.top_z = self.top_z.max(element.z_index);
        self.push(element);
        Ok(())
    }

    fn push(&mut self, element: CanvasElement) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(element.id, Entry { seq, element });
    }

    /// Merge a partial update into an element. Returns `false` if the id is
    /// unknown. Geometry fields are ignored on locked elements, and a payload
    /// of a different type is ignored because an element's type is fixed.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        let el = &mut entry.element;
        if el.locked && patch.touches_geometry() {
            debug!(%id, "geometry update skipped on locked element");
        } else {
            if let Some(position) = patch.position {
                el.position = position;
            }
            if let Some(size) = patch.size {
                el.size = size.non_negative();
            }
            if let Some(rotation) = patch.rotation {
                el.rotation = rotation;
            }
        }
        if let Some(z) = patch.z_index {
            el.z_index = z;
            self.top_z = self.top_z.max(z);
        }
        if let Some(ref payload) = patch.payload {
            if payload.element_type() == el.element_type() {
                el.payload = payload.clone();
            } else {
                warn!(%id, from = ?el.element_type(), to = ?payload.element_type(), "payload type change ignored");
            }
        }
        true
    }

    /// Remove every listed element that exists and is unlocked. Returns the
    /// ids actually removed, in request order. Frames do not take their
    /// visual contents with them.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut removed = Vec::new();
        for id in ids {
            match self.entries.get(id) {
                Some(entry) if entry.element.locked => debug!(%id, "delete skipped on locked element"),
                Some(_) => {
                    self.entries.remove(id);
                    removed.push(*id);
                }
                None => {}
            }
        }
        removed
    }

    /// Set the lock flag on the listed elements. Returns the ids whose flag
    /// actually changed.
    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> Vec<ElementId> {
        let mut changed = Vec::new();
        for id in ids {
            if let Some(entry) = self.entries.get_mut(id) {
                if entry.element.locked != locked {
                    entry.element.locked = locked;
                    changed.push(*id);
                }
            }
        }
        changed
    }

    /// Write or clear `metadata.group_id`. Lock state does not apply: group
    /// membership is metadata, not a transform.
    pub fn set_group(&mut self, id: &ElementId, group_id: Option<GroupId>) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        entry.element.metadata.group_id = group_id;
        true
    }

    /// Apply `f` to the element if it exists and is unlocked. Returns whether
    /// `f` ran.
    pub fn modify_unlocked<F>(&mut self, id: &ElementId, f: F) -> bool
    where
        F: FnOnce(&mut CanvasElement),
    {
        match self.entries.get_mut(id) {
            Some(entry) if !entry.element.locked => {
                f(&mut entry.element);
                true
            }
            _ => false,
        }
    }

    /// Raise the listed elements above everything else, keeping their
    /// relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let ordered = self.in_paint_order(ids);
        for id in &ordered {
            let z = self.next_top_z();
            if let Some(entry) = self.entries.get_mut(id) {
                entry.element.z_index = z;
            }
        }
        ordered
    }

    /// Drop the listed elements below everything else, keeping their
    /// relative order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let ordered = self.in_paint_order(ids);
        let count = i64::try_from(ordered.len()).unwrap_or(i64::MAX);
        let start = match self.bottom_z().checked_sub(count) {
            Some(start) => start,
            None => {
                self.renumber();
                self.bottom_z().saturating_sub(count)
            }
        };
        for (id, z) in ordered.iter().zip(start..) {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.element.z_index = z;
            }
        }
        ordered
    }

    /// Ids whose `z_index` was rewritten by a renumbering since the last
    /// call, in paint order.
    pub fn take_renumbered(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.renumbered)
    }

    fn bottom_z(&self) -> i64 {
        self.entries.values().map(|e| e.element.z_index).min().unwrap_or(0)
    }

    /// Claim the next z above everything else.
    fn next_top_z(&mut self) -> i64 {
        if let Some(z) = self.top_z.checked_add(1) {
            self.top_z = z;
            return z;
        }
        self.renumber();
        self.top_z = self.top_z.saturating_add(1);
        self.top_z
    }

    /// Rewrite every `z_index` to `1..=len` in paint order.
    fn renumber(&mut self) {
        let ordered: Vec<ElementId> = self.sorted_elements().into_iter().map(|el| el.id).collect();
        let mut top = 0;
        for (id, z) in ordered.iter().zip(1..) {
            if let Some(entry) = self.entries.get_mut(id) {
                if entry.element.z_index != z {
                    entry.element.z_index = z;
                    if !self.renumbered.contains(id) {
                        self.renumbered.push(*id);
                    }
                }
            }
            top = z;
        }
        self.top_z = top;
        warn!(elements = ordered.len(), "z-order exhausted, renumbered");
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
        self.top_z = 0;
        self.renumbered.clear();
    }

    // --- Queries ---

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.entries.get(id).map(|e| &e.element)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.entries.contains_key(id)
    }

    /// All elements in paint order: `(z_index, insertion order)` ascending.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&CanvasElement> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.element.z_index.cmp(&b.element.z_index).then_with(|| a.seq.cmp(&b.seq)));
        entries.into_iter().map(|e| &e.element).collect()
    }

    /// Elements of one type, in paint order.
    #[must_use]
    pub fn elements_of_type(&self, ty: ElementType) -> Vec<&CanvasElement> {
        self.find(|el| el.element_type() == ty)
    }

    /// Elements matching `pred`, in paint order.
    pub fn find<P>(&self, pred: P) -> Vec<&CanvasElement>
    where
        P: Fn(&CanvasElement) -> bool,
    {
        self.sorted_elements().into_iter().filter(|el| pred(el)).collect()
    }

    /// The existing subset of `ids`, reordered bottom-to-top.
    #[must_use]
    pub fn in_paint_order(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut found: Vec<&Entry> = Vec::new();
        for id in ids {
            if let Some(entry) = self.entries.get(id) {
                if !found.iter().any(|e| e.element.id == *id) {
                    found.push(entry);
                }
            }
        }
        found.sort_by(|a, b| a.element.z_index.cmp(&b.element.z_index).then_with(|| a.seq.cmp(&b.seq)));
        found.into_iter().map(|e| e.element.id).collect()
    }

    /// Elements whose bounds lie entirely inside the frame's bounds.
    /// Containment is geometric and recomputed on every call; frames own
    /// nothing. Returns an empty list if `frame_id` is not a frame.
    #[must_use]
    pub fn elements_in_frame(&self, frame_id: &ElementId) -> Vec<ElementId> {
        let Some(frame) = self.get(frame_id).filter(|f| f.element_type() == ElementType::Frame) else {
            return Vec::new();
        };
        let area = frame.bounds();
        self.find(|el| el.id != frame.id && area.contains(&el.bounds())).into_iter().map(|el| el.id).collect()
    }

    /// Topmost element whose (rotated) body contains `world`.
    #[must_use]
    pub fn topmost_at(&self, world: Point) -> Option<&CanvasElement> {
        self.sorted_elements().into_iter().rev().find(|el| el.contains_point(world))
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
