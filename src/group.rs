//! Grouping engine.
//!
//! DESIGN
//! ======
//! A group is not an entity of its own: it is the set of elements sharing a
//! `metadata.group_id`. Grouping writes a fresh id into every listed
//! element; ungrouping scans the store and clears it. The scan is linear in
//! the element count, which is fine at per-canvas scale.
//!
//! An element belongs to at most one group. Grouping an element that is
//! already a member moves it to the new group (last group wins), which may
//! leave the old group with a single member.

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use tracing::info;
use uuid::Uuid;

use crate::element::{ElementId, GroupId};
use crate::store::ElementStore;

/// Group the listed elements under a fresh group id.
///
/// Unknown ids are ignored; if fewer than two existing elements remain the
/// call is rejected and nothing changes. Locked elements are grouped too:
/// membership is metadata, and the lock still blocks their transforms.
pub fn group_elements(store: &mut ElementStore, ids: &[ElementId]) -> Option<GroupId> {
    let members = store.in_paint_order(ids);
    if members.len() < 2 {
        return None;
    }
    let group_id = fresh_group_id(store);
    for id in &members {
        store.set_group(id, Some(group_id));
    }
    info!(%group_id, members = members.len(), "grouped elements");
    Some(group_id)
}

/// Remove `group_id` from every element carrying it. Returns those elements.
pub fn ungroup_elements(store: &mut ElementStore, group_id: &GroupId) -> Vec<ElementId> {
    let members = group_members(store, group_id);
    for id in &members {
        store.set_group(id, None);
    }
    info!(%group_id, members = members.len(), "ungrouped elements");
    members
}

/// Elements currently carrying `group_id`, in paint order.
#[must_use]
pub fn group_members(store: &ElementStore, group_id: &GroupId) -> Vec<ElementId> {
    store.find(|el| el.group_id().as_ref() == Some(group_id)).into_iter().map(|el| el.id).collect()
}

/// `ids` plus every member of any group one of them belongs to, without
/// duplicates and with the originally listed ids first.
#[must_use]
pub fn expand_to_groups(store: &ElementStore, ids: &[ElementId]) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::new();
    for id in ids {
        if store.contains(id) && !out.contains(id) {
            out.push(*id);
        }
    }
    let groups: Vec<GroupId> = out.iter().filter_map(|id| store.get(id).and_then(|el| el.group_id())).collect();
    for group_id in groups {
        for member in group_members(store, &group_id) {
            if !out.contains(&member) {
                out.push(member);
            }
        }
    }
    out
}

fn fresh_group_id(store: &ElementStore) -> GroupId {
    loop {
        let candidate = Uuid::new_v4();
        if store.find(|el| el.group_id() == Some(candidate)).is_empty() {
            return candidate;
        }
    }
}
