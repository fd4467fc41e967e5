//! Transform engine: alignment, flipping, moving, and resizing.
//!
//! Every operation takes the target ids explicitly and skips locked or
//! unknown elements, returning the ids it actually changed.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{CanvasElement, ElementId};
use crate::geom::{Point, Size};
use crate::selection::bounding_box;
use crate::store::ElementStore;

/// Which edge or center line `align_elements` lines elements up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    /// Horizontal center.
    Center,
    Right,
    Top,
    /// Vertical center.
    Middle,
    Bottom,
}

/// Mirror axis for `flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Line the listed elements up against the shared bounding box.
///
/// The box covers every listed element, locked ones included; only unlocked
/// elements move, and only along the aligned axis. Fewer than two existing
/// elements is a no-op.
pub fn align_elements(store: &mut ElementStore, ids: &[ElementId], edge: Alignment) -> Vec<ElementId> {
    let live: Vec<ElementId> = store.in_paint_order(ids);
    if live.len() < 2 {
        return Vec::new();
    }
    let Some(area) = bounding_box(store, &live) else {
        return Vec::new();
    };

    let mut moved = Vec::new();
    for id in ids.iter().filter(|id| live.contains(id)) {
        let Some(b) = store.get(id).map(CanvasElement::bounds) else {
            continue;
        };
        let delta = match edge {
            Alignment::Left => Point::new(area.min_x - b.min_x, 0.0),
            Alignment::Center => Point::new(area.center().x - b.center().x, 0.0),
            Alignment::Right => Point::new(area.max_x - b.max_x, 0.0),
            Alignment::Top => Point::new(0.0, area.min_y - b.min_y),
            Alignment::Middle => Point::new(0.0, area.center().y - b.center().y),
            Alignment::Bottom => Point::new(0.0, area.max_y - b.max_y),
        };
        if delta.x == 0.0 && delta.y == 0.0 {
            continue;
        }
        if store.modify_unlocked(id, |el| el.position = el.position.offset(delta)) && !moved.contains(id) {
            moved.push(*id);
        }
    }
    debug!(?edge, moved = moved.len(), "aligned elements");
    moved
}

/// Mirror each unlocked element about its own center.
///
/// The envelope stays put; the flip flag for the axis toggles and the
/// rotation is negated, since a mirrored rotated shape turns the other way.
/// Both steps are self-inverse, so flipping twice restores the element
/// exactly.
pub fn flip(store: &mut ElementStore, ids: &[ElementId], axis: FlipAxis) -> Vec<ElementId> {
    let mut flipped = Vec::new();
    for id in dedup(ids) {
        let changed = store.modify_unlocked(&id, |el| {
            match axis {
                FlipAxis::Horizontal => el.flip_x = !el.flip_x,
                FlipAxis::Vertical => el.flip_y = !el.flip_y,
            }
            el.rotation = -el.rotation;
        });
        if changed {
            flipped.push(id);
        }
    }
    debug!(?axis, flipped = flipped.len(), "flipped elements");
    flipped
}

/// Translate each unlocked element by `delta` world units.
pub fn move_elements(store: &mut ElementStore, ids: &[ElementId], delta: Point) -> Vec<ElementId> {
    dedup(ids)
        .into_iter()
        .filter(|id| store.modify_unlocked(id, |el| el.position = el.position.offset(delta)))
        .collect()
}

/// Give an unlocked element a new size, keeping its top-left corner.
/// Negative dimensions clamp to zero.
pub fn resize_element(store: &mut ElementStore, id: &ElementId, size: Size) -> bool {
    store.modify_unlocked(id, |el| el.size = size.non_negative())
}

/// Set the rotation (degrees) of each unlocked element.
pub fn rotate_elements(store: &mut ElementStore, ids: &[ElementId], rotation: f64) -> Vec<ElementId> {
    dedup(ids).into_iter().filter(|id| store.modify_unlocked(id, |el| el.rotation = rotation)).collect()
}

fn dedup(ids: &[ElementId]) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
