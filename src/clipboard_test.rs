#![allow(clippy::float_cmp)]

use super::*;
use crate::element::{ElementPayload, ShapeData, TextData};
use crate::geom::Size;
use crate::group::group_elements;

fn add_rect(store: &mut ElementStore, x: f64, y: f64) -> ElementId {
    store.add_element(ElementSpec::new(Point::new(x, y), Size::new(10.0, 10.0), ElementPayload::Shape(ShapeData::default())))
}

const OFFSET: Point = Point { x: 20.0, y: 20.0 };

#[test]
fn paste_creates_offset_copies_with_fresh_ids() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let b = add_rect(&mut store, 100.0, 50.0);
    let mut clip = Clipboard::new();

    assert_eq!(clip.copy(&store, &[a, b]), 2);
    let pasted = clip.paste(&mut store, OFFSET);

    assert_eq!(pasted.len(), 2);
    assert_eq!(store.len(), 4);
    assert!(!pasted.contains(&a) && !pasted.contains(&b));
    assert_eq!(store.get(&pasted[0]).unwrap().position, Point::new(20.0, 20.0));
    assert_eq!(store.get(&pasted[1]).unwrap().position, Point::new(120.0, 70.0));
}

#[test]
fn paste_keeps_relative_order_on_top() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let b = add_rect(&mut store, 0.0, 0.0);
    let c = add_rect(&mut store, 0.0, 0.0);
    let mut clip = Clipboard::new();

    // Listed out of paint order on purpose.
    clip.copy(&store, &[b, a]);
    let pasted = clip.paste(&mut store, OFFSET);

    let order: Vec<ElementId> = store.sorted_elements().iter().map(|el| el.id).collect();
    assert_eq!(order, vec![a, b, c, pasted[0], pasted[1]]);
    assert_eq!(clip.entries()[0].source_id, a);
}

#[test]
fn paste_copies_payload_and_flags() {
    let mut store = ElementStore::new();
    let mut spec = ElementSpec::new(
        Point::new(5.0, 5.0),
        Size::new(40.0, 20.0),
        ElementPayload::Text(TextData { content: "hello".into(), ..TextData::default() }),
    )
    .with_rotation(30.0)
    .locked();
    spec.flip_x = true;
    let id = store.add_element(spec);

    let mut clip = Clipboard::new();
    clip.copy(&store, &[id]);
    let pasted = clip.paste(&mut store, OFFSET);
    let copy = store.get(&pasted[0]).unwrap();
    let source = store.get(&id).unwrap();

    assert_eq!(copy.payload, source.payload);
    assert_eq!(copy.size, source.size);
    assert_eq!(copy.rotation, 30.0);
    assert!(copy.locked);
    assert!(copy.flip_x);
    assert!(!copy.flip_y);
}

#[test]
fn empty_clipboard_paste_is_noop() {
    let mut store = ElementStore::new();
    add_rect(&mut store, 0.0, 0.0);
    let clip = Clipboard::new();
    assert!(clip.paste(&mut store, OFFSET).is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn copying_nothing_keeps_previous_contents() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let mut clip = Clipboard::new();
    clip.copy(&store, &[a]);
    assert_eq!(clip.copy(&store, &[Uuid::new_v4()]), 0);
    assert_eq!(clip.len(), 1);
}

#[test]
fn repeated_paste_offsets_from_the_original() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let mut clip = Clipboard::new();
    clip.copy(&store, &[a]);

    let first = clip.paste(&mut store, OFFSET);
    let second = clip.paste(&mut store, OFFSET);

    assert_ne!(first, second);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(&second[0]).unwrap().position, Point::new(20.0, 20.0));
}

#[test]
fn cut_removes_unlocked_and_keeps_locked() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let b = add_rect(&mut store, 0.0, 0.0);
    store.set_locked(&[b], true);
    let mut clip = Clipboard::new();

    let removed = clip.cut(&mut store, &[a, b]);

    assert_eq!(removed, vec![a]);
    assert!(store.contains(&b));
    assert_eq!(clip.len(), 2);
}

#[test]
fn paste_remaps_groups_and_drops_lone_members() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0);
    let b = add_rect(&mut store, 0.0, 0.0);
    let c = add_rect(&mut store, 0.0, 0.0);
    let d = add_rect(&mut store, 0.0, 0.0);
    let g1 = group_elements(&mut store, &[a, b]).unwrap();
    group_elements(&mut store, &[c, d]).unwrap();

    let mut clip = Clipboard::new();
    clip.copy(&store, &[a, b, c]);
    let pasted = clip.paste(&mut store, OFFSET);

    let new_a = store.get(&pasted[0]).unwrap().group_id();
    let new_b = store.get(&pasted[1]).unwrap().group_id();
    let new_c = store.get(&pasted[2]).unwrap().group_id();
    assert!(new_a.is_some());
    assert_eq!(new_a, new_b);
    assert_ne!(new_a, Some(g1));
    assert_eq!(new_c, None);
    assert_eq!(store.get(&a).unwrap().group_id(), Some(g1));
}
