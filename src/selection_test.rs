#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::element::{ElementPayload, ElementSpec, ShapeData};
use crate::geom::{Point, Size};

fn add_rect(store: &mut ElementStore, x: f64, y: f64, w: f64, h: f64) -> ElementId {
    store.add_element(ElementSpec::new(Point::new(x, y), Size::new(w, h), ElementPayload::Shape(ShapeData::default())))
}

#[test]
fn select_replaces_and_dedups() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut sel = Selection::new();
    sel.select(&[a]);
    sel.select(&[b, a, b]);
    assert_eq!(sel.len(), 2);
    assert!(sel.contains(&a));
}

#[test]
fn add_keeps_insertion_order() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let c = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let mut sel = Selection::new();
    sel.select(&[c]);
    sel.add(&[a, c, b]);
    assert_eq!(sel.ids(&store), vec![c, a, b]);
    assert_eq!(sel.primary(&store).map(|e| e.id), Some(c));
}

#[test]
fn remove_and_clear() {
    let a = Uuid::new_v4();
    let mut sel = Selection::new();
    sel.select(&[a]);
    assert!(sel.remove(&a));
    assert!(!sel.remove(&a));
    sel.select(&[a]);
    sel.clear();
    assert!(sel.is_empty());
}

#[test]
fn reads_skip_deleted_elements() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let mut sel = Selection::new();
    sel.select(&[a, b]);
    store.delete_elements(&[a]);

    assert_eq!(sel.ids(&store), vec![b]);
    assert_eq!(sel.primary(&store).map(|e| e.id), Some(b));
    assert_eq!(sel.single(&store).map(|e| e.id), Some(b));

    sel.retain_existing(&store);
    assert_eq!(sel.len(), 1);
}

#[test]
fn single_requires_exactly_one() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = add_rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let mut sel = Selection::new();
    assert!(sel.single(&store).is_none());
    sel.select(&[a, b]);
    assert!(sel.single(&store).is_none());
    sel.select(&[a]);
    assert_eq!(sel.single(&store).map(|e| e.id), Some(a));
}

#[test]
fn bounding_box_unions_elements() {
    let mut store = ElementStore::new();
    let a = add_rect(&mut store, 10.0, 10.0, 20.0, 20.0);
    let b = add_rect(&mut store, 100.0, -5.0, 10.0, 10.0);
    let bb = bounding_box(&store, &[a, b, Uuid::new_v4()]).unwrap();
    assert_eq!(bb, Bounds { min_x: 10.0, min_y: -5.0, max_x: 110.0, max_y: 30.0 });
}

#[test]
fn bounding_box_uses_rotated_corners() {
    let mut store = ElementStore::new();
    let id = store.add_element(
        ElementSpec::new(Point::new(0.0, 0.0), Size::new(40.0, 10.0), ElementPayload::Shape(ShapeData::default()))
            .with_rotation(90.0),
    );
    let bb = bounding_box(&store, &[id]).unwrap();
    assert!((bb.width() - 10.0).abs() < 1e-9);
    assert!((bb.height() - 40.0).abs() < 1e-9);
    assert!((bb.min_y - -15.0).abs() < 1e-9);
}

#[test]
fn bounding_box_of_nothing_is_none() {
    let store = ElementStore::new();
    assert!(bounding_box(&store, &[]).is_none());
    assert!(bounding_box(&store, &[Uuid::new_v4()]).is_none());
}
