#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point ---

#[test]
fn point_offset_adds_components() {
    let p = Point::new(1.0, 2.0).offset(Point::new(10.0, -5.0));
    assert_eq!(p, Point::new(11.0, -3.0));
}

#[test]
fn rotate_zero_degrees_is_identity() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.rotate_around(Point::new(100.0, 100.0), 0.0), p);
}

#[test]
fn rotate_quarter_turn_is_clockwise_on_screen() {
    // (1, 0) around origin by +90 lands on (0, 1), i.e. pointing "down".
    let p = Point::new(1.0, 0.0).rotate_around(Point::default(), 90.0);
    assert!(approx_eq(p.x, 0.0));
    assert!(approx_eq(p.y, 1.0));
}

#[test]
fn rotate_full_turn_returns_to_start() {
    let p = Point::new(7.0, -2.0);
    let q = p.rotate_around(Point::new(1.0, 1.0), 360.0);
    assert!(approx_eq(p.x, q.x));
    assert!(approx_eq(p.y, q.y));
}

// --- Size ---

#[test]
fn size_non_negative_clamps() {
    assert_eq!(Size::new(-5.0, 3.0).non_negative(), Size::new(0.0, 3.0));
}

#[test]
fn size_is_empty_for_zero_area() {
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(!Size::new(1.0, 1.0).is_empty());
}

// --- Bounds ---

#[test]
fn bounds_from_rect() {
    let b = Bounds::from_rect(Point::new(10.0, 20.0), Size::new(30.0, 40.0));
    assert_eq!(b.min_x, 10.0);
    assert_eq!(b.min_y, 20.0);
    assert_eq!(b.max_x, 40.0);
    assert_eq!(b.max_y, 60.0);
    assert_eq!(b.width(), 30.0);
    assert_eq!(b.height(), 40.0);
    assert_eq!(b.center(), Point::new(25.0, 40.0));
}

#[test]
fn bounds_from_no_points_is_none() {
    assert!(Bounds::from_points(Vec::new()).is_none());
}

#[test]
fn bounds_from_points_covers_all() {
    let b = Bounds::from_points([Point::new(5.0, 1.0), Point::new(-2.0, 8.0), Point::new(3.0, 3.0)]).unwrap();
    assert_eq!(b, Bounds { min_x: -2.0, min_y: 1.0, max_x: 5.0, max_y: 8.0 });
}

#[test]
fn bounds_union() {
    let a = Bounds::from_rect(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    let b = Bounds::from_rect(Point::new(20.0, -5.0), Size::new(5.0, 5.0));
    assert_eq!(a.union(b), Bounds { min_x: 0.0, min_y: -5.0, max_x: 25.0, max_y: 10.0 });
}

#[test]
fn bounds_contains_point_is_inclusive() {
    let b = Bounds::from_rect(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    assert!(b.contains_point(Point::new(10.0, 10.0)));
    assert!(!b.contains_point(Point::new(10.1, 5.0)));
}

#[test]
fn bounds_contains_nested_box() {
    let outer = Bounds::from_rect(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
    let inner = Bounds::from_rect(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
    let straddling = Bounds::from_rect(Point::new(90.0, 90.0), Size::new(20.0, 20.0));
    assert!(outer.contains(&inner));
    assert!(!outer.contains(&straddling));
}

// --- rotated_corners ---

#[test]
fn unrotated_corners_match_rect() {
    let corners = rotated_corners(Point::new(0.0, 0.0), Size::new(4.0, 2.0), 0.0);
    assert_eq!(corners[0], Point::new(0.0, 0.0));
    assert_eq!(corners[2], Point::new(4.0, 2.0));
}

#[test]
fn quarter_turn_swaps_extent() {
    let corners = rotated_corners(Point::new(0.0, 0.0), Size::new(4.0, 2.0), 90.0);
    let b = Bounds::from_points(corners).unwrap();
    assert!(approx_eq(b.width(), 2.0));
    assert!(approx_eq(b.height(), 4.0));
    assert!(approx_eq(b.center().x, 2.0));
    assert!(approx_eq(b.center().y, 1.0));
}
