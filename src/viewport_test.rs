#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn sized(width: f64, height: f64) -> Viewport {
    let mut vp = Viewport::default();
    vp.set_screen_size(Size::new(width, height));
    vp
}

// --- defaults ---

#[test]
fn default_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.pan(), Point::default());
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.zoom_percent(), 100);
    assert_eq!(vp.zoom_limits(), (MIN_ZOOM, MAX_ZOOM));
}

#[test]
fn screen_to_world_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.screen_to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0));
}

// --- mapping ---

#[test]
fn world_to_screen_applies_zoom_then_pan() {
    let mut vp = Viewport::default();
    vp.set_zoom(2.0);
    vp.pan_by(Point::new(10.0, -20.0));
    assert_eq!(vp.world_to_screen(Point::new(5.0, 5.0)), Point::new(20.0, -10.0));
}

#[test]
fn round_trip_over_many_states() {
    let pans = [(0.0, 0.0), (123.5, -77.25), (-1000.0, 3.0)];
    let zooms = [0.25, 0.3, 1.0, 1.7, 5.0];
    let points = [(0.0, 0.0), (1.0, -1.0), (9999.5, 0.125), (-42.0, 17.3)];
    for (px, py) in pans {
        for zoom in zooms {
            let mut vp = Viewport::default();
            vp.set_pan(Point::new(px, py));
            vp.set_zoom(zoom);
            for (x, y) in points {
                let world = Point::new(x, y);
                let back = vp.screen_to_world(vp.world_to_screen(world));
                assert!(point_approx_eq(world, back), "{world:?} -> {back:?} at pan=({px},{py}) zoom={zoom}");
            }
        }
    }
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let mut vp = Viewport::default();
    vp.set_zoom(4.0);
    assert_eq!(vp.screen_dist_to_world(8.0), 2.0);
}

// --- zoom ---

#[test]
fn set_zoom_clamps_low_and_high() {
    let mut vp = Viewport::default();
    assert_eq!(vp.set_zoom(0.01), MIN_ZOOM);
    assert_eq!(vp.set_zoom(50.0), MAX_ZOOM);
    assert_eq!(vp.set_zoom(1.5), 1.5);
}

#[test]
fn set_zoom_ignores_nan() {
    let mut vp = Viewport::default();
    vp.set_zoom(2.0);
    assert_eq!(vp.set_zoom(f64::NAN), 2.0);
}

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut vp = Viewport::default();
    vp.set_pan(Point::new(30.0, 40.0));
    let cursor = Point::new(200.0, 150.0);
    let before = vp.screen_to_world(cursor);
    vp.zoom_at(cursor, 3.0);
    let after = vp.screen_to_world(cursor);
    assert!(point_approx_eq(before, after));
    assert_eq!(vp.zoom(), 3.0);
}

// --- pan ---

#[test]
fn pan_by_is_additive() {
    let mut vp = Viewport::default();
    vp.pan_by(Point::new(10.0, 5.0));
    vp.pan_by(Point::new(-3.0, 5.0));
    assert_eq!(vp.pan(), Point::new(7.0, 10.0));
}

#[test]
fn center_on_puts_point_mid_screen() {
    let mut vp = sized(800.0, 600.0);
    vp.set_zoom(2.0);
    vp.center_on(Point::new(100.0, 50.0));
    assert!(point_approx_eq(vp.world_to_screen(Point::new(100.0, 50.0)), Point::new(400.0, 300.0)));
}

#[test]
fn fit_to_bounds_scales_to_tightest_axis() {
    let mut vp = sized(880.0, 680.0);
    // Available area is 800 x 600 after 40px padding on each side.
    vp.fit_to_bounds(Bounds::from_rect(Point::new(0.0, 0.0), Size::new(400.0, 100.0)));
    assert!(approx_eq(vp.zoom(), 2.0));
    assert!(point_approx_eq(vp.world_to_screen(Point::new(200.0, 50.0)), Point::new(440.0, 340.0)));
}

#[test]
fn fit_to_bounds_respects_zoom_limits() {
    let mut vp = sized(880.0, 680.0);
    vp.fit_to_bounds(Bounds::from_rect(Point::new(0.0, 0.0), Size::new(1.0, 1.0)));
    assert_eq!(vp.zoom(), MAX_ZOOM);
}

#[test]
fn fit_to_degenerate_bounds_only_centers() {
    let mut vp = sized(800.0, 600.0);
    vp.set_zoom(1.5);
    vp.fit_to_bounds(Bounds::from_rect(Point::new(10.0, 10.0), Size::new(0.0, 0.0)));
    assert_eq!(vp.zoom(), 1.5);
    assert!(point_approx_eq(vp.world_to_screen(Point::new(10.0, 10.0)), Point::new(400.0, 300.0)));
}

#[test]
fn reset_restores_identity() {
    let mut vp = Viewport::default();
    vp.set_zoom(3.0);
    vp.pan_by(Point::new(9.0, 9.0));
    vp.reset();
    assert_eq!(vp.state(), ViewportState::default());
}

#[test]
fn apply_state_clamps_zoom() {
    let mut vp = Viewport::default();
    vp.apply_state(ViewportState { pan: Point::new(1.0, 2.0), zoom: 99.0 });
    assert_eq!(vp.pan(), Point::new(1.0, 2.0));
    assert_eq!(vp.zoom(), MAX_ZOOM);
}
