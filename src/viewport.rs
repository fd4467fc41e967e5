#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_ZOOM, MIN_ZOOM};
use crate::geom::{Bounds, Point, Size};

/// The persisted part of the viewport: pan offset and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { pan: Point::default(), zoom: 1.0 }
    }
}

/// Pan/zoom state for one canvas and the world↔screen mapping it defines.
///
/// `pan` is in screen pixels, `zoom` is a scale factor (1.0 = 100%). The
/// mapping is `screen = world * zoom + pan`, inverted by
/// `world = (screen - pan) / zoom`.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pan: Point,
    zoom: f64,
    screen: Size,
    min_zoom: f64,
    max_zoom: f64,
    fit_padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM, FIT_PADDING_PX)
    }
}

impl Viewport {
    /// Identity viewport with the given zoom limits. The caller guarantees
    /// `0 < min_zoom <= 1 <= max_zoom`; see `EngineConfig::validate`.
    #[must_use]
    pub fn new(min_zoom: f64, max_zoom: f64, fit_padding: f64) -> Self {
        Self { pan: Point::default(), zoom: 1.0, screen: Size::default(), min_zoom, max_zoom, fit_padding }
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a whole-number percentage, for toolbar display.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.zoom * 100.0).round() as u32;
        pct
    }

    #[must_use]
    pub fn screen_size(&self) -> Size {
        self.screen
    }

    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        ViewportState { pan: self.pan, zoom: self.zoom }
    }

    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan.x) / self.zoom, y: (screen.y - self.pan.y) / self.zoom }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x * self.zoom + self.pan.x, y: world.y * self.zoom + self.pan.y }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Record the size of the host drawing surface. Needed by `center_on`
    /// and `fit_to_bounds`.
    pub fn set_screen_size(&mut self, screen: Size) {
        self.screen = screen.non_negative();
    }

    /// Set the zoom factor, clamped to the configured limits. Returns the
    /// value actually applied. Non-finite input leaves the zoom unchanged.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    /// Zoom to `zoom` while keeping the world point under `screen_pt` fixed.
    pub fn zoom_at(&mut self, screen_pt: Point, zoom: f64) -> f64 {
        let anchor = self.screen_to_world(screen_pt);
        self.set_zoom(zoom);
        self.pan = Point::new(screen_pt.x - anchor.x * self.zoom, screen_pt.y - anchor.y * self.zoom);
        self.zoom
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan.offset(delta);
    }

    /// Replace the pan offset outright.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Pan so that `world` appears at the center of the screen.
    pub fn center_on(&mut self, world: Point) {
        let mid = Point::new(self.screen.width / 2.0, self.screen.height / 2.0);
        self.pan = Point::new(mid.x - world.x * self.zoom, mid.y - world.y * self.zoom);
    }

    /// Zoom and pan so `bounds` fills the screen minus padding. Degenerate
    /// boxes or an unsized screen keep the current zoom and only center.
    pub fn fit_to_bounds(&mut self, bounds: Bounds) {
        let avail_w = self.screen.width - 2.0 * self.fit_padding;
        let avail_h = self.screen.height - 2.0 * self.fit_padding;
        if bounds.width() > 0.0 && bounds.height() > 0.0 && avail_w > 0.0 && avail_h > 0.0 {
            self.set_zoom((avail_w / bounds.width()).min(avail_h / bounds.height()));
        }
        self.center_on(bounds.center());
    }

    /// Restore pan and zoom from persisted state (zoom is still clamped).
    pub fn apply_state(&mut self, state: ViewportState) {
        self.pan = state.pan;
        self.set_zoom(state.zoom);
    }

    /// Back to identity: no pan, 100% zoom.
    pub fn reset(&mut self) {
        self.pan = Point::default();
        self.zoom = 1.0;
    }
}
