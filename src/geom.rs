//! World-space geometry primitives shared by every engine component.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point (or displacement) in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[must_use]
    pub fn offset(self, delta: Point) -> Self {
        Self { x: self.x + delta.x, y: self.y + delta.y }
    }

    /// Rotate this point clockwise by `degrees` around `pivot`.
    ///
    /// Screen/world space has +y pointing down, so a positive angle turns
    /// clockwise on screen.
    #[must_use]
    pub fn rotate_around(self, pivot: Point, degrees: f64) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self { x: pivot.x + dx * cos - dy * sin, y: pivot.y + dx * sin + dy * cos }
    }
}

/// Width and height of an element in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to be non-negative. NaN collapses to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self { width: self.width.max(0.0), height: self.height.max(0.0) }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Box from a top-left corner and a size.
    #[must_use]
    pub fn from_rect(origin: Point, size: Size) -> Self {
        Self { min_x: origin.x, min_y: origin.y, max_x: origin.x + size.width, max_y: origin.y + size.height }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y },
                Some(b) => Self {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether `other` lies entirely inside this box (edges may touch).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x && other.max_x <= self.max_x && other.min_y >= self.min_y && other.max_y <= self.max_y
    }
}

/// The four corners of a rectangle rotated about its own center, clockwise
/// from the top-left.
#[must_use]
pub fn rotated_corners(origin: Point, size: Size, rotation: f64) -> [Point; 4] {
    let center = Point::new(origin.x + size.width / 2.0, origin.y + size.height / 2.0);
    [
        Point::new(origin.x, origin.y),
        Point::new(origin.x + size.width, origin.y),
        Point::new(origin.x + size.width, origin.y + size.height),
        Point::new(origin.x, origin.y + size.height),
    ]
    .map(|corner| corner.rotate_around(center, rotation))
}
