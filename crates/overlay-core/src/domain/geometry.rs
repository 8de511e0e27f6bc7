//! Geometry shared by controls and the surface that hosts them.
//!
//! Three coordinate spaces appear in this crate:
//!
//! - **Normalized** (`ControlGeometry`): what the layout collaborator stores,
//!   fractions of the surface in `0.0..=1.0`.
//! - **Surface** (`Point`, `Rect`): raw pixels of the input surface, origin at
//!   the top-left.  Touch events arrive in this space.
//! - **Local**: pixels relative to one control's top-left corner.  Gesture
//!   state machines only ever see local positions.

use serde::{Deserialize, Serialize};

/// A position or a displacement in raw pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// Length of this point seen as a vector from the origin.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Component-wise multiplication by `factor`.
    pub fn scale(self, factor: f32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns `true` if `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Center of the rectangle in surface coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Center of the rectangle in its own local coordinates.
    pub fn local_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Converts a surface position to a position local to this rectangle.
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }
}

/// Size of the input surface in raw pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Absolute center of the whole surface.
    ///
    /// The double-tap-drag gesture positions the cursor relative to this
    /// point, not relative to the touchpad control.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Normalized control placement as stored by the layout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlGeometry {
    /// Left edge as a fraction of surface width.
    pub x: f32,
    /// Top edge as a fraction of surface height.
    pub y: f32,
    /// Width as a fraction of surface width.
    pub width: f32,
    /// Height as a fraction of surface height.
    pub height: f32,
}

impl ControlGeometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns `true` if the geometry has a positive, finite area.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Resolves the normalized geometry against a concrete surface.
    pub fn resolve(&self, surface: SurfaceSize) -> Rect {
        Rect::new(
            self.x * surface.width,
            self.y * surface.height,
            self.width * surface.width,
            self.height * surface.height,
        )
    }
}

/// Density-scaling collaborator: converts device-independent units to raw pixels.
///
/// A single multiplicative factor, e.g. `2.75` on a typical phone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density(pub f32);

impl Density {
    pub fn to_raw_units(self, dp: f32) -> f32 {
        dp * self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Density(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(100.0, 100.0);
        let b = Point::new(103.0, 104.0);

        assert_eq!(a.distance_to(b), 5.0);
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(!r.contains(Point::new(30.1, 15.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn test_resolve_scales_by_surface() {
        // Arrange
        let g = ControlGeometry::new(0.5, 0.25, 0.1, 0.2);
        let surface = SurfaceSize::new(1920.0, 1080.0);

        // Act
        let r = g.resolve(surface);

        // Assert
        assert_eq!(r, Rect::new(960.0, 270.0, 192.0, 216.0));
        assert_eq!(r.center(), Point::new(1056.0, 378.0));
        assert_eq!(r.local_center(), Point::new(96.0, 108.0));
    }

    #[test]
    fn test_geometry_validation() {
        assert!(ControlGeometry::new(0.0, 0.0, 0.1, 0.1).is_valid());
        assert!(!ControlGeometry::new(0.0, 0.0, 0.0, 0.1).is_valid());
        assert!(!ControlGeometry::new(f32::NAN, 0.0, 0.1, 0.1).is_valid());
    }

    #[test]
    fn test_density_scales_linearly() {
        assert_eq!(Density(2.5).to_raw_units(5.0), 12.5);
        assert_eq!(Density::default().to_raw_units(5.0), 5.0);
    }
}
