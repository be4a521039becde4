//! Planar geometry shared by the layout engine.
//!
//! Coordinates are millimetres. The y axis grows toward the card edge: the
//! finger pads sit on `y = 0` and replicated connectors at negative `y`.
//!
//! Mirroring is expressed with [`Transform`] values that are composed and
//! applied explicitly, so no frame ever outlives the computation that uses it.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum X (mm).
    pub min_x: f64,
    /// Minimum Y (mm).
    pub min_y: f64,
    /// Maximum X (mm).
    pub max_x: f64,
    /// Maximum Y (mm).
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle of the given size centred on `centre`.
    #[must_use]
    pub fn centred_at(centre: Point, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            min_x: centre.x - half_w,
            min_y: centre.y - half_h,
            max_x: centre.x + half_w,
            max_y: centre.y + half_h,
        }
    }

    /// Returns the rectangle width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the rectangle height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Which axes a flip mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Mirror y values about a horizontal line.
    Vertical,
    /// Mirror both axes, a half turn about the pivot.
    Both,
}

/// An axis-aligned affine map: `p' = (sx·x + dx, sy·y + dy)` with `sx, sy ∈ {1, −1}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    sx: f64,
    sy: f64,
    dx: f64,
    dy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            dx,
            dy,
        }
    }

    /// A flip about `pivot`.
    #[must_use]
    pub fn flip(pivot: Point, flip: Flip) -> Self {
        let (sx, sy) = match flip {
            Flip::Vertical => (1.0, -1.0),
            Flip::Both => (-1.0, -1.0),
        };
        Self {
            sx,
            sy,
            dx: pivot.x - sx * pivot.x,
            dy: pivot.y - sy * pivot.y,
        }
    }

    /// Returns the transform that applies `self` first and `next` second.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            sx: next.sx * self.sx,
            sy: next.sy * self.sy,
            dx: next.sx.mul_add(self.dx, next.dx),
            dy: next.sy.mul_add(self.dy, next.dy),
        }
    }

    /// Maps a point through the transform.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.sx.mul_add(p.x, self.dx), self.sy.mul_add(p.y, self.dy))
    }
}
