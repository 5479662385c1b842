//! Coordinate types and transforms for the map plane.
//!
//! A map places every element on a normalized plane: **maturity** runs along
//! the X axis from genesis (`0.0`) to commodity (`1.0`), **visibility** runs
//! along the Y axis from invisible (`0.0`) to the user-facing top (`1.0`).
//!
//! # Overview
//!
//! - [`Position`] - A normalized `(visibility, maturity)` pair as written in map sources
//! - [`Point`] - A pixel coordinate in the rendering surface
//! - [`Region`] - A normalized rectangle spanned by two corners (PST boxes)
//! - [`MapDimensions`] - Pixel size of the rendering surface
//!
//! # Coordinate System
//!
//! Pixel space follows the SVG convention, so the visibility axis is inverted:
//!
//! ```text
//!   (0,0) ─────────────► +X   maturity 0.0 ──► 1.0
//!     │                        visibility 1.0
//!     │                             │
//!     ▼                             ▼
//!    +Y                        visibility 0.0
//! ```
//!
//! The inverse transforms round to [`DEFAULT_PRECISION`] decimal places, which
//! is the precision written back into map sources.

use serde::Deserialize;

/// Number of decimal places used for normalized coordinates written to sources.
pub const DEFAULT_PRECISION: usize = 2;

/// Converts a maturity value into a pixel X coordinate.
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::maturity_to_x;
/// assert_eq!(maturity_to_x(0.5, 500.0), 250.0);
/// ```
pub fn maturity_to_x(maturity: f64, width: f64) -> f64 {
    maturity * width
}

/// Converts a pixel X coordinate back into a maturity value.
///
/// The result is rounded to [`DEFAULT_PRECISION`] decimal places.
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::x_to_maturity;
/// assert_eq!(x_to_maturity(311.0, 500.0), 0.62);
/// ```
pub fn x_to_maturity(x: f64, width: f64) -> f64 {
    round_to(x / width, DEFAULT_PRECISION)
}

/// Converts a visibility value into a pixel Y coordinate.
///
/// Visibility `1.0` maps to the top edge (`y = 0`).
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::visibility_to_y;
/// assert_eq!(visibility_to_y(1.0, 600.0), 0.0);
/// assert_eq!(visibility_to_y(0.25, 600.0), 450.0);
/// ```
pub fn visibility_to_y(visibility: f64, height: f64) -> f64 {
    (1.0 - visibility) * height
}

/// Converts a pixel Y coordinate back into a visibility value.
///
/// The result is rounded to [`DEFAULT_PRECISION`] decimal places.
pub fn y_to_visibility(y: f64, height: f64) -> f64 {
    round_to(1.0 - y / height, DEFAULT_PRECISION)
}

/// Rounds `value` to `precision` decimal places.
///
/// Negative zero is normalized to `0.0` so formatted output never reads `-0.00`.
pub fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Clamps a normalized coordinate into `[0, 1]`.
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Formats a normalized coordinate with a fixed number of decimal places.
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::format_coordinate;
/// assert_eq!(format_coordinate(0.5, 2), "0.50");
/// assert_eq!(format_coordinate(0.625, 2), "0.63");
/// ```
pub fn format_coordinate(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, round_to(value, precision))
}

/// A pixel coordinate on the rendering surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }
}

/// A normalized position on the map plane.
///
/// Sources write positions as `[visibility, maturity]`, so that is also the
/// argument order of [`Position::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    visibility: f64,
    maturity: f64,
}

impl Position {
    /// Creates a position from visibility and maturity.
    pub fn new(visibility: f64, maturity: f64) -> Self {
        Self {
            visibility,
            maturity,
        }
    }

    /// Returns the visibility (Y axis, `1.0` is the top).
    pub fn visibility(self) -> f64 {
        self.visibility
    }

    /// Returns the maturity (X axis, `1.0` is commodity).
    pub fn maturity(self) -> f64 {
        self.maturity
    }

    /// Returns a copy with a different maturity.
    pub fn with_maturity(mut self, maturity: f64) -> Self {
        self.maturity = maturity;
        self
    }

    /// Returns a copy with both axes clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(clamp_unit(self.visibility), clamp_unit(self.maturity))
    }

    /// Returns `true` when both axes lie within `[0, 1]`.
    pub fn is_normalized(self) -> bool {
        (0.0..=1.0).contains(&self.visibility) && (0.0..=1.0).contains(&self.maturity)
    }
}

/// A normalized rectangle spanned by an upper-left and a lower-right corner.
///
/// `visibility1` is the upper edge and `maturity1` the left edge, so a
/// well-formed region has `visibility1 > visibility2` and `maturity1 < maturity2`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Region {
    visibility1: f64,
    maturity1: f64,
    visibility2: f64,
    maturity2: f64,
}

impl Region {
    /// Creates a region from its two corners, in source order.
    pub fn new(visibility1: f64, maturity1: f64, visibility2: f64, maturity2: f64) -> Self {
        Self {
            visibility1,
            maturity1,
            visibility2,
            maturity2,
        }
    }

    /// Creates a region from two corner positions.
    pub fn from_corners(first: Position, second: Position) -> Self {
        Self::new(
            first.visibility(),
            first.maturity(),
            second.visibility(),
            second.maturity(),
        )
    }

    pub fn visibility1(self) -> f64 {
        self.visibility1
    }

    pub fn maturity1(self) -> f64 {
        self.maturity1
    }

    pub fn visibility2(self) -> f64 {
        self.visibility2
    }

    pub fn maturity2(self) -> f64 {
        self.maturity2
    }

    /// The upper-left corner.
    pub fn first(self) -> Position {
        Position::new(self.visibility1, self.maturity1)
    }

    /// The lower-right corner.
    pub fn second(self) -> Position {
        Position::new(self.visibility2, self.maturity2)
    }

    /// Returns `true` when the corners are ordered as the map expects.
    pub fn is_well_formed(self) -> bool {
        self.maturity1 < self.maturity2 && self.visibility1 > self.visibility2
    }

    /// Moves the region so its first corner sits at `first`, keeping its size.
    pub fn moved_to(self, first: Position) -> Self {
        let delta_visibility = first.visibility() - self.visibility1;
        let delta_maturity = first.maturity() - self.maturity1;
        Self::new(
            first.visibility(),
            first.maturity(),
            self.visibility2 + delta_visibility,
            self.maturity2 + delta_maturity,
        )
    }
}

/// Pixel size of the surface a map is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapDimensions {
    width: f64,
    height: f64,
}

impl Default for MapDimensions {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 600.0,
        }
    }
}

impl MapDimensions {
    /// Creates dimensions from a width and height in pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }

    /// Projects a normalized position onto the surface.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wardley_core::geometry::{MapDimensions, Position};
    /// let dims = MapDimensions::new(500.0, 600.0);
    /// let point = dims.to_point(Position::new(0.75, 0.5));
    /// assert_eq!(point.x(), 250.0);
    /// assert_eq!(point.y(), 150.0);
    /// ```
    pub fn to_point(self, position: Position) -> Point {
        Point::new(
            maturity_to_x(position.maturity(), self.width),
            visibility_to_y(position.visibility(), self.height),
        )
    }

    /// Converts a surface point back into a rounded normalized position.
    pub fn to_position(self, point: Point) -> Position {
        Position::new(
            y_to_visibility(point.y(), self.height),
            x_to_maturity(point.x(), self.width),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_maturity_transform() {
        assert_eq!(maturity_to_x(0.0, 500.0), 0.0);
        assert_eq!(maturity_to_x(1.0, 500.0), 500.0);
        assert_eq!(x_to_maturity(125.0, 500.0), 0.25);
    }

    #[test]
    fn test_visibility_transform_is_inverted() {
        assert_eq!(visibility_to_y(1.0, 600.0), 0.0);
        assert_eq!(visibility_to_y(0.0, 600.0), 600.0);
        assert_eq!(y_to_visibility(0.0, 600.0), 1.0);
        assert_eq!(y_to_visibility(600.0, 600.0), 0.0);
    }

    #[test]
    fn test_round_to_normalizes_negative_zero() {
        let rounded = round_to(-0.001, 2);
        assert!(rounded.is_sign_positive());
        assert_eq!(format_coordinate(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_coordinate_precision() {
        assert_eq!(format_coordinate(0.55, 2), "0.55");
        assert_eq!(format_coordinate(0.1, 3), "0.100");
        assert_eq!(format_coordinate(1.0, 2), "1.00");
    }

    #[test]
    fn test_region_moved_to_preserves_size() {
        let region = Region::new(0.9, 0.1, 0.7, 0.3);
        let moved = region.moved_to(Position::new(0.8, 0.2));

        assert!(approx_eq!(f64, moved.visibility2(), 0.6, epsilon = 1e-9));
        assert!(approx_eq!(f64, moved.maturity2(), 0.4, epsilon = 1e-9));
        assert!(moved.is_well_formed());
    }

    #[test]
    fn test_dimensions_point_round_trip() {
        let dims = MapDimensions::new(800.0, 600.0);
        let position = Position::new(0.55, 0.62);
        let back = dims.to_position(dims.to_point(position));

        assert!(approx_eq!(f64, back.visibility(), 0.55, epsilon = 1e-9));
        assert!(approx_eq!(f64, back.maturity(), 0.62, epsilon = 1e-9));
    }

    #[test]
    fn test_position_clamped() {
        let position = Position::new(1.4, -0.2).clamped();
        assert_eq!(position, Position::new(1.0, 0.0));
        assert!(position.is_normalized());
    }

    proptest! {
        #[test]
        fn prop_maturity_round_trip(m in 0.0f64..=1.0, w in 1.0f64..5000.0) {
            let back = x_to_maturity(maturity_to_x(m, w), w);
            prop_assert!((back - m).abs() < 0.01);
        }

        #[test]
        fn prop_visibility_round_trip(v in 0.0f64..=1.0, h in 1.0f64..5000.0) {
            let back = y_to_visibility(visibility_to_y(v, h), h);
            prop_assert!((back - v).abs() < 0.01);
        }
    }
}
