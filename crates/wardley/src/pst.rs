//! Resizing and dragging PST boxes.
//!
//! Attitude regions are drawn as boxes that can be dragged by one of their
//! corners or edges. The functions here compute the region a drag ends in.
//! Every result is clamped to the unit square and well formed: the left edge
//! stays below the right edge and the upper edge above the lower one, at
//! least [`MIN_EXTENT`] apart.

use std::fmt;

use wardley_core::geometry::{Position, Region, clamp_unit};

/// Smallest width and height of a region, in normalized units.
pub const MIN_EXTENT: f64 = 0.05;

/// The part of a box being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl ResizeHandle {
    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::BottomLeft | ResizeHandle::Left
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::BottomRight | ResizeHandle::Right
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::TopRight | ResizeHandle::Top
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::BottomRight | ResizeHandle::Bottom
        )
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResizeHandle::TopLeft => "top-left",
            ResizeHandle::TopRight => "top-right",
            ResizeHandle::BottomLeft => "bottom-left",
            ResizeHandle::BottomRight => "bottom-right",
            ResizeHandle::Top => "top",
            ResizeHandle::Bottom => "bottom",
            ResizeHandle::Left => "left",
            ResizeHandle::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// Orders the corners of `region` and widens it to [`MIN_EXTENT`].
pub fn normalize(region: Region) -> Region {
    let (m1, m2) = ordered_span(region.maturity1(), region.maturity2());
    let (v2, v1) = ordered_span(region.visibility2(), region.visibility1());
    Region::new(v1, m1, v2, m2)
}

/// Sorts two values into `[0, 1]` and pushes them apart to [`MIN_EXTENT`].
fn ordered_span(a: f64, b: f64) -> (f64, f64) {
    let (low, high) = (clamp_unit(a.min(b)), clamp_unit(a.max(b)));
    if high - low >= MIN_EXTENT {
        (low, high)
    } else if low + MIN_EXTENT <= 1.0 {
        (low, low + MIN_EXTENT)
    } else {
        (1.0 - MIN_EXTENT, 1.0)
    }
}

/// Moves the edges held by `handle` towards `pointer`.
///
/// Edges the handle does not hold stay where they are. A pointer past the
/// opposite edge stops [`MIN_EXTENT`] short of it.
///
/// # Examples
///
/// ```
/// # use wardley::pst::{ResizeHandle, resize};
/// # use wardley_core::geometry::{Position, Region};
/// let region = Region::new(0.9, 0.1, 0.6, 0.3);
/// let resized = resize(region, ResizeHandle::BottomRight, Position::new(0.4, 0.5));
/// assert_eq!(resized, Region::new(0.9, 0.1, 0.4, 0.5));
///
/// // Dragging the left edge past the right one stops short of it.
/// let squeezed = resize(region, ResizeHandle::Left, Position::new(0.7, 0.8));
/// assert!(squeezed.is_well_formed());
/// ```
pub fn resize(region: Region, handle: ResizeHandle, pointer: Position) -> Region {
    let region = normalize(region);
    let pointer = pointer.clamped();

    let mut m1 = region.maturity1();
    let mut m2 = region.maturity2();
    let mut v1 = region.visibility1();
    let mut v2 = region.visibility2();

    // Bounds may cross by an ulp at the border, where `clamp` would panic.
    if handle.moves_left() {
        m1 = pointer.maturity().min(m2 - MIN_EXTENT).max(0.0);
    }
    if handle.moves_right() {
        m2 = pointer.maturity().max(m1 + MIN_EXTENT).min(1.0);
    }
    if handle.moves_top() {
        v1 = pointer.visibility().max(v2 + MIN_EXTENT).min(1.0);
    }
    if handle.moves_bottom() {
        v2 = pointer.visibility().min(v1 - MIN_EXTENT).max(0.0);
    }

    Region::new(v1, m1, v2, m2)
}

/// Moves the whole box so its upper-left corner follows `first`.
///
/// The size is kept; the box stops at the borders of the unit square.
pub fn drag(region: Region, first: Position) -> Region {
    let region = normalize(region);
    let width = region.maturity2() - region.maturity1();
    let height = region.visibility1() - region.visibility2();

    let maturity = first.maturity().min(1.0 - width).max(0.0);
    let visibility = first.visibility().max(height).min(1.0);
    region.moved_to(Position::new(visibility, maturity))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_orders_corners() {
        let region = normalize(Region::new(0.2, 0.8, 0.9, 0.1));
        assert_eq!(region, Region::new(0.9, 0.1, 0.2, 0.8));
    }

    #[test]
    fn test_normalize_widens_collapsed_region() {
        let region = normalize(Region::new(1.0, 0.99, 1.0, 1.0));
        assert!(region.is_well_formed());
        assert!(approx_eq!(f64, region.maturity1(), 0.95, epsilon = 1e-9));
        assert!(approx_eq!(f64, region.visibility2(), 0.95, epsilon = 1e-9));
    }

    #[test]
    fn test_resize_single_edge() {
        let region = Region::new(0.9, 0.1, 0.6, 0.3);
        let resized = resize(region, ResizeHandle::Top, Position::new(0.95, 0.7));
        assert_eq!(resized, Region::new(0.95, 0.1, 0.6, 0.3));
    }

    #[test]
    fn test_resize_clamps_to_unit_square() {
        let region = Region::new(0.9, 0.1, 0.6, 0.3);
        let resized = resize(region, ResizeHandle::TopLeft, Position::new(1.4, -0.3));
        assert_eq!(resized, Region::new(1.0, 0.0, 0.6, 0.3));
    }

    #[test]
    fn test_resize_past_opposite_edge() {
        let region = Region::new(0.9, 0.1, 0.6, 0.3);
        let resized = resize(region, ResizeHandle::Bottom, Position::new(0.95, 0.2));
        assert!(approx_eq!(f64, resized.visibility2(), 0.85, epsilon = 1e-9));
        assert!(resized.is_well_formed());
    }

    #[test]
    fn test_drag_keeps_size_inside_bounds() {
        let region = Region::new(0.9, 0.1, 0.6, 0.3);
        let dragged = drag(region, Position::new(0.2, 0.9));
        assert!(approx_eq!(f64, dragged.maturity1(), 0.8, epsilon = 1e-9));
        assert!(approx_eq!(f64, dragged.maturity2(), 1.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, dragged.visibility1(), 0.3, epsilon = 1e-9));
        assert!(approx_eq!(f64, dragged.visibility2(), 0.0, epsilon = 1e-9));
    }

    fn handle() -> impl Strategy<Value = ResizeHandle> {
        prop_oneof![
            Just(ResizeHandle::TopLeft),
            Just(ResizeHandle::TopRight),
            Just(ResizeHandle::BottomLeft),
            Just(ResizeHandle::BottomRight),
            Just(ResizeHandle::Top),
            Just(ResizeHandle::Bottom),
            Just(ResizeHandle::Left),
            Just(ResizeHandle::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_resize_stays_well_formed(
            v1 in -0.5f64..1.5,
            m1 in -0.5f64..1.5,
            v2 in -0.5f64..1.5,
            m2 in -0.5f64..1.5,
            handle in handle(),
            pv in -0.5f64..1.5,
            pm in -0.5f64..1.5,
        ) {
            let resized = resize(Region::new(v1, m1, v2, m2), handle, Position::new(pv, pm));
            prop_assert!(resized.maturity1() < resized.maturity2());
            prop_assert!(resized.visibility1() > resized.visibility2());
            for value in [resized.maturity1(), resized.maturity2(), resized.visibility1(), resized.visibility2()] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
