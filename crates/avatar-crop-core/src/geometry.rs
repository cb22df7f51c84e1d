//! Pan and zoom geometry for the circular cropper.
//!
//! # Coordinate System
//!
//! - All lengths are in container units (CSS pixels for a browser host)
//! - The pan offset is measured from the centered position: `(0, 0)` places
//!   the image center on the container center, which is also the mask center
//! - Positive offsets move the image right/down
//!
//! The image is first fitted into the container (see [`fit_factor`]), then
//! multiplied by the zoom scale. [`pan_bounds`] is the only place the
//! offset/scale coupling is computed; both drag and zoom go through it.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that an offset lies within bounds.
const BOUNDS_EPSILON: f64 = 1e-9;

/// A 2D point or vector in container units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The centered position.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in container units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Multiply both sides by `factor`.
    pub fn scaled(&self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

/// Legal range of the pan offset for one scale value.
///
/// Each axis is independent and symmetric around zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PanBounds {
    /// Clamp each axis of `offset` into the bounds.
    ///
    /// Non-finite components fall back to the nearest bound rather than
    /// propagating NaN into the state.
    pub fn clamp(&self, offset: Point) -> Point {
        Point::new(
            offset.x.max(self.min_x).min(self.max_x),
            offset.y.max(self.min_y).min(self.max_y),
        )
    }

    /// Check whether `offset` lies within the bounds.
    pub fn contains(&self, offset: Point) -> bool {
        offset.x >= self.min_x - BOUNDS_EPSILON
            && offset.x <= self.max_x + BOUNDS_EPSILON
            && offset.y >= self.min_y - BOUNDS_EPSILON
            && offset.y <= self.max_y + BOUNDS_EPSILON
    }
}

/// Compute the factor that maps source pixels to container units at scale 1.
///
/// The image is fitted like CSS `background-size: contain`, except the factor
/// never leaves the shorter image side smaller than the mask. That keeps the
/// mask covered at every scale >= 1, even for panoramas.
pub fn fit_factor(source: Size, container: Size, mask_diameter: f64) -> f64 {
    let contain = (container.width / source.width).min(container.height / source.height);
    let cover_mask = mask_diameter / source.min_side();
    contain.max(cover_mask)
}

/// Compute the displayed image size at scale 1.
pub fn display_size(source: Size, container: Size, mask_diameter: f64) -> Size {
    source.scaled(fit_factor(source, container, mask_diameter))
}

/// Compute the pan bounds for a displayed image at the given scale.
///
/// For an axis with displayed extent `d` and mask diameter `m`, the offset
/// may range over `[-(d*scale - m)/2, (d*scale - m)/2]`. Past that, an image
/// edge would enter the mask. If the scaled image is smaller than the mask on
/// an axis, that axis is pinned to zero.
pub fn pan_bounds(display: Size, mask_diameter: f64, scale: f64) -> PanBounds {
    let half_x = ((display.width * scale - mask_diameter) / 2.0).max(0.0);
    let half_y = ((display.height * scale - mask_diameter) / 2.0).max(0.0);

    PanBounds {
        min_x: -half_x,
        max_x: half_x,
        min_y: -half_y,
        max_y: half_y,
    }
}

/// Clamp a zoom value into `[min_scale, max_scale]`.
pub fn clamp_scale(value: f64, min_scale: f64, max_scale: f64) -> f64 {
    value.max(min_scale).min(max_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_factor_square_source() {
        // 400x400 into 300x300 - contain wins (0.75 > 200/400)
        let fit = fit_factor(Size::new(400.0, 400.0), Size::new(300.0, 300.0), 200.0);
        assert!((fit - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_fit_factor_panorama_covers_mask() {
        // 2000x200 contained in 300x300 would be 300x30 - too short for the mask
        let source = Size::new(2000.0, 200.0);
        let display = display_size(source, Size::new(300.0, 300.0), 200.0);
        assert!((display.height - 200.0).abs() < 1e-9);
        assert!((display.width - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_bounds_scale_one() {
        let bounds = pan_bounds(Size::new(300.0, 300.0), 200.0, 1.0);
        assert_eq!(bounds.min_x, -50.0);
        assert_eq!(bounds.max_x, 50.0);
        assert_eq!(bounds.min_y, -50.0);
        assert_eq!(bounds.max_y, 50.0);
    }

    #[test]
    fn test_pan_bounds_grow_with_scale() {
        let bounds = pan_bounds(Size::new(300.0, 300.0), 200.0, 2.0);
        assert_eq!(bounds.max_x, 200.0);
        assert_eq!(bounds.min_y, -200.0);
    }

    #[test]
    fn test_pan_bounds_pinned_when_smaller_than_mask() {
        let bounds = pan_bounds(Size::new(150.0, 300.0), 200.0, 1.0);
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 0.0);
        assert_eq!(bounds.max_y, 50.0);
    }

    #[test]
    fn test_clamp_each_axis_independently() {
        let bounds = pan_bounds(Size::new(300.0, 300.0), 200.0, 1.0);
        let clamped = bounds.clamp(Point::new(80.0, -10.0));
        assert_eq!(clamped, Point::new(50.0, -10.0));
    }

    #[test]
    fn test_clamp_nan_lands_inside() {
        let bounds = pan_bounds(Size::new(300.0, 300.0), 200.0, 1.0);
        let clamped = bounds.clamp(Point::new(f64::NAN, 0.0));
        assert!(bounds.contains(clamped));
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(10.0, 1.0, 3.0), 3.0);
        assert_eq!(clamp_scale(0.0, 1.0, 3.0), 1.0);
        assert_eq!(clamp_scale(1.5, 1.0, 3.0), 1.5);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a - b, Point::new(2.0, 3.0));
        assert_eq!(a + b, Point::new(4.0, 5.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Clamped offsets always lie inside the bounds.
        #[test]
        fn prop_clamp_lands_in_bounds(
            width in 200.0f64..=1000.0,
            height in 200.0f64..=1000.0,
            scale in 1.0f64..=3.0,
            x in -5000.0f64..=5000.0,
            y in -5000.0f64..=5000.0,
        ) {
            let bounds = pan_bounds(Size::new(width, height), 200.0, scale);
            let clamped = bounds.clamp(Point::new(x, y));
            prop_assert!(bounds.contains(clamped));
        }

        /// Property: Any in-bounds offset keeps the mask inside the image.
        #[test]
        fn prop_in_bounds_offset_covers_mask(
            width in 200.0f64..=1000.0,
            height in 200.0f64..=1000.0,
            scale in 1.0f64..=3.0,
            tx in 0.0f64..=1.0,
            ty in 0.0f64..=1.0,
        ) {
            let mask = 200.0;
            let bounds = pan_bounds(Size::new(width, height), mask, scale);
            let offset = Point::new(
                bounds.min_x + (bounds.max_x - bounds.min_x) * tx,
                bounds.min_y + (bounds.max_y - bounds.min_y) * ty,
            );

            // Image edges relative to the mask center
            let left = offset.x - width * scale / 2.0;
            let right = offset.x + width * scale / 2.0;
            let top = offset.y - height * scale / 2.0;
            let bottom = offset.y + height * scale / 2.0;

            prop_assert!(left <= -mask / 2.0 + 1e-9);
            prop_assert!(right >= mask / 2.0 - 1e-9);
            prop_assert!(top <= -mask / 2.0 + 1e-9);
            prop_assert!(bottom >= mask / 2.0 - 1e-9);
        }

        /// Property: The displayed image always covers the mask at scale 1.
        #[test]
        fn prop_display_size_covers_mask(
            src_w in 1.0f64..=8000.0,
            src_h in 1.0f64..=8000.0,
        ) {
            let display = display_size(Size::new(src_w, src_h), Size::new(300.0, 300.0), 200.0);
            prop_assert!(display.min_side() >= 200.0 - 1e-6);
        }
    }
}
