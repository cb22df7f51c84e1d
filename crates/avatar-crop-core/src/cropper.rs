//! Pan/zoom state machine for the circular cropper.
//!
//! A [`Cropper`] owns a [`Viewport`] (the fixed geometry of one source image
//! inside one container) and a [`CropState`] (what the pointer and zoom
//! slider have done to it). All mutation goes through the drag and zoom
//! operations, each of which clamps the offset with
//! [`pan_bounds`](crate::geometry::pan_bounds).

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CropperConfig;
use crate::geometry::{clamp_scale, display_size, pan_bounds, PanBounds, Point, Size};
use crate::CropError;

/// Mutable pan/zoom state of an open cropper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropState {
    /// Horizontal offset from the centered position
    pub offset_x: f64,
    /// Vertical offset from the centered position
    pub offset_y: f64,
    /// Zoom multiplier
    pub scale: f64,
    /// Whether a drag is in progress
    pub is_dragging: bool,
    /// Pointer position minus offset at drag start
    pub drag_anchor: Point,
}

impl Default for CropState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            is_dragging: false,
            drag_anchor: Point::ORIGIN,
        }
    }
}

impl CropState {
    /// Current offset as a point.
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    fn set_offset(&mut self, offset: Point) {
        self.offset_x = offset.x;
        self.offset_y = offset.y;
    }
}

/// Fixed geometry of a source image inside the cropper container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Upright source width in pixels
    pub source_width: u32,
    /// Upright source height in pixels
    pub source_height: u32,
    /// Container size
    pub container: Size,
    /// Displayed image size at scale 1
    pub display: Size,
    /// Circular mask diameter
    pub mask_diameter: f64,
    /// Lowest zoom value
    pub min_scale: f64,
    /// Highest zoom value
    pub max_scale: f64,
}

impl Viewport {
    /// Build a viewport for a source image of the given pixel dimensions.
    pub fn new(
        config: &CropperConfig,
        source_width: u32,
        source_height: u32,
    ) -> Result<Self, CropError> {
        config.validate()?;

        if source_width == 0 || source_height == 0 {
            return Err(CropError::EmptySource {
                width: source_width,
                height: source_height,
            });
        }

        let container = Size::new(config.container_width, config.container_height);
        let source = Size::new(source_width as f64, source_height as f64);

        Ok(Self {
            source_width,
            source_height,
            container,
            display: display_size(source, container, config.mask_diameter),
            mask_diameter: config.mask_diameter,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        })
    }

    /// Pan bounds at `scale`.
    pub fn bounds(&self, scale: f64) -> PanBounds {
        pan_bounds(self.display, self.mask_diameter, scale)
    }

    /// Clamp `scale` into the zoom range.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        clamp_scale(scale, self.min_scale, self.max_scale)
    }
}

/// Placement of the live preview layer inside the container.
///
/// The layer is `width` x `height` with its top-left corner at
/// (`left`, `top`), then scaled by `scale` around its own center. This maps
/// directly onto `transform: translate(left, top) scale(scale)` with
/// `transform-origin: center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewTransform {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Pan/zoom controller for one source image.
#[derive(Debug, Clone)]
pub struct Cropper {
    viewport: Viewport,
    state: CropState,
}

impl Cropper {
    /// Open a cropper centered at the lowest zoom.
    pub fn new(
        config: &CropperConfig,
        source_width: u32,
        source_height: u32,
    ) -> Result<Self, CropError> {
        let viewport = Viewport::new(config, source_width, source_height)?;
        let state = CropState {
            scale: viewport.min_scale,
            ..CropState::default()
        };

        debug!(
            source_width,
            source_height,
            display_width = viewport.display.width,
            display_height = viewport.display.height,
            "cropper opened"
        );

        Ok(Self { viewport, state })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    /// Pan bounds at the current scale.
    pub fn bounds(&self) -> PanBounds {
        self.viewport.bounds(self.state.scale)
    }

    /// Start dragging from `pointer`.
    pub fn begin_drag(&mut self, pointer: Point) {
        self.state.drag_anchor = pointer - self.state.offset();
        self.state.is_dragging = true;
    }

    /// Move the image with the pointer. Ignored unless a drag is in progress.
    pub fn update_drag(&mut self, pointer: Point) {
        if !self.state.is_dragging {
            return;
        }

        let candidate = pointer - self.state.drag_anchor;
        let clamped = self.bounds().clamp(candidate);
        if clamped != candidate {
            trace!(
                candidate_x = candidate.x,
                candidate_y = candidate.y,
                x = clamped.x,
                y = clamped.y,
                "drag clamped"
            );
        }
        self.state.set_offset(clamped);
    }

    /// Stop dragging.
    pub fn end_drag(&mut self) {
        self.state.is_dragging = false;
    }

    /// Set the zoom, clamped to the configured range.
    ///
    /// The offset is re-clamped against the new bounds, so zooming out never
    /// leaves an edge of the image inside the mask. Non-finite input is
    /// ignored.
    pub fn set_zoom(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }

        self.state.scale = self.viewport.clamp_scale(value);
        let offset = self.bounds().clamp(self.state.offset());
        self.state.set_offset(offset);
    }

    /// Change the zoom by `delta` (wheel or keyboard zoom).
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(self.state.scale + delta);
    }

    /// Return to the centered, unzoomed state.
    pub fn reset(&mut self) {
        self.state = CropState {
            scale: self.viewport.min_scale,
            ..CropState::default()
        };
        debug!("cropper reset");
    }

    /// Where the host should draw the preview layer for the current state.
    pub fn preview_transform(&self) -> PreviewTransform {
        let Viewport {
            container, display, ..
        } = self.viewport;

        PreviewTransform {
            left: (container.width - display.width) / 2.0 + self.state.offset_x,
            top: (container.height - display.height) / 2.0 + self.state.offset_y,
            width: display.width,
            height: display.height,
            scale: self.state.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    fn cropper_400() -> Cropper {
        Cropper::new(&CropperConfig::default(), 400, 400).unwrap()
    }

    #[test]
    fn test_opens_centered() {
        let cropper = cropper_400();
        assert_eq!(cropper.state().offset(), Point::ORIGIN);
        assert_eq!(cropper.state().scale, 1.0);
        assert!(!cropper.state().is_dragging);
    }

    #[test]
    fn test_drag_within_bounds() {
        let mut cropper = cropper_400();
        cropper.begin_drag(Point::new(100.0, 100.0));
        cropper.update_drag(Point::new(150.0, 100.0));
        assert_eq!(cropper.state().offset(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_drag_clamps_to_nearest_legal_value() {
        let mut cropper = cropper_400();
        cropper.begin_drag(Point::new(100.0, 100.0));
        cropper.update_drag(Point::new(170.0, 20.0));
        assert_eq!(cropper.state().offset(), Point::new(50.0, -50.0));
    }

    #[test]
    fn test_drag_anchor_accounts_for_offset() {
        let mut cropper = cropper_400();
        cropper.begin_drag(Point::new(0.0, 0.0));
        cropper.update_drag(Point::new(20.0, 10.0));
        cropper.end_drag();

        // Second drag continues from the current offset
        cropper.begin_drag(Point::new(500.0, 500.0));
        assert_eq!(cropper.state().drag_anchor, Point::new(480.0, 490.0));
        cropper.update_drag(Point::new(510.0, 505.0));
        assert_eq!(cropper.state().offset(), Point::new(30.0, 15.0));
    }

    #[test]
    fn test_update_without_drag_is_ignored() {
        let mut cropper = cropper_400();
        cropper.update_drag(Point::new(40.0, 40.0));
        assert_eq!(cropper.state().offset(), Point::ORIGIN);

        cropper.begin_drag(Point::ORIGIN);
        cropper.end_drag();
        cropper.update_drag(Point::new(40.0, 40.0));
        assert_eq!(cropper.state().offset(), Point::ORIGIN);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cropper = cropper_400();
        cropper.set_zoom(10.0);
        assert_eq!(cropper.state().scale, 3.0);
        cropper.set_zoom(0.0);
        assert_eq!(cropper.state().scale, 1.0);
    }

    #[test]
    fn test_zoom_ignores_nan() {
        let mut cropper = cropper_400();
        cropper.set_zoom(2.0);
        cropper.set_zoom(f64::NAN);
        assert_eq!(cropper.state().scale, 2.0);
    }

    #[test]
    fn test_zoom_out_reclamps_offset() {
        let mut cropper = cropper_400();
        cropper.set_zoom(3.0);
        cropper.begin_drag(Point::ORIGIN);
        cropper.update_drag(Point::new(300.0, -300.0));
        cropper.end_drag();
        assert_eq!(cropper.state().offset(), Point::new(300.0, -300.0));

        cropper.set_zoom(1.0);
        assert_eq!(cropper.state().offset(), Point::new(50.0, -50.0));
        assert!(cropper.bounds().contains(cropper.state().offset()));
    }

    #[test]
    fn test_zoom_by() {
        let mut cropper = cropper_400();
        cropper.zoom_by(0.5);
        assert_eq!(cropper.state().scale, 1.5);
        cropper.zoom_by(-5.0);
        assert_eq!(cropper.state().scale, 1.0);
    }

    #[test]
    fn test_reset() {
        let mut cropper = cropper_400();
        cropper.set_zoom(2.0);
        cropper.begin_drag(Point::ORIGIN);
        cropper.update_drag(Point::new(30.0, 30.0));
        cropper.reset();
        assert_eq!(*cropper.state(), CropState::default());
    }

    #[test]
    fn test_preview_transform_centered() {
        let cropper = cropper_400();
        let transform = cropper.preview_transform();
        assert_eq!(transform.left, 0.0);
        assert_eq!(transform.top, 0.0);
        assert_eq!(transform.width, 300.0);
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn test_preview_transform_follows_offset() {
        let mut cropper = Cropper::new(&CropperConfig::default(), 800, 400).unwrap();
        cropper.begin_drag(Point::ORIGIN);
        cropper.update_drag(Point::new(-10.0, 0.0));
        let transform = cropper.preview_transform();

        // 800x400 displays at 400x200 (the mask pins the short side)
        assert_eq!(transform.width, 400.0);
        assert_eq!(transform.height, 200.0);
        assert_eq!(transform.left, -60.0);
        assert_eq!(transform.top, 50.0);
    }

    #[test]
    fn test_rejects_empty_source() {
        let result = Cropper::new(&CropperConfig::default(), 0, 100);
        assert!(matches!(result, Err(CropError::EmptySource { .. })));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = CropperConfig::default();
        config.output_size = 0;
        let result = Cropper::new(&config, 100, 100);
        assert!(matches!(
            result,
            Err(CropError::Config(ConfigError::ZeroOutputSize))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
