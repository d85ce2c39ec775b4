//! Coordinate transform between screen space and document space
//!
//! Measurements are stored exclusively in document space (PDF points, origin
//! at the top-left of the rendered page). Screen space is the pixel grid of
//! the drawing surface at the current zoom, so converting back and forth is a
//! pure scale by the zoom factor.

use crate::error::{MeasureError, MeasureResult};

/// Page-local coordinate in document space
///
/// - Origin (0, 0) at the top-left of the page
/// - X increases to the right, Y increases downward
/// - Units are points (1/72 inch), independent of zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCoordinate {
    pub x: f32,
    pub y: f32,
}

impl PageCoordinate {
    /// Create a new page coordinate
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another coordinate
    pub fn distance_to(&self, other: &PageCoordinate) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: &PageCoordinate) -> PageCoordinate {
        PageCoordinate::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pixel position on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> ScreenPoint {
        ScreenPoint::new(self.x + dx, self.y + dy)
    }
}

/// Zoom-dependent mapping between screen and document space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    zoom: f32,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl CoordinateTransform {
    /// Create a transform, rejecting non-positive or non-finite zoom
    pub fn new(zoom: f32) -> MeasureResult<Self> {
        Self::validate_zoom(zoom)?;
        Ok(Self { zoom })
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Replace the zoom factor; an invalid value leaves the prior zoom in place
    pub fn set_zoom(&mut self, zoom: f32) -> MeasureResult<()> {
        Self::validate_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    fn validate_zoom(zoom: f32) -> MeasureResult<()> {
        if zoom.is_finite() && zoom > 0.0 {
            Ok(())
        } else {
            Err(MeasureError::InvalidZoom(zoom))
        }
    }

    /// Document space to screen space
    pub fn to_screen(&self, point: PageCoordinate) -> ScreenPoint {
        ScreenPoint::new(point.x * self.zoom, point.y * self.zoom)
    }

    /// Screen space to document space
    pub fn to_page(&self, point: ScreenPoint) -> PageCoordinate {
        PageCoordinate::new(point.x / self.zoom, point.y / self.zoom)
    }

    /// Convert a screen-space length (e.g. a pixel tolerance) to document units
    pub fn length_to_page(&self, pixels: f32) -> f32 {
        pixels / self.zoom
    }
}
