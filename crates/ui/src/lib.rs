//! PDF Measure UI Library
//!
//! Overlay and magnifier drawing for the measurement tool, expressed as
//! toolkit-independent primitives.

pub mod magnifier;
pub mod overlay;
pub mod scene;

pub use magnifier::{Magnifier, MagnifierFrame, MagnifierStyle};
pub use overlay::{OverlayFrame, OverlayRenderer, OverlayStyle};
pub use scene::{DrawSurface, FontSpec, Primitive, RecordingSurface, Rect, Shadow, Stroke};
