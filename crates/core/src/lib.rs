//! PDF Measure Core Library
//!
//! Calibration, coordinate mapping, measurement storage and pointer
//! interaction for measuring distances on rendered PDF pages.

pub mod calibration;
pub mod color;
pub mod config;
pub mod error;
pub mod interaction;
pub mod measurement;
pub mod readout;
pub mod session;
pub mod transform;

pub use calibration::{calibration_status, format_length, Calibration, Orientation, PaperSize};
pub use color::{Color, DEFAULT_PALETTE};
pub use config::{MagnifierSettings, MeasureConfig};
pub use error::{MeasureError, MeasureResult};
pub use interaction::{
    hit_test, CursorHint, Hit, InteractionController, InteractionOutcome, InteractionState,
    MagnifierUpdate, PointerEvent, DEFAULT_HIT_TOLERANCE,
};
pub use measurement::{CommitOutcome, Endpoint, Measurement, MeasurementId, MeasurementStore};
pub use readout::Readout;
pub use session::{InstalledPage, MeasureSession, PageRequest};
pub use transform::{CoordinateTransform, PageCoordinate, ScreenPoint};
