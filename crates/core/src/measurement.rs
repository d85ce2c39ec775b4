//! Measurement storage
//!
//! Distance measurements are two-point segments stored in page coordinates,
//! so they survive zoom changes untouched. The store keeps them in creation
//! order together with the first point of a measurement still being drawn.

use crate::calibration::Calibration;
use crate::color::{Color, DEFAULT_PALETTE};
use crate::transform::PageCoordinate;

/// Unique identifier for measurements
pub type MeasurementId = uuid::Uuid;

/// Which end of a measurement segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    P1,
    P2,
}

/// A committed two-point distance measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Unique identifier
    id: MeasurementId,
    /// First endpoint (page coordinates)
    p1: PageCoordinate,
    /// Second endpoint (page coordinates)
    p2: PageCoordinate,
    /// Assigned once at creation and kept for the measurement's lifetime
    color: Color,
}

impl Measurement {
    /// Create a new measurement
    pub fn new(p1: PageCoordinate, p2: PageCoordinate, color: Color) -> Self {
        Self {
            id: MeasurementId::new_v4(),
            p1,
            p2,
            color,
        }
    }

    pub fn id(&self) -> MeasurementId {
        self.id
    }

    pub fn p1(&self) -> PageCoordinate {
        self.p1
    }

    pub fn p2(&self) -> PageCoordinate {
        self.p2
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Position of one endpoint
    pub fn endpoint(&self, endpoint: Endpoint) -> PageCoordinate {
        match endpoint {
            Endpoint::P1 => self.p1,
            Endpoint::P2 => self.p2,
        }
    }

    /// Replace one endpoint
    pub fn set_endpoint(&mut self, endpoint: Endpoint, point: PageCoordinate) {
        match endpoint {
            Endpoint::P1 => self.p1 = point,
            Endpoint::P2 => self.p2 = point,
        }
    }

    /// Length in document units
    pub fn page_length(&self) -> f32 {
        self.p1.distance_to(&self.p2)
    }

    /// Length in physical units (0 if uncalibrated)
    pub fn physical_length(&self, calibration: &Calibration) -> f32 {
        calibration.to_physical(self.page_length())
    }

    /// Where the label goes: the segment midpoint
    pub fn label_position(&self) -> PageCoordinate {
        self.p1.midpoint(&self.p2)
    }
}

/// What `begin_or_commit` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new measurement was started; the point is now pending
    Started,
    /// The pending point was joined into a measurement at this index
    Committed(usize),
}

/// Ordered collection of measurements plus the pending first point
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
    pending: Option<PageCoordinate>,
    palette: Vec<Color>,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementStore {
    /// Create an empty store using the default palette
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.to_vec())
    }

    /// Create an empty store with a custom palette.
    ///
    /// An empty palette falls back to the default one.
    pub fn with_palette(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self {
            measurements: Vec::new(),
            pending: None,
            palette,
        }
    }

    /// Start a measurement, or finish the one in progress.
    pub fn begin_or_commit(&mut self, point: PageCoordinate) -> CommitOutcome {
        match self.pending.take() {
            None => {
                self.pending = Some(point);
                CommitOutcome::Started
            }
            Some(start) => {
                let color = self.next_color();
                self.measurements.push(Measurement::new(start, point, color));
                CommitOutcome::Committed(self.measurements.len() - 1)
            }
        }
    }

    /// Drop the pending point without committing; returns whether one existed
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Replace an endpoint of the measurement at `index`.
    ///
    /// Indices come from a hit-test against this same list, so an index out
    /// of range is ignored rather than reported.
    pub fn update_endpoint(&mut self, index: usize, endpoint: Endpoint, point: PageCoordinate) {
        match self.measurements.get_mut(index) {
            Some(measurement) => measurement.set_endpoint(endpoint, point),
            None => log::debug!("Ignoring endpoint update for missing measurement {}", index),
        }
    }

    /// Remove every measurement and the pending point
    pub fn clear_all(&mut self) {
        self.measurements.clear();
        self.pending = None;
    }

    /// Color the next committed measurement will receive
    pub fn next_color(&self) -> Color {
        self.palette[self.measurements.len() % self.palette.len()]
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn pending(&self) -> Option<PageCoordinate> {
        self.pending
    }

    pub fn get(&self, index: usize) -> Option<&Measurement> {
        self.measurements.get(index)
    }

    /// Most recently committed measurement
    pub fn last(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Every endpoint plus the pending point, in list order
    pub fn points(&self) -> impl Iterator<Item = PageCoordinate> + '_ {
        self.measurements
            .iter()
            .flat_map(|m| [m.p1, m.p2])
            .chain(self.pending)
    }
}
