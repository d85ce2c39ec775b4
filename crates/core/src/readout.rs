//! One-line textual readout of the measurement in focus

use crate::calibration::{format_length, Calibration};
use crate::interaction::InteractionState;
use crate::measurement::MeasurementStore;
use crate::transform::PageCoordinate;
use std::fmt;

/// Text shown next to the page describing the current measurement
#[derive(Debug, Clone, PartialEq)]
pub enum Readout {
    /// Nothing measured yet
    Prompt,
    /// Everything was just cleared
    Cleared,
    /// Drawing a new segment from the pending point to the cursor
    Measuring { length: f32, unit: String },
    /// Dragging an endpoint of an existing segment
    Adjusting { length: f32, unit: String },
    /// The most recently committed segment
    Last { length: f32, unit: String },
}

impl Readout {
    /// Derive the readout from the interaction state and store contents
    pub fn describe(
        state: InteractionState,
        ghost: Option<PageCoordinate>,
        store: &MeasurementStore,
        calibration: &Calibration,
        unit: &str,
    ) -> Readout {
        let unit = unit.to_string();
        match (state, store.pending(), ghost) {
            (InteractionState::Dragging { index, .. }, _, _) => match store.get(index) {
                Some(measurement) => Readout::Adjusting {
                    length: measurement.physical_length(calibration),
                    unit,
                },
                None => Readout::Prompt,
            },
            (_, Some(pending), Some(ghost)) => Readout::Measuring {
                length: calibration.distance(&pending, &ghost),
                unit,
            },
            _ => match store.last() {
                Some(last) => Readout::Last {
                    length: last.physical_length(calibration),
                    unit,
                },
                None => Readout::Prompt,
            },
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readout::Prompt => write!(f, "Click to measure"),
            Readout::Cleared => write!(f, "Cleared"),
            Readout::Measuring { length, unit } => {
                write!(f, "Measuring: {}", format_length(*length, unit))
            }
            Readout::Adjusting { length, unit } => {
                write!(f, "Adjusting: {}", format_length(*length, unit))
            }
            Readout::Last { length, unit } => write!(f, "Last: {}", format_length(*length, unit)),
        }
    }
}
