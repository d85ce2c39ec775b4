//! Automatic scale calibration from a fixed paper size
//!
//! Every page is assumed to be printed on one standard sheet (A4 unless
//! configured otherwise). The page's width in document units is matched to
//! the physical width of that sheet in the detected orientation, giving a
//! physical-length-per-point factor. Documents on other paper sizes measure
//! wrong; the renderer's physical metadata is not consulted.

use crate::transform::PageCoordinate;

/// Physical sheet size the calibration assumes
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaperSize {
    /// Display name, e.g. "A4"
    pub name: String,
    /// Shorter side in `unit`
    pub short_side: f32,
    /// Longer side in `unit`
    pub long_side: f32,
    /// Physical unit label, e.g. "cm"
    pub unit: String,
}

impl PaperSize {
    /// ISO A4, 21.0 x 29.7 cm
    pub fn a4() -> Self {
        Self {
            name: "A4".to_string(),
            short_side: 21.0,
            long_side: 29.7,
            unit: "cm".to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.short_side.is_finite()
            && self.long_side.is_finite()
            && self.short_side > 0.0
            && self.long_side >= self.short_side
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::a4()
    }
}

/// Page orientation inferred from its aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Physical units per document unit
///
/// A factor of `0.0` means no page has been calibrated yet; lengths computed
/// in that state are `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    factor: f32,
    orientation: Orientation,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::UNSET
    }
}

impl Calibration {
    pub const UNSET: Calibration = Calibration {
        factor: 0.0,
        orientation: Orientation::Portrait,
    };

    /// Calibrate from the unscaled page size.
    ///
    /// Returns `None` when the dimensions are unusable, so callers can keep
    /// their previous calibration.
    pub fn from_page(width: f32, height: f32, paper: &PaperSize) -> Option<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return None;
        }

        let (orientation, physical_width) = if width >= height {
            (Orientation::Landscape, paper.long_side)
        } else {
            (Orientation::Portrait, paper.short_side)
        };

        Some(Self {
            factor: physical_width / width,
            orientation,
        })
    }

    /// Physical units per document unit (0 when unset)
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_set(&self) -> bool {
        self.factor > 0.0
    }

    /// Convert a document-space length to physical units
    pub fn to_physical(&self, document_length: f32) -> f32 {
        if self.is_set() {
            document_length * self.factor
        } else {
            0.0
        }
    }

    /// Physical distance between two document points
    pub fn distance(&self, p1: &PageCoordinate, p2: &PageCoordinate) -> f32 {
        self.to_physical(p1.distance_to(p2))
    }
}

/// Format a physical length with two decimals and the unit, e.g. "3.53 cm"
pub fn format_length(value: f32, unit: &str) -> String {
    format!("{:.2} {}", value, unit)
}

/// Status line describing the active calibration
pub fn calibration_status(calibration: &Calibration, paper: &PaperSize) -> String {
    format!(
        "Ready ({} Auto-Scale: 1 pt = {:.4} {})",
        paper.name,
        calibration.factor(),
        paper.unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_a4() {
        let calibration = Calibration::from_page(595.0, 842.0, &PaperSize::a4()).unwrap();
        assert_eq!(calibration.orientation(), Orientation::Portrait);
        assert!((calibration.factor() - 21.0 / 595.0).abs() < 1e-7);

        let length = calibration.distance(
            &PageCoordinate::new(100.0, 100.0),
            &PageCoordinate::new(100.0, 200.0),
        );
        assert!((length - 3.529_412).abs() < 1e-4);
        assert_eq!(format_length(length, "cm"), "3.53 cm");
    }

    #[test]
    fn test_landscape_uses_long_side() {
        let calibration = Calibration::from_page(842.0, 595.0, &PaperSize::a4()).unwrap();
        assert_eq!(calibration.orientation(), Orientation::Landscape);
        assert!((calibration.factor() - 29.7 / 842.0).abs() < 1e-7);
    }

    #[test]
    fn test_square_page_counts_as_landscape() {
        let calibration = Calibration::from_page(500.0, 500.0, &PaperSize::a4()).unwrap();
        assert_eq!(calibration.orientation(), Orientation::Landscape);
        assert!((calibration.factor() - 29.7 / 500.0).abs() < 1e-7);
    }

    #[test]
    fn test_calibration_is_zoom_independent() {
        // Only unscaled dimensions feed calibration, so the same page always
        // yields the same factor.
        let a = Calibration::from_page(612.0, 792.0, &PaperSize::a4()).unwrap();
        let b = Calibration::from_page(612.0, 792.0, &PaperSize::a4()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unset_degrades_to_zero() {
        let calibration = Calibration::default();
        assert!(!calibration.is_set());
        assert_eq!(calibration.to_physical(250.0), 0.0);
        assert_eq!(
            calibration.distance(&PageCoordinate::new(0.0, 0.0), &PageCoordinate::new(3.0, 4.0)),
            0.0
        );
    }

    #[test]
    fn test_unusable_dimensions_skip_calibration() {
        let paper = PaperSize::a4();
        assert!(Calibration::from_page(0.0, 842.0, &paper).is_none());
        assert!(Calibration::from_page(595.0, -1.0, &paper).is_none());
        assert!(Calibration::from_page(f32::NAN, 842.0, &paper).is_none());
    }

    #[test]
    fn test_status_line() {
        let paper = PaperSize::a4();
        let calibration = Calibration::from_page(595.0, 842.0, &paper).unwrap();
        assert_eq!(
            calibration_status(&calibration, &paper),
            "Ready (A4 Auto-Scale: 1 pt = 0.0353 cm)"
        );
    }

    #[test]
    fn test_paper_validity() {
        assert!(PaperSize::a4().is_valid());
        let flipped = PaperSize {
            short_side: 29.7,
            long_side: 21.0,
            ..PaperSize::a4()
        };
        assert!(!flipped.is_valid());
    }
}
