//! Measurement overlay
//!
//! Paints committed measurements, the rubber-band segment of a measurement
//! being drawn, and length labels. The overlay reads the store and never
//! changes it.

use crate::scene::{DrawSurface, FontSpec, Primitive, Rect, Shadow, Stroke};
use pdf_measure_core::{
    format_length, Calibration, Color, CoordinateTransform, MeasureSession, MeasurementStore,
    PageCoordinate, ScreenPoint,
};

/// Visual parameters of the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub line_width: f32,
    pub marker_radius: f32,
    pub marker_outline: Stroke,
    pub label_font: FontSpec,
    /// Horizontal padding on each side of the label text
    pub label_padding: f32,
    pub label_height: f32,
    pub label_background: Color,
    pub label_border_width: f32,
    pub label_shadow: Option<Shadow>,
    /// Line color of the segment being drawn
    pub ghost_line_color: Color,
    pub ghost_dash: [f32; 2],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            marker_radius: 5.0,
            marker_outline: Stroke::new(2.0, Color::WHITE),
            label_font: FontSpec {
                size: 14.0,
                bold: true,
            },
            label_padding: 6.0,
            label_height: 24.0,
            label_background: Color::WHITE,
            label_border_width: 1.0,
            label_shadow: Some(Shadow {
                blur: 4.0,
                color: Color::BLACK.with_alpha(51),
            }),
            ghost_line_color: Color::BLACK.with_alpha(128),
            ghost_dash: [5.0, 5.0],
        }
    }
}

/// Everything the overlay reads for one frame
pub struct OverlayFrame<'a> {
    pub store: &'a MeasurementStore,
    pub transform: &'a CoordinateTransform,
    pub calibration: &'a Calibration,
    /// Physical unit label, e.g. "cm"
    pub unit: &'a str,
    /// Cursor position while a measurement is being drawn
    pub ghost: Option<PageCoordinate>,
}

impl<'a> OverlayFrame<'a> {
    /// Frame for the current state of a session
    pub fn from_session(session: &'a MeasureSession) -> Self {
        Self {
            store: session.store(),
            transform: session.transform(),
            calibration: session.calibration(),
            unit: &session.config().paper.unit,
            ghost: session.ghost(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    style: OverlayStyle,
}

impl OverlayRenderer {
    /// Clear the surface and draw the whole overlay
    pub fn render(&self, surface: &mut dyn DrawSurface, frame: &OverlayFrame<'_>) {
        surface.clear();

        for measurement in frame.store.iter() {
            self.draw_segment(
                surface,
                frame,
                measurement.p1(),
                measurement.p2(),
                measurement.color(),
                false,
            );
        }

        if let (Some(pending), Some(ghost)) = (frame.store.pending(), frame.ghost) {
            self.draw_segment(
                surface,
                frame,
                pending,
                ghost,
                frame.store.next_color(),
                true,
            );
        }
    }

    fn draw_segment(
        &self,
        surface: &mut dyn DrawSurface,
        frame: &OverlayFrame<'_>,
        p1: PageCoordinate,
        p2: PageCoordinate,
        color: Color,
        temporary: bool,
    ) {
        let style = &self.style;
        let s1 = frame.transform.to_screen(p1);
        let s2 = frame.transform.to_screen(p2);

        surface.draw(Primitive::Line {
            start: [s1.x, s1.y],
            end: [s2.x, s2.y],
            width: style.line_width,
            color: if temporary {
                style.ghost_line_color
            } else {
                color
            },
            dash: temporary.then_some(style.ghost_dash),
        });

        for point in [s1, s2] {
            surface.draw(Primitive::Circle {
                center: [point.x, point.y],
                radius: style.marker_radius,
                fill_color: color,
                stroke: Some(style.marker_outline),
            });
        }

        let length = frame.calibration.distance(&p1, &p2);
        self.draw_label(
            surface,
            s1.midpoint(&s2),
            format_length(length, frame.unit),
            color,
        );
    }

    fn draw_label(
        &self,
        surface: &mut dyn DrawSurface,
        center: ScreenPoint,
        text: String,
        color: Color,
    ) {
        let style = &self.style;
        let width = surface.text_width(&text, style.label_font) + style.label_padding * 2.0;
        let rect = Rect::centered_at(center, width, style.label_height);

        surface.draw(Primitive::Rectangle {
            rect,
            fill_color: Some(style.label_background),
            stroke: Some(Stroke::new(style.label_border_width, color)),
            shadow: style.label_shadow,
        });
        surface.draw(Primitive::Text {
            center: [center.x, center.y],
            text,
            font: style.label_font,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingSurface;
    use pdf_measure_core::{PaperSize, DEFAULT_PALETTE};

    fn pt(x: f32, y: f32) -> PageCoordinate {
        PageCoordinate::new(x, y)
    }

    fn a4() -> Calibration {
        Calibration::from_page(595.0, 842.0, &PaperSize::a4()).unwrap()
    }

    fn render(
        store: &MeasurementStore,
        zoom: f32,
        ghost: Option<PageCoordinate>,
    ) -> RecordingSurface {
        let transform = CoordinateTransform::new(zoom).unwrap();
        let calibration = a4();
        let frame = OverlayFrame {
            store,
            transform: &transform,
            calibration: &calibration,
            unit: "cm",
            ghost,
        };
        let mut surface = RecordingSurface::new();
        OverlayRenderer::default().render(&mut surface, &frame);
        surface
    }

    #[test]
    fn test_empty_store_only_clears() {
        let surface = render(&MeasurementStore::new(), 1.0, None);
        assert_eq!(surface.clear_count(), 1);
        assert!(surface.primitives().is_empty());
    }

    #[test]
    fn test_committed_measurement() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(pt(0.0, 0.0));
        store.begin_or_commit(pt(0.0, 100.0));

        let surface = render(&store, 2.0, None);
        let color = DEFAULT_PALETTE[0];
        let prims = surface.primitives();
        assert_eq!(prims.len(), 5);

        assert_eq!(
            prims[0],
            Primitive::Line {
                start: [0.0, 0.0],
                end: [0.0, 200.0],
                width: 2.0,
                color,
                dash: None,
            }
        );
        assert_eq!(surface.circles().count(), 2);
        match &prims[1] {
            Primitive::Circle {
                radius,
                fill_color,
                stroke,
                ..
            } => {
                assert_eq!(*radius, 5.0);
                assert_eq!(*fill_color, color);
                assert_eq!(stroke.unwrap().color, Color::WHITE);
            }
            other => panic!("expected marker, got {:?}", other),
        }
        match &prims[3] {
            Primitive::Rectangle {
                rect,
                fill_color,
                stroke,
                ..
            } => {
                assert_eq!(rect.center(), ScreenPoint::new(0.0, 100.0));
                assert_eq!(rect.height, 24.0);
                let text_width = "3.53 cm".len() as f32 * 14.0 * 0.6;
                assert!((rect.width - (text_width + 12.0)).abs() < 1e-3);
                assert_eq!(*fill_color, Some(Color::WHITE));
                assert_eq!(*stroke, Some(Stroke::new(1.0, color)));
            }
            other => panic!("expected label box, got {:?}", other),
        }
        assert_eq!(surface.texts(), vec!["3.53 cm"]);
    }

    #[test]
    fn test_ghost_segment_uses_next_color() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(pt(0.0, 0.0));
        store.begin_or_commit(pt(10.0, 0.0));
        store.begin_or_commit(pt(50.0, 50.0));

        let surface = render(&store, 1.0, Some(pt(50.0, 150.0)));
        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].is_dashed());
        match lines[1] {
            Primitive::Line { color, dash, .. } => {
                assert_eq!(*color, Color::new(0, 0, 0, 128));
                assert_eq!(*dash, Some([5.0, 5.0]));
            }
            _ => unreachable!(),
        }

        let next = DEFAULT_PALETTE[1];
        let ghost_markers = surface
            .circles()
            .filter(|p| matches!(p, Primitive::Circle { fill_color, .. } if *fill_color == next))
            .count();
        assert_eq!(ghost_markers, 2);
        assert_eq!(surface.texts(), vec!["0.35 cm", "3.53 cm"]);
    }

    #[test]
    fn test_pending_without_ghost_draws_nothing_extra() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(pt(5.0, 5.0));

        let surface = render(&store, 1.0, None);
        assert!(surface.primitives().is_empty());
    }

    #[test]
    fn test_labels_follow_zoom_but_lengths_do_not() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(pt(10.0, 10.0));
        store.begin_or_commit(pt(110.0, 10.0));

        let small = render(&store, 0.5, None);
        let large = render(&store, 3.0, None);
        assert_eq!(small.texts(), large.texts());
        assert_ne!(small.primitives()[0], large.primitives()[0]);
    }

    #[test]
    fn test_uncalibrated_labels_read_zero() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(pt(0.0, 0.0));
        store.begin_or_commit(pt(30.0, 40.0));

        let transform = CoordinateTransform::default();
        let frame = OverlayFrame {
            store: &store,
            transform: &transform,
            calibration: &Calibration::UNSET,
            unit: "cm",
            ghost: None,
        };
        let mut surface = RecordingSurface::new();
        OverlayRenderer::default().render(&mut surface, &frame);
        assert_eq!(surface.texts(), vec!["0.00 cm"]);
    }
}
