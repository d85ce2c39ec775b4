//! Magnifier preview
//!
//! Shows an enlarged copy of the page around the cursor with a crosshair and
//! markers for nearby measurement points, so endpoints can be placed
//! precisely. The preview reads the rendered page and the store only.

use crate::scene::{DrawSurface, Primitive, Rect, Stroke};
use image::{Rgba, RgbaImage};
use pdf_measure_core::{
    Color, CoordinateTransform, MagnifierSettings, MeasureSession, MeasurementStore, ScreenPoint,
};

/// Visual parameters of the magnifier overlay
#[derive(Debug, Clone, PartialEq)]
pub struct MagnifierStyle {
    pub crosshair_color: Color,
    pub crosshair_width: f32,
    /// Marker radius before magnification
    pub marker_radius: f32,
    pub marker_fill: Color,
    pub marker_outline: Stroke,
}

impl Default for MagnifierStyle {
    fn default() -> Self {
        Self {
            crosshair_color: Color::new(255, 0, 0, 128),
            crosshair_width: 1.0,
            marker_radius: 5.0,
            marker_fill: Color::BLACK.with_alpha(128),
            marker_outline: Stroke::new(1.0, Color::WHITE),
        }
    }
}

/// One magnifier image ready to show
#[derive(Debug, Clone)]
pub struct MagnifierFrame {
    /// Enlarged page pixels; transparent where the source lies off the page
    pub image: RgbaImage,
    /// Crosshair and markers in preview-local pixels
    pub primitives: Vec<Primitive>,
    /// Top-left corner of the preview on the drawing surface
    pub position: ScreenPoint,
}

impl MagnifierFrame {
    /// Side length of the square preview
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Draw the crosshair and markers into a preview-local surface
    pub fn draw_overlay(&self, surface: &mut dyn DrawSurface) {
        surface.clear();
        for primitive in &self.primitives {
            surface.draw(primitive.clone());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Magnifier {
    settings: MagnifierSettings,
    style: MagnifierStyle,
}

impl Magnifier {
    pub fn new(settings: MagnifierSettings) -> Self {
        Self {
            settings,
            style: MagnifierStyle::default(),
        }
    }

    /// Region of the page surface that gets enlarged, centered on the cursor
    pub fn source_rect(&self, cursor: ScreenPoint) -> Rect {
        let side = self.settings.size as f32 / self.settings.zoom;
        Rect::centered_at(cursor, side, side)
    }

    /// Where the preview goes on the drawing surface
    pub fn position(&self, cursor: ScreenPoint) -> ScreenPoint {
        cursor.offset(self.settings.offset, self.settings.offset)
    }

    /// Build the preview for a session's installed page
    pub fn render_session(
        &self,
        page: &RgbaImage,
        cursor: ScreenPoint,
        session: &MeasureSession,
    ) -> Option<MagnifierFrame> {
        self.render(page, cursor, session.store(), session.transform())
    }

    /// Build the preview at `cursor`.
    ///
    /// `page` must be the page rendered at the transform's zoom, so its pixels
    /// line up with screen coordinates. Returns `None` when disabled.
    pub fn render(
        &self,
        page: &RgbaImage,
        cursor: ScreenPoint,
        store: &MeasurementStore,
        transform: &CoordinateTransform,
    ) -> Option<MagnifierFrame> {
        if !self.settings.enabled || self.settings.size == 0 || self.settings.zoom <= 0.0 {
            return None;
        }

        let source = self.source_rect(cursor);
        Some(MagnifierFrame {
            image: self.sample(page, &source),
            primitives: self.overlay(&source, store, transform),
            position: self.position(cursor),
        })
    }

    /// Nearest-neighbour enlargement of `source`
    fn sample(&self, page: &RgbaImage, source: &Rect) -> RgbaImage {
        let zoom = self.settings.zoom;
        RgbaImage::from_fn(self.settings.size, self.settings.size, |x, y| {
            let src_x = (source.x + (x as f32 + 0.5) / zoom).floor();
            let src_y = (source.y + (y as f32 + 0.5) / zoom).floor();
            if src_x < 0.0 || src_y < 0.0 {
                return Rgba([0, 0, 0, 0]);
            }
            page.get_pixel_checked(src_x as u32, src_y as u32)
                .copied()
                .unwrap_or(Rgba([0, 0, 0, 0]))
        })
    }

    /// Crosshair plus a marker for each endpoint near the sampled region.
    ///
    /// An endpoint whose marker circle overlaps the preview is kept even when
    /// its center lies up to one marker radius outside the sampled region, so
    /// markers at the edge are clipped rather than popping in and out.
    fn overlay(
        &self,
        source: &Rect,
        store: &MeasurementStore,
        transform: &CoordinateTransform,
    ) -> Vec<Primitive> {
        let zoom = self.settings.zoom;
        let size = self.settings.size as f32;
        let radius = self.style.marker_radius * zoom;
        let visible = Rect::new(0.0, 0.0, size, size).expand(radius);

        let mut primitives: Vec<Primitive> = store
            .points()
            .map(|point| {
                let screen = transform.to_screen(point);
                ScreenPoint::new((screen.x - source.x) * zoom, (screen.y - source.y) * zoom)
            })
            .filter(|local| visible.contains(*local))
            .map(|local| Primitive::Circle {
                center: [local.x, local.y],
                radius,
                fill_color: self.style.marker_fill,
                stroke: Some(self.style.marker_outline),
            })
            .collect();

        let half = size / 2.0;
        for (start, end) in [([half, 0.0], [half, size]), ([0.0, half], [size, half])] {
            primitives.push(Primitive::Line {
                start,
                end,
                width: self.style.crosshair_width,
                color: self.style.crosshair_color,
                dash: None,
            });
        }
        primitives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingSurface;
    use pdf_measure_core::PageCoordinate;

    /// 100x80 page whose red channel encodes x and green encodes y
    fn gradient_page() -> RgbaImage {
        RgbaImage::from_fn(100, 80, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    fn magnifier() -> Magnifier {
        Magnifier::new(MagnifierSettings::default())
    }

    fn marker_centers(frame: &MagnifierFrame) -> Vec<[f32; 2]> {
        frame
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_source_rect_and_position() {
        let mag = magnifier();
        let cursor = ScreenPoint::new(50.0, 40.0);
        assert_eq!(mag.source_rect(cursor), Rect::new(12.5, 2.5, 75.0, 75.0));
        assert_eq!(mag.position(cursor), ScreenPoint::new(70.0, 60.0));
    }

    #[test]
    fn test_sampling_enlarges_region() {
        let frame = magnifier()
            .render(
                &gradient_page(),
                ScreenPoint::new(50.0, 40.0),
                &MeasurementStore::new(),
                &CoordinateTransform::default(),
            )
            .unwrap();

        assert_eq!(frame.size(), 150);
        // Preview pixel (0, 0) samples source (12.75, 2.75)
        assert_eq!(frame.image.get_pixel(0, 0), &Rgba([12, 2, 0, 255]));
        // Two preview pixels per source pixel
        assert_eq!(frame.image.get_pixel(75, 75), frame.image.get_pixel(76, 76));
        assert_ne!(frame.image.get_pixel(76, 76), frame.image.get_pixel(77, 77));
        assert_eq!(frame.image.get_pixel(75, 75), &Rgba([50, 40, 0, 255]));
    }

    #[test]
    fn test_off_page_is_transparent() {
        let frame = magnifier()
            .render(
                &gradient_page(),
                ScreenPoint::new(2.0, 78.0),
                &MeasurementStore::new(),
                &CoordinateTransform::default(),
            )
            .unwrap();

        assert_eq!(frame.image.get_pixel(0, 0)[3], 0);
        assert_eq!(frame.image.get_pixel(149, 149)[3], 0);
        assert_eq!(frame.image.get_pixel(149, 0)[3], 255);
    }

    #[test]
    fn test_crosshair() {
        let frame = magnifier()
            .render(
                &gradient_page(),
                ScreenPoint::new(50.0, 40.0),
                &MeasurementStore::new(),
                &CoordinateTransform::default(),
            )
            .unwrap();

        assert_eq!(
            frame.primitives,
            vec![
                Primitive::Line {
                    start: [75.0, 0.0],
                    end: [75.0, 150.0],
                    width: 1.0,
                    color: Color::new(255, 0, 0, 128),
                    dash: None,
                },
                Primitive::Line {
                    start: [0.0, 75.0],
                    end: [150.0, 75.0],
                    width: 1.0,
                    color: Color::new(255, 0, 0, 128),
                    dash: None,
                },
            ]
        );
    }

    #[test]
    fn test_markers_for_points_in_region() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(PageCoordinate::new(20.0, 20.0));
        store.begin_or_commit(PageCoordinate::new(400.0, 400.0));
        store.begin_or_commit(PageCoordinate::new(25.0, 22.0));

        let transform = CoordinateTransform::new(2.0).unwrap();
        // Screen points: (40,40), (800,800) and the pending (50,44)
        let frame = magnifier()
            .render(&gradient_page(), ScreenPoint::new(40.0, 40.0), &store, &transform)
            .unwrap();

        assert_eq!(marker_centers(&frame), vec![[75.0, 75.0], [95.0, 83.0]]);
        match &frame.primitives[0] {
            Primitive::Circle {
                radius,
                fill_color,
                stroke,
                ..
            } => {
                assert_eq!(*radius, 10.0);
                assert_eq!(*fill_color, Color::new(0, 0, 0, 128));
                assert_eq!(*stroke, Some(Stroke::new(1.0, Color::WHITE)));
            }
            other => panic!("expected marker, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_markers_are_kept_within_radius() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(PageCoordinate::new(10.0, 40.0));
        store.begin_or_commit(PageCoordinate::new(5.0, 40.0));

        // Source region starts at x = 12.5; the marker radius is 10 preview px
        let frame = magnifier()
            .render(
                &gradient_page(),
                ScreenPoint::new(50.0, 40.0),
                &store,
                &CoordinateTransform::default(),
            )
            .unwrap();

        assert_eq!(marker_centers(&frame), vec![[-5.0, 75.0]]);
    }

    #[test]
    fn test_disabled() {
        let mag = Magnifier::new(MagnifierSettings {
            enabled: false,
            ..MagnifierSettings::default()
        });
        assert!(mag
            .render(
                &gradient_page(),
                ScreenPoint::new(1.0, 1.0),
                &MeasurementStore::new(),
                &CoordinateTransform::default(),
            )
            .is_none());
    }

    #[test]
    fn test_draw_overlay() {
        let frame = magnifier()
            .render(
                &gradient_page(),
                ScreenPoint::new(50.0, 40.0),
                &MeasurementStore::new(),
                &CoordinateTransform::default(),
            )
            .unwrap();
        let mut surface = RecordingSurface::new();
        frame.draw_overlay(&mut surface);
        assert_eq!(surface.clear_count(), 1);
        assert_eq!(surface.lines().count(), 2);
    }
}
