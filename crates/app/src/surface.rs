//! [`DrawSurface`] backed by an egui painter.

use eframe::egui;
use pdf_measure_core::Color;
use pdf_measure_ui::{DrawSurface, FontSpec, Primitive, Rect, Stroke};

/// Collects egui shapes for one layer and paints them on `finish`.
///
/// Primitive coordinates are offset by `origin`, the on-screen position of
/// the surface's top-left corner.
pub struct EguiSurface {
    painter: egui::Painter,
    origin: egui::Pos2,
    shapes: Vec<egui::Shape>,
}

impl EguiSurface {
    pub fn new(painter: egui::Painter, origin: egui::Pos2) -> Self {
        Self {
            painter,
            origin,
            shapes: Vec::new(),
        }
    }

    /// Hand everything drawn to egui
    pub fn finish(self) {
        self.painter.extend(self.shapes);
    }

    fn pos(&self, point: [f32; 2]) -> egui::Pos2 {
        self.origin + egui::vec2(point[0], point[1])
    }

    fn rect(&self, rect: &Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.pos([rect.x, rect.y]),
            egui::vec2(rect.width, rect.height),
        )
    }
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn stroke(stroke: Stroke) -> egui::Stroke {
    egui::Stroke::new(stroke.width, color32(stroke.color))
}

// Default egui fonts ship a single weight, so `bold` has no effect.
fn font_id(font: FontSpec) -> egui::FontId {
    egui::FontId::proportional(font.size)
}

impl DrawSurface for EguiSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn draw(&mut self, primitive: Primitive) {
        match primitive {
            Primitive::Line {
                start,
                end,
                width,
                color,
                dash,
            } => {
                let points = [self.pos(start), self.pos(end)];
                let line_stroke = egui::Stroke::new(width, color32(color));
                match dash {
                    Some([on, off]) => self.shapes.extend(egui::Shape::dashed_line(
                        &points,
                        line_stroke,
                        on,
                        off,
                    )),
                    None => self.shapes.push(egui::Shape::line_segment(points, line_stroke)),
                }
            }
            Primitive::Circle {
                center,
                radius,
                fill_color,
                stroke: outline,
            } => {
                let center = self.pos(center);
                self.shapes
                    .push(egui::Shape::circle_filled(center, radius, color32(fill_color)));
                if let Some(outline) = outline {
                    self.shapes
                        .push(egui::Shape::circle_stroke(center, radius, stroke(outline)));
                }
            }
            Primitive::Rectangle {
                rect,
                fill_color,
                stroke: outline,
                shadow,
            } => {
                let rect = self.rect(&rect);
                if let Some(shadow) = shadow {
                    self.shapes.push(egui::Shape::rect_filled(
                        rect.expand(shadow.blur / 2.0),
                        shadow.blur / 2.0,
                        color32(shadow.color),
                    ));
                }
                if let Some(fill) = fill_color {
                    self.shapes
                        .push(egui::Shape::rect_filled(rect, 0.0, color32(fill)));
                }
                if let Some(outline) = outline {
                    self.shapes.push(egui::Shape::rect_stroke(
                        rect,
                        0.0,
                        stroke(outline),
                        egui::StrokeKind::Inside,
                    ));
                }
            }
            Primitive::Text {
                center,
                text,
                font,
                color,
            } => {
                let galley = self
                    .painter
                    .layout_no_wrap(text, font_id(font), color32(color));
                let top_left = self.pos(center) - galley.size() / 2.0;
                self.shapes
                    .push(egui::Shape::galley(top_left, galley, color32(color)));
            }
        }
    }

    fn text_width(&self, text: &str, font: FontSpec) -> f32 {
        self.painter
            .layout_no_wrap(text.to_string(), font_id(font), egui::Color32::BLACK)
            .size()
            .x
    }
}
