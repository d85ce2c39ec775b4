//! Toolkit-independent drawing primitives
//!
//! Overlay and magnifier output is expressed as a list of [`Primitive`]s in
//! surface pixels. The shell implements [`DrawSurface`] over whatever
//! painter it has; tests use [`RecordingSurface`].

use pdf_measure_core::{Color, ScreenPoint};

/// Rectangle primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered_at(center: ScreenPoint, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Grow by `amount` on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Outline drawn around a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Soft drop shadow behind a filled rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub color: Color,
}

/// Font used for labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Height in pixels
    pub size: f32,
    pub bold: bool,
}

/// Visual primitive types that can be drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Line segment, optionally dashed as `[on, off]` lengths
    Line {
        start: [f32; 2],
        end: [f32; 2],
        width: f32,
        color: Color,
        dash: Option<[f32; 2]>,
    },
    /// Filled circle with an optional outline
    Circle {
        center: [f32; 2],
        radius: f32,
        fill_color: Color,
        stroke: Option<Stroke>,
    },
    /// Rectangle with optional fill, outline and shadow
    Rectangle {
        rect: Rect,
        fill_color: Option<Color>,
        stroke: Option<Stroke>,
        shadow: Option<Shadow>,
    },
    /// Single line of text centered on `center`
    Text {
        center: [f32; 2],
        text: String,
        font: FontSpec,
        color: Color,
    },
}

impl Primitive {
    /// Whether this is a dashed line
    pub fn is_dashed(&self) -> bool {
        matches!(self, Primitive::Line { dash: Some(_), .. })
    }
}

/// A place the overlay and magnifier can draw into
pub trait DrawSurface {
    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Draw one primitive on top of what is already there
    fn draw(&mut self, primitive: Primitive);

    /// Width in pixels of `text` rendered with `font`
    fn text_width(&self, text: &str, font: FontSpec) -> f32;
}

/// Surface that keeps what was drawn.
///
/// Text width is approximated as `0.6 * size` per character.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    primitives: Vec<Primitive>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Number of times `clear` was called
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn lines(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Circle { .. }))
    }

    /// Every text string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.primitives.clear();
        self.clears += 1;
    }

    fn draw(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    fn text_width(&self, text: &str, font: FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * 0.6
    }
}
