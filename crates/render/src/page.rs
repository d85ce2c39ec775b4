//! Rendered page surfaces and the renderer interface
//!
//! The measurement core only needs two things from a document backend: the
//! number of pages, and a page rasterized at a zoom factor together with its
//! zoom-independent size.

use crate::pdf::{PdfError, PdfResult};
use image::RgbaImage;

/// Page dimensions in points (1/72 inch), independent of zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

impl PageDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Pixel size of the page rasterized at `zoom`
    pub fn scaled_pixels(&self, zoom: f32) -> (u32, u32) {
        (
            (self.width * zoom).floor().max(1.0) as u32,
            (self.height * zoom).floor().max(1.0) as u32,
        )
    }
}

/// A page rasterized at a specific zoom
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Zero-based page index
    pub page_index: u16,
    /// Zoom factor the surface was rendered at
    pub zoom: f32,
    /// Unscaled page size in document units
    pub dimensions: PageDimensions,
    /// Pixel surface, `floor(width * zoom)` by `floor(height * zoom)`
    pub image: RgbaImage,
}

impl RenderedPage {
    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }
}

/// Backend able to report page geometry and rasterize pages
///
/// Implementors provide raw RGBA output; `render_page` assembles the surface.
pub trait DocumentRenderer {
    /// Number of pages in the document
    fn page_count(&self) -> u16;

    /// Unscaled size of a page in document units
    fn page_dimensions(&self, page_index: u16) -> PdfResult<PageDimensions>;

    /// Rasterize a page into `width * height * 4` RGBA bytes
    fn render_rgba(&self, page_index: u16, width: u32, height: u32) -> PdfResult<Vec<u8>>;

    /// Rasterize a page at `zoom`
    fn render_page(&self, page_index: u16, zoom: f32) -> PdfResult<RenderedPage> {
        if page_index >= self.page_count() {
            return Err(PdfError::InvalidPageIndex(page_index));
        }
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(PdfError::RenderError(format!("invalid zoom {}", zoom)));
        }

        let dimensions = self.page_dimensions(page_index)?;
        if !dimensions.is_valid() {
            return Err(PdfError::RenderError(format!(
                "page {} has no usable size ({} x {})",
                page_index, dimensions.width, dimensions.height
            )));
        }

        let (width, height) = dimensions.scaled_pixels(zoom);
        let rgba = self.render_rgba(page_index, width, height)?;
        let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            PdfError::RenderError(format!(
                "renderer returned a buffer that does not fit {}x{}",
                width, height
            ))
        })?;

        Ok(RenderedPage {
            page_index,
            zoom,
            dimensions,
            image,
        })
    }
}
