//! PDF document abstraction layer
//!
//! Provides a high-level interface to PDF documents using PDFium.

use crate::page::{DocumentRenderer, PageDimensions};
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::Mutex;

/// Process-wide PDFium binding, created on first open
static PDFIUM: Mutex<Option<&'static Pdfium>> = Mutex::new(None);

/// Errors that can occur during PDF operations
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Failed to initialize PDFium library
    InitializationError(String),

    /// Failed to load PDF document
    LoadError(String),

    /// Invalid page index
    InvalidPageIndex(u16),

    /// Rendering error
    RenderError(String),

    /// The render worker thread is no longer running
    WorkerGone,
}

impl std::fmt::Display for PdfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfError::InitializationError(msg) => write!(f, "PDFium initialization error: {}", msg),
            PdfError::LoadError(msg) => write!(f, "PDF load error: {}", msg),
            PdfError::InvalidPageIndex(idx) => write!(f, "Invalid page index: {}", idx),
            PdfError::RenderError(msg) => write!(f, "PDF render error: {}", msg),
            PdfError::WorkerGone => write!(f, "Render worker is not running"),
        }
    }
}

impl std::error::Error for PdfError {}

/// Result type for PDF operations
pub type PdfResult<T> = Result<T, PdfError>;

/// PDF document handle
///
/// Wraps a PDFium document and provides page geometry and rasterization.
pub struct PdfDocument {
    /// The loaded PDF document (owns the Pdfium instance internally)
    document: pdfium_render::prelude::PdfDocument<'static>,
}

impl PdfDocument {
    /// Initialize PDFium library
    ///
    /// Search order:
    /// 1. Executable's directory (for app bundles)
    /// 2. Current working directory
    /// 3. System library paths
    fn init_pdfium() -> PdfResult<Pdfium> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        if let Some(ref dir) = exe_dir {
            if let Ok(bindings) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            {
                return Ok(Pdfium::new(bindings));
            }
        }

        Ok(Pdfium::new(
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| PdfError::InitializationError(e.to_string()))?,
        ))
    }

    /// Load a PDF document from a file path
    ///
    /// Every document shares one PDFium binding for the life of the process.
    pub fn open<P: AsRef<Path>>(path: P) -> PdfResult<Self> {
        let pdfium = shared_binding(&PDFIUM, Self::init_pdfium)?;

        let document = pdfium
            .load_pdf_from_file(path.as_ref(), None)
            .map_err(|e| PdfError::LoadError(e.to_string()))?;

        log::info!(
            "Opened {} ({} pages)",
            path.as_ref().display(),
            document.pages().len()
        );
        Ok(Self { document })
    }

    /// Get a page by index (0-based)
    pub fn get_page(&self, index: u16) -> PdfResult<PdfPage<'_>> {
        self.document
            .pages()
            .get(index)
            .map_err(|_| PdfError::InvalidPageIndex(index))
    }
}

/// Return the binding stored in `slot`, creating it with `init` on first use.
///
/// A failed `init` leaves the slot empty so the next call tries again.
fn shared_binding<T>(
    slot: &Mutex<Option<&'static T>>,
    init: impl FnOnce() -> PdfResult<T>,
) -> PdfResult<&'static T> {
    let mut slot = slot
        .lock()
        .map_err(|_| PdfError::InitializationError("PDFium binding lock poisoned".to_string()))?;
    if let Some(binding) = *slot {
        return Ok(binding);
    }
    let binding: &'static T = Box::leak(Box::new(init()?));
    log::debug!("Bound PDFium library");
    *slot = Some(binding);
    Ok(binding)
}

impl DocumentRenderer for PdfDocument {
    fn page_count(&self) -> u16 {
        self.document.pages().len()
    }

    fn page_dimensions(&self, page_index: u16) -> PdfResult<PageDimensions> {
        let page = self.get_page(page_index)?;
        Ok(PageDimensions::new(page.width().value, page.height().value))
    }

    fn render_rgba(&self, page_index: u16, width: u32, height: u32) -> PdfResult<Vec<u8>> {
        let page = self.get_page(page_index)?;

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;

        Ok(bitmap.as_rgba_bytes().to_vec())
    }
}
