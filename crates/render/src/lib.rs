//! PDF Measure Render Library
//!
//! Document renderer collaborator: page geometry, rasterization and a
//! background worker that keeps rendering off the UI thread.

pub mod page;
pub mod pdf;
pub mod worker;

pub use page::{DocumentRenderer, PageDimensions, RenderedPage};
pub use pdf::{PdfDocument, PdfError, PdfResult};
pub use worker::{RenderEvent, RenderWorker};
