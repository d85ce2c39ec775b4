//! Measurement session: the explicit context object the shell owns.
//!
//! Everything the measurement tool knows about the open document lives here:
//! the page being shown, the zoom it was rendered at, the calibration derived
//! from it, the measurement store and the interaction state. The shell calls
//! into the session from its event handlers; nothing is global.
//!
//! Rendering is asynchronous. Navigation and zoom calls only record a pending
//! target and return a [`PageRequest`]. The page, zoom, calibration and
//! measurements change together when the finished page is handed back through
//! [`MeasureSession::install_page`], so pointer input always maps against the
//! page that is actually on screen. A failed render drops the pending target
//! and leaves everything else as it was.

use crate::calibration::{calibration_status, Calibration};
use crate::config::MeasureConfig;
use crate::error::{MeasureError, MeasureResult};
use crate::interaction::{
    CursorHint, InteractionController, InteractionOutcome, InteractionState, MagnifierUpdate,
    PointerEvent,
};
use crate::measurement::MeasurementStore;
use crate::readout::Readout;
use crate::transform::{CoordinateTransform, PageCoordinate};
use pdf_measure_render::{PageDimensions, RenderedPage};

/// A page the shell should ask the renderer for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page_index: u16,
    pub zoom: f32,
}

/// Page currently installed on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstalledPage {
    pub page_index: u16,
    pub dimensions: PageDimensions,
}

pub struct MeasureSession {
    config: MeasureConfig,
    transform: CoordinateTransform,
    calibration: Calibration,
    store: MeasurementStore,
    controller: InteractionController,
    page_count: u16,
    /// Page on screen, or about to be after a document load
    current_page: u16,
    /// Render requested but not installed yet
    pending: Option<PageRequest>,
    installed: Option<InstalledPage>,
    /// Show "Cleared" until the next pointer interaction
    cleared: bool,
}

impl MeasureSession {
    pub fn new(config: MeasureConfig) -> Self {
        let transform = CoordinateTransform::new(config.default_zoom).unwrap_or_else(|e| {
            log::warn!("{}; falling back to 100%", e);
            CoordinateTransform::default()
        });
        Self {
            store: MeasurementStore::with_palette(config.palette.clone()),
            controller: InteractionController::new(config.hit_tolerance_px),
            transform,
            calibration: Calibration::UNSET,
            page_count: 0,
            current_page: 0,
            pending: None,
            installed: None,
            cleared: false,
            config,
        }
    }

    /// A new document finished loading; start over on its first page.
    pub fn on_document_loaded(&mut self, page_count: u16) -> MeasureResult<PageRequest> {
        if page_count == 0 {
            return Err(MeasureError::NoDocument);
        }
        log::info!("Document loaded with {} pages", page_count);
        self.page_count = page_count;
        self.current_page = 0;
        self.installed = None;
        self.reset_measurements();
        Ok(self.request(0, self.requested_zoom()))
    }

    /// Switch to another page. Measurements belong to a page, so they are
    /// cleared once the new page is installed.
    pub fn on_page_changed(&mut self, page_index: u16) -> MeasureResult<PageRequest> {
        if self.page_count == 0 {
            return Err(MeasureError::NoDocument);
        }
        if page_index >= self.page_count {
            return Err(MeasureError::PageOutOfRange {
                page: page_index,
                page_count: self.page_count,
            });
        }
        Ok(self.request(page_index, self.requested_zoom()))
    }

    /// Go one page forward, if there is one
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let next = self.target_page().checked_add(1)?;
        self.on_page_changed(next).ok()
    }

    /// Go one page back, if there is one
    pub fn previous_page(&mut self) -> Option<PageRequest> {
        let previous = self.target_page().checked_sub(1)?;
        self.on_page_changed(previous).ok()
    }

    /// Request a re-render at a new zoom. Measurements are kept: they live in
    /// document space.
    pub fn on_zoom_changed(&mut self, zoom: f32) -> MeasureResult<PageRequest> {
        if !(zoom.is_finite() && zoom > 0.0) {
            log::warn!("Rejected zoom factor {}", zoom);
            return Err(MeasureError::InvalidZoom(zoom));
        }
        if self.page_count == 0 {
            return Err(MeasureError::NoDocument);
        }
        let zoom = self.config.clamp_zoom(zoom);
        Ok(self.request(self.target_page(), zoom))
    }

    pub fn zoom_in(&mut self) -> MeasureResult<PageRequest> {
        self.on_zoom_changed(self.requested_zoom() + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> MeasureResult<PageRequest> {
        self.on_zoom_changed(self.requested_zoom() - self.config.zoom_step)
    }

    /// Install a finished render: page, zoom, calibration and measurements
    /// switch together.
    ///
    /// Returns `Ok(false)` for a page that is no longer the target. Moving to
    /// another page clears the measurements. If the page reports unusable
    /// dimensions, the previous calibration is kept.
    pub fn install_page(
        &mut self,
        page_index: u16,
        zoom: f32,
        dimensions: PageDimensions,
    ) -> MeasureResult<bool> {
        if page_index != self.target_page() || page_index >= self.page_count {
            log::debug!(
                "Ignoring render of page {} (target {})",
                page_index,
                self.target_page()
            );
            return Ok(false);
        }
        let transform = CoordinateTransform::new(zoom)?;

        if page_index != self.current_page {
            self.current_page = page_index;
            self.reset_measurements();
        }
        if self.pending == Some(PageRequest { page_index, zoom }) {
            self.pending = None;
        }

        match Calibration::from_page(dimensions.width, dimensions.height, &self.config.paper) {
            Some(calibration) => self.calibration = calibration,
            None => log::warn!(
                "Page {} reported unusable size {}x{}; keeping previous calibration",
                page_index,
                dimensions.width,
                dimensions.height
            ),
        }
        self.transform = transform;
        self.installed = Some(InstalledPage {
            page_index,
            dimensions,
        });
        log::debug!(
            "Installed page {} at zoom {:.2} ({:.4} {}/pt)",
            page_index,
            zoom,
            self.calibration.factor(),
            self.config.paper.unit
        );
        Ok(true)
    }

    /// Install a page delivered by the renderer
    pub fn install_render(&mut self, page: &RenderedPage) -> MeasureResult<bool> {
        self.install_page(page.page_index, page.zoom, page.dimensions)
    }

    /// The pending render failed; keep showing what is installed.
    ///
    /// Returns the dropped target, if there was one.
    pub fn on_render_failed(&mut self) -> Option<PageRequest> {
        let dropped = self.pending.take();
        if let Some(request) = dropped {
            log::warn!(
                "Render of page {} at zoom {:.2} failed; keeping page {}",
                request.page_index,
                request.zoom,
                self.current_page
            );
        }
        dropped
    }

    /// Remove every measurement, including one in progress
    pub fn on_clear(&mut self) {
        self.reset_measurements();
        self.cleared = true;
    }

    /// Abandon the measurement in progress; returns whether there was one
    pub fn cancel_pending(&mut self) -> bool {
        self.controller.cancel(&mut self.store)
    }

    /// Feed one pointer event through the interaction state machine.
    ///
    /// Input is ignored until a page is on screen.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        if self.installed.is_none() {
            let mut outcome = InteractionOutcome::new(CursorHint::Default);
            if event == PointerEvent::Leave {
                outcome.magnifier = MagnifierUpdate::Hide;
            }
            return outcome;
        }
        let outcome = self
            .controller
            .handle(event, &mut self.store, &self.transform);
        if outcome.redraw {
            self.cleared = false;
        }
        outcome
    }

    fn reset_measurements(&mut self) {
        self.store.clear_all();
        self.controller.reset();
        self.cleared = false;
    }

    /// Record a pending render target
    fn request(&mut self, page_index: u16, zoom: f32) -> PageRequest {
        let request = PageRequest { page_index, zoom };
        self.pending = Some(request);
        request
    }

    fn target_page(&self) -> u16 {
        self.pending
            .map_or(self.current_page, |request| request.page_index)
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Zoom of the page on screen
    pub fn zoom(&self) -> f32 {
        self.transform.zoom()
    }

    /// Zoom most recently requested, possibly still rendering
    pub fn requested_zoom(&self) -> f32 {
        self.pending
            .map_or(self.transform.zoom(), |request| request.zoom)
    }

    /// Render requested but not yet installed
    pub fn pending_request(&self) -> Option<PageRequest> {
        self.pending
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn ghost(&self) -> Option<PageCoordinate> {
        self.controller.ghost()
    }

    pub fn installed_page(&self) -> Option<InstalledPage> {
        self.installed
    }

    pub fn has_document(&self) -> bool {
        self.page_count > 0
    }

    pub fn current_page(&self) -> u16 {
        self.current_page
    }

    pub fn page_count(&self) -> u16 {
        self.page_count
    }

    /// "n / total", one-based
    pub fn page_label(&self) -> String {
        if self.page_count == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_page + 1, self.page_count)
        }
    }

    /// Calibration status line, once a page is installed
    pub fn status_text(&self) -> Option<String> {
        self.installed
            .map(|_| calibration_status(&self.calibration, &self.config.paper))
    }

    pub fn readout(&self) -> Readout {
        if self.cleared {
            return Readout::Cleared;
        }
        Readout::describe(
            self.controller.state(),
            self.controller.ghost(),
            &self.store,
            &self.calibration,
            &self.config.paper.unit,
        )
    }
}
