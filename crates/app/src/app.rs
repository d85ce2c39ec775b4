//! The measurement window: toolbar, page view, status bar and dialogs.

use crate::pointer::{PointerAdapter, PointerFrame};
use crate::surface::EguiSurface;
use eframe::egui;
use image::RgbaImage;
use pdf_measure_core::{
    CursorHint, MagnifierUpdate, MeasureConfig, MeasureResult, MeasureSession, PageRequest,
    ScreenPoint,
};
use pdf_measure_render::{PdfDocument, RenderEvent, RenderWorker, RenderedPage};
use pdf_measure_ui::{Magnifier, MagnifierFrame, OverlayFrame, OverlayRenderer};
use std::path::{Path, PathBuf};

/// Rendered page shown in the central panel
struct PageView {
    texture: egui::TextureHandle,
    image: RgbaImage,
}

impl PageView {
    fn size(&self) -> egui::Vec2 {
        egui::vec2(self.image.width() as f32, self.image.height() as f32)
    }
}

/// Magnifier preview currently on screen
struct MagnifierView {
    texture: egui::TextureHandle,
    frame: MagnifierFrame,
}

/// Error dialog state
struct ErrorDialogState {
    title: String,
    message: String,
}

pub struct MeasureApp {
    session: MeasureSession,
    worker: RenderWorker,
    overlay: OverlayRenderer,
    magnifier: Magnifier,
    pointer: PointerAdapter,

    page: Option<PageView>,
    magnifier_view: Option<MagnifierView>,
    cursor: CursorHint,
    /// Screen position of the page's top-left corner in the last frame
    page_origin: egui::Pos2,
    /// A load or render request is in flight
    busy: bool,

    error_dialog: Option<ErrorDialogState>,
}

impl MeasureApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: MeasureConfig,
        initial_file: Option<PathBuf>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let worker = RenderWorker::spawn(
            |path: &Path| PdfDocument::open(path),
            move || ctx.request_repaint(),
        );

        let mut app = Self {
            magnifier: Magnifier::new(config.magnifier.clone()),
            session: MeasureSession::new(config),
            worker,
            overlay: OverlayRenderer::default(),
            pointer: PointerAdapter::new(),
            page: None,
            magnifier_view: None,
            cursor: CursorHint::Default,
            page_origin: egui::Pos2::ZERO,
            busy: false,
            error_dialog: None,
        };
        if let Some(path) = initial_file {
            app.load_pdf(path);
        }
        app
    }

    fn show_error(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", title, message);
        self.error_dialog = Some(ErrorDialogState {
            title: title.to_string(),
            message,
        });
    }

    /// Open a PDF file using the file picker
    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        {
            self.load_pdf(path);
        }
    }

    fn load_pdf(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        match self.worker.open(path) {
            Ok(()) => self.busy = true,
            Err(e) => self.show_error("Error", format!("Failed to open PDF: {}", e)),
        }
    }

    /// Forward a session page request to the render worker
    fn request(&mut self, request: MeasureResult<PageRequest>) {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        match self
            .worker
            .request_render(request.page_index, request.zoom)
        {
            Ok(_) => self.busy = true,
            Err(e) => {
                self.session.on_render_failed();
                self.show_error("Error", format!("Failed to render page: {}", e));
            }
        }
    }

    fn poll_worker(&mut self, ctx: &egui::Context) {
        while let Some(event) = self.worker.try_recv() {
            match event {
                RenderEvent::Opened { path, page_count } => {
                    let title = path
                        .file_name()
                        .map(|name| format!("PDF Measure - {}", name.to_string_lossy()))
                        .unwrap_or_else(|| "PDF Measure".to_string());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

                    self.page = None;
                    self.magnifier_view = None;
                    self.pointer.reset();
                    match self.session.on_document_loaded(page_count) {
                        Ok(request) => self.request(Ok(request)),
                        Err(e) => {
                            self.busy = false;
                            self.show_error("Error", format!("Failed to open PDF: {}", e));
                        }
                    }
                }
                RenderEvent::Rendered { page, .. } => {
                    self.busy = false;
                    self.install(ctx, page);
                }
                RenderEvent::Failed { generation, error } => {
                    self.busy = false;
                    self.session.on_render_failed();
                    let action = if generation.is_some() {
                        "render page"
                    } else {
                        "open PDF"
                    };
                    self.show_error("Error", format!("Failed to {}: {}", action, error));
                }
            }
        }
    }

    fn install(&mut self, ctx: &egui::Context, page: RenderedPage) {
        match self.session.install_render(&page) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                self.show_error("Error", format!("Failed to show page: {}", e));
                return;
            }
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [page.image.width() as usize, page.image.height() as usize],
            page.image.as_raw(),
        );
        let texture = ctx.load_texture(
            format!("page_{}", page.page_index),
            image,
            egui::TextureOptions::LINEAR,
        );
        self.page = Some(PageView {
            texture,
            image: page.image,
        });
        self.magnifier_view = None;
    }

    fn clear(&mut self) {
        self.session.on_clear();
        self.magnifier_view = None;
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);
        self.handle_keyboard_shortcuts(ctx);
        self.draw_toolbar(ctx);
        self.draw_status_bar(ctx);
        self.draw_viewport(ctx);
        self.draw_magnifier(ctx);
        self.draw_error_dialog(ctx);
    }
}

impl MeasureApp {
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, open) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::O),
            )
        });

        // Escape: close dialog, else abandon the measurement in progress
        if escape {
            if self.error_dialog.is_some() {
                self.error_dialog = None;
            } else if self.session.cancel_pending() {
                ctx.request_repaint();
            }
        }
        if open {
            self.open_file();
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(8.0);

                if ui.button("📂 Open").clicked() {
                    self.open_file();
                }

                ui.separator();

                ui.add_enabled_ui(self.session.has_document(), |ui| {
                    if ui.button("◀").clicked() {
                        let request = self.session.previous_page();
                        if let Some(request) = request {
                            self.magnifier_view = None;
                            self.request(Ok(request));
                        }
                    }

                    ui.label(self.session.page_label());

                    if ui.button("▶").clicked() {
                        let request = self.session.next_page();
                        if let Some(request) = request {
                            self.magnifier_view = None;
                            self.request(Ok(request));
                        }
                    }

                    ui.separator();

                    if ui.button("−").clicked() {
                        let request = self.session.zoom_out();
                        self.request(request);
                    }
                    ui.label(format!("{:.0}%", self.session.requested_zoom() * 100.0));
                    if ui.button("+").clicked() {
                        let request = self.session.zoom_in();
                        self.request(request);
                    }

                    ui.separator();

                    if ui.button("Clear").clicked() {
                        self.clear();
                    }
                });
            });
        });
    }

    fn draw_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let status = if self.busy {
                    "Rendering…".to_string()
                } else {
                    self.session
                        .status_text()
                        .unwrap_or_else(|| "No document".to_string())
                };
                ui.label(status);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.installed_page().is_some() {
                        ui.strong(self.session.readout().to_string());
                    }
                });
            });
        });
    }

    fn draw_intro(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading("Measure distances on PDF pages");
            ui.add_space(8.0);
            ui.label("Click two points to measure. Drag an endpoint to adjust it.");
            ui.weak("Files are processed locally and never leave this computer.");
            ui.add_space(12.0);
            if ui.button("📂 Open PDF").clicked() {
                self.open_file();
            }
        });
    }

    fn draw_viewport(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(page) = &self.page else {
                if self.busy {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                } else {
                    self.draw_intro(ui);
                }
                return;
            };
            let size = page.size();
            let texture_id = page.texture.id();

            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

                    ui.painter().image(
                        texture_id,
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );

                    self.page_origin = rect.min;
                    self.handle_pointer(ctx, rect, &response);

                    let mut surface = EguiSurface::new(ui.painter_at(rect), rect.min);
                    self.overlay
                        .render(&mut surface, &OverlayFrame::from_session(&self.session));
                    surface.finish();
                });
        });
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect, response: &egui::Response) {
        let (hover, pressed, released) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });
        let position = hover
            .filter(|pos| rect.contains(*pos) && response.contains_pointer())
            .map(|pos| ScreenPoint::new(pos.x - rect.min.x, pos.y - rect.min.y));

        let frame = PointerFrame {
            position,
            pressed: pressed && position.is_some(),
            released,
        };

        for event in self.pointer.events(frame) {
            let outcome = self.session.handle_pointer(event);
            self.cursor = outcome.cursor;
            match outcome.magnifier {
                MagnifierUpdate::Keep => {}
                MagnifierUpdate::Follow(cursor) => self.update_magnifier(ctx, cursor),
                MagnifierUpdate::Hide => self.magnifier_view = None,
            }
            if outcome.redraw {
                ctx.request_repaint();
            }
        }

        if position.is_some() {
            ctx.set_cursor_icon(match self.cursor {
                CursorHint::Default => egui::CursorIcon::Crosshair,
                CursorHint::Grab => egui::CursorIcon::Grab,
                CursorHint::Grabbing => egui::CursorIcon::Grabbing,
            });
        }
    }

    fn update_magnifier(&mut self, ctx: &egui::Context, cursor: ScreenPoint) {
        let Some(page) = &self.page else {
            return;
        };
        let Some(frame) = self
            .magnifier
            .render_session(&page.image, cursor, &self.session)
        else {
            self.magnifier_view = None;
            return;
        };

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.image.width() as usize, frame.image.height() as usize],
            frame.image.as_raw(),
        );
        match &mut self.magnifier_view {
            Some(view) => {
                view.texture.set(image, egui::TextureOptions::NEAREST);
                view.frame = frame;
            }
            None => {
                let texture = ctx.load_texture("magnifier", image, egui::TextureOptions::NEAREST);
                self.magnifier_view = Some(MagnifierView { texture, frame });
            }
        }
    }

    fn draw_magnifier(&mut self, ctx: &egui::Context) {
        let Some(view) = &self.magnifier_view else {
            return;
        };
        let position = self.page_origin + egui::vec2(view.frame.position.x, view.frame.position.y);
        let side = view.frame.size() as f32;

        egui::Area::new(egui::Id::new("magnifier"))
            .order(egui::Order::Foreground)
            .fixed_pos(position)
            .interactable(false)
            .show(ctx, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
                painter.image(
                    view.texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                let mut surface = EguiSurface::new(painter.clone(), rect.min);
                view.frame.draw_overlay(&mut surface);
                surface.finish();

                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::GRAY),
                    egui::StrokeKind::Inside,
                );
            });
    }

    fn draw_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(error) = &self.error_dialog else {
            return;
        };

        let title = format!("❌ {}", error.title);
        let message = error.message.clone();

        let mut should_close = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(12.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.error_dialog = None;
        }
    }
}
