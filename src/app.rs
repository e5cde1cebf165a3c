// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the editing session to the window: it starts
//! background decodes and exports, applies their results when they arrive,
//! keeps GPU textures in step with the session, and routes canvas and
//! toolbar actions back into the session.

use crate::config::EditorConfig;
use crate::error::CaptureError;
use crate::io::export::spawn_export;
use crate::io::media::{ImageLoader, PendingFile, IMAGE_EXTENSIONS};
use crate::models::session::{CompletionOutcome, EditorSession, ImageSlot, ImageSource, RequestId};
use crate::ui::{canvas, toolbar};
use image::imageops::{self, FilterType};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);

/// Line shown in the status bar.
struct StatusMessage {
    text: String,
    is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Main application state.
pub struct DesignerApp {
    config: EditorConfig,

    /// Everything the user has built so far
    session: EditorSession,

    /// Background decoder for uploads
    loader: ImageLoader,

    /// Uploaded textures, tagged with the request they were built from
    background_texture: Option<(RequestId, egui::TextureHandle)>,
    overlay_texture: Option<(RequestId, egui::TextureHandle)>,

    /// Screen rect of the container as of the last frame
    drop_zone: Option<egui::Rect>,

    /// Receiver for the export in progress
    export_result: Option<Receiver<Result<PathBuf, CaptureError>>>,

    status: Option<StatusMessage>,
}

impl DesignerApp {
    /// Create a new designer with an empty session.
    pub fn new(config: EditorConfig) -> Self {
        let session = EditorSession::new(&config);
        Self {
            config,
            session,
            loader: ImageLoader::new(),
            background_texture: None,
            overlay_texture: None,
            drop_zone: None,
            export_result: None,
            status: None,
        }
    }

    /// Start decoding `file` into `slot` (asynchronously).
    fn request_upload(&mut self, slot: ImageSlot, file: PendingFile) {
        let id = self.session.begin_request(slot);
        log::info!("Loading {:?} image {} ({:?})", slot, file.name(), id);
        self.loader.spawn(slot, id, file);
    }

    /// Ask the user for an image and load it into `slot`.
    fn pick_image(&mut self, slot: ImageSlot) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.request_upload(slot, PendingFile::Path(path));
        }
    }

    /// Apply decodes that finished since the last frame.
    fn poll_loader(&mut self) {
        for completion in self.loader.poll() {
            let name = match &completion.result {
                Ok(source) => source.name().to_string(),
                Err(_) => String::new(),
            };

            match self.session.apply_completion(completion) {
                CompletionOutcome::Applied => {
                    self.status = Some(StatusMessage::info(format!("Loaded {}", name)));
                }
                CompletionOutcome::Stale => {}
                CompletionOutcome::Failed(e) => {
                    log::warn!("Upload ignored: {}", e);
                    self.status = Some(StatusMessage::error(e.to_string()));
                }
            }
        }
    }

    /// Rebuild textures for slots whose image changed.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let max_side = ctx.input(|i| i.max_texture_side);

        for slot in [ImageSlot::Background, ImageSlot::Overlay] {
            let revision = self.session.revision(slot);
            let cached = match slot {
                ImageSlot::Background => &mut self.background_texture,
                ImageSlot::Overlay => &mut self.overlay_texture,
            };

            if cached.as_ref().map(|(id, _)| *id) == revision {
                continue;
            }

            *cached = match (revision, self.session.image(slot)) {
                (Some(id), Some(source)) => {
                    let image = texture_image(source, max_side);
                    let name = match slot {
                        ImageSlot::Background => "design_background",
                        ImageSlot::Overlay => "design_logo",
                    };
                    let texture = ctx.load_texture(name, image, egui::TextureOptions::LINEAR);
                    Some((id, texture))
                }
                _ => None,
            };
        }
    }

    /// Track files hovering over the container and load a dropped logo.
    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let pointer = ctx.input(|i| i.pointer.hover_pos());
        let over_zone = canvas::accepts_drop(self.drop_zone, pointer);

        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty()) && over_zone;
        if self.session.set_drag_active(hovering) {
            log::debug!("Drag active: {}", hovering);
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        if !over_zone {
            log::debug!("Ignoring files dropped outside the design");
            return;
        }

        match dropped.iter().find_map(PendingFile::from_dropped) {
            Some(file) => self.request_upload(ImageSlot::Overlay, file),
            None => {
                self.status = Some(StatusMessage::error("Dropped file is not an image"));
            }
        }
    }

    /// Ask where to save and start the export (asynchronously).
    fn start_export(&mut self) {
        let Some(scene) = self.session.scene() else {
            log::debug!("Export requested before the design surface exists");
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(self.config.export_file_name.as_str())
            .save_file()
        {
            log::info!("Exporting design to {}", path.display());
            self.export_result = Some(spawn_export(scene, path));
            self.status = Some(StatusMessage::info("Exporting design..."));
        }
    }

    /// Check whether the export in progress has finished.
    fn poll_export(&mut self) {
        if let Some(ref receiver) = self.export_result {
            if let Ok(result) = receiver.try_recv() {
                self.export_result = None;
                self.status = Some(match result {
                    Ok(path) => StatusMessage::info(format!("Saved {}", path.display())),
                    Err(e) => StatusMessage::error(format!("Export failed: {}", e)),
                });
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.export_result.is_some()
            || self.session.is_loading(ImageSlot::Background)
            || self.session.is_loading(ImageSlot::Overlay)
    }
}

/// Build the display copy of an image, scaled down to fit the largest
/// texture the GPU accepts. Export keeps using the full-resolution pixels.
fn texture_image(source: &ImageSource, max_side: usize) -> egui::ColorImage {
    let (width, height) = source.dimensions();
    let longest = width.max(height) as usize;

    if longest <= max_side {
        let size = [width as usize, height as usize];
        return egui::ColorImage::from_rgba_unmultiplied(size, source.pixels().as_raw());
    }

    let scale = max_side as f64 / longest as f64;
    let scaled_w = ((width as f64 * scale).round() as u32).max(1);
    let scaled_h = ((height as f64 * scale).round() as u32).max(1);
    log::debug!(
        "Downscaling {} from {}x{} to {}x{} for display",
        source.name(),
        width,
        height,
        scaled_w,
        scaled_h
    );

    let scaled = imageops::resize(source.pixels(), scaled_w, scaled_h, FilterType::Triangle);
    let size = [scaled_w as usize, scaled_h as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, scaled.as_raw())
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();
        self.poll_export();
        self.sync_textures(ctx);
        self.handle_file_drop(ctx);

        // Keep polling while work is in flight
        if self.is_busy() {
            ctx.request_repaint();
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.is_busy() {
                    ui.spinner();
                }
                match &self.status {
                    Some(status) if status.is_error => {
                        ui.colored_label(ERROR_TEXT, &status.text);
                    }
                    Some(status) => {
                        ui.label(&status.text);
                    }
                    None => {
                        ui.label("Upload a design to begin");
                    }
                }
            });
        });

        let mut canvas_action = canvas::CanvasAction::None;
        let mut toolbar_action = toolbar::ToolbarAction::None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                let title = egui::RichText::new("Logo Designer Builder").size(24.0);
                ui.heading(title);
                ui.add_space(16.0);
            });

            ui.horizontal(|ui| {
                ui.add_space(24.0);
                let (zone, action) = canvas::show(
                    ui,
                    &self.session,
                    self.background_texture.as_ref().map(|(_, t)| t),
                    self.overlay_texture.as_ref().map(|(_, t)| t),
                );
                self.drop_zone = Some(zone);
                canvas_action = action;
                ui.add_space(40.0);
                toolbar_action = toolbar::show(ui, self.export_result.is_some());
            });
        });

        self.session.mount();

        match canvas_action {
            canvas::CanvasAction::Drag(dx, dy) => self.session.drag_overlay(dx, dy),
            canvas::CanvasAction::Resize(handle, dx, dy) => {
                self.session.resize_overlay(handle, dx, dy)
            }
            canvas::CanvasAction::None => {}
        }

        match toolbar_action {
            toolbar::ToolbarAction::UploadDesign => self.pick_image(ImageSlot::Background),
            toolbar::ToolbarAction::UploadLogo => self.pick_image(ImageSlot::Overlay),
            toolbar::ToolbarAction::Download => self.start_export(),
            toolbar::ToolbarAction::None => {}
        }
    }
}
