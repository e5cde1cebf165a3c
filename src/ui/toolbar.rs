// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload and download buttons.

use egui::{Color32, RichText};

/// Button clicked this frame, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    UploadDesign,
    UploadLogo,
    Download,
}

const BUTTON_SIZE: egui::Vec2 = egui::vec2(160.0, 36.0);

const DESIGN_FILL: Color32 = Color32::from_rgb(59, 130, 246);
const LOGO_FILL: Color32 = Color32::from_rgb(168, 85, 247);
const DOWNLOAD_FILL: Color32 = Color32::from_rgb(34, 197, 94);

/// Display the buttons stacked vertically.
pub fn show(ui: &mut egui::Ui, exporting: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing.y = 16.0;

        if ui.add(button("Upload Design", DESIGN_FILL)).clicked() {
            action = ToolbarAction::UploadDesign;
        }

        if ui.add(button("Upload Logo", LOGO_FILL)).clicked() {
            action = ToolbarAction::UploadLogo;
        }

        // One export at a time
        let download = button("Download Design", DOWNLOAD_FILL);
        if ui.add_enabled(!exporting, download).clicked() {
            action = ToolbarAction::Download;
        }
    });

    action
}

fn button(label: &str, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label).color(Color32::WHITE).size(15.0))
        .fill(fill)
        .min_size(BUTTON_SIZE)
}
