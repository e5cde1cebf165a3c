// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Design surface.
//!
//! This module draws the container with the background and the logo,
//! the resize handles, the drop hint, and the drag-hover border, and turns
//! pointer drags into container-space deltas.
//!
//! The container is the drop zone for logo files. Some platforms report no
//! pointer position while an OS file drag is over the window; in that case
//! the whole window accepts the drop (see [`accepts_drop`]).

use crate::models::overlay::ResizeHandle;
use crate::models::session::EditorSession;
use crate::util::geometry::{container_to_screen, cover_crop, screen_to_container_delta};
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke};

/// Side length of a resize handle in points.
const HANDLE_SIZE: f32 = 10.0;

const BORDER_IDLE: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);
const BORDER_DROP: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);
const SELECTION: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const HINT_FILL: Color32 = Color32::from_rgba_premultiplied(187, 187, 188, 191);
const HINT_BORDER: Color32 = Color32::from_gray(209);
const HINT_TEXT: Color32 = Color32::from_gray(107);

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    /// Move the logo by a delta in container pixels
    Drag(f32, f32),
    /// Resize the logo from a handle by a delta in container pixels
    Resize(ResizeHandle, f32, f32),
}

/// Whether a file drag at `pointer` targets the drop zone.
///
/// Without a known zone or pointer position the drop is accepted.
pub fn accepts_drop(zone: Option<Rect>, pointer: Option<Pos2>) -> bool {
    match (zone, pointer) {
        (Some(zone), Some(pointer)) => zone.contains(pointer),
        _ => true,
    }
}

/// Display the design surface and handle pointer interaction.
///
/// Returns the screen rect of the container (the drop zone) along with the
/// action for this frame.
pub fn show(
    ui: &mut egui::Ui,
    session: &EditorSession,
    background_texture: Option<&egui::TextureHandle>,
    overlay_texture: Option<&egui::TextureHandle>,
) -> (Rect, CanvasAction) {
    let mut action = CanvasAction::None;
    let container = session.container();

    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(container.width, container.height),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, Color32::WHITE);

    if let (Some(texture), Some(source)) = (background_texture, session.background()) {
        let (src_w, src_h) = source.dimensions();
        let (dst_w, dst_h) = container.pixel_size();
        let crop = cover_crop(src_w, src_h, dst_w.max(1), dst_h.max(1));
        let uv = Rect::from_min_max(
            egui::pos2(crop.x as f32 / src_w as f32, crop.y as f32 / src_h as f32),
            egui::pos2(
                (crop.x + crop.width) as f32 / src_w as f32,
                (crop.y + crop.height) as f32 / src_h as f32,
            ),
        );
        painter.image(texture.id(), rect, uv, Color32::WHITE);
    }

    match (session.transform(), session.overlay()) {
        (Some(transform), Some(source)) => {
            let box_rect = container_to_screen(&transform, rect, container);

            if let Some(texture) = overlay_texture {
                let (src_w, src_h) = source.dimensions();
                let scale_x = box_rect.width() / src_w as f32;
                let scale_y = box_rect.height() / src_h as f32;
                let scale = scale_x.min(scale_y);
                let logo_rect = Rect::from_center_size(
                    box_rect.center(),
                    egui::vec2(src_w as f32 * scale, src_h as f32 * scale),
                );
                let full_uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), logo_rect, full_uv, Color32::WHITE);
            }

            // Body first so the handles registered after it win the hover
            let body_id = ui.id().with("overlay_body");
            let body = ui
                .interact(box_rect, body_id, Sense::drag())
                .on_hover_cursor(CursorIcon::Move);
            if body.dragged() {
                let delta = body.drag_delta();
                let (dx, dy) = screen_to_container_delta(delta, rect, container);
                action = CanvasAction::Drag(dx, dy);
            }

            if body.hovered() || body.dragged() {
                painter.rect_stroke(box_rect, 0.0, Stroke::new(1.0, SELECTION));
            }

            let handle_size = egui::Vec2::splat(HANDLE_SIZE);
            for (i, handle) in ResizeHandle::ALL.into_iter().enumerate() {
                let (fx, fy) = handle.anchor();
                let offset = egui::vec2(fx * box_rect.width(), fy * box_rect.height());
                let handle_rect = Rect::from_center_size(box_rect.min + offset, handle_size);

                let handle_id = ui.id().with(("overlay_handle", i));
                let response = ui
                    .interact(handle_rect, handle_id, Sense::drag())
                    .on_hover_cursor(cursor_for(handle));
                if response.dragged() {
                    let delta = response.drag_delta();
                    let (dx, dy) = screen_to_container_delta(delta, rect, container);
                    action = CanvasAction::Resize(handle, dx, dy);
                }

                painter.rect_filled(handle_rect, 1.0, Color32::WHITE);
                painter.rect_stroke(handle_rect, 1.0, Stroke::new(1.0, SELECTION));
            }
        }
        _ => draw_drop_hint(&painter, rect, session.is_drag_active()),
    }

    let border = if session.is_drag_active() {
        BORDER_DROP
    } else {
        BORDER_IDLE
    };
    let stroke = Stroke::new(2.0, border);
    ui.painter().rect_stroke(rect.expand(1.0), 2.0, stroke);

    (rect, action)
}

/// Hint shown until a logo has been added.
fn draw_drop_hint(painter: &egui::Painter, rect: Rect, drag_active: bool) {
    let outline = if drag_active {
        BORDER_DROP
    } else {
        HINT_BORDER
    };

    painter.rect_filled(rect, 0.0, HINT_FILL);
    painter.rect_stroke(rect.shrink(4.0), 0.0, Stroke::new(2.0, outline));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Drag and Drop Logo Here",
        FontId::proportional(16.0),
        HINT_TEXT,
    );
}

fn cursor_for(handle: ResizeHandle) -> CursorIcon {
    match handle {
        ResizeHandle::Left | ResizeHandle::Right => CursorIcon::ResizeHorizontal,
        ResizeHandle::Top | ResizeHandle::Bottom => CursorIcon::ResizeVertical,
        ResizeHandle::TopLeft | ResizeHandle::BottomRight => CursorIcon::ResizeNwSe,
        ResizeHandle::TopRight | ResizeHandle::BottomLeft => CursorIcon::ResizeNeSw,
    }
}
