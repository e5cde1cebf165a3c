// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides clamping helpers, the image fit rules shared by the
//! on-screen canvas and the exporter, and conversions between screen points
//! and container pixels.

use crate::models::overlay::{Container, OverlayTransform};

/// Clamp `value` into `[lower, upper]`, letting the lower bound win when the
/// range is empty.
pub fn clamp_lower_first(value: f32, lower: f32, upper: f32) -> f32 {
    if upper < lower {
        lower
    } else {
        value.clamp(lower, upper)
    }
}

/// An integer rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Region of a `src_w x src_h` image that, scaled to `dst_w x dst_h`,
/// covers the destination completely (centred crop).
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> PixelRect {
    let scale_x = dst_w as f64 / src_w as f64;
    let scale_y = dst_h as f64 / src_h as f64;
    let scale = scale_x.max(scale_y);
    let width = ((dst_w as f64 / scale).round() as u32).clamp(1, src_w);
    let height = ((dst_h as f64 / scale).round() as u32).clamp(1, src_h);

    PixelRect {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// Placement of a `src_w x src_h` image scaled to fit entirely inside a
/// `dst_w x dst_h` box, centred. The rect is relative to the box origin.
pub fn contain_fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> PixelRect {
    let scale_x = dst_w as f64 / src_w as f64;
    let scale_y = dst_h as f64 / src_h as f64;
    let scale = scale_x.min(scale_y);
    let max_w = dst_w.max(1);
    let max_h = dst_h.max(1);
    let width = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let height = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);

    PixelRect {
        x: dst_w.saturating_sub(width) / 2,
        y: dst_h.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Convert a pointer delta in screen points to container pixels.
pub fn screen_to_container_delta(
    delta: egui::Vec2,
    screen_rect: egui::Rect,
    container: Container,
) -> (f32, f32) {
    (
        delta.x * container.width / screen_rect.width(),
        delta.y * container.height / screen_rect.height(),
    )
}

/// Convert an overlay transform to its on-screen rectangle.
pub fn container_to_screen(
    transform: &OverlayTransform,
    screen_rect: egui::Rect,
    container: Container,
) -> egui::Rect {
    let sx = screen_rect.width() / container.width;
    let sy = screen_rect.height() / container.height;

    egui::Rect::from_min_size(
        screen_rect.min + egui::vec2(transform.x * sx, transform.y * sy),
        egui::vec2(transform.width * sx, transform.height * sy),
    )
}
