// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay geometry.
//!
//! This module defines the editing surface, the logo's position and size
//! inside it, and the pure functions that turn drag and resize gestures into
//! a new transform that never leaves the surface.

use crate::util::geometry::clamp_lower_first;

/// The fixed-size editing surface. All overlay geometry is relative to its
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size in whole pixels, as used for export.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(0.0) as u32,
            self.height.round().max(0.0) as u32,
        )
    }
}

/// Position and size of the logo in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTransform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OverlayTransform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Bring the transform inside `container`.
    ///
    /// Position is clamped to the lower bound first; the size is then cut
    /// down to whatever space remains.
    pub fn fit_within(self, container: Container) -> Self {
        let width = clamp_lower_first(self.width, 1.0, container.width);
        let height = clamp_lower_first(self.height, 1.0, container.height);
        let x = clamp_lower_first(self.x, 0.0, container.width - width);
        let y = clamp_lower_first(self.y, 0.0, container.height - height);

        Self {
            x,
            y,
            width: width.min(container.width - x),
            height: height.min(container.height - y),
        }
    }
}

/// One of the eight handles drawn around the selected logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    fn is_horizontal(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    fn is_vertical(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// Position of the handle on the overlay's bounding box, as fractions of
    /// its width and height.
    pub fn anchor(self) -> (f32, f32) {
        let fx = if self.moves_left() {
            0.0
        } else if self.moves_right() {
            1.0
        } else {
            0.5
        };
        let fy = if self.moves_top() {
            0.0
        } else if self.moves_bottom() {
            1.0
        } else {
            0.5
        };
        (fx, fy)
    }
}

/// Constraints applied while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    /// Smallest allowed width and height
    pub min_size: f32,
    /// Locked width/height ratio, if any
    pub aspect_ratio: Option<f32>,
}

/// Move the overlay by `(dx, dy)`, stopping at the container edges.
///
/// Delta beyond an edge is dropped, not carried over to later moves.
pub fn apply_drag(
    transform: OverlayTransform,
    container: Container,
    dx: f32,
    dy: f32,
) -> OverlayTransform {
    let t = transform.fit_within(container);

    OverlayTransform {
        x: clamp_lower_first(t.x + dx, 0.0, container.width - t.width),
        y: clamp_lower_first(t.y + dy, 0.0, container.height - t.height),
        ..t
    }
}

/// Resize the overlay by dragging `handle` by `(dx, dy)`.
///
/// The edge or corner opposite the handle stays put. Sizes are kept within
/// `[limits.min_size, space left in the container]`. With a locked aspect
/// ratio one dimension drives the other: width for side handles, height for
/// top/bottom handles, and the axis with the larger requested change for
/// corners.
pub fn apply_resize(
    transform: OverlayTransform,
    container: Container,
    handle: ResizeHandle,
    dx: f32,
    dy: f32,
    limits: ResizeLimits,
) -> OverlayTransform {
    let t = transform.fit_within(container);
    let right = t.right();
    let bottom = t.bottom();

    // Room in the direction each axis grows
    let max_width = if handle.moves_left() {
        right
    } else {
        container.width - t.x
    };
    let max_height = if handle.moves_top() {
        bottom
    } else {
        container.height - t.y
    };

    let requested_width = if handle.moves_left() {
        t.width - dx
    } else if handle.moves_right() {
        t.width + dx
    } else {
        t.width
    };
    let requested_height = if handle.moves_top() {
        t.height - dy
    } else if handle.moves_bottom() {
        t.height + dy
    } else {
        t.height
    };

    let ratio = limits
        .aspect_ratio
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0);

    let (width, height) = match ratio {
        None => (
            clamp_size(requested_width, limits.min_size, max_width),
            clamp_size(requested_height, limits.min_size, max_height),
        ),
        Some(ratio) => {
            let width_change = (requested_width - t.width).abs();
            let height_change = (requested_height - t.height).abs() * ratio;
            let width_drives = match (handle.is_horizontal(), handle.is_vertical()) {
                (true, false) => true,
                (false, true) => false,
                _ => width_change >= height_change,
            };
            let candidate = if width_drives {
                requested_width
            } else {
                requested_height * ratio
            };

            let min_width = limits.min_size.max(limits.min_size * ratio);
            let width = clamp_size(candidate, min_width, max_width.min(max_height * ratio));
            (width, width / ratio)
        }
    };

    let x = if handle.moves_left() {
        right - width
    } else {
        t.x
    };
    let y = if handle.moves_top() {
        bottom - height
    } else {
        t.y
    };

    OverlayTransform::new(x, y, width, height)
}

/// Apply the minimum first, then cut down to the available space.
fn clamp_size(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
