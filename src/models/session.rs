// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session state.
//!
//! This module holds everything one editing session knows about: the
//! container, the uploaded background and logo, the logo's transform, and
//! bookkeeping that makes sure only the most recent upload for each slot
//! is ever shown.

use super::overlay::{
    apply_drag, apply_resize, Container, OverlayTransform, ResizeHandle, ResizeLimits,
};
use crate::config::EditorConfig;
use crate::error::DecodeError;
use image::RgbaImage;
use std::sync::Arc;

/// Decoded image pixels plus the name of the file they came from.
#[derive(Debug, Clone)]
pub struct ImageSource {
    name: String,
    pixels: Arc<RgbaImage>,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Which image an upload is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Background,
    Overlay,
}

/// Tag for a decode request. Later requests always carry larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A finished decode, delivered back to the session.
#[derive(Debug)]
pub struct DecodeCompletion {
    pub slot: ImageSlot,
    pub id: RequestId,
    pub result: Result<ImageSource, DecodeError>,
}

/// What the session did with a [`DecodeCompletion`].
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The image is now displayed
    Applied,
    /// A newer request exists for the slot; the completion was dropped
    Stale,
    /// The latest request failed; the previous image is kept
    Failed(DecodeError),
}

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<RequestId>,
    in_flight: bool,
    source: Option<ImageSource>,
    revision: Option<RequestId>,
}

/// Immutable snapshot of what the container shows, handed to the exporter.
#[derive(Debug, Clone)]
pub struct Scene {
    pub container: Container,
    pub background: Option<ImageSource>,
    pub overlay: Option<(ImageSource, OverlayTransform)>,
}

/// State of one editing session.
pub struct EditorSession {
    container: Container,
    default_overlay: OverlayTransform,
    min_overlay_size: f32,
    lock_aspect_ratio: bool,

    /// Whether the editing surface has been laid out yet
    mounted: bool,

    next_request: u64,
    background: SlotState,
    overlay: SlotState,

    transform: Option<OverlayTransform>,
    locked_ratio: Option<f32>,

    /// Files are currently being dragged over the window
    is_drag_active: bool,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            container: config.container,
            default_overlay: config.default_overlay,
            min_overlay_size: config.min_overlay_size,
            lock_aspect_ratio: config.lock_aspect_ratio,
            mounted: false,
            next_request: 0,
            background: SlotState::default(),
            overlay: SlotState::default(),
            transform: None,
            locked_ratio: None,
            is_drag_active: false,
        }
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// Mark the editing surface as laid out. Exports are ignored before this.
    pub fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            log::debug!(
                "Editing surface mounted at {}x{}",
                self.container.width,
                self.container.height
            );
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn slot(&self, slot: ImageSlot) -> &SlotState {
        match slot {
            ImageSlot::Background => &self.background,
            ImageSlot::Overlay => &self.overlay,
        }
    }

    fn slot_mut(&mut self, slot: ImageSlot) -> &mut SlotState {
        match slot {
            ImageSlot::Background => &mut self.background,
            ImageSlot::Overlay => &mut self.overlay,
        }
    }

    /// Register a new decode request for `slot`. Any request still in flight
    /// for the same slot becomes stale.
    pub fn begin_request(&mut self, slot: ImageSlot) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);

        let state = self.slot_mut(slot);
        state.latest = Some(id);
        state.in_flight = true;
        id
    }

    /// Apply a decode result if it belongs to the latest request for its slot.
    pub fn apply_completion(&mut self, completion: DecodeCompletion) -> CompletionOutcome {
        let DecodeCompletion { slot, id, result } = completion;

        if self.slot(slot).latest != Some(id) {
            log::debug!("Dropping stale {:?} decode {:?}", slot, id);
            return CompletionOutcome::Stale;
        }

        self.slot_mut(slot).in_flight = false;

        let source = match result {
            Ok(source) => source,
            Err(e) => return CompletionOutcome::Failed(e),
        };

        log::info!(
            "Showing {:?} image {} ({}x{})",
            slot,
            source.name(),
            source.dimensions().0,
            source.dimensions().1
        );

        let state = self.slot_mut(slot);
        state.source = Some(source);
        state.revision = Some(id);

        if slot == ImageSlot::Overlay && self.transform.is_none() {
            let transform = self.default_overlay.fit_within(self.container);
            self.locked_ratio = self.lock_aspect_ratio.then(|| transform.aspect_ratio());
            self.transform = Some(transform);
        }

        CompletionOutcome::Applied
    }

    /// A decode for `slot` has been requested and not yet delivered.
    pub fn is_loading(&self, slot: ImageSlot) -> bool {
        self.slot(slot).in_flight
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&ImageSource> {
        self.slot(slot).source.as_ref()
    }

    /// Id of the request whose image is currently shown in `slot`. Changes
    /// whenever the image is replaced.
    pub fn revision(&self, slot: ImageSlot) -> Option<RequestId> {
        self.slot(slot).revision
    }

    pub fn background(&self) -> Option<&ImageSource> {
        self.image(ImageSlot::Background)
    }

    pub fn overlay(&self) -> Option<&ImageSource> {
        self.image(ImageSlot::Overlay)
    }

    pub fn transform(&self) -> Option<OverlayTransform> {
        self.transform
    }

    pub fn resize_limits(&self) -> ResizeLimits {
        ResizeLimits {
            min_size: self.min_overlay_size,
            aspect_ratio: self.locked_ratio,
        }
    }

    /// Move the logo by a delta in container pixels.
    pub fn drag_overlay(&mut self, dx: f32, dy: f32) {
        if let Some(transform) = self.transform {
            self.transform = Some(apply_drag(transform, self.container, dx, dy));
        }
    }

    /// Resize the logo from `handle` by a delta in container pixels.
    pub fn resize_overlay(&mut self, handle: ResizeHandle, dx: f32, dy: f32) {
        if let Some(transform) = self.transform {
            let limits = self.resize_limits();
            let resized = apply_resize(transform, self.container, handle, dx, dy, limits);
            self.transform = Some(resized);
        }
    }

    /// Update the drag-hover flag. Returns true if it changed.
    pub fn set_drag_active(&mut self, active: bool) -> bool {
        let changed = self.is_drag_active != active;
        self.is_drag_active = active;
        changed
    }

    pub fn is_drag_active(&self) -> bool {
        self.is_drag_active
    }

    /// Snapshot the content for export, or `None` if the surface is not
    /// mounted yet.
    pub fn scene(&self) -> Option<Scene> {
        if !self.is_mounted() {
            return None;
        }

        let overlay = match (&self.overlay.source, self.transform) {
            (Some(source), Some(transform)) => Some((source.clone(), transform)),
            _ => None,
        };

        Some(Scene {
            container: self.container,
            background: self.background.source.clone(),
            overlay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn solid(name: &str, width: u32, height: u32, color: [u8; 4]) -> ImageSource {
        ImageSource::new(name, RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    fn completion(slot: ImageSlot, id: RequestId, source: ImageSource) -> DecodeCompletion {
        DecodeCompletion {
            slot,
            id,
            result: Ok(source),
        }
    }

    /// Deliver a successful decode for `id` into `slot`.
    fn deliver(
        s: &mut EditorSession,
        slot: ImageSlot,
        id: RequestId,
        source: ImageSource,
    ) -> CompletionOutcome {
        s.apply_completion(completion(slot, id, source))
    }

    fn session() -> EditorSession {
        EditorSession::new(&EditorConfig::default())
    }

    /// Session with a 10x10 logo already placed.
    fn session_with_logo() -> EditorSession {
        let mut s = session();
        let id = s.begin_request(ImageSlot::Overlay);
        let logo = solid("logo.png", 10, 10, BLACK);
        deliver(&mut s, ImageSlot::Overlay, id, logo);
        s
    }

    #[test]
    fn test_latest_request_wins_out_of_order() {
        let mut s = session();
        let a = s.begin_request(ImageSlot::Background);
        let b = s.begin_request(ImageSlot::Background);
        let red = solid("a.png", 2, 2, [255, 0, 0, 255]);
        let blue = solid("b.png", 2, 2, [0, 0, 255, 255]);

        // B finishes first, then the stale A arrives
        let outcome = deliver(&mut s, ImageSlot::Background, b, blue);
        assert!(matches!(outcome, CompletionOutcome::Applied));
        let outcome = deliver(&mut s, ImageSlot::Background, a, red);
        assert!(matches!(outcome, CompletionOutcome::Stale));

        assert_eq!(s.background().map(|b| b.name()), Some("b.png"));
        assert_eq!(s.revision(ImageSlot::Background), Some(b));
    }

    #[test]
    fn test_latest_request_wins_in_order() {
        let mut s = session();
        let a = s.begin_request(ImageSlot::Background);
        let b = s.begin_request(ImageSlot::Background);
        let red = solid("a.png", 2, 2, [255, 0, 0, 255]);
        let blue = solid("b.png", 2, 2, [0, 0, 255, 255]);

        deliver(&mut s, ImageSlot::Background, a, red);
        assert!(s.background().is_none());
        assert!(s.is_loading(ImageSlot::Background));

        deliver(&mut s, ImageSlot::Background, b, blue);
        assert_eq!(s.background().map(|b| b.name()), Some("b.png"));
        assert!(!s.is_loading(ImageSlot::Background));
    }

    #[test]
    fn test_slots_are_tracked_independently() {
        let mut s = session();
        let bg = s.begin_request(ImageSlot::Background);
        let logo = s.begin_request(ImageSlot::Overlay);

        let logo_image = solid("logo.png", 4, 4, BLACK);
        deliver(&mut s, ImageSlot::Overlay, logo, logo_image);
        let shirt = solid("shirt.png", 8, 8, [255, 255, 255, 255]);
        deliver(&mut s, ImageSlot::Background, bg, shirt);

        assert_eq!(s.background().map(|b| b.name()), Some("shirt.png"));
        assert_eq!(s.overlay().map(|o| o.name()), Some("logo.png"));
    }

    #[test]
    fn test_failed_decode_keeps_previous_image() {
        let mut s = session();
        let first = s.begin_request(ImageSlot::Background);
        let good = solid("good.png", 2, 2, [1, 2, 3, 255]);
        deliver(&mut s, ImageSlot::Background, first, good);

        let second = s.begin_request(ImageSlot::Background);
        let error = DecodeError::Empty {
            name: "bad.png".to_string(),
        };
        let outcome = s.apply_completion(DecodeCompletion {
            slot: ImageSlot::Background,
            id: second,
            result: Err(error),
        });

        assert!(matches!(outcome, CompletionOutcome::Failed(_)));
        assert_eq!(s.background().map(|b| b.name()), Some("good.png"));
        assert_eq!(s.revision(ImageSlot::Background), Some(first));
        assert!(!s.is_loading(ImageSlot::Background));
    }

    #[test]
    fn test_first_overlay_creates_default_transform() {
        let s = session();
        assert!(s.transform().is_none());

        let s = session_with_logo();
        let expected = OverlayTransform::new(100.0, 100.0, 100.0, 100.0);
        assert_eq!(s.transform(), Some(expected));
        assert_eq!(s.resize_limits().aspect_ratio, Some(1.0));
    }

    #[test]
    fn test_replacing_logo_keeps_transform() {
        let mut s = session_with_logo();
        s.drag_overlay(50.0, -20.0);
        let moved = s.transform();

        let id = s.begin_request(ImageSlot::Overlay);
        let wide = solid("two.png", 30, 10, BLACK);
        deliver(&mut s, ImageSlot::Overlay, id, wide);

        assert_eq!(s.transform(), moved);
        assert_eq!(s.overlay().map(|o| o.name()), Some("two.png"));
    }

    #[test]
    fn test_drag_without_overlay_is_noop() {
        let mut s = session();
        s.drag_overlay(10.0, 10.0);
        s.resize_overlay(ResizeHandle::BottomRight, 10.0, 10.0);
        assert!(s.transform().is_none());
    }

    #[test]
    fn test_session_drag_and_resize_are_clamped() {
        let mut s = session_with_logo();

        s.drag_overlay(400.0, 0.0);
        assert_eq!(s.transform().map(|t| (t.x, t.y)), Some((284.0, 100.0)));

        s.resize_overlay(ResizeHandle::BottomRight, 0.0, 1000.0);
        let t = s.transform().unwrap();
        assert!(t.right() <= 384.0 + 0.001);
        assert!(t.bottom() <= 384.0 + 0.001);
        assert!((t.aspect_ratio() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_drag_active_flag() {
        let mut s = session();
        assert!(!s.is_drag_active());
        assert!(s.set_drag_active(true));
        assert!(!s.set_drag_active(true));
        assert!(s.is_drag_active());
        assert!(s.set_drag_active(false));
    }

    #[test]
    fn test_scene_requires_mount() {
        let mut s = session();
        assert!(s.scene().is_none());

        s.mount();
        let scene = s.scene().unwrap();
        assert!(scene.background.is_none());
        assert!(scene.overlay.is_none());
        assert_eq!(scene.container, Container::new(384.0, 384.0));
    }
}
