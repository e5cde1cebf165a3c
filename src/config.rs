// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! All settings are compile-time defaults; the editor keeps no configuration
//! on disk.

use crate::models::overlay::{Container, OverlayTransform};

/// File name proposed when saving an exported design.
pub const EXPORT_FILE_NAME: &str = "tshirt-design.png";

/// Settings for one editing session and the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Size of the editing surface in logical pixels.
    pub container: Container,
    /// Placement of a logo the first time one is added.
    pub default_overlay: OverlayTransform,
    /// Smallest width/height a resize may produce.
    pub min_overlay_size: f32,
    /// Keep the logo's width/height ratio while resizing.
    pub lock_aspect_ratio: bool,
    /// Default file name for exports
    pub export_file_name: String,
    /// Initial window size
    pub window_size: [f32; 2],
    /// Minimum window size
    pub min_window_size: [f32; 2],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            container: Container::new(384.0, 384.0),
            default_overlay: OverlayTransform::new(100.0, 100.0, 100.0, 100.0),
            min_overlay_size: 10.0,
            lock_aspect_ratio: true,
            export_file_name: EXPORT_FILE_NAME.to_string(),
            window_size: [900.0, 600.0],
            min_window_size: [640.0, 520.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fit_container() {
        let config = EditorConfig::default();
        let t = config.default_overlay;
        assert!(t.x + t.width <= config.container.width);
        assert!(t.y + t.height <= config.container.height);
        assert!(t.width >= config.min_overlay_size);
        assert_eq!(config.export_file_name, "tshirt-design.png");
    }
}
