// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flattening a design into a PNG.
//!
//! The export is drawn from the session content, not captured from the
//! screen, so handles, the drop hint and the hover border never end up in
//! the file. Output is exactly the container size at scale 1.

use crate::error::CaptureError;
use crate::models::session::Scene;
use crate::util::geometry::{contain_fit, cover_crop};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Fill shown when no background has been uploaded.
pub const PLACEHOLDER_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Resampling filter for both layers
const FILTER: FilterType = FilterType::Triangle;

/// Draw the scene into a raster the size of the container.
pub fn render(scene: &Scene) -> Result<RgbaImage, CaptureError> {
    let (width, height) = scene.container.pixel_size();
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptySurface { width, height });
    }

    let mut canvas = RgbaImage::from_pixel(width, height, PLACEHOLDER_BACKGROUND);

    if let Some(background) = &scene.background {
        let (src_w, src_h) = background.dimensions();
        let crop = cover_crop(src_w, src_h, width, height);
        let pixels = background.pixels();
        let view = imageops::crop_imm(pixels, crop.x, crop.y, crop.width, crop.height);
        let scaled = imageops::resize(&view.to_image(), width, height, FILTER);
        imageops::overlay(&mut canvas, &scaled, 0, 0);
    }

    if let Some((logo, transform)) = &scene.overlay {
        let box_x = transform.x.round() as i64;
        let box_y = transform.y.round() as i64;
        let box_w = (transform.width.round() as u32).max(1);
        let box_h = (transform.height.round() as u32).max(1);

        let (src_w, src_h) = logo.dimensions();
        let fit = contain_fit(src_w, src_h, box_w, box_h);
        let scaled = imageops::resize(logo.pixels(), fit.width, fit.height, FILTER);
        let x = box_x + fit.x as i64;
        let y = box_y + fit.y as i64;
        imageops::overlay(&mut canvas, &scaled, x, y);
    }

    Ok(canvas)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

/// Render and encode the scene.
pub fn export_png(scene: &Scene) -> Result<Vec<u8>, CaptureError> {
    let image = render(scene)?;
    encode_png(&image)
}

/// Render the scene and write it to `path`.
pub fn write_export(scene: &Scene, path: &Path) -> Result<(), CaptureError> {
    let bytes = export_png(scene)?;
    std::fs::write(path, &bytes).map_err(|source| CaptureError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Exported design to {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// Export on a worker thread. The receiver yields the written path or the
/// capture error.
pub fn spawn_export(scene: Scene, path: PathBuf) -> Receiver<Result<PathBuf, CaptureError>> {
    let (sender, receiver) = channel();

    std::thread::spawn(move || {
        let result = write_export(&scene, &path).map(|_| path);
        if let Err(e) = &result {
            log::error!("Failed to export design: {}", e);
        }
        let _ = sender.send(result);
    });

    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::overlay::{Container, OverlayTransform};
    use crate::models::session::ImageSource;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn solid(name: &str, width: u32, height: u32, color: [u8; 4]) -> ImageSource {
        ImageSource::new(name, RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    fn scene(
        background: Option<ImageSource>,
        overlay: Option<(ImageSource, OverlayTransform)>,
    ) -> Scene {
        Scene {
            container: Container::new(384.0, 384.0),
            background,
            overlay,
        }
    }

    /// Render a red 384x384 shirt with `logo` placed at `transform`.
    fn render_on_red(logo: ImageSource, transform: OverlayTransform) -> RgbaImage {
        let shirt = solid("shirt.png", 384, 384, RED);
        let s = scene(Some(shirt), Some((logo, transform)));
        render(&s).unwrap()
    }

    #[test]
    fn test_output_matches_container_size() {
        let shirt = solid("shirt.png", 1000, 600, RED);
        let image = render(&scene(Some(shirt), None)).unwrap();
        assert_eq!(image.dimensions(), (384, 384));
    }

    #[test]
    fn test_background_only_has_no_extra_content() {
        // No logo: every pixel is background, nothing else is drawn on top
        let shirt = solid("shirt.png", 200, 300, RED);
        let image = render(&scene(Some(shirt), None)).unwrap();
        assert!(image.pixels().all(|p| *p == Rgba(RED)));
    }

    #[test]
    fn test_placeholder_background() {
        let image = render(&scene(None, None)).unwrap();
        assert!(image.pixels().all(|p| *p == PLACEHOLDER_BACKGROUND));
    }

    #[test]
    fn test_overlay_is_placed_at_transform() {
        let logo = solid("logo.png", 50, 50, BLUE);
        let transform = OverlayTransform::new(100.0, 100.0, 100.0, 100.0);
        let image = render_on_red(logo, transform);

        assert_eq!(image.get_pixel(150, 150), &Rgba(BLUE));
        assert_eq!(image.get_pixel(100, 100), &Rgba(BLUE));
        assert_eq!(image.get_pixel(199, 199), &Rgba(BLUE));
        assert_eq!(image.get_pixel(99, 150), &Rgba(RED));
        assert_eq!(image.get_pixel(200, 150), &Rgba(RED));
    }

    #[test]
    fn test_overlay_keeps_logo_aspect() {
        // Wide logo in a square box: letterboxed vertically
        let logo = solid("logo.png", 100, 50, BLUE);
        let transform = OverlayTransform::new(0.0, 0.0, 100.0, 100.0);
        let image = render_on_red(logo, transform);

        assert_eq!(image.get_pixel(50, 10), &Rgba(RED));
        assert_eq!(image.get_pixel(50, 50), &Rgba(BLUE));
        assert_eq!(image.get_pixel(50, 90), &Rgba(RED));
    }

    #[test]
    fn test_transparent_logo_shows_background() {
        let logo = solid("logo.png", 10, 10, [0, 0, 0, 0]);
        let transform = OverlayTransform::new(0.0, 0.0, 100.0, 100.0);
        let image = render_on_red(logo, transform);
        assert_eq!(image.get_pixel(50, 50), &Rgba(RED));
    }

    #[test]
    fn test_export_is_repeatable() {
        let shirt = solid("shirt.png", 500, 700, RED);
        let logo = solid("logo.png", 64, 32, BLUE);
        let transform = OverlayTransform::new(12.5, 40.0, 90.0, 45.0);
        let s = scene(Some(shirt), Some((logo, transform)));

        let first = export_png(&s).unwrap();
        let second = export_png(&s).unwrap();
        assert_eq!(first, second);

        let decoded = image::load_from_memory(&first).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (384, 384));
    }

    #[test]
    fn test_empty_surface_is_capture_error() {
        let s = Scene {
            container: Container::new(0.0, 384.0),
            background: None,
            overlay: None,
        };
        let result = render(&s);
        assert!(matches!(result, Err(CaptureError::EmptySurface { .. })));
    }

    #[test]
    fn test_write_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::config::EXPORT_FILE_NAME);

        write_export(&scene(None, None), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_write_export_bad_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("tshirt-design.png");
        let err = write_export(&scene(None, None), &path).unwrap_err();
        assert!(matches!(err, CaptureError::Write { .. }));
    }

    #[test]
    fn test_spawn_export_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let receiver = spawn_export(scene(None, None), path.clone());

        let result = receiver.recv().unwrap();
        assert_eq!(result.unwrap(), path);
        assert!(path.exists());
    }
}
