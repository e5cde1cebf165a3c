// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module filters uploads down to image files, decodes them into
//! [`ImageSource`]s, and runs decodes on background threads so the UI
//! never waits on a large file.

use crate::error::DecodeError;
use crate::models::session::{DecodeCompletion, ImageSlot, ImageSource, RequestId};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Extensions offered in the file dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif", "ico",
];

/// A file the user picked or dropped, not yet decoded.
#[derive(Debug, Clone)]
pub enum PendingFile {
    /// A file on disk
    Path(PathBuf),
    /// File contents delivered with a drop event
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl PendingFile {
    /// Name used in logs and the status bar.
    pub fn name(&self) -> String {
        match self {
            PendingFile::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            PendingFile::Bytes { name, .. } => name.clone(),
        }
    }

    /// Convert a dropped file, skipping anything that is not an image.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        let path = file.path.as_deref().unwrap_or(Path::new(&file.name));
        if !is_image_file(Some(path), &file.mime) {
            log::debug!("Ignoring dropped non-image file {:?}", file.name);
            return None;
        }

        if let Some(bytes) = &file.bytes {
            Some(PendingFile::Bytes {
                name: file.name.clone(),
                bytes: bytes.clone(),
            })
        } else {
            file.path.clone().map(PendingFile::Path)
        }
    }
}

/// Accept a file when its MIME type is `image/*`, or, without a MIME type,
/// when its extension names an image format.
pub fn is_image_file(path: Option<&Path>, mime: &str) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }

    match path {
        Some(path) => image::ImageFormat::from_path(path).is_ok(),
        None => false,
    }
}

/// Decode in-memory file contents into an image.
pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<ImageSource, DecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| DecodeError::Image {
        name: name.to_string(),
        source,
    })?;

    let pixels = decoded.to_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(DecodeError::Empty {
            name: name.to_string(),
        });
    }

    Ok(ImageSource::new(name, pixels))
}

/// Read and decode a pending file.
pub fn load_image(file: &PendingFile) -> Result<ImageSource, DecodeError> {
    match file {
        PendingFile::Path(path) => {
            let bytes = std::fs::read(path).map_err(|source| DecodeError::Read {
                path: path.clone(),
                source,
            })?;
            decode_bytes(&file.name(), &bytes)
        }
        PendingFile::Bytes { name, bytes } => decode_bytes(name, bytes),
    }
}

/// Runs decodes on worker threads and collects their results.
pub struct ImageLoader {
    sender: Sender<DecodeCompletion>,
    receiver: Receiver<DecodeCompletion>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Decode `file` in the background; the result arrives tagged with
    /// `slot` and `id`.
    pub fn spawn(&self, slot: ImageSlot, id: RequestId, file: PendingFile) {
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            let result = load_image(&file);
            match &result {
                Ok(source) => {
                    let (width, height) = source.dimensions();
                    log::info!("Decoded {} ({}x{})", source.name(), width, height);
                }
                Err(e) => log::warn!("Failed to decode {}: {}", file.name(), e),
            }

            let _ = sender.send(DecodeCompletion { slot, id, result });
        });
    }

    /// Take every completion that has arrived so far.
    pub fn poll(&self) -> Vec<DecodeCompletion> {
        self.receiver.try_iter().collect()
    }
}
