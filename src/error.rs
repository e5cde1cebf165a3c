// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for decoding uploads and capturing exports.

use std::path::PathBuf;
use thiserror::Error;

/// An uploaded file could not be turned into an image.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be read from disk
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a supported image
    #[error("{name} is not a readable image: {source}")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// The image decoded to zero pixels
    #[error("{name} has no pixels")]
    Empty { name: String },
}

/// The design could not be flattened into an exported image.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The editing surface has no area to capture
    #[error("Design surface is empty ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    /// The encoded file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
