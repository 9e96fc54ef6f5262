use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while turning a user-selected file into a loaded image.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    EmptyImage,
}

/// Errors produced while exporting the composited surface.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface has no background image")]
    EmptySurface,
    #[error("cannot allocate a {width}x{height} raster surface")]
    Allocation { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
