use std::path::PathBuf;

use thiserror::Error;

/// Asset loading failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load OBJ '{}'", .path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to decode image '{}'", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture dimensions must be non-zero (got {width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("texture data is {actual} bytes, expected {expected} for RGBA8")]
    TextureSize { expected: usize, actual: usize },
}
