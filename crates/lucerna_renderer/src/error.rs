//! Renderer error types and the fatal-error exit path.
//!
//! Two classes of failure exist:
//! - configuration errors (a pipeline that fails validation, an incomplete
//!   G-buffer) mean every later frame would be wrong, so they are logged
//!   and the process aborts through [`fatal`];
//! - data errors (an unknown handle, a texture that failed to decode) are
//!   returned as [`RendererError`] or skipped at draw time.

use std::fmt::Display;

use thiserror::Error;

use crate::resources::registry::TextureHandle;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("texture {0:?} is not registered")]
    MissingTexture(TextureHandle),
    #[error("texture data is {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("invalid viewport size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[cfg(feature = "image")]
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Log `what` together with the underlying error and abort the process.
pub fn fatal(what: impl Display, err: impl Display) -> ! {
    log::error!("{what}: {err}");
    std::process::abort()
}
