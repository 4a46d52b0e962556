use thiserror::Error;

use super::buffer::ScrollDirection;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("terrain dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("gradient mask is {actual:?} but the buffer is {expected:?}")]
    MaskMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("cannot scroll {direction:?} by {speed}px: the buffer is only {extent}px along that axis")]
    DegenerateScroll {
        direction: ScrollDirection,
        speed: u32,
        extent: u32,
    },
    #[error("cannot scroll {direction:?}: the buffer was built under a gradient mask")]
    MaskedScroll { direction: ScrollDirection },
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type TerrainResult<T> = Result<T, TerrainError>;
