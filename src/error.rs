//! Error type shared by the lighting engine

use thiserror::Error;

use crate::lightbox::{LightId, WallGroupId};

#[derive(Debug, Error)]
pub enum LightingError {
    /// Id was never handed out by `LightBox::add_light`, or was removed
    #[error("light {0} not found")]
    LightNotFound(LightId),

    /// Id was never handed out by `LightBox::add_dynamic_walls`, or was deleted
    #[error("dynamic wall group {0} not found")]
    WallGroupNotFound(WallGroupId),

    #[error("tile size must be non-zero")]
    ZeroTileSize,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = LightingError> = std::result::Result<T, E>;
