//! tilelight: 2D dynamic lighting and shadow casting for tile-based games.
//!
//! Build a [`LightBox`], turn a tile map into walls with
//! [`generate_walls`], add [`Light`]s and call [`LightBox::render`] once per
//! frame with the camera offset.

pub mod chunks;
pub mod config;
pub mod display;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod light;
pub mod lightbox;
pub mod tilemap;
pub mod util;
pub mod wall;

pub use config::LightBoxConfig;
pub use display::{BlendMode, PixelBuffer};
pub use error::{LightingError, Result};
pub use generate::{boundary_walls, generate_walls, Cell};
pub use geometry::{Point, Rect};
pub use light::Light;
pub use lightbox::{LightBox, LightId, WallGroupId};
pub use tilemap::TileMap;
pub use wall::{box_walls, Direction, FaceAxis, Side, Wall};
