mod pixel_buffer;
#[cfg(feature = "demo")]
mod window;

pub use pixel_buffer::{BlendMode, PixelBuffer};
#[cfg(feature = "demo")]
pub use window::{Control, FrameTexture, LightWindow, ScrollKey};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
