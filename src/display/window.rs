//! SDL2 front end for the lighting demo.
//!
//! Shows lit frames and reduces raw SDL input to the handful of [`Control`]s
//! the demo understands: WASD scrolling, the `E`/`Q` reports, pointer
//! movement and quitting.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use super::PixelBuffer;
use crate::geometry::Point;

/// Scroll direction bound to one of the WASD keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKey {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Quit,
    /// A scroll key went down (`held`) or up
    Scroll { key: ScrollKey, held: bool },
    ReportFps,
    ReportWalls,
    /// Pointer position in window pixels
    Pointer(Point),
}

pub struct LightWindow {
    canvas: Canvas<Window>,
    events: EventPump,
}

/// Streaming texture the frame is uploaded into, bound to the window's
/// texture creator
pub struct FrameTexture<'a>(Texture<'a>);

impl LightWindow {
    /// Open a centred window. Also returns the texture creator that
    /// [`FrameTexture`]s borrow from.
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl = sdl2::init()?;
        let window = sdl
            .video()?
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let builder = window.into_canvas().accelerated();
        let canvas = if vsync {
            builder.present_vsync().build()
        } else {
            builder.build()
        }
        .map_err(|e| e.to_string())?;

        let creator = canvas.texture_creator();
        let events = sdl.event_pump()?;
        log::debug!("opened {}x{} window (vsync {})", width, height, vsync);
        Ok((Self { canvas, events }, creator))
    }

    /// Upload `frame` and flip it to the screen
    pub fn show(&mut self, texture: &mut FrameTexture, frame: &PixelBuffer) -> Result<(), String> {
        let pitch = frame.width() as usize * 4;
        texture
            .0
            .update(None, frame.as_bytes(), pitch)
            .map_err(|e| e.to_string())?;
        self.canvas.copy(&texture.0, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Controls triggered since the last call. Key repeats are dropped.
    pub fn controls(&mut self) -> Vec<Control> {
        self.events.poll_iter().filter_map(|event| to_control(&event)).collect()
    }
}

impl<'a> FrameTexture<'a> {
    /// Texture matching the `PixelBuffer` byte layout (RGBA8888)
    pub fn new(
        creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map(FrameTexture)
            .map_err(|e| e.to_string())
    }
}

fn to_control(event: &Event) -> Option<Control> {
    match *event {
        Event::Quit { .. } => Some(Control::Quit),
        Event::MouseMotion { x, y, .. } => Some(Control::Pointer(Point::new(x as f32, y as f32))),
        Event::KeyDown {
            keycode: Some(key),
            repeat: false,
            ..
        } => key_control(key, true),
        Event::KeyUp {
            keycode: Some(key), ..
        } => key_control(key, false),
        _ => None,
    }
}

/// Control for a key press (`held`) or release. Only scroll keys report
/// releases.
fn key_control(key: Keycode, held: bool) -> Option<Control> {
    let scroll = match key {
        Keycode::W => ScrollKey::Up,
        Keycode::A => ScrollKey::Left,
        Keycode::S => ScrollKey::Down,
        Keycode::D => ScrollKey::Right,
        _ if !held => return None,
        Keycode::Escape => return Some(Control::Quit),
        Keycode::E => return Some(Control::ReportFps),
        Keycode::Q => return Some(Control::ReportWalls),
        _ => return None,
    };
    Some(Control::Scroll { key: scroll, held })
}
