use std::path::PathBuf;

use tilelight::display::{
    Control, FrameTexture, LightWindow, ScrollKey, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use tilelight::util::FpsCounter;
use tilelight::{
    box_walls, generate_walls, Light, LightBox, LightBoxConfig, LightId, PixelBuffer, Point,
    TileMap,
};

const DEFAULT_TILE_SIZE: u32 = 25;
const LIGHT_RADIUS: i32 = 80;
const SCROLL_SPEED: f32 = 2.0;
const BOX_ORIGIN: (f32, f32) = (1200.0, 100.0);

/// Room used when no map file is found
const FALLBACK_MAP: &str = "\
1111111111111111111111111111111111111111111111111111111111111111
1000000000000000000000000000000000000000000000000000000000000001
1000000000000000000000000000000000000000000000000000000000000001
1000011110000000000000000001111000000000000000000000000000000001
1000011110000000000000000001111000000000000000000000000000000001
1000000000000000111000000000000000000000000000000000000000000001
1000000000000000111000000000000000001111111100000000000000000001
1000000000000000000000000000000000001000000100000000000000000001
1000000000000000000000000000000000001000000100000000000000000001
1001100000000000000000111100000000001000000000000000000000000001
1001100000000000000000100100000000001111111100000000000000000001
1000000000000000000000100100000000000000000000000000000000000001
1000000000000000000000111100000000000000000000000000000000000001
1000000000000000000000000000000000000000000000000000000000000001
1000000000111111100000000000000000000000000000000000000000000001
1000000000000000000000000000000000000000000000000000000000000001
1000000000000000000000000000000000000000000000000000000000000001
1000000000000000000000000000001100000000000000000000000000000001
1000000000000000000000000000001100000000000000000000000000000001
1111111111111111111111111111111111111111111111111111111111111111";

struct Options {
    width: u32,
    height: u32,
    vsync: bool,
    tile_size: u32,
    map: PathBuf,
    config: Option<PathBuf>,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        tile_size: DEFAULT_TILE_SIZE,
        map: PathBuf::from("map.txt"),
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--no-vsync" => opts.vsync = false,
            "--width" | "-w" => {
                if let Some(w) = value.and_then(|v| v.parse().ok()) {
                    opts.width = w;
                }
                i += 1;
            },
            "--height" | "-h" => {
                if let Some(h) = value.and_then(|v| v.parse().ok()) {
                    opts.height = h;
                }
                i += 1;
            },
            "--tile-size" => {
                if let Some(t) = value.and_then(|v| v.parse().ok()) {
                    opts.tile_size = t;
                }
                i += 1;
            },
            "--map" => {
                if let Some(path) = value {
                    opts.map = PathBuf::from(path);
                }
                i += 1;
            },
            "--config" => {
                opts.config = value.map(PathBuf::from);
                i += 1;
            },
            "--help" => {
                println!("Usage: tilelight-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --map PATH            Tile map, '0' = open (default: map.txt)");
                println!("  --config PATH         LightBox settings as JSON");
                println!(
                    "  --tile-size N         Tile size in pixels (default: {})",
                    DEFAULT_TILE_SIZE
                );
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    opts
}

fn load_map(opts: &Options) -> TileMap {
    match TileMap::load(&opts.map) {
        Ok(map) => map,
        Err(e) => {
            log::warn!("{}: {}, using built-in room", opts.map.display(), e);
            TileMap::parse(FALLBACK_MAP)
        },
    }
}

/// WASD keys currently held
#[derive(Default)]
struct Scroll {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Scroll {
    fn set(&mut self, key: ScrollKey, held: bool) {
        match key {
            ScrollKey::Up => self.up = held,
            ScrollKey::Down => self.down = held,
            ScrollKey::Left => self.left = held,
            ScrollKey::Right => self.right = held,
        }
    }

    fn velocity(&self) -> Point {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32 * SCROLL_SPEED;
        Point::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Red marker where a light sits
fn draw_dot(buffer: &mut PixelBuffer, at: Point) {
    let (x, y) = (at.x as i32, at.y as i32);
    for dy in -1..=1 {
        buffer.hline_rgba(x - 1, x + 1, y + dy, 255, 0, 0, 255);
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let opts = parse_args();

    let config = match &opts.config {
        Some(path) => LightBoxConfig::load(path).map_err(|e| e.to_string())?,
        None => LightBoxConfig::new(opts.width, opts.height),
    };
    let (width, height) = (config.width, config.height);

    let (mut window, texture_creator) = LightWindow::open("tilelight", width, height, opts.vsync)?;
    let mut frame = FrameTexture::new(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let mut fps_counter = FpsCounter::new(60);

    let mut light_box = LightBox::new(config);
    let map = load_map(&opts);
    generate_walls(&mut light_box, map.open_cells(), opts.tile_size).map_err(|e| e.to_string())?;

    let template = PixelBuffer::radial_gradient(256, 1.5);
    let mouse_lights: Vec<LightId> = (0..9u64)
        .map(|i| {
            let light = Light::new(Point::ZERO, LIGHT_RADIUS, &template, (100, 50, 255), 255)
                .with_seed(i + 1);
            light_box.add_light(light)
        })
        .collect();

    let moving_box = light_box.add_dynamic_walls(box_walls(
        Point::new(BOX_ORIGIN.0, BOX_ORIGIN.1),
        Point::new(20.0, 20.0),
    ));

    println!("=== tilelight ===");
    println!("Resolution: {}x{}", width, height);
    println!("Map: {}x{} tiles, {} walls", map.width(), map.height(), light_box.wall_count());
    println!("Controls:");
    println!("  Mouse      - Move the lights");
    println!("  W/A/S/D    - Scroll");
    println!("  E          - Print FPS");
    println!("  Q          - Print visible wall count");
    println!("  Escape     - Quit");

    let mut offset = Point::ZERO;
    let mut mouse = Point::ZERO;
    let mut scroll = Scroll::default();
    let mut visible_walls = Vec::new();
    let mut timer = 0.0f32;

    'main: loop {
        let avg_fps = fps_counter.tick();

        for control in window.controls() {
            match control {
                Control::Quit => break 'main,
                Control::ReportFps => println!("fps {}", avg_fps as u32),
                Control::ReportWalls => println!("visible walls: {}", visible_walls.len()),
                Control::Scroll { key, held } => scroll.set(key, held),
                Control::Pointer(at) => mouse = at,
            }
        }

        timer += 1.0;
        offset = offset + scroll.velocity();

        // Wobble the obstacle by editing its walls in place
        let pos = Point::new(
            BOX_ORIGIN.0 + (timer / 100.0).sin() * 50.0,
            BOX_ORIGIN.1 + (timer / 72.0).sin() * 100.0,
        );
        let size = Point::new(
            (1.0 + (timer / 60.0).sin()) * 50.0,
            (1.0 + (timer / 65.0).sin()) * 50.0,
        );
        let group = light_box
            .dynamic_walls_mut(moving_box)
            .map_err(|e| e.to_string())?;
        for (wall, fresh) in group.iter_mut().zip(box_walls(pos, size)) {
            wall.set_endpoints(fresh.p1(), fresh.p2());
        }

        // Dimmed, cycling colour shared by every mouse light
        let color = (
            ((100.0 + (timer / 10.0).sin() * 100.0) * 0.2) as u8,
            ((50.0 + (timer / 25.0).sin() * 50.0) * 0.2) as u8,
            ((200.0 + (timer / 15.0).sin() * 55.0) * 0.2) as u8,
        );
        let spread = (timer / 40.0).sin() * 60.0;
        let mut dots = Vec::with_capacity(mouse_lights.len());
        for (i, id) in mouse_lights.iter().enumerate() {
            let around = Point::new((i % 3) as f32 - 1.0, (i / 3) as f32 - 1.0);
            let at = mouse + Point::new(around.x * spread, around.y * spread);
            dots.push(at);

            let light = light_box.get_light_mut(*id).map_err(|e| e.to_string())?;
            light.set_color(color, true);
            light.position = at + offset;
            light.set_size(((1.0 + (timer / 15.0).sin()) * 40.0 + 50.0) as i32);
        }

        buffer.clear_rgba(0, 0, 0, 255);
        visible_walls = light_box.render(&mut buffer, offset);

        for wall in &visible_walls {
            wall.render(&mut buffer, Point::ZERO);
        }
        for dot in dots {
            draw_dot(&mut buffer, dot);
        }

        window.show(&mut frame, &buffer)?;
    }

    Ok(())
}
