//! The `LightBox`: owner of every light and wall, and the per-frame renderer.
//!
//! Lighting is only computed inside the "box" of the viewport, grown by the
//! largest light radius so lights just off screen still reach into it.
//! Static walls live in a [`ChunkIndex`]; dynamic wall groups are kept in
//! plain vectors that callers may edit in place between frames.

use std::collections::BTreeMap;
use std::fmt;

use crate::chunks::ChunkIndex;
use crate::config::LightBoxConfig;
use crate::display::{BlendMode, PixelBuffer};
use crate::error::{LightingError, Result};
use crate::geometry::{Point, Rect};
use crate::light::Light;
use crate::wall::Wall;

/// Colour painted into a light's image where a wall blocks it
const SHADOW_COLOR: (u8, u8, u8) = (0, 0, 0);

/// Handle returned by [`LightBox::add_light`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(u64);

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by [`LightBox::add_dynamic_walls`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallGroupId(u64);

impl fmt::Display for WallGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct LightBox {
    config: LightBoxConfig,
    static_walls: ChunkIndex,
    dynamic_walls: BTreeMap<WallGroupId, Vec<Wall>>,
    lights: BTreeMap<LightId, Light>,
    last_light_id: u64,
    last_group_id: u64,
}

impl LightBox {
    pub fn new(config: LightBoxConfig) -> Self {
        Self {
            static_walls: ChunkIndex::new(config.chunk_size),
            config,
            dynamic_walls: BTreeMap::new(),
            lights: BTreeMap::new(),
            last_light_id: 0,
            last_group_id: 0,
        }
    }

    /// Resize the lit area, e.g. after the window was resized
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.config.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.config.blend_mode = mode;
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.last_light_id += 1;
        let id = LightId(self.last_light_id);
        self.lights.insert(id, light);
        id
    }

    pub fn get_light(&self, id: LightId) -> Result<&Light> {
        self.lights.get(&id).ok_or(LightingError::LightNotFound(id))
    }

    pub fn get_light_mut(&mut self, id: LightId) -> Result<&mut Light> {
        self.lights.get_mut(&id).ok_or(LightingError::LightNotFound(id))
    }

    pub fn remove_light(&mut self, id: LightId) -> Result<Light> {
        self.lights.remove(&id).ok_or(LightingError::LightNotFound(id))
    }

    /// Lights in id (insertion) order
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(id, light)| (*id, light))
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Largest current radius over all lights, 0 without lights
    pub fn max_light_radius(&self) -> i32 {
        self.lights.values().map(Light::radius).max().unwrap_or(0)
    }

    // ========================================================================
    // Walls
    // ========================================================================

    /// Register static walls. Usually filled by
    /// [`generate_walls`](crate::generate::generate_walls).
    pub fn add_walls<I>(&mut self, walls: I)
    where
        I: IntoIterator<Item = Wall>,
    {
        self.static_walls.add(walls);
    }

    pub fn clear_walls(&mut self) {
        self.static_walls.clear();
    }

    /// Static walls in insertion order
    pub fn walls(&self) -> &[Wall] {
        self.static_walls.walls()
    }

    pub fn wall_count(&self) -> usize {
        self.static_walls.len()
    }

    pub fn add_dynamic_walls(&mut self, walls: Vec<Wall>) -> WallGroupId {
        self.last_group_id += 1;
        let id = WallGroupId(self.last_group_id);
        self.dynamic_walls.insert(id, walls);
        id
    }

    /// Replace the walls of an existing group
    pub fn update_dynamic_walls(&mut self, id: WallGroupId, walls: Vec<Wall>) -> Result<()> {
        let group = self.dynamic_walls_mut(id)?;
        *group = walls;
        Ok(())
    }

    pub fn dynamic_walls(&self, id: WallGroupId) -> Result<&[Wall]> {
        self.dynamic_walls
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(LightingError::WallGroupNotFound(id))
    }

    /// In-place access to a group; edits show up in the next render
    pub fn dynamic_walls_mut(&mut self, id: WallGroupId) -> Result<&mut Vec<Wall>> {
        self.dynamic_walls
            .get_mut(&id)
            .ok_or(LightingError::WallGroupNotFound(id))
    }

    pub fn delete_dynamic_walls(&mut self, id: WallGroupId) -> Result<Vec<Wall>> {
        self.dynamic_walls
            .remove(&id)
            .ok_or(LightingError::WallGroupNotFound(id))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Walls that can affect the frame at `offset`, already moved into
    /// viewport-local coordinates
    pub fn visible_walls(&self, offset: Point) -> Vec<Wall> {
        self.cull(offset, self.max_light_radius()).0
    }

    /// Returns the local walls together with the local render box
    fn cull(&self, offset: Point, max_radius: i32) -> (Vec<Wall>, Rect) {
        let local_box = Rect::new(0.0, 0.0, self.config.width as f32, self.config.height as f32)
            .inflate(max_radius as f32);
        let world_box = local_box.translate(offset);

        let candidates = self
            .static_walls
            .query(&world_box, self.config.chunk_overshoot)
            .into_iter()
            .chain(self.dynamic_walls.values().flatten());

        let back = -offset;
        let walls: Vec<Wall> = candidates
            .filter(|wall| wall.rect().intersects(&world_box))
            .map(|wall| wall.clone_move(back))
            .collect();

        (walls, local_box)
    }

    /// Light the frame seen at `offset` (the camera scroll) and blend the
    /// mask onto `target` with the configured mode. Lights that reach the
    /// viewport advance their animation. Returns the visible walls in local
    /// coordinates for debug overlays.
    pub fn render(&mut self, target: &mut PixelBuffer, offset: Point) -> Vec<Wall> {
        let max_radius = self.max_light_radius();
        let (walls, local_box) = self.cull(offset, max_radius);

        let mut mask = PixelBuffer::with_size(self.config.width, self.config.height);
        mask.clear_rgba(0, 0, 0, 255);

        let mut lit = 0;
        for light in self.lights.values_mut() {
            let source = light.position - offset;
            if !local_box.contains_point(source) {
                continue;
            }

            let radius = light.radius() as f32;
            let corner = source.floor() - Point::new(radius, radius);

            let mut image = light.image().clone();
            for wall in &walls {
                wall.draw_shadow(&mut image, source, &local_box, SHADOW_COLOR, corner);
            }
            mask.composite(&image, corner.x as i32, corner.y as i32, BlendMode::Add);

            light.update();
            lit += 1;
        }

        target.composite_full(&mask, self.config.blend_mode);

        log::trace!(
            "rendered {}/{} lights against {} walls (max radius {})",
            lit,
            self.lights.len(),
            walls.len(),
            max_radius
        );
        walls
    }
}
