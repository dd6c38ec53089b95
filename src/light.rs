//! Point lights with a cached tinted image and a pulse/flicker animation

use crate::display::PixelBuffer;
use crate::geometry::Point;
use crate::util::Rng;

const FLICKER_MIN_FRAMES: i32 = 30;
const FLICKER_MAX_FRAMES: i32 = 60;

#[derive(Debug, Clone)]
pub struct Light {
    /// World position of the light's centre; move freely between frames
    pub position: Point,
    base_radius: i32,
    radius: i32,
    /// Template scaled to the base diameter
    base_image: PixelBuffer,
    /// `base_image` after alpha and colour
    tinted: PixelBuffer,
    /// `tinted` at the current diameter
    image: PixelBuffer,
    color: (u8, u8, u8),
    alpha: u8,
    timer: i32,
    flicker_timer: i32,
    variance: i32,
    variance_size: i32,
    rng: Rng,
}

impl Light {
    /// Light of `radius` centred on `position`. `template` is any light image
    /// (see [`PixelBuffer::radial_gradient`]); it is rescaled to the diameter.
    pub fn new(
        position: Point,
        radius: i32,
        template: &PixelBuffer,
        color: (u8, u8, u8),
        alpha: u8,
    ) -> Self {
        let radius = radius.max(0);
        let diameter = (radius * 2) as u32;
        let base_image = template.scaled(diameter, diameter);
        let seed = ((position.x.to_bits() as u64) << 32)
            ^ (position.y.to_bits() as u64)
            ^ (radius as u64);

        let mut light = Self {
            position,
            base_radius: radius,
            radius,
            tinted: base_image.clone(),
            image: base_image.clone(),
            base_image,
            color,
            alpha,
            timer: 1,
            flicker_timer: 1,
            variance: 0,
            variance_size: radius / 30,
            rng: Rng::new(seed),
        };
        light.retint(false);
        light
    }

    /// Reseed the flicker randomness
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn base_radius(&self) -> i32 {
        self.base_radius
    }

    #[inline]
    pub fn color(&self) -> (u8, u8, u8) {
        self.color
    }

    #[inline]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Tinted image at the current radius, `2 * radius` pixels square
    #[inline]
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Resize the light. Negative radii collapse to an empty image.
    pub fn set_size(&mut self, radius: i32) {
        self.radius = radius.max(0);
        let diameter = (self.radius * 2) as u32;
        self.image = self.tinted.scaled(diameter, diameter);
    }

    /// Recolour. With `skip_alpha` the tint ignores alpha, which is cheaper
    /// for colours animated every frame.
    pub fn set_color(&mut self, color: (u8, u8, u8), skip_alpha: bool) {
        self.color = color;
        self.retint(skip_alpha);
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
        self.retint(false);
    }

    fn retint(&mut self, skip_alpha: bool) {
        self.tinted = if skip_alpha {
            self.base_image.multiply_color(self.color)
        } else {
            self.base_image
                .with_mask_alpha(self.alpha)
                .multiply_color(self.color)
        };
        self.set_size(self.radius);
    }

    /// Advance the pulse and flicker animation by one frame
    pub fn update(&mut self) {
        self.timer += 1;
        let pulse = (1.0 + (self.timer as f32 / 10.0).sin()) as i32;
        self.set_size(pulse + self.base_radius + self.variance);

        self.flicker_timer -= 1;
        if self.flicker_timer < 0 {
            self.variance = self.rng.range_i32(-self.variance_size, self.variance_size);
            self.set_size(self.base_radius + self.variance);

            let alpha = (self.alpha as i32 + self.variance).clamp(0, 255);
            self.set_alpha(alpha as u8);

            self.flicker_timer = self.rng.range_i32(FLICKER_MIN_FRAMES, FLICKER_MAX_FRAMES);
        }
    }
}
