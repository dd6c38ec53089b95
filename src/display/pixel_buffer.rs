use serde::{Deserialize, Serialize};

// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing blend mode for `composite()` / `composite_full()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Plain copy of all four channels
    Overwrite,
    /// dst = min(dst + src, 255) per RGBA channel
    #[default]
    Add,
    /// dst = (dst * src + 255) >> 8 per RGBA channel
    Multiply,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Channel multiply with the `(a * b + 255) >> 8` rounding used for all
/// multiplicative operations (255 * x stays x).
#[inline]
fn mul_channel(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16 + 255) >> 8) as u8
}

/// Write ABGR pixel with custom alpha (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// Light templates, per-light shadow scratch images, the lighting mask and the
/// host's frame are all `PixelBuffer`s.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new, fully transparent black pixel buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Create a buffer from row-major RGBA bytes.
    /// Returns None if the data length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Option<Self> {
        if data.len() != (width * height * 4) as usize {
            return None;
        }
        let mut buffer = Self::with_size(width, height);
        for (dst, src) in buffer.pixels.chunks_exact_mut(4).zip(data.chunks_exact(4)) {
            write_pixel_rgba(dst, src[0], src[1], src[2], src[3]);
        }
        Some(buffer)
    }

    /// Opaque radial falloff image of `size`x`size`: white at the centre,
    /// black at and beyond the inscribed circle. Default light template.
    pub fn radial_gradient(size: u32, falloff: f32) -> Self {
        let mut buffer = Self::with_size(size, size);
        buffer.clear_rgba(0, 0, 0, 255);
        if size == 0 {
            return buffer;
        }

        let radius = size as f32 / 2.0;
        for y in 0..size {
            let dy = y as f32 + 0.5 - radius;
            for x in 0..size {
                let dx = x as f32 + 0.5 - radius;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= radius {
                    continue;
                }
                let v = ((1.0 - dist / radius).powf(falloff) * 255.0) as u8;
                buffer.set_pixel_rgba(x as i32, y as i32, v, v, v, 255);
            }
        }
        buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color with custom alpha
    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel_rgba(chunk, r, g, b, a);
        }
    }

    /// Set a single pixel with custom alpha (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], r, g, b, a);
        }
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Horizontal span, clipped to the buffer
    pub fn hline_rgba(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        for _ in start..=end {
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], r, g, b, a);
            idx += 4;
        }
    }

    /// Draw an opaque line using Bresenham's algorithm with Cohen-Sutherland clipping
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, r: u8, g: u8, b: u8) {
        let Some((cx0, cy0, cx1, cy1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = (cx1 - cx0).abs();
        let dy = -((cy1 - cy0).abs());
        let sx = if cx0 < cx1 { 1i32 } else { -1i32 };
        let sy = if cy0 < cy1 { 1i32 } else { -1i32 };
        let mut err = dx + dy;
        let mut x = cx0;
        let mut y = cy0;

        loop {
            self.set_pixel_rgba(x, y, r, g, b, 255);
            if x == cx1 && y == cy1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cohen-Sutherland line clipping.
    /// Returns the clipped endpoints, or None when nothing is visible.
    fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most 4 iterations for valid input
        const MAX_ITERATIONS: u32 = 16;

        if self.width == 0 || self.height == 0 {
            return None;
        }

        let w = self.width as i64;
        let h = self.height as i64;
        let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);

        let outcode = |x: i64, y: i64| -> u8 {
            let mut code = INSIDE;
            if x < 0 {
                code |= LEFT;
            } else if x >= w {
                code |= RIGHT;
            }
            if y < 0 {
                code |= TOP;
            } else if y >= h {
                code |= BOTTOM;
            }
            code
        };

        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            let dy = y1 - y0;
            let dx = x1 - x0;

            let (x, y) = if (code_out & BOTTOM) != 0 {
                if dy == 0 {
                    return None;
                }
                (x0 + dx * (h - 1 - y0) / dy, h - 1)
            } else if (code_out & TOP) != 0 {
                if dy == 0 {
                    return None;
                }
                (x0 + dx * (0 - y0) / dy, 0)
            } else if (code_out & RIGHT) != 0 {
                if dx == 0 {
                    return None;
                }
                (w - 1, y0 + dy * (w - 1 - x0) / dx)
            } else {
                if dx == 0 {
                    return None;
                }
                (0, y0 + dy * (0 - x0) / dx)
            };

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            }
        }

        None
    }

    /// Fill a polygon using the scanline algorithm (even-odd rule).
    /// Vertices may lie far outside the buffer; spans are clipped per row.
    pub fn fill_polygon_rgba(&mut self, vertices: &[(f32, f32)], r: u8, g: u8, b: u8, a: u8) {
        if vertices.len() < 3 || self.height == 0 {
            return;
        }

        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (_, y) in vertices {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }

        let min_y = (min_y.floor() as i32).max(0);
        let max_y = (max_y.ceil() as i32).min(self.height as i32 - 1);

        // Reused per scanline
        let mut intersections: Vec<f32> = Vec::with_capacity(vertices.len());
        let n = vertices.len();

        for y in min_y..=max_y {
            intersections.clear();
            let yf = y as f32 + 0.5;

            for i in 0..n {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];

                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    intersections.push(x1 + (yf - y1) / (y2 - y1) * (x2 - x1));
                }
            }

            intersections.sort_unstable_by(f32::total_cmp);
            for pair in intersections.chunks_exact(2) {
                // Pixel centres inside [left, right)
                let start = (pair[0] - 0.5).ceil() as i32;
                let end = (pair[1] - 0.5).ceil() as i32 - 1;
                if start <= end {
                    self.hline_rgba(start, end, y, r, g, b, a);
                }
            }
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Composite a source buffer onto this one at (dst_x, dst_y).
    /// Source pixels falling outside this buffer are clipped.
    pub fn composite(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32, mode: BlendMode) {
        let src_w = src.width() as i32;
        let src_h = src.height() as i32;
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for sy in 0..src_h {
            let dy = dst_y + sy;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            for sx in 0..src_w {
                let dx = dst_x + sx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }

                let si = src.pixel_index(sx as u32, sy as u32);
                let di = self.pixel_index(dx as u32, dy as u32);
                let s = &src.pixels[si..si + 4];
                let d = &mut self.pixels[di..di + 4];

                match mode {
                    BlendMode::Overwrite => d.copy_from_slice(s),
                    BlendMode::Add => {
                        for (dc, sc) in d.iter_mut().zip(s) {
                            *dc = dc.saturating_add(*sc);
                        }
                    },
                    BlendMode::Multiply => {
                        for (dc, sc) in d.iter_mut().zip(s) {
                            *dc = mul_channel(*dc, *sc);
                        }
                    },
                }
            }
        }
    }

    /// Convenience: composite at (0, 0)
    pub fn composite_full(&mut self, src: &PixelBuffer, mode: BlendMode) {
        self.composite(src, 0, 0, mode);
    }

    /// Copy with every colour channel multiplied by `color`; alpha untouched
    pub fn multiply_color(&self, color: (u8, u8, u8)) -> PixelBuffer {
        let mut out = self.clone();
        for chunk in out.pixels.chunks_exact_mut(4) {
            chunk[1] = mul_channel(chunk[1], color.2);
            chunk[2] = mul_channel(chunk[2], color.1);
            chunk[3] = mul_channel(chunk[3], color.0);
        }
        out
    }

    /// Copy scaled in brightness by `alpha` (a uniform grey multiply)
    pub fn with_mask_alpha(&self, alpha: u8) -> PixelBuffer {
        self.multiply_color((alpha, alpha, alpha))
    }

    /// Nearest-neighbour rescale to `width`x`height`
    pub fn scaled(&self, width: u32, height: u32) -> PixelBuffer {
        let mut out = PixelBuffer::with_size(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }

        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                let si = self.pixel_index(sx, sy);
                let di = out.pixel_index(x, y);
                out.pixels[di..di + 4].copy_from_slice(&self.pixels[si..si + 4]);
            }
        }
        out
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clamps_each_channel() {
        let mut dst = PixelBuffer::with_size(1, 1);
        dst.set_pixel_rgba(0, 0, 200, 10, 0, 255);
        let mut src = PixelBuffer::with_size(1, 1);
        src.set_pixel_rgba(0, 0, 100, 20, 0, 255);

        dst.composite_full(&src, BlendMode::Add);
        assert_eq!(dst.get_pixel_rgba(0, 0), Some((255, 30, 0, 255)));
    }

    #[test]
    fn test_multiply_darkens() {
        let mut dst = PixelBuffer::with_size(1, 1);
        dst.set_pixel_rgba(0, 0, 200, 200, 200, 255);
        let mut src = PixelBuffer::with_size(1, 1);
        src.set_pixel_rgba(0, 0, 255, 128, 0, 255);

        dst.composite_full(&src, BlendMode::Multiply);
        assert_eq!(dst.get_pixel_rgba(0, 0), Some((200, 100, 0, 255)));
    }

    #[test]
    fn test_composite_clips_negative_offsets() {
        let mut dst = PixelBuffer::with_size(4, 4);
        let mut src = PixelBuffer::with_size(4, 4);
        src.clear_rgba(9, 9, 9, 255);

        dst.composite(&src, -2, -2, BlendMode::Overwrite);
        assert_eq!(dst.get_pixel_rgba(1, 1), Some((9, 9, 9, 255)));
        assert_eq!(dst.get_pixel_rgba(2, 2), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_fill_polygon_covers_interior_only() {
        let mut buf = PixelBuffer::with_size(10, 10);
        buf.fill_polygon_rgba(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], 255, 0, 0, 255);

        assert_eq!(buf.get_pixel_rgba(2, 2), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(5, 5), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(6, 6), Some((0, 0, 0, 0)));
        assert_eq!(buf.get_pixel_rgba(1, 3), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_fill_polygon_far_outside_vertices() {
        let mut buf = PixelBuffer::with_size(8, 8);
        buf.fill_polygon_rgba(
            &[(-1.0e6, -1.0e6), (1.0e6, -1.0e6), (1.0e6, 1.0e6), (-1.0e6, 1.0e6)],
            1,
            2,
            3,
            255,
        );
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((1, 2, 3, 255)));
        assert_eq!(buf.get_pixel_rgba(7, 7), Some((1, 2, 3, 255)));
    }

    #[test]
    fn test_multiply_color_keeps_alpha() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.set_pixel_rgba(0, 0, 255, 255, 255, 77);
        let tinted = buf.multiply_color((255, 128, 0));
        assert_eq!(tinted.get_pixel_rgba(0, 0), Some((255, 128, 0, 77)));
    }

    #[test]
    fn test_scaled_nearest_neighbour() {
        let mut buf = PixelBuffer::with_size(2, 1);
        buf.set_pixel_rgba(0, 0, 10, 0, 0, 255);
        buf.set_pixel_rgba(1, 0, 20, 0, 0, 255);

        let big = buf.scaled(4, 2);
        assert_eq!(big.width(), 4);
        assert_eq!(big.get_pixel_rgba(1, 1), Some((10, 0, 0, 255)));
        assert_eq!(big.get_pixel_rgba(2, 0), Some((20, 0, 0, 255)));
    }

    #[test]
    fn test_radial_gradient_centre_bright_corner_dark() {
        let img = PixelBuffer::radial_gradient(32, 1.0);
        let (r, _, _, a) = img.get_pixel_rgba(16, 16).unwrap_or_default();
        assert!(r > 200);
        assert_eq!(a, 255);
        assert_eq!(img.get_pixel_rgba(0, 0), Some((0, 0, 0, 255)));
    }

    #[test]
    fn test_line_is_clipped() {
        let mut buf = PixelBuffer::with_size(5, 5);
        buf.line(-10, 2, 10, 2, 255, 255, 255);
        for x in 0..5 {
            assert_eq!(buf.get_pixel_rgba(x, 2), Some((255, 255, 255, 255)));
        }
    }

    #[test]
    fn test_from_rgba_reads_row_major_rgba() {
        let data = [
            255, 0, 0, 255, 0, 255, 0, 128, //
            0, 0, 255, 0, 10, 20, 30, 40,
        ];
        let buf = PixelBuffer::from_rgba(2, 2, &data).unwrap();
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(1, 0), Some((0, 255, 0, 128)));
        assert_eq!(buf.get_pixel_rgba(0, 1), Some((0, 0, 255, 0)));
        assert_eq!(buf.get_pixel_rgba(1, 1), Some((10, 20, 30, 40)));

        assert!(PixelBuffer::from_rgba(2, 2, &data[..12]).is_none());
    }
}
