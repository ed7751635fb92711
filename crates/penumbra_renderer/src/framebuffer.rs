//! Float RGB image buffers.

use penumbra_core::Color;

/// Row-major RGB float image; row 0 is the bottom of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Wrap existing pixels; `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == (width as usize) * (height as usize)).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn same_shape(&self, other: &FrameBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Flat view with three floats per pixel.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// New buffer of the same shape with `f` applied to every pixel.
    pub fn map(&self, f: impl Fn(Color) -> Color) -> FrameBuffer {
        FrameBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Convert to an 8-bit image, top row first.
    pub fn to_rgb8(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.get(x, self.height - 1 - y);
            image::Rgb([to_byte(c.x), to_byte(c.y), to_byte(c.z)])
        })
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// First-hit surface data handed to a denoiser alongside the color.
#[derive(Debug, Clone, Copy)]
pub struct AuxBuffers<'a> {
    pub albedo: &'a FrameBuffer,
    pub normal: &'a FrameBuffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set(3, 2, Color::new(0.1, 0.2, 0.3));
        assert_eq!(fb.get(3, 2), Color::new(0.1, 0.2, 0.3));
        assert_eq!(fb.pixels()[11], Color::new(0.1, 0.2, 0.3));
        assert_eq!(fb.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_as_floats_is_interleaved() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(1, 0, Color::new(1.0, 2.0, 3.0));
        let floats = fb.as_floats();
        assert_eq!(floats.len(), 12);
        assert_eq!(&floats[3..6], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(FrameBuffer::from_pixels(2, 2, vec![Color::ZERO; 4]).is_some());
        assert!(FrameBuffer::from_pixels(2, 2, vec![Color::ZERO; 3]).is_none());
    }

    #[test]
    fn test_to_rgb8_flips_rows() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(0, 0, Color::ONE);
        fb.set(1, 1, Color::new(2.0, -1.0, 0.5));
        let img = fb.to_rgb8();

        // Bottom-left internally is bottom-left in the image too.
        assert_eq!(img.get_pixel(0, 1).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 128]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_map_and_clear() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.set(1, 0, Color::splat(0.5));
        let doubled = fb.map(|c| c * 2.0);
        assert!(doubled.same_shape(&fb));
        assert_eq!(doubled.get(1, 0), Color::ONE);

        fb.clear();
        assert!(fb.pixels().iter().all(|&c| c == Color::ZERO));
    }
}
