pub mod decode;

pub use decode::{decode_bytes, load};

use image::{DynamicImage, Rgb, RgbImage};

/// Bounding rectangle of a [`SourceImage`] inside its pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Immutable RGB pixel grid handed to the render pipeline.
///
/// Pixels are addressed relative to the bounding rectangle, so a view onto
/// part of a larger buffer behaves exactly like a standalone image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbImage,
    bounds: Bounds,
}

impl SourceImage {
    /// Wrap a whole RGB buffer.
    pub fn from_rgb(pixels: RgbImage) -> Self {
        let bounds = Bounds {
            x: 0,
            y: 0,
            width: pixels.width(),
            height: pixels.height(),
        };
        SourceImage { pixels, bounds }
    }

    /// Flatten a decoded image to RGB, compositing any alpha over black.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = RgbImage::from_fn(width, height, |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            Rgb([premultiply(r, a), premultiply(g, a), premultiply(b, a)])
        });
        Self::from_rgb(pixels)
    }

    /// Restrict the image to a sub-rectangle of its buffer.
    ///
    /// Returns `None` if the rectangle does not lie within the buffer.
    pub fn with_bounds(pixels: RgbImage, bounds: Bounds) -> Option<Self> {
        let right = bounds.x.checked_add(bounds.width)?;
        let bottom = bounds.y.checked_add(bounds.height)?;
        if right > pixels.width() || bottom > pixels.height() {
            return None;
        }
        Some(SourceImage { pixels, bounds })
    }

    pub fn width(&self) -> u32 {
        self.bounds.width
    }

    pub fn height(&self) -> u32 {
        self.bounds.height
    }

    /// Pixel at `(x, y)` relative to the bounds, or `None` outside them.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        Some(*self.pixels.get_pixel(self.bounds.x + x, self.bounds.y + y))
    }
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    (channel as u16 * alpha as u16 / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_pixel_addressing_respects_bounds() {
        let buffer = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]));
        let bounds = Bounds {
            x: 1,
            y: 2,
            width: 2,
            height: 2,
        };
        let image = SourceImage::with_bounds(buffer, bounds).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixel(0, 0), Some(Rgb([1, 2, 0])));
        assert_eq!(image.pixel(1, 1), Some(Rgb([2, 3, 0])));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn test_bounds_outside_buffer_rejected() {
        let buffer = RgbImage::new(4, 4);
        let bounds = Bounds {
            x: 3,
            y: 0,
            width: 2,
            height: 1,
        };
        assert!(SourceImage::with_bounds(buffer, bounds).is_none());
    }

    #[test]
    fn test_alpha_composited_over_black() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
        rgba.put_pixel(1, 0, Rgba([200, 100, 50, 0]));

        let image = SourceImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(image.pixel(0, 0), Some(Rgb([200, 100, 50])));
        assert_eq!(image.pixel(1, 0), Some(Rgb([0, 0, 0])));
    }
}
