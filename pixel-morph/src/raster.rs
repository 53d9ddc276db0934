use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::{MorphError, MorphResult};

/// Row-major RGBA8 pixel buffer. Alpha is carried but ignored by the morph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    /// Opaque raster filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        let rgba = [r, g, b, 255].repeat(width as usize * height as usize);

        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> MorphResult<Self> {
        let expected = width as usize * height as usize * 4;

        if rgba.len() != expected {
            return Err(MorphError::InvalidBuffer {
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Stretches `img` to `side × side`, ignoring its aspect ratio.
    pub fn from_image(img: &DynamicImage, side: u32) -> Self {
        let rgba = if img.width() == side && img.height() == side {
            img.to_rgba8()
        } else {
            img.resize_exact(side, side, FilterType::Triangle).to_rgba8()
        };

        Self {
            width: side,
            height: side,
            rgba: rgba.into_raw(),
        }
    }

    /// Decodes an encoded image (any format `image` was built with).
    pub fn decode(bytes: &[u8], side: u32) -> MorphResult<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img, side))
    }

    pub fn open(path: impl AsRef<Path>, side: u32) -> MorphResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), side, "loaded image");
        Ok(Self::from_image(&img, side))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Panics if `(x, y)` lies outside the raster.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]]
    }

    /// Writes an opaque pixel. Out-of-bounds writes are dropped.
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }

        let i = self.offset(x, y);
        self.rgba[i..i + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn filled_is_opaque() {
        let raster = Raster::filled(2, 3, [10, 20, 30]);

        assert_eq!(raster.as_rgba().len(), 2 * 3 * 4);
        assert_eq!(raster.rgb(1, 2), [10, 20, 30]);
        assert!(raster.as_rgba().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn from_rgba_rejects_short_buffer() {
        let err = Raster::from_rgba(2, 2, vec![0; 15]).unwrap_err();

        assert!(matches!(
            err,
            MorphError::InvalidBuffer {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn decode_keeps_pixels_at_native_size() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 128]));

        let raster = Raster::decode(&png_bytes(img), 2).unwrap();

        assert_eq!(raster.rgb(1, 0), [255, 0, 0]);
        assert_eq!(raster.rgb(0, 1), [0, 0, 255]);
    }

    #[test]
    fn decode_stretches_to_side() {
        let img = RgbaImage::from_pixel(8, 4, Rgba([40, 80, 120, 255]));
        let raster = Raster::decode(&png_bytes(img), 16).unwrap();

        assert_eq!((raster.width(), raster.height()), (16, 16));
        assert_eq!(raster.rgb(15, 15), [40, 80, 120]);
    }

    #[test]
    fn decode_garbage_is_an_image_error() {
        let err = Raster::decode(b"not an image", 4).unwrap_err();

        assert!(matches!(err, MorphError::Image(_)));
    }

    #[test]
    fn set_rgb_ignores_out_of_bounds() {
        let mut raster = Raster::filled(2, 2, [0, 0, 0]);
        raster.set_rgb(5, 0, [255, 255, 255]);
        raster.set_rgb(1, 1, [255, 255, 255]);

        assert_eq!(raster.rgb(1, 1), [255, 255, 255]);
        assert_eq!(raster.rgb(0, 0), [0, 0, 0]);
    }
}
