use std::path::Path;

use glam::Vec4;

use super::LoadError;

/// CPU-side RGBA8 image used as a diffuse map.
///
/// Rows are stored top to bottom, matching wgpu's texture origin. `srgb`
/// selects how bytes are decoded: sRGB-encoded color (diffuse maps loaded from
/// disk) or linear data.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    srgb: bool,
}

impl TextureImage {
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>, srgb: bool) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::EmptyTexture { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(LoadError::TextureSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            srgb,
        })
    }

    /// Decodes an image file as an sRGB diffuse map.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| LoadError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw(), true)
    }

    /// 1x1 image of a single color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
            srgb: true,
        }
    }

    /// Square checkerboard with `cells` cells per side.
    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
            srgb: true,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// GPU format with the same decoding as [`texel`](Self::texel).
    pub fn wgpu_format(&self) -> wgpu::TextureFormat {
        if self.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    /// Linear RGBA at integer texel coordinates. Out-of-range coordinates are clamped.
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let px = &self.pixels[i..i + 4];

        let unorm = |b: u8| b as f32 / 255.0;
        let color = |b: u8| {
            if self.srgb { srgb_to_linear(unorm(b)) } else { unorm(b) }
        };
        // Alpha is never sRGB-encoded.
        Vec4::new(color(px[0]), color(px[1]), color(px[2]), unorm(px[3]))
    }
}

/// sRGB transfer function inverse (IEC 61966-2-1).
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = TextureImage::from_rgba8(2, 2, vec![0; 15], true).unwrap_err();
        assert!(matches!(err, LoadError::TextureSize { expected: 16, actual: 15 }));
    }

    #[test]
    fn rejects_empty_dimensions() {
        let err = TextureImage::from_rgba8(0, 4, Vec::new(), true).unwrap_err();
        assert!(matches!(err, LoadError::EmptyTexture { width: 0, height: 4 }));
    }

    #[test]
    fn srgb_decoding_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        // Mid-grey 0.5 encodes roughly 21% linear intensity.
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }

    #[test]
    fn texel_decodes_color_but_not_alpha() {
        let img = TextureImage::solid([128, 0, 255, 128]);
        let t = img.texel(0, 0);
        assert!((t.x - srgb_to_linear(128.0 / 255.0)).abs() < 1e-6);
        assert_eq!(t.y, 0.0);
        assert!((t.z - 1.0).abs() < 1e-6);
        assert!((t.w - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn checkerboard_alternates() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let img = TextureImage::checkerboard(4, 2, white, black);
        assert_eq!(img.texel(0, 0).x, 1.0);
        assert_eq!(img.texel(2, 0).x, 0.0);
        assert_eq!(img.texel(2, 2).x, 1.0);
        assert_eq!(img.pixels().len(), 4 * 4 * 4);
    }
}
