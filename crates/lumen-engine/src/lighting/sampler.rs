use glam::{Vec2, Vec4};
use serde::Deserialize;

use crate::scene::TextureImage;

/// Source of the unlit surface color for a fragment.
pub trait DiffuseSource {
    /// Returns linear RGBA at texture coordinate `uv`.
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// Constant color, independent of `uv`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidColor(pub Vec4);

impl DiffuseSource for SolidColor {
    #[inline]
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.0
    }
}

/// Out-of-range texture coordinate policy.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    ClampToEdge,
    #[default]
    Repeat,
    MirrorRepeat,
}

impl AddressMode {
    /// Maps an arbitrary coordinate into `[0, 1]`. Non-finite input maps to
    /// 0, except `+inf` under clamping, which saturates to 1.
    #[inline]
    pub fn wrap(self, t: f32) -> f32 {
        if !t.is_finite() {
            return match self {
                AddressMode::ClampToEdge if t == f32::INFINITY => 1.0,
                _ => 0.0,
            };
        }
        match self {
            AddressMode::ClampToEdge => t.clamp(0.0, 1.0),
            AddressMode::Repeat => t - t.floor(),
            AddressMode::MirrorRepeat => {
                let period = t.rem_euclid(2.0);
                if period > 1.0 { 2.0 - period } else { period }
            }
        }
    }

    /// Integer texel addressing for filtering footprints that spill past the edge.
    fn wrap_texel(self, i: i64, size: u32) -> u32 {
        let n = size as i64;
        let idx = match self {
            AddressMode::ClampToEdge => i.clamp(0, n - 1),
            AddressMode::Repeat => i.rem_euclid(n),
            AddressMode::MirrorRepeat => {
                let p = i.rem_euclid(2 * n);
                if p >= n { 2 * n - 1 - p } else { p }
            }
        };
        idx as u32
    }

    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Texel filtering for magnification and minification.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

impl FilterMode {
    pub fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Sampler state shared by the CPU sampler and the GPU sampler descriptor.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    pub address_mode: AddressMode,
    pub filter: FilterMode,
}

impl SamplerConfig {
    pub fn descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        let address = self.address_mode.to_wgpu();
        let filter = self.filter.to_wgpu();
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: address,
            address_mode_v: address,
            address_mode_w: address,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }
    }
}

/// CPU texture sampling with the same conventions as wgpu: texel centers at
/// half-integer positions, `uv = (0, 0)` at the top-left.
#[derive(Debug, Copy, Clone)]
pub struct ImageSampler<'a> {
    image: &'a TextureImage,
    config: SamplerConfig,
}

impl<'a> ImageSampler<'a> {
    pub fn new(image: &'a TextureImage, config: SamplerConfig) -> Self {
        Self { image, config }
    }

    fn fetch(&self, x: i64, y: i64) -> Vec4 {
        let mode = self.config.address_mode;
        self.image.texel(
            mode.wrap_texel(x, self.image.width()),
            mode.wrap_texel(y, self.image.height()),
        )
    }
}

impl DiffuseSource for ImageSampler<'_> {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let mode = self.config.address_mode;
        let w = self.image.width() as f32;
        let h = self.image.height() as f32;

        match self.config.filter {
            FilterMode::Nearest => {
                let u = mode.wrap(uv.x);
                let v = mode.wrap(uv.y);
                // u == 1.0 lands on the last texel rather than one past it.
                let x = ((u * w) as i64).min(self.image.width() as i64 - 1);
                let y = ((v * h) as i64).min(self.image.height() as i64 - 1);
                self.fetch(x, y)
            }
            FilterMode::Linear => {
                // Wrap first so the footprint stays within one texel of the image.
                let px = mode.wrap(uv.x) * w - 0.5;
                let py = mode.wrap(uv.y) * h - 0.5;
                let x0 = px.floor();
                let y0 = py.floor();
                let fx = px - x0;
                let fy = py - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);

                let top = self.fetch(x0, y0).lerp(self.fetch(x0 + 1, y0), fx);
                let bottom = self.fetch(x0, y0 + 1).lerp(self.fetch(x0 + 1, y0 + 1), fx);
                top.lerp(bottom, fy)
            }
        }
    }
}
