//! Uniform block layouts shared with `shaders/lit_mesh.wgsl`.
//!
//! WGSL aligns `vec3<f32>` to 16 bytes, so every vec3 is followed by a
//! scalar or explicit padding. Sizes are checked in the tests below.

use bytemuck::{Pod, Zeroable};

use crate::lighting::{AmbientMode, LightSet, Material, PointLight, MAX_LIGHTS};
use crate::scene::Camera;

/// Group 0: view-projection matrix and eye position (`w` unused).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl From<&Camera> for CameraUniform {
    fn from(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye().extend(1.0).to_array(),
        }
    }
}

/// Group 2: material parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 3],
    pub _pad0: f32,
    pub diffuse: [f32; 3],
    pub _pad1: f32,
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl From<&Material> for MaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            ambient: m.ambient.to_array(),
            _pad0: 0.0,
            diffuse: m.diffuse.to_array(),
            _pad1: 0.0,
            specular: m.specular.to_array(),
            shininess: m.shininess,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
    /// (constant, linear, quadratic)
    pub attenuation: [f32; 3],
    pub _pad2: f32,
}

impl From<&PointLight> for PointLightUniform {
    fn from(l: &PointLight) -> Self {
        Self {
            position: l.position.to_array(),
            _pad0: 0.0,
            color: l.color.to_array(),
            _pad1: 0.0,
            attenuation: l.attenuation.to_array(),
            _pad2: 0.0,
        }
    }
}

/// Group 3: ambient term and the active point lights.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient_color: [f32; 3],
    /// 0 = ambient disabled.
    pub ambient_enabled: u32,
    pub lights: [PointLightUniform; MAX_LIGHTS],
    pub count: u32,
    pub _pad: [u32; 3],
}

impl LightsUniform {
    pub fn new(lights: &LightSet, ambient: AmbientMode) -> Self {
        let mut out = Self::zeroed();
        for (slot, light) in out.lights.iter_mut().zip(lights) {
            *slot = PointLightUniform::from(light);
        }
        out.count = lights.len().min(MAX_LIGHTS) as u32;
        out.ambient_enabled = ambient.is_enabled() as u32;
        out.ambient_color = ambient.light_color().to_array();
        out
    }
}

/// Minimum binding size for a uniform block of type `T`.
pub(crate) fn min_binding_size<T>() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::Attenuation;
    use glam::Vec3;

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 48);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 224);
    }

    #[test]
    fn shininess_shares_the_specular_slot() {
        let u = MaterialUniform::from(&Material::default());
        let bytes = bytemuck::bytes_of(&u);
        let shininess = f32::from_ne_bytes(bytes[44..48].try_into().expect("4 bytes"));
        assert_eq!(shininess, Material::default().shininess);
    }

    #[test]
    fn lights_uniform_packs_active_lights() {
        let lights: LightSet = [
            PointLight::new(Vec3::new(1.0, 2.0, 3.0)),
            PointLight::new(Vec3::ZERO)
                .with_color(Vec3::new(0.5, 0.25, 1.0))
                .with_attenuation(Attenuation::new(1.0, 0.1, 0.01)),
        ]
        .into_iter()
        .collect();

        let u = LightsUniform::new(&lights, AmbientMode::Disabled);
        assert_eq!(u.count, 2);
        assert_eq!(u.ambient_enabled, 0);
        assert_eq!(u.lights[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(u.lights[1].color, [0.5, 0.25, 1.0]);
        assert_eq!(u.lights[1].attenuation, [1.0, 0.1, 0.01]);
        assert_eq!(u.lights[2], PointLightUniform::zeroed());
    }

    #[test]
    fn lights_uniform_carries_ambient() {
        let u = LightsUniform::new(
            &LightSet::new(),
            AmbientMode::Enabled { light_color: Vec3::new(0.2, 0.3, 0.4) },
        );
        assert_eq!(u.count, 0);
        assert_eq!(u.ambient_enabled, 1);
        assert_eq!(u.ambient_color, [0.2, 0.3, 0.4]);
    }

    #[test]
    fn camera_uniform_carries_eye() {
        let cam = Camera::default();
        let u = CameraUniform::from(&cam);
        let eye = Vec3::from_slice(&u.eye[..3]);
        assert!((eye - Vec3::new(0.0, 1.0, 2.0)).length() < 1e-5);
        assert_eq!(u.eye[3], 1.0);
    }
}
