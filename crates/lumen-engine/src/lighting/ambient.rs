use glam::Vec3;

use super::Material;

/// How the material's ambient color participates in shading.
///
/// `Disabled` leaves the ambient field unused, which reproduces the plain
/// diffuse + specular formula. `Enabled` adds `material.ambient * light_color`
/// to the lit sum before it is modulated by the texture color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum AmbientMode {
    #[default]
    Disabled,
    Enabled { light_color: Vec3 },
}

impl AmbientMode {
    /// Ambient contribution for `material` (zero when disabled).
    #[inline]
    pub fn term(self, material: &Material) -> Vec3 {
        match self {
            AmbientMode::Disabled => Vec3::ZERO,
            AmbientMode::Enabled { light_color } => material.ambient * light_color,
        }
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        matches!(self, AmbientMode::Enabled { .. })
    }

    /// Ambient light color, or black when disabled.
    #[inline]
    pub fn light_color(self) -> Vec3 {
        match self {
            AmbientMode::Disabled => Vec3::ZERO,
            AmbientMode::Enabled { light_color } => light_color,
        }
    }
}
