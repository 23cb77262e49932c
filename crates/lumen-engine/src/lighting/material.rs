use glam::Vec3;

/// Surface reflectance parameters, constant across a draw.
///
/// Channels are conventionally in `[0, 1]` but are not clamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,

    /// Specular exponent; larger values give a tighter highlight.
    pub shininess: f32,
}

impl Material {
    #[inline]
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Builds a material from an MTL entry, keeping defaults for absent fields.
    pub fn from_mtl(mtl: &tobj::Material) -> Self {
        let d = Self::default();
        Self {
            ambient: mtl.ambient.map(Vec3::from_array).unwrap_or(d.ambient),
            diffuse: mtl.diffuse.map(Vec3::from_array).unwrap_or(d.diffuse),
            specular: mtl.specular.map(Vec3::from_array).unwrap_or(d.specular),
            shininess: mtl.shininess.unwrap_or(d.shininess).max(0.0),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::ONE,
            specular: Vec3::splat(0.5),
            shininess: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mtl_keeps_defaults_for_missing_fields() {
        let mtl = tobj::Material {
            diffuse: Some([0.2, 0.4, 0.6]),
            shininess: Some(-3.0),
            ..Default::default()
        };
        let m = Material::from_mtl(&mtl);
        assert_eq!(m.diffuse, Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(m.ambient, Material::default().ambient);
        assert_eq!(m.specular, Material::default().specular);
        // Negative exponents make no sense for a highlight lobe.
        assert_eq!(m.shininess, 0.0);
    }
}
