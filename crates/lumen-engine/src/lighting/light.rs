use glam::Vec3;

/// Maximum number of point lights evaluated per fragment.
///
/// Must match `MAX_LIGHTS` in `lit_mesh.wgsl`.
pub const MAX_LIGHTS: usize = 4;

/// Distance falloff coefficients: `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// No falloff; the factor is always 1.
    pub const NONE: Self = Self {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    #[inline]
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Falloff factor at `distance`.
    ///
    /// The denominator is floored at `1e-4` so coefficients that reach zero do
    /// not produce infinities. The shader applies the same floor.
    #[inline]
    pub fn factor(self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        1.0 / denom.max(1e-4)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.constant, self.linear, self.quadratic]
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::NONE
    }
}

/// A point light. No shadowing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// White light without falloff.
    #[inline]
    pub const fn new(position: Vec3) -> Self {
        Self {
            position,
            color: Vec3::ONE,
            attenuation: Attenuation::NONE,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }
}

/// Ordered list of at most [`MAX_LIGHTS`] point lights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSet {
    lights: Vec<PointLight>,
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-light set.
    pub fn single(light: PointLight) -> Self {
        Self {
            lights: vec![light],
        }
    }

    /// Appends a light. Returns `false` (and drops the light) when the set is full.
    pub fn push(&mut self, light: PointLight) -> bool {
        if self.lights.len() >= MAX_LIGHTS {
            log::warn!("light set is full ({MAX_LIGHTS} lights); ignoring light at {}", light.position);
            return false;
        }
        self.lights.push(light);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PointLight> {
        self.lights.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PointLight> {
        self.lights.iter_mut()
    }
}

impl FromIterator<PointLight> for LightSet {
    /// Collects up to [`MAX_LIGHTS`] lights; extras are dropped with a warning.
    fn from_iter<I: IntoIterator<Item = PointLight>>(iter: I) -> Self {
        let mut set = Self::new();
        for light in iter {
            set.push(light);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LightSet {
    type Item = &'a PointLight;
    type IntoIter = std::slice::Iter<'a, PointLight>;

    fn into_iter(self) -> Self::IntoIter {
        self.lights.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_attenuation_is_unit_factor() {
        assert_eq!(Attenuation::NONE.factor(0.0), 1.0);
        assert_eq!(Attenuation::NONE.factor(1234.0), 1.0);
    }

    #[test]
    fn quadratic_attenuation_falls_off() {
        let a = Attenuation::new(1.0, 0.0, 1.0);
        assert_eq!(a.factor(1.0), 0.5);
        assert_eq!(a.factor(3.0), 0.1);
    }

    #[test]
    fn zero_coefficients_stay_finite() {
        let a = Attenuation::new(0.0, 0.0, 0.0);
        assert!(a.factor(0.0).is_finite());
    }

    #[test]
    fn light_set_rejects_overflow() {
        let mut set = LightSet::new();
        for i in 0..MAX_LIGHTS {
            assert!(set.push(PointLight::new(Vec3::new(i as f32, 0.0, 0.0))));
        }
        assert!(!set.push(PointLight::new(Vec3::ZERO)));
        assert_eq!(set.len(), MAX_LIGHTS);
    }

    #[test]
    fn collect_truncates() {
        let set: LightSet = (0..10).map(|i| PointLight::new(Vec3::splat(i as f32))).collect();
        assert_eq!(set.len(), MAX_LIGHTS);
        assert_eq!(set.iter().last().map(|l| l.position), Some(Vec3::splat(3.0)));
    }
}
