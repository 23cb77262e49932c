use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use super::{AmbientMode, DiffuseSource, LightSet, Material};

/// Interpolated per-fragment attributes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    /// World-space surface point.
    pub position: Vec3,
    /// Surface normal; need not be unit length.
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Fragment {
    #[inline]
    pub const fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Diffuse and specular terms for one light.
///
/// `n`, `li` and `v` must already be normalized. Negative cosines are clamped
/// to zero, so back-facing light contributes nothing. A zero cosine gives no
/// highlight even at shininess 0, where `powf` would return 1.
#[inline]
pub fn blinn_phong_terms(n: Vec3, li: Vec3, v: Vec3, material: &Material) -> (Vec3, Vec3) {
    let h = (li + v).normalize();
    let diffuse = material.diffuse * li.dot(n).max(0.0);
    let n_dot_h = n.dot(h).max(0.0);
    let highlight = if n_dot_h > 0.0 { n_dot_h.powf(material.shininess) } else { 0.0 };
    (diffuse, material.specular * highlight)
}

/// Blinn-Phong evaluator bound to one draw's uniforms.
///
/// A zero-length normal, a light coincident with the surface point, or a light
/// direction opposite the view direction normalizes a zero vector. On the CPU
/// the resulting NaN is discarded by `f32::max` and the light contributes
/// nothing; on the GPU the result is undefined. Callers avoid those
/// configurations.
#[derive(Debug, Copy, Clone)]
pub struct BlinnPhong<'a> {
    material: &'a Material,
    lights: &'a LightSet,
    eye: Vec3,
    ambient: AmbientMode,
}

impl<'a> BlinnPhong<'a> {
    pub fn new(material: &'a Material, lights: &'a LightSet, eye: Vec3) -> Self {
        Self {
            material,
            lights,
            eye,
            ambient: AmbientMode::Disabled,
        }
    }

    pub fn with_ambient(mut self, ambient: AmbientMode) -> Self {
        self.ambient = ambient;
        self
    }

    /// Shades `fragment`, sampling its base color from `source`.
    pub fn shade<S>(&self, fragment: &Fragment, source: &S) -> Vec4
    where
        S: DiffuseSource + ?Sized,
    {
        self.shade_color(fragment, source.sample(fragment.tex_coord))
    }

    /// Shades `fragment` with an already-sampled base color.
    ///
    /// Output alpha is `obj_color.w`, untouched by lighting.
    pub fn shade_color(&self, fragment: &Fragment, obj_color: Vec4) -> Vec4 {
        let n = fragment.normal.normalize();
        let v = (self.eye - fragment.position).normalize();

        let mut lit = Vec3::ZERO;
        for light in self.lights {
            let to_light = light.position - fragment.position;
            let li = to_light.normalize();
            let (diffuse, specular) = blinn_phong_terms(n, li, v, self.material);
            lit += (diffuse + specular) * light.color * light.attenuation.factor(to_light.length());
        }
        lit += self.ambient.term(self.material);

        (lit * obj_color.xyz()).extend(obj_color.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{
        AddressMode, Attenuation, FilterMode, ImageSampler, PointLight, SamplerConfig, SolidColor,
    };
    use crate::scene::{srgb_to_linear, TextureImage};

    /// Camera eye used by the default viewer camera.
    const EYE: Vec3 = Vec3::new(0.0, 1.0, 2.0);

    fn approx_v4(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    fn red_matte() -> Material {
        Material::new(Vec3::ZERO, Vec3::X, Vec3::ZERO, 32.0)
    }

    fn up_fragment() -> Fragment {
        Fragment::new(Vec3::ZERO, Vec3::Y, Vec2::new(0.5, 0.5))
    }

    // ── contract scenarios ────────────────────────────────────────────────

    #[test]
    fn overhead_light_on_red_matte_is_pure_red() {
        let material = red_matte();
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 5.0, 0.0)));
        let out = BlinnPhong::new(&material, &lights, EYE).shade(&up_fragment(), &SolidColor(Vec4::ONE));
        assert!(approx_v4(out, Vec4::new(1.0, 0.0, 0.0, 1.0)), "{out}");
    }

    #[test]
    fn light_behind_surface_renders_black() {
        let material = Material::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, 8.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, -5.0, 0.0)));
        // Eye also below the surface so the halfway vector faces away from n.
        let eye = Vec3::new(0.0, -3.0, 0.1);
        let out = BlinnPhong::new(&material, &lights, eye).shade(&up_fragment(), &SolidColor(Vec4::ONE));
        assert!(approx_v4(out, Vec4::new(0.0, 0.0, 0.0, 1.0)), "{out}");
    }

    #[test]
    fn shade_samples_srgb_texture() {
        // Left texel black, right texel sRGB grey with half alpha.
        let image = TextureImage::from_rgba8(2, 1, vec![0, 0, 0, 255, 188, 188, 188, 128], true)
            .expect("valid image");
        let sampler = ImageSampler::new(
            &image,
            SamplerConfig {
                address_mode: AddressMode::ClampToEdge,
                filter: FilterMode::Nearest,
            },
        );
        let material = red_matte();
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 5.0, 0.0)));
        let shader = BlinnPhong::new(&material, &lights, EYE);

        let at = |u: f32| Fragment::new(Vec3::ZERO, Vec3::Y, Vec2::new(u, 0.5));

        let dark = shader.shade(&at(0.25), &sampler);
        assert_eq!(dark, Vec4::new(0.0, 0.0, 0.0, 1.0));

        let lit = shader.shade(&at(0.75), &sampler);
        let grey = srgb_to_linear(188.0 / 255.0);
        assert!(approx_v4(lit, Vec4::new(grey, 0.0, 0.0, 128.0 / 255.0)), "{lit}");
    }

    #[test]
    fn zero_shininess_back_light_stays_black() {
        // Ns clamped to 0 from an MTL file must not turn into a full highlight.
        let material = Material::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE, 0.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, -5.0, 0.0)));
        let eye = Vec3::new(0.0, -3.0, 0.1);
        let out = BlinnPhong::new(&material, &lights, eye).shade_color(&up_fragment(), Vec4::ONE);
        assert!(approx_v4(out, Vec4::new(0.0, 0.0, 0.0, 1.0)), "{out}");
    }

    #[test]
    fn zero_shininess_front_light_is_flat_specular() {
        let material = Material::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0), 0.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 5.0, 0.0)));
        let out = BlinnPhong::new(&material, &lights, EYE).shade_color(&up_fragment(), Vec4::ONE);
        assert!(approx_v4(out, Vec4::new(0.0, 0.5, 0.0, 1.0)), "{out}");
    }

    #[test]
    fn alpha_passes_through() {
        let material = Material::new(Vec3::ONE, Vec3::new(0.3, 0.9, 0.1), Vec3::ONE, 4.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(1.0, 4.0, -2.0)));
        let shader = BlinnPhong::new(&material, &lights, EYE);
        for alpha in [0.0, 0.5, 1.0] {
            let out = shader.shade_color(&up_fragment(), Vec4::new(0.7, 0.2, 0.4, alpha));
            assert_eq!(out.w, alpha);
        }
    }

    #[test]
    fn higher_shininess_shrinks_highlight() {
        let lights = LightSet::single(PointLight::new(Vec3::new(3.0, 2.0, 0.0)));
        let fragment = up_fragment();
        let specular_only = |shininess: f32| {
            let m = Material::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE, shininess);
            BlinnPhong::new(&m, &lights, EYE).shade_color(&fragment, Vec4::ONE).x
        };

        let low = specular_only(2.0);
        let mid = specular_only(16.0);
        let high = specular_only(64.0);
        assert!(low > 0.0 && low < 1.0);
        assert!(low > mid);
        assert!(mid > high);
    }

    #[test]
    fn black_texture_yields_black() {
        let material = Material::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, 1.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 2.0, 1.0)));
        let out = BlinnPhong::new(&material, &lights, EYE)
            .with_ambient(AmbientMode::Enabled { light_color: Vec3::ONE })
            .shade_color(&up_fragment(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(out, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn normal_length_does_not_matter() {
        let material = Material::new(Vec3::ZERO, Vec3::new(0.8, 0.6, 0.4), Vec3::splat(0.5), 12.0);
        let lights = LightSet::single(PointLight::new(Vec3::new(1.0, 3.0, 2.0)));
        let shader = BlinnPhong::new(&material, &lights, EYE);

        let dir = Vec3::new(0.2, 1.0, 0.3).normalize();
        let unit = Fragment::new(Vec3::new(0.1, 0.0, -0.2), dir, Vec2::ZERO);
        let long = Fragment { normal: dir * 5.0, ..unit };

        let a = shader.shade_color(&unit, Vec4::ONE);
        let b = shader.shade_color(&long, Vec4::ONE);
        assert!(approx_v4(a, b), "{a} vs {b}");
    }

    #[test]
    fn zero_normal_contributes_nothing() {
        let material = red_matte();
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 5.0, 0.0)));
        let fragment = Fragment::new(Vec3::ZERO, Vec3::ZERO, Vec2::ZERO);
        let out = BlinnPhong::new(&material, &lights, EYE).shade_color(&fragment, Vec4::ONE);
        assert_eq!(out, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    // ── light list, color, attenuation ────────────────────────────────────

    #[test]
    fn identical_lights_accumulate() {
        let material = Material::new(Vec3::ZERO, Vec3::splat(0.25), Vec3::ZERO, 1.0);
        let light = PointLight::new(Vec3::new(0.0, 5.0, 0.0));
        let one = LightSet::single(light);
        let two: LightSet = [light, light].into_iter().collect();

        let a = BlinnPhong::new(&material, &one, EYE).shade_color(&up_fragment(), Vec4::ONE);
        let b = BlinnPhong::new(&material, &two, EYE).shade_color(&up_fragment(), Vec4::ONE);
        assert!(approx_v4(b.truncate().extend(0.0), (a.truncate() * 2.0).extend(0.0)));
    }

    #[test]
    fn attenuation_scales_contribution() {
        let material = red_matte();
        let near = PointLight::new(Vec3::new(0.0, 2.0, 0.0));
        let faded = near.with_attenuation(Attenuation::new(1.0, 0.0, 1.0));

        let full = BlinnPhong::new(&material, &LightSet::single(near), EYE).shade_color(&up_fragment(), Vec4::ONE);
        let dim = BlinnPhong::new(&material, &LightSet::single(faded), EYE).shade_color(&up_fragment(), Vec4::ONE);
        // d = 2 → factor 1 / (1 + 4).
        assert!((dim.x - full.x / 5.0).abs() < 1e-6);
    }

    #[test]
    fn light_color_filters_channels() {
        let material = Material::new(Vec3::ZERO, Vec3::ONE, Vec3::ZERO, 1.0);
        let light = PointLight::new(Vec3::new(0.0, 5.0, 0.0)).with_color(Vec3::new(0.0, 1.0, 0.5));
        let lights = LightSet::single(light);
        let out = BlinnPhong::new(&material, &lights, EYE).shade_color(&up_fragment(), Vec4::ONE);
        assert!(approx_v4(out, Vec4::new(0.0, 1.0, 0.5, 1.0)), "{out}");
    }

    #[test]
    fn no_lights_is_black_unless_ambient() {
        let material = Material::new(Vec3::new(0.2, 0.4, 0.6), Vec3::ONE, Vec3::ONE, 1.0);
        let lights = LightSet::new();
        let tex = Vec4::new(0.5, 0.5, 1.0, 1.0);

        let dark = BlinnPhong::new(&material, &lights, EYE).shade_color(&up_fragment(), tex);
        assert_eq!(dark, Vec4::new(0.0, 0.0, 0.0, 1.0));

        let lit = BlinnPhong::new(&material, &lights, EYE)
            .with_ambient(AmbientMode::Enabled { light_color: Vec3::new(1.0, 0.5, 1.0) })
            .shade_color(&up_fragment(), tex);
        assert!(approx_v4(lit, Vec4::new(0.1, 0.1, 0.6, 1.0)), "{lit}");
    }

    #[test]
    fn disabled_ambient_ignores_material_ambient() {
        let lights = LightSet::single(PointLight::new(Vec3::new(0.0, 5.0, 0.0)));
        let base = red_matte();
        let glowing = Material { ambient: Vec3::ONE, ..base };

        let a = BlinnPhong::new(&base, &lights, EYE).shade_color(&up_fragment(), Vec4::ONE);
        let b = BlinnPhong::new(&glowing, &lights, EYE).shade_color(&up_fragment(), Vec4::ONE);
        assert_eq!(a, b);
    }

    #[test]
    fn terms_match_hand_computation() {
        let material = Material::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE, 2.0);
        let n = Vec3::Y;
        let li = Vec3::new(1.0, 1.0, 0.0).normalize();
        let v = Vec3::Y;
        let (d, s) = blinn_phong_terms(n, li, v, &material);

        let cos_l = std::f32::consts::FRAC_1_SQRT_2;
        let h = (li + v).normalize();
        assert!((d.x - cos_l).abs() < 1e-6);
        assert!((s.x - h.y * h.y).abs() < 1e-6);
    }
}
