//! TOML viewer configuration.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below.
//!
//! ```toml
//! model = "data/cube.obj"
//! clear_color = [0.1, 0.2, 0.3]
//! animate_lights = false
//!
//! [window]
//! title = "lumen"
//! width = 1280
//! height = 720
//! vsync = true
//!
//! [camera]
//! eye = [0.0, 1.0, 2.0]
//! target = [0.0, 0.0, 0.0]
//! fov_y = 0.7
//!
//! [ambient]
//! enabled = true
//! color = [1.0, 1.0, 1.0]
//!
//! [sampler]
//! address_mode = "repeat"   # clamp_to_edge | repeat | mirror_repeat
//! filter = "linear"         # nearest | linear
//!
//! [[lights]]
//! position = [0.0, 2.0, -3.0]
//! color = [1.0, 1.0, 1.0]
//! attenuation = [1.0, 0.0, 0.0]
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use lumen_engine::lighting::{AmbientMode, Attenuation, LightSet, PointLight, SamplerConfig, MAX_LIGHTS};
use lumen_engine::scene::Camera;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// OBJ file to show; the built-in textured cube when absent.
    pub model: Option<PathBuf>,
    pub clear_color: [f32; 3],
    pub animate_lights: bool,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub ambient: AmbientConfig,
    pub sampler: SamplerConfig,
    pub lights: Vec<LightConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: None,
            clear_color: [0.1, 0.2, 0.3],
            animate_lights: false,
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            ambient: AmbientConfig::default(),
            sampler: SamplerConfig::default(),
            lights: vec![LightConfig::default()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 1.0, 2.0],
            target: [0.0, 0.0, 0.0],
            fov_y: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    pub enabled: bool,
    pub color: [f32; 3],
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// (constant, linear, quadratic)
    pub attenuation: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, -3.0],
            color: [1.0, 1.0, 1.0],
            attenuation: [1.0, 0.0, 0.0],
        }
    }
}

impl ViewerConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        if !(self.camera.fov_y > 0.0 && self.camera.fov_y < std::f32::consts::PI) {
            return invalid(format!("camera.fov_y must be in (0, pi), got {}", self.camera.fov_y));
        }
        if Vec3::from(self.camera.eye) == Vec3::from(self.camera.target) {
            return invalid("camera.eye and camera.target must differ".to_string());
        }
        if self.lights.len() > MAX_LIGHTS {
            return invalid(format!(
                "at most {MAX_LIGHTS} lights are supported, got {}",
                self.lights.len()
            ));
        }
        for (i, light) in self.lights.iter().enumerate() {
            if light.color.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return invalid(format!("lights[{i}].color must be finite and non-negative"));
            }
            if light.attenuation.iter().any(|k| !k.is_finite() || *k < 0.0)
                || light.attenuation.iter().all(|k| *k == 0.0)
            {
                return invalid(format!(
                    "lights[{i}].attenuation must be non-negative and not all zero"
                ));
            }
        }
        if self.ambient.color.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return invalid("ambient.color must be finite and non-negative".to_string());
        }
        Ok(())
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::look_at(self.camera.eye.into(), self.camera.target.into());
        camera.fov_y = self.camera.fov_y;
        camera.aspect = aspect;
        camera
    }

    pub fn light_set(&self) -> LightSet {
        self.lights
            .iter()
            .map(|l| {
                let [c, lin, q] = l.attenuation;
                PointLight::new(l.position.into())
                    .with_color(l.color.into())
                    .with_attenuation(Attenuation::new(c, lin, q))
            })
            .collect()
    }

    pub fn ambient_mode(&self) -> AmbientMode {
        if self.ambient.enabled {
            AmbientMode::Enabled {
                light_color: self.ambient.color.into(),
            }
        } else {
            AmbientMode::Disabled
        }
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        self.sampler
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_color.map(f64::from);
        wgpu::Color { r, g, b, a: 1.0 }
    }
}
