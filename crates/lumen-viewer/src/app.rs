use glam::{Quat, Vec2};

use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::input::{InputFrame, InputState, Key, MouseButton};
use lumen_engine::lighting::{AmbientMode, LightSet};
use lumen_engine::render::{LitFrame, LitMeshRenderer};
use lumen_engine::scene::{Camera, Model};

use crate::config::ViewerConfig;

/// Radians of orbit per logical pixel dragged.
const ORBIT_SPEED: f32 = 0.01;
/// World units per wheel line.
const ZOOM_STEP: f32 = 0.25;
/// Light animation speed, radians per second.
const LIGHT_SPEED: f32 = 0.8;

/// Applies mouse orbit and wheel zoom to `camera`.
///
/// Returns `true` when the camera moved.
pub fn apply_camera_input(camera: &mut Camera, input: &InputState, frame: &InputFrame) -> bool {
    let mut moved = false;

    if input.button_down(MouseButton::Left) && frame.pointer_delta != Vec2::ZERO {
        let d = frame.pointer_delta * ORBIT_SPEED;
        // Dragging right swings the eye left around the target.
        camera.orbit(-d.x, d.y);
        moved = true;
    }

    if frame.wheel_delta != 0.0 {
        camera.zoom(frame.wheel_delta * ZOOM_STEP);
        moved = true;
    }

    moved
}

/// `base` rotated about the world Y axis by `angle` radians.
pub fn orbit_lights(base: &LightSet, angle: f32) -> LightSet {
    let rot = Quat::from_rotation_y(angle);
    let mut out = base.clone();
    for light in out.iter_mut() {
        light.position = rot * light.position;
    }
    out
}

pub struct ViewerApp {
    config: ViewerConfig,
    renderer: LitMeshRenderer,
    /// Held until the first frame uploads it.
    pending_model: Option<Model>,

    camera: Camera,
    base_lights: LightSet,
    lights: LightSet,
    ambient: AmbientMode,

    animate_lights: bool,
    light_angle: f32,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig, model: Model) -> Self {
        let aspect = config.window.width as f32 / config.window.height as f32;
        let base_lights = config.light_set();
        Self {
            camera: config.camera(aspect),
            lights: base_lights.clone(),
            base_lights,
            ambient: config.ambient_mode(),
            animate_lights: config.animate_lights,
            light_angle: 0.0,
            renderer: LitMeshRenderer::new(),
            pending_model: Some(model),
            config,
        }
    }

    fn handle_keys(&mut self, frame: &InputFrame) {
        if frame.key_pressed(Key::R) {
            self.camera = self.config.camera(self.camera.aspect);
            log::info!("camera reset");
        }

        if frame.key_pressed(Key::Space) {
            self.animate_lights = !self.animate_lights;
            log::info!("light animation {}", if self.animate_lights { "on" } else { "off" });
        }

        if frame.key_pressed(Key::A) {
            self.ambient = match self.ambient {
                AmbientMode::Enabled { .. } => AmbientMode::Disabled,
                AmbientMode::Disabled => AmbientMode::Enabled {
                    light_color: self.config.ambient.color.into(),
                },
            };
            log::info!("ambient {:?}", self.ambient);
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            log::info!("escape pressed, exiting");
            return AppControl::Exit;
        }

        self.handle_keys(ctx.input_frame);
        apply_camera_input(&mut self.camera, ctx.input, ctx.input_frame);

        let size = ctx.gpu.size();
        self.camera.set_aspect(size.width, size.height);

        if self.animate_lights {
            self.light_angle = (self.light_angle + ctx.time.dt * LIGHT_SPEED) % std::f32::consts::TAU;
            self.lights = orbit_lights(&self.base_lights, self.light_angle);
        }

        let renderer = &mut self.renderer;
        let pending = &mut self.pending_model;
        let frame = LitFrame {
            camera: &self.camera,
            lights: &self.lights,
            ambient: self.ambient,
        };
        let mut upload_error = None;

        let control = ctx.render(self.config.clear_color(), |rctx, target| {
            if let Some(model) = pending.take() {
                if let Err(e) = renderer.upload(rctx, &model) {
                    upload_error = Some(e);
                    return;
                }
            }
            renderer.render(rctx, target, &frame);
        });

        if let Some(e) = upload_error {
            log::error!("failed to upload model: {e:#}");
            return AppControl::Exit;
        }
        control
    }
}
