//! Lumen viewer - shows an OBJ model lit with Blinn-Phong shading.
//!
//! Usage:
//!   lumen-viewer [--config <viewer.toml>] [--model <model.obj>] [--log <filter>]

mod app;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::scene::Model;
use lumen_engine::window::{Runtime, RuntimeConfig};

use crate::app::ViewerApp;
use crate::config::ViewerConfig;

#[derive(Parser)]
#[command(name = "lumen-viewer")]
#[command(about = "Blinn-Phong model viewer")]
struct Args {
    /// Path to a TOML viewer config
    #[arg(long)]
    config: Option<PathBuf>,

    /// OBJ model to show (overrides `model` from the config)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load viewer config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(model) = args.model {
        config.model = Some(model);
    }

    let mut model = match &config.model {
        Some(path) => Model::load_obj(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => {
            log::info!("no model given, showing the built-in cube");
            Model::fallback()
        }
    };
    let sampler = config.sampler_config();
    for material in &mut model.materials {
        material.sampler = sampler;
    }

    log::info!(
        "loaded {} meshes ({} triangles), {} materials",
        model.meshes.len(),
        model.meshes.iter().map(|m| m.triangle_count()).sum::<usize>(),
        model.materials.len()
    );
    log::info!("controls: left-drag orbit, wheel zoom, R reset camera, Space animate lights, A toggle ambient, Esc quit");

    let runtime_config = RuntimeConfig {
        title: config.window.title.clone(),
        initial_size: LogicalSize::new(config.window.width as f64, config.window.height as f64),
    };
    let gpu_init = GpuInit {
        present_mode: if config.window.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        },
        ..Default::default()
    };

    Runtime::run(runtime_config, gpu_init, ViewerApp::new(config, model))
}
