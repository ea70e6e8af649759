use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grove_common::{GroveConfig, ScatterSettings};
use grove_input::{InputState, KeyAction, KeyBindings};
use grove_render::{DebugTextRenderer, FlyCamera, RenderView, Renderer};
use grove_scatter::{DensityProfile, RadialStats, ScatterConstraints};
use grove_scene::Scene;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fixed step used by the scripted preview.
const PREVIEW_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "grove-cli", about = "Headless tools for the grove scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate placement points and print them with radial statistics
    Scatter {
        /// Number of points
        #[arg(short, long, default_value = "150")]
        count: usize,
        /// Inner radius of the ring; nothing spawns closer to the origin
        #[arg(long, default_value = "8")]
        exclusion_radius: f32,
        /// Outer radius of the ring
        #[arg(long, default_value = "60")]
        max_spawn_radius: f32,
        /// Draw budget per point
        #[arg(long, default_value = "10000")]
        max_attempts: u32,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Build the scene and fly the camera forward for a number of frames
    Preview {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Frames to simulate at 60 Hz
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Scatter seed, overriding the config
        #[arg(long)]
        seed: Option<u64>,
        /// List at most this many trees
        #[arg(long, default_value = "20")]
        max_listed: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("grove-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scatter: {}", grove_scatter::crate_info());
            println!("input: {}", grove_input::crate_info());
            println!("render: {}", grove_render::crate_info());
        }
        Commands::Scatter {
            count,
            exclusion_radius,
            max_spawn_radius,
            max_attempts,
            seed,
            json,
        } => {
            let settings = ScatterSettings {
                count,
                exclusion_radius,
                max_spawn_radius,
                max_attempts,
                seed: Some(seed),
                ..ScatterSettings::default()
            };
            print!("{}", scatter_report(&settings, seed, json)?);
        }
        Commands::Preview {
            config,
            frames,
            seed,
            max_listed,
        } => {
            let (mut config, bindings) = match &config {
                Some(path) => (
                    GroveConfig::load(path)
                        .with_context(|| format!("failed to load config {}", path.display()))?,
                    KeyBindings::load(path).with_context(|| {
                        format!("failed to load keybindings from {}", path.display())
                    })?,
                ),
                None => (GroveConfig::default(), KeyBindings::default()),
            };
            if let Some(seed) = seed {
                config.scatter.seed = Some(seed);
            }
            print!("{}", preview(&config, bindings, frames, max_listed)?);
        }
    }

    Ok(())
}

fn scatter_report(settings: &ScatterSettings, seed: u64, json: bool) -> Result<String> {
    let constraints = ScatterConstraints::from(settings);
    let points = grove_scatter::generate_seeded(&constraints, seed)?;
    let stats = RadialStats::from_points(&points, &constraints);

    if json {
        let doc = serde_json::json!({
            "seed": seed,
            "count": constraints.count,
            "exclusion_radius": constraints.exclusion_radius,
            "max_spawn_radius": constraints.max_spawn_radius,
            "points": points,
            "stats": {
                "min_distance": stats.min_distance,
                "max_distance": stats.max_distance,
                "mean_distance": stats.mean_distance,
                "inner_half_fraction": stats.inner_half_fraction,
            },
        });
        return Ok(serde_json::to_string_pretty(&doc)? + "\n");
    }

    let mut out = format!(
        "Scatter: seed={seed}, count={}, ring=[{}, {}]\n",
        constraints.count, constraints.exclusion_radius, constraints.max_spawn_radius
    );
    for (i, p) in points.iter().enumerate() {
        out += &format!(
            "  [{i:>4}] ({:>8.3}, {:>8.3})  r={:.3}\n",
            p.x,
            p.z,
            p.distance_from_origin()
        );
    }
    out += &format!(
        "Stats: min={:.3} max={:.3} mean={:.3} inner-half={:.2}\n",
        stats.min_distance, stats.max_distance, stats.mean_distance, stats.inner_half_fraction
    );
    if let Some(end) = DensityProfile::new(&constraints).end_radius() {
        out += &format!("Density end radius {end} is recorded but does not bias placement\n");
    }
    Ok(out)
}

/// Fly forward through the scene for `frames` steps using the same polled
/// input path as the desktop app, then render the final view as text.
fn preview(
    config: &GroveConfig,
    bindings: KeyBindings,
    frames: u32,
    max_listed: usize,
) -> Result<String> {
    let scene =
        Scene::generate(&config.scatter, &config.scene).context("failed to scatter trees")?;
    let mut camera = FlyCamera::from_settings(&config.camera);
    camera.set_aspect(config.window.width, config.window.height);

    let forward = bindings
        .keys_for(KeyAction::MoveForward)
        .next()
        .map(str::to_owned)
        .context("no key bound to move_forward")?;
    let mut input = InputState::new(bindings);
    input.key_pressed(&forward);
    for _ in 0..frames {
        input.poll().apply(&mut camera, PREVIEW_DT);
    }
    input.key_released(&forward);

    tracing::debug!(
        frames,
        layout_hash = %format!("{:#x}", scene.layout_hash()),
        "preview finished"
    );

    let renderer = DebugTextRenderer::with_max_trees(max_listed);
    let mut out = format!("Preview: {frames} frames holding {forward}\n");
    out += &renderer.render(&scene, &RenderView::from_camera(&camera));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_report_lists_every_point() {
        let settings = ScatterSettings {
            count: 5,
            ..ScatterSettings::default()
        };
        let report = scatter_report(&settings, 3, false).unwrap();
        assert_eq!(report.matches("r=").count(), 5);
        assert!(report.contains("Stats: "));
    }

    #[test]
    fn scatter_json_is_parseable() {
        let settings = ScatterSettings {
            count: 4,
            ..ScatterSettings::default()
        };
        let report = scatter_report(&settings, 3, true).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(doc["points"].as_array().map(Vec::len), Some(4));
        assert_eq!(doc["seed"], 3);
    }

    #[test]
    fn scatter_report_rejects_empty_ring() {
        let settings = ScatterSettings {
            exclusion_radius: 60.0,
            max_spawn_radius: 60.0,
            ..ScatterSettings::default()
        };
        assert!(scatter_report(&settings, 1, false).is_err());
    }

    #[test]
    fn preview_moves_camera_forward() {
        let mut config = GroveConfig::default();
        config.scatter.seed = Some(7);
        config.scatter.count = 10;
        // 60 frames at speed 2.5 along -Z.
        let out = preview(&config, KeyBindings::default(), 60, 3).unwrap();
        assert!(out.starts_with("Preview: 60 frames holding KeyW"));
        assert!(out.contains(", 1.50, -2.50) front="));
        assert!(out.contains("... 7 more"));
    }

    #[test]
    fn preview_needs_forward_binding() {
        let bindings = KeyBindings::from_config_yaml("keybindings: { KeyS: move_backward }\n")
            .unwrap();
        assert!(preview(&GroveConfig::default(), bindings, 1, 1).is_err());
    }
}
