use anyhow::{bail, Context};
use clap::Parser;
use scene_core::{Density, DrawList, Scene, SceneConfig, SceneKind};
use std::path::PathBuf;
use std::time::Duration;

/// Run a scene for a fixed number of steps against a recording canvas.
#[derive(Parser, Debug)]
#[command(name = "scene-headless", version)]
struct Args {
    /// Scene to run (matrix, security, dataflow, pipeline, starfield, identity).
    #[arg(long, value_parser = parse_kind)]
    scene: Option<SceneKind>,

    /// Number of fixed steps.
    #[arg(long, default_value_t = 1000)]
    frames: u64,

    /// Step size in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,

    /// Population cap.
    #[arg(long = "particle-count")]
    particle_count: Option<usize>,

    /// Density tier (low, high).
    #[arg(long, value_parser = parse_density)]
    density: Option<Density>,

    /// Scene config JSON; flags above override its keys.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    #[arg(long)]
    seed: Option<u64>,
}

fn parse_kind(s: &str) -> Result<SceneKind, String> {
    SceneKind::from_name(&s.to_ascii_lowercase()).ok_or_else(|| format!("unknown scene {s:?}"))
}

fn parse_density(s: &str) -> Result<Density, String> {
    match s.to_ascii_lowercase().as_str() {
        "low" => Ok(Density::Low),
        "high" => Ok(Density::High),
        _ => Err(format!("unknown density {s:?}")),
    }
}

fn load_config(args: &Args) -> anyhow::Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            SceneConfig::from_json(&json).with_context(|| format!("parse {}", path.display()))?
        }
        None => SceneConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.scene = scene;
    }
    if let Some(n) = args.particle_count {
        config.particle_count = n;
    }
    if let Some(density) = args.density {
        config.density = density;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let cap = config.particle_count;
    let mut scene = Scene::new(config, args.width, args.height, 1.0)?;
    let dt = Duration::from_millis(args.dt_ms);
    let mut canvas = DrawList::new();
    let mut peak = 0usize;
    let mut draw_calls = 0usize;

    for frame in 0..args.frames {
        scene.step(dt);
        canvas.clear_commands();
        scene.render(&mut canvas);
        draw_calls += canvas.len();
        let live = scene.pool().len();
        peak = peak.max(live);
        if live > cap {
            bail!("frame {frame}: population {live} exceeds cap {cap}");
        }
        if scene.pool().iter().any(|e| !e.position.is_finite()) || !canvas.all_finite() {
            bail!("frame {frame}: non-finite coordinates");
        }
        if frame % 100 == 0 {
            log::debug!("[headless] frame {frame}: {live} live, {} draw calls", canvas.len());
        }
    }

    let stats = scene.stats();
    log::info!(
        "[headless] {} x{} @{}ms: peak {peak}/{cap}, spawned {}, culled {}, blocked {}, arrived {}, authenticated {}, dropped {}, {} draw calls",
        scene.kind().name(),
        args.frames,
        args.dt_ms,
        stats.spawned,
        stats.culled,
        stats.blocked,
        stats.arrived,
        stats.authenticated,
        stats.dropped,
        draw_calls
    );
    scene.stop();
    Ok(())
}
