use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rhythmus_core::{command_names, EngineConfig, EngineContext, Scene, SceneDescription};
use tracing_subscriber::EnvFilter;

fn main() -> rhythmus_core::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    init_tracing(config.log_filter.as_deref());

    match cli.command {
        Commands::Play {
            scene,
            frames,
            delta,
            events,
            keys,
        } => run_play(config, &scene, frames, delta, &events, &keys),
        Commands::Commands => {
            for name in command_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run_play(
    config: EngineConfig,
    path: &PathBuf,
    frames: u32,
    delta: Option<f32>,
    events: &[String],
    keys: &[String],
) -> rhythmus_core::Result<()> {
    let delta = delta.unwrap_or(config.animation.tick_ms);
    tracing::info!(?path, frames, delta, "playing scene");

    let mut ctx = EngineContext::new(config);
    for entry in keys {
        let (key, value) = split_pair(entry, '=')?;
        ctx.keys.set_text(key, value);
    }
    let timed = events
        .iter()
        .map(|entry| {
            let (name, at) = split_pair(entry, '@')?;
            Ok((name, rhythmus_core::command::parse_number(at)? as f32))
        })
        .collect::<rhythmus_core::Result<Vec<_>>>()?;

    let desc = SceneDescription::load(path)?;
    let mut scene = Scene::from_description(&desc, &mut ctx);
    if let Err(err) = scene.resolve_resources(&ctx) {
        tracing::warn!(%err, "scene references resources that were never provided");
    }
    scene.start(&mut ctx);
    for (name, at) in timed {
        scene.schedule_event(name, at);
    }

    for _ in 0..frames {
        for event in scene.update(delta, &mut ctx) {
            tracing::debug!(event = %event.name, time_ms = ?event.time_ms, "delivered");
        }
    }

    println!("{}", scene.render(&ctx).to_json()?);
    Ok(())
}

fn split_pair(entry: &str, separator: char) -> rhythmus_core::Result<(&str, &str)> {
    entry
        .split_once(separator)
        .ok_or_else(|| format!("expected `a{separator}b`, got `{entry}`").into())
}

fn init_tracing(filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or("info"))),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the Rhythmus scene engine", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a scene description, run it for a number of frames and print the
    /// resulting draw list as JSON.
    Play {
        /// Path to the scene description.
        scene: PathBuf,
        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 60)]
        frames: u32,
        /// Milliseconds per frame. Defaults to the configured tick.
        #[arg(short, long)]
        delta: Option<f32>,
        /// Event to send at a scene time, as `NAME@MS`. Repeatable.
        #[arg(short, long = "event")]
        events: Vec<String>,
        /// Key to set before the scene starts, as `KEY=VALUE`. Repeatable.
        #[arg(short, long = "key")]
        keys: Vec<String>,
    },
    /// List the command names understood by scene objects.
    Commands,
}
