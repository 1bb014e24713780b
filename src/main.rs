use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use train_sim::simulation::{
    InputEvent, InputScript, LogSink, ShiftPolicy, SimConfig, SimEvent, SimWorld,
};

#[derive(Parser)]
#[command(name = "train_sim")]
#[command(about = "Train and traffic simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of frames to simulate in headless mode (60 frames = 1s)
    #[arg(long, default_value = "1800")]
    frames: u64,

    /// Seed for reproducible traffic and smoke
    #[arg(long)]
    seed: Option<u64>,

    /// Throttle behaviour while the gearbox shifts: "pause" or "ignore"
    #[arg(long)]
    shift_policy: Option<ShiftPolicy>,

    /// JSON file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timed input, e.g. "0:navigate=projects,900:press=brake,960:release=brake"
    #[arg(long)]
    script: Option<String>,

    /// Print a summary and track map every N frames (0 = only at the end)
    #[arg(long, default_value = "300")]
    summary_every: u64,
}

impl Cli {
    /// Defaults, then the config file, then command line flags
    fn load_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(policy) = self.shift_policy {
            config.train.shift_policy = policy;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config)
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui")
        }
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("warn,train_sim=info"),
        )
        .init();

        let script = match &cli.script {
            Some(text) => InputScript::parse(text).context("failed to parse --script")?,
            None => InputScript::new(),
        };
        run_headless(config, &script, cli.frames, cli.summary_every)
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(
    config: SimConfig,
    script: &InputScript,
    frames: u64,
    summary_every: u64,
) -> Result<()> {
    println!("Running train simulation in headless mode...");
    println!(
        "Frames: {} ({:.1}s simulated), scripted events: {}",
        frames,
        frames as f32 / 60.0,
        script.len()
    );
    println!();

    let mut world = SimWorld::from_config(config)?;
    world.unlock_audio(Box::new(LogSink));

    println!("Initial state:");
    world.print_summary();
    world.draw_map();

    for frame in 0..frames {
        for event in script.events_at(frame) {
            match event {
                InputEvent::Navigate(id) => world
                    .navigate(id)
                    .with_context(|| format!("scripted navigation at frame {frame}"))?,
                other => world.handle_input(other.clone()),
            }
        }

        let report = world.tick();
        for event in &report.events {
            match event {
                SimEvent::Arrived(station) => info!("frame {}: arrived at '{}'", frame, station),
                SimEvent::AutopilotCancelled => info!("frame {}: autopilot cancelled", frame),
                _ => {}
            }
        }

        if summary_every > 0 && (frame + 1) % summary_every == 0 && frame + 1 < frames {
            println!(
                "--- After frame {} ({:.1}s simulated time) ---",
                frame + 1,
                world.time
            );
            world.print_summary();
            world.draw_map();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use train_sim::ui::{SimWorldResource, TrainSimUIPlugin};

    let world = SimWorld::from_config(config)?;

    println!("Starting Train Sim UI...");
    println!();
    println!("Controls:");
    println!("  Right Arrow - Accelerate");
    println!("  Left Arrow  - Brake / reverse");
    println!("  H           - Horn (also enables audio)");
    println!("  1-6         - Drive to a station");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,train_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Train Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(SimWorldResource(world))
        .add_plugins(TrainSimUIPlugin)
        .run();
    Ok(())
}
