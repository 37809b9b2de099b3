//! Arena simulation headless runner.
//!
//! Loads the arena (ground tiles, perimeter walls, the player tank) from the
//! asset directory named in the configuration and runs the frame loop
//! without a window:
//!
//! - input comes from a seeded [`Autopilot`](arenacore::autopilot::Autopilot)
//! - frames are presented through a [`LogPresenter`] that only logs
//! - async loading is driven with `pollster::block_on`
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --frames 600 --fixed-dt 0.016 --seed 7
//! ```

use std::path::PathBuf;
use std::time::Duration;

use arenacore::autopilot::Autopilot;
use arenacore::entities::GameEntity;
use arenacore::error::RunError;
use arenacore::game::GameScene;
use arenacore::resources::assetstore::AssetStore;
use arenacore::resources::gameconfig::GameConfig;
use arenacore::resources::presenter::LogPresenter;
use clap::Parser;
use log::{error, info, warn};

/// Headless arena simulation
#[derive(Parser)]
#[command(version, about = "Runs the tank arena simulation without a window.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Fixed frame delta in seconds; overrides the configuration.
    #[arg(long, value_name = "SECONDS")]
    fixed_dt: Option<f32>,

    /// Seed for every random choice (ground textures, particles, autopilot).
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    let mut config = GameConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else if !cli.write_config {
        warn!("Config file {:?} not found, using defaults", cli.config);
    }
    if let Some(dt) = cli.fixed_dt {
        config.fixed_delta = Some(dt);
    }

    if cli.write_config {
        config.save_to_file()?;
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    fastrand::seed(seed);
    info!("Random seed {seed}");

    let assets = AssetStore::from_dir(&config.assets_root);
    let frame_budget = (config.fixed_delta.is_none() && config.target_fps > 0)
        .then(|| Duration::from_secs_f32(1.0 / config.target_fps as f32));

    let mut scene = GameScene::new(config, Box::new(assets), LogPresenter::default());
    scene.populate();
    pollster::block_on(scene.load())?;

    let mut autopilot = Autopilot::new(seed);
    for _ in 0..cli.frames {
        for event in autopilot.next_events() {
            pollster::block_on(scene.handle_input(event))?;
        }
        scene.frame();
        if let Some(budget) = frame_budget {
            std::thread::sleep(budget);
        }
    }
    if let Some(event) = autopilot.finish() {
        pollster::block_on(scene.handle_input(event))?;
    }

    let time = scene.world_time();
    info!(
        "Simulated {} frames ({:.2}s): {} live entities",
        time.frame_count,
        time.elapsed,
        scene.registry().len()
    );
    if let Some(player) = scene.player() {
        info!(
            "Player at {} heading {:.3} rad",
            player.position(),
            player.rotation()
        );
    }
    scene.shutdown();
    Ok(())
}
