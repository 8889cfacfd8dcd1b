use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use snake::config::{parse_username, ConfigError, GameConfig, TickPolicy};
use snake::scene::Context;
use snake::{app, HighScores};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake with a high score table")]
struct Cli {
    /// Name the scores are recorded under
    #[arg(long, value_parser = parse_username)]
    username: String,

    /// High score file, read at start and overwritten on exit
    #[arg(long)]
    scorefile: PathBuf,

    /// Grid width in cells
    #[arg(long, default_value = "12")]
    width: i32,

    /// Grid height in cells
    #[arg(long, default_value = "9")]
    height: i32,

    /// Snake moves per second
    #[arg(long, default_value = "5")]
    speed: u32,

    /// Screen updates per second
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Run every tick a slow frame covered instead of at most one
    #[arg(long)]
    catch_up: bool,

    /// Where to write the log, the terminal belongs to the game
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("Starting snake for {}", cli.username);

    let config = GameConfig {
        width: cli.width,
        height: cli.height,
        speed: cli.speed,
        tick_policy: if cli.catch_up { TickPolicy::CatchUp } else { TickPolicy::SingleStep },
    };
    config.validate()?;
    if cli.fps == 0 {
        return Err(ConfigError::ZeroFps.into());
    }

    // An unreadable file stops here instead of being overwritten on exit
    let high_scores = HighScores::load(&cli.scorefile)
        .with_context(|| format!("Failed to read high scores from {}", cli.scorefile.display()))?;

    let mut ctx = Context {
        username: cli.username,
        high_scores,
        config,
    };

    // Scores from finished rounds are saved even if the loop failed later
    let result = app::run(&mut ctx, cli.fps);
    app::save_after_run(result, &ctx.high_scores, &cli.scorefile)
}
