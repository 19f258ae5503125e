mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::ReplayOptions;
use config::CliConfig;
use handplay_core::{config::validate_player_name, HandplayError};
use handplay_games::{GameError, GameKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "handplay")]
#[command(about = "Gesture-controlled minigames driven by hand keypoints")]
#[command(version)]
struct Cli {
    /// Data directory for the leaderboard and config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON config file (defaults to <data-dir>/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL keypoint recording through a game
    Replay {
        /// Game to play (line_following or rps)
        game: GameKind,
        /// Recording with one {"t": seconds, "hands": [...]} object per line
        recording: PathBuf,
        /// Seed for the computer opponent
        #[arg(long)]
        seed: Option<u64>,
        /// Player name for leaderboard entries
        #[arg(long)]
        player: Option<String>,
        /// Do not write finished runs to the leaderboard
        #[arg(long)]
        dry_run: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Classify every hand in a single-frame JSON file
    Classify {
        /// Frame file with a "hands" array
        frame: PathBuf,
    },
    /// Show the path-tracing leaderboard, fastest first
    Leaderboard {
        /// Only show the top N runs
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "handplay={},handplay_games={},handplay_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = match CliConfig::resolve(cli.data_dir, cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Replay {
            game,
            recording,
            seed,
            player,
            dry_run,
            json,
        } => {
            if let Some(name) = player {
                if let Err(e) = validate_player_name(&name) {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                settings.game.path.player_name = name;
            }
            let options = ReplayOptions {
                seed,
                dry_run,
                json,
            };
            commands::replay_recording(&settings, game, &recording, &options).await
        }
        Commands::Classify { frame } => commands::classify_frame(&frame).await,
        Commands::Leaderboard { limit } => commands::show_leaderboard(&settings, limit),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(hint) = hint_for(e.as_ref()) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn hint_for(error: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    let core = match error.downcast_ref::<GameError>() {
        Some(GameError::Core(inner)) => Some(inner),
        Some(_) => None,
        None => error.downcast_ref::<HandplayError>(),
    };
    match core? {
        HandplayError::DataFormat { .. } => Some("Fix or remove the reported line and retry."),
        HandplayError::Config(_) => Some("Check the values in your config file."),
        _ => None,
    }
}
