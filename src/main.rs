//! Command line entry point for the chess scoreboard
//!
//! Loads the scoreboard from the configured grid file, runs one action and
//! flushes the result back when the action changed anything.

use anyhow::Result;
use chess_scoreboard::config::AppConfig;
use chess_scoreboard::metrics::MetricsCollector;
use chess_scoreboard::rating::RecomputeReport;
use chess_scoreboard::storage::JsonFileGridStore;
use chess_scoreboard::Scoreboard;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Chess Scoreboard - Elo leaderboard kept in a spreadsheet-style grid file
#[derive(Parser)]
#[command(
    name = "chess-scoreboard",
    version,
    about = "Keep a chess club leaderboard with Elo ratings replayed from the full game history",
    long_about = "Chess Scoreboard stores players and games as rows in a grid file, replays every \
                 game in order to derive Elo ratings and ranks, and writes the updated rows back."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Grid file override
    #[arg(long, value_name = "FILE", help = "Override the JSON grid file path")]
    data: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (never write back)
    #[arg(long, help = "Run the action without writing changes back to the grid file")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the leaderboard
    Players,
    /// Show the game history
    Games,
    /// Replay every game and write the ratings back
    Recompute,
    /// Add a player at the base rating
    AddPlayer {
        /// Full name; must contain a first and last name
        name: String,
    },
    /// Record a game between two players
    AddGame {
        winner: String,
        loser: String,
        /// The game ended in a stalemate
        #[arg(long)]
        draw: bool,
    },
    /// Delete every game and reset ratings
    ClearGames,
    /// Print scoreboard metrics in the Prometheus text format
    Metrics,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data) = &args.data {
        config.storage.path = data.clone();
    }

    chess_scoreboard::config::validate_config(&config)?;
    Ok(config)
}

fn print_standings(scoreboard: &Scoreboard) {
    println!(
        "{:>4}  {:<28} {:>5} {:>6} {:>10} {:>9}",
        "Rank", "Name", "Wins", "Losses", "Stalemates", "Rating"
    );
    for player in scoreboard.standings() {
        println!(
            "{:>4}  {:<28} {:>5} {:>6} {:>10} {:>9.2}",
            player.rank, player.name, player.wins, player.losses, player.stalemates, player.rating
        );
    }
}

fn print_games(scoreboard: &Scoreboard) {
    println!("{:>4}  {:<28} {:<28} {}", "#", "Winner", "Loser", "Stalemate?");
    for game in scoreboard.games() {
        println!(
            "{:>4}  {:<28} {:<28} {}",
            game.id.unwrap_or_default(),
            game.winner_name,
            game.loser_name,
            if game.was_stalemate { "yes" } else { "" }
        );
    }
}

fn report_skipped(report: &RecomputeReport) {
    for problem in &report.skipped {
        warn!("{}", problem);
    }
}

/// Run one command; returns whether the scoreboard changed
fn run(command: &Command, scoreboard: &mut Scoreboard) -> Result<bool> {
    match command {
        Command::Players => {
            print_standings(scoreboard);
            Ok(false)
        }
        Command::Games => {
            print_games(scoreboard);
            Ok(false)
        }
        Command::Recompute => {
            let report = scoreboard.recompute()?;
            report_skipped(&report);
            println!(
                "Replayed {} games ({} skipped)",
                report.games_replayed,
                report.games_skipped()
            );
            print_standings(scoreboard);
            Ok(true)
        }
        Command::AddPlayer { name } => {
            scoreboard.add_player(name)?;
            println!("Added {}", name.trim());
            Ok(true)
        }
        Command::AddGame {
            winner,
            loser,
            draw,
        } => {
            let game_id = scoreboard.add_game(winner, loser, *draw)?;
            println!("Recorded game #{}", game_id);
            print_standings(scoreboard);
            Ok(true)
        }
        Command::ClearGames => {
            scoreboard.clear_games()?;
            println!("Cleared all games");
            Ok(true)
        }
        Command::Metrics => {
            if let Some(metrics) = scoreboard.metrics() {
                print!("{}", metrics.gather_text()?);
            }
            Ok(false)
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} using {}",
        config.service.name,
        chess_scoreboard::VERSION,
        config.storage.path.display()
    );

    let store = JsonFileGridStore::open(&config.storage.path)?;
    let mut scoreboard = Scoreboard::from_config(&config)?.with_metrics(MetricsCollector::new()?);

    let report = scoreboard.load(&store)?;
    report_skipped(&report);

    let changed = match run(&args.command, &mut scoreboard) {
        Ok(changed) => changed,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if changed {
        if args.dry_run {
            info!("Dry run - changes were not written back");
        } else {
            for range in scoreboard.flush(&store)? {
                info!("Wrote {}", range);
            }
        }
    }

    Ok(())
}
