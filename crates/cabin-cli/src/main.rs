//! CLI frontend for The Last Cabin session orchestrator.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::simulate::Player;

#[derive(Parser)]
#[command(
    name = "cabin",
    about = "The Last Cabin: run horror sessions headless",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full session against a simulated player
    Simulate {
        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Who plays the session
        #[arg(short, long, value_enum, default_value_t = Player::Autopilot)]
        player: Player,

        /// JSON signal script; implies `--player script`
        #[arg(long)]
        script: Option<PathBuf>,

        /// JSON session config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the event log as JSON lines instead of a timeline
        #[arg(long)]
        json: bool,
    },

    /// Sample the weighted ambient event draw
    Odds {
        /// Number of draws
        #[arg(short, long, default_value = "13000")]
        draws: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            seed,
            player,
            script,
            config,
            json,
        } => commands::simulate::run(seed, player, script.as_deref(), config.as_deref(), json),
        Commands::Odds { draws, seed } => commands::odds::run(draws, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
