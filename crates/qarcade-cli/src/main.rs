//! CLI for the quantum arcade: entangled pairs can't be peeked at.

mod commands;

use clap::{Parser, Subcommand};

use commands::EngineArgs;

#[derive(Parser)]
#[command(name = "qarcade")]
#[command(about = "qarcade: a slot machine and card game on a simulated entangled-pair RNG")]
#[command(version = qarcade_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP JSON API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout_secs: u64,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Spin the slot machine locally and print the result as JSON
    Spin {
        /// Use the independent (classical) regime instead of entangled pairs
        #[arg(long)]
        classical: bool,

        /// Try to read the outcome early
        #[arg(long)]
        eavesdrop: bool,

        /// Number of spins
        #[arg(long, default_value = "1")]
        count: usize,

        /// Print the console log afterwards
        #[arg(long)]
        console: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Attempt to force a jackpot
    Attack {
        /// Use the independent (classical) regime instead of entangled pairs
        #[arg(long)]
        classical: bool,

        /// Eavesdrop while attacking
        #[arg(long)]
        eavesdrop: bool,

        /// Print the console log afterwards
        #[arg(long)]
        console: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Deal two cards and score two players' guesses of their sum
    Play {
        /// Player 1's guess
        #[arg(long)]
        player1: i64,

        /// Player 2's guess
        #[arg(long)]
        player2: i64,

        /// Use the independent (classical) regime instead of entangled pairs
        #[arg(long)]
        classical: bool,

        /// Try to read the cards before guessing
        #[arg(long)]
        eavesdrop: bool,

        /// Print the console log afterwards
        #[arg(long)]
        console: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            timeout_secs,
            engine,
        } => commands::serve::run(&host, port, timeout_secs, &engine),
        Commands::Spin {
            classical,
            eavesdrop,
            count,
            console,
            engine,
        } => commands::play::run_spin(&engine, classical, eavesdrop, count, console),
        Commands::Attack {
            classical,
            eavesdrop,
            console,
            engine,
        } => commands::play::run_attack(&engine, classical, eavesdrop, console),
        Commands::Play {
            player1,
            player2,
            classical,
            eavesdrop,
            console,
            engine,
        } => commands::play::run_cards(commands::play::CardCommandConfig {
            engine: &engine,
            player1,
            player2,
            classical,
            eavesdrop,
            console,
        }),
    }
}
