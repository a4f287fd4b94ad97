//! Command-line interface for catan_agent.

use clap::{Parser, Subcommand};

/// Catan Agent - move proposals from a locally hosted LLM
#[derive(Parser, Debug)]
#[command(name = "catan_agent")]
#[command(about = "Ask a locally hosted LLM to propose Catan moves", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the model to choose a move for a game state
    ChooseMove {
        /// Path to agent configuration file (TOML); defaults apply if absent
        #[arg(short, long, default_value = "agent_config.toml")]
        config: std::path::PathBuf,

        /// Path to a game-state JSON file; the built-in sample is used if omitted
        #[arg(long)]
        state: Option<std::path::PathBuf>,

        /// Override the configured model name
        #[arg(long)]
        model: Option<String>,

        /// Override the configured endpoint base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Override the configured request timeout in seconds
        #[arg(long)]
        timeout_seconds: Option<u64>,
    },

    /// Print the built-in sample game state as pretty JSON
    SampleState,
}
