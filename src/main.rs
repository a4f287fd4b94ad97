//! Catan Agent - unified CLI
//!
//! Sends Catan game states to a locally hosted model and prints the
//! move it proposes.

#![warn(missing_docs)]

use anyhow::Result;
use catan_agent::{
    AgentConfig, Cli, Command, GameState, LlmClient, MoveAgent,
};
use clap::Parser;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::ChooseMove {
            config,
            state,
            model,
            base_url,
            timeout_seconds,
        } => run_choose_move(config, state, model, base_url, timeout_seconds).await,
        Command::SampleState => run_sample_state(),
    }
}

/// Ask the model for a move and print it.
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_choose_move(
    config_path: std::path::PathBuf,
    state_path: Option<std::path::PathBuf>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<()> {
    let config = load_config(&config_path, model, base_url, timeout_seconds)?;
    let game_state = load_game_state(state_path)?;

    let client = LlmClient::new(&config)?;
    let agent = MoveAgent::new(client);

    info!(model = %config.model(), "Requesting move proposal");
    let response = match agent.propose_move(&game_state).await {
        Ok(response) => response,
        Err(err) => {
            if let Some(raw) = err.raw_response() {
                error!(raw, "Model response could not be used");
            }
            return Err(err.into());
        }
    };

    println!("=== Model reasoning ===");
    println!("{}", response.reasoning);
    println!();
    println!("=== Model action ===");
    println!("{}", serde_json::to_string_pretty(&response.action)?);

    Ok(())
}

/// Print the built-in sample game state.
fn run_sample_state() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&GameState::sample())?);
    Ok(())
}

#[instrument(skip_all)]
fn load_config(
    config_path: &std::path::Path,
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<AgentConfig> {
    let config = if config_path.exists() {
        AgentConfig::from_file(config_path)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        AgentConfig::default()
    };

    // Command-line overrides win over the file.
    let config = AgentConfig::new(
        model.unwrap_or_else(|| config.model().clone()),
        base_url.unwrap_or_else(|| config.base_url().clone()),
        timeout_seconds.unwrap_or(*config.timeout_seconds()),
    );

    Ok(config)
}

#[instrument(skip_all)]
fn load_game_state(state_path: Option<std::path::PathBuf>) -> Result<GameState> {
    match state_path {
        Some(path) => {
            info!(path = %path.display(), "Loading game state from file");
            let text = std::fs::read_to_string(&path)?;
            Ok(GameState::from_json_str(&text)?)
        }
        None => {
            info!("Using built-in sample game state");
            Ok(GameState::sample())
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catan_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
