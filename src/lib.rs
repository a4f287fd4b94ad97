//! Catan Agent library - Catan move proposals from a locally hosted LLM
//!
//! This library turns a Catan game-state snapshot into a single proposed
//! move by prompting a model behind an OpenAI-compatible chat endpoint
//! (such as Ollama) and decoding its JSON reply into typed actions.
//!
//! # Architecture
//!
//! - **Games**: Catan transport model (state snapshots, the tagged-union
//!   move format, decode/extract with field-path errors)
//! - **Prompt**: static system instruction plus the per-state user message
//! - **Transport**: [`ChatTransport`] seam with the [`LlmClient`] HTTP
//!   implementation
//! - **Agent**: [`MoveAgent`] pipeline tying the pieces together
//!
//! # Example
//!
//! ```no_run
//! use catan_agent::{AgentConfig, GameState, LlmClient, MoveAgent};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AgentConfig::default();
//! let agent = MoveAgent::new(LlmClient::new(&config)?);
//!
//! let response = agent.propose_move(&GameState::sample()).await?;
//! println!("{}: {}", response.reasoning, response.action);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod agent_config;
mod cli;
mod games;
mod llm_client;
mod prompt;

// Crate-level exports - Agent pipeline
pub use agent::{MoveAgent, ProposeError};

// Crate-level exports - Agent configuration
pub use agent_config::{AgentConfig, ConfigError};

// Crate-level exports - Command-line interface
pub use cli::{Cli, Command};

// Crate-level exports - LLM transport
pub use llm_client::{ChatTransport, LlmClient, LlmError};

// Crate-level exports - Prompt assembly
pub use prompt::{PromptError, SYSTEM_PROMPT, build_user_instruction};

// Crate-level exports - Game types (Catan)
pub use games::catan::{
    BoardState, BuildType, DecodeError, ExtractionError, GameState, HexTile,
    ModelMoveResponse, MoveAction, Player, Resource, RobberState, TradeType, TurnPhase,
    ValidationError, decode_move_response, extract_json_object,
};
