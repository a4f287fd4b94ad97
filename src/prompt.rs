//! Prompt assembly for the move-proposal request.

use derive_more::Display;
use tracing::{debug, instrument};

use crate::games::catan::GameState;

/// The static system instruction sent with every move request.
///
/// This text is the model's only source of truth for the output schema:
/// any change to the action types or their field names must be mirrored
/// here, or the decoder will reject what the model produces.
pub const SYSTEM_PROMPT: &str = r#"You are an AI agent that plays the board game Catan.

You will receive a JSON object describing the current game state.
You must respond with a SINGLE JSON object that matches this schema
(no extra keys, no commentary outside JSON):

ModelMoveResponse:
- reasoning: string  # short explanation of the move
- action: one of:
  - BuildAction:
      { "type": "build",
        "build_type": "road" | "settlement" | "city" | "development_card",
        "location": "<symbolic location id like 'node_12' or 'edge_5_6'>" }
  - TradeAction:
      { "type": "trade",
        "trade_type": "player" | "bank" | "port",
        "target_player_id": <int or null>,
        "give": { "<resource>": int, ... },
        "receive": { "<resource>": int, ... } }
  - RobberAction:
      { "type": "move_robber",
        "target_hex_id": <int>,
        "steal_from_player_id": <int or null> }
  - EndTurnAction:
      { "type": "end_turn" }

Resources are: "brick", "lumber", "wool", "grain", "ore".

Rules:
- ALWAYS respond with valid JSON that can be parsed directly, with double quotes.
- NEVER wrap JSON in backticks or explanation text.
- Prefer strong, strategically reasonable moves given the current resources and board.
- If no beneficial move exists, choose an appropriate 'end_turn' action.
"#;

/// Failure to assemble the user instruction.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PromptError {
    /// The game state could not be serialized to JSON.
    #[display("failed to serialize game state: {_0}")]
    Serialize(String),
}

impl std::error::Error for PromptError {}

/// Builds the user message embedding the game state as canonical JSON.
///
/// Pure: no I/O, no clock, no randomness. Equal states produce equal
/// instructions.
#[instrument(skip(state), fields(players = state.players.len(), turn = state.turn_number))]
pub fn build_user_instruction(state: &GameState) -> Result<String, PromptError> {
    let state_json =
        serde_json::to_string(state).map_err(|e| PromptError::Serialize(e.to_string()))?;
    let instruction = format!(
        "Given the following Catan game state, choose a single move.\n\
         Return only the JSON for ModelMoveResponse.\n\
         game_state_json: {state_json}"
    );
    debug!(len = instruction.len(), "built user instruction");
    Ok(instruction)
}
