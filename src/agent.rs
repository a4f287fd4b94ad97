//! The move-proposal pipeline: encode, call the model, extract, decode.

use derive_more::{Display, From};
use tracing::{debug, info, instrument, warn};

use crate::games::catan::{
    DecodeError, ExtractionError, GameState, ModelMoveResponse, decode_move_response,
    extract_json_object,
};
use crate::llm_client::{ChatTransport, LlmError};
use crate::prompt::{self, PromptError, SYSTEM_PROMPT};

/// Failure of one move-proposal attempt.
///
/// The pipeline never retries and never terminates the process; callers
/// own retry, fallback, and reporting policy. For extraction and decode
/// failures the raw model text rides along via [`ProposeError::raw_response`]
/// so callers can log or salvage it.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum ProposeError {
    /// The game state could not be encoded into the prompt.
    #[display("prompt assembly failed: {_0}")]
    Prompt(PromptError),
    /// The model call failed; carries the timeout/transport distinction.
    #[display("model call failed: {_0}")]
    Llm(LlmError),
    /// No JSON object could be located in the model's reply.
    #[display("response extraction failed: {source}")]
    #[from(skip)]
    Extraction {
        /// What went wrong locating the object.
        source: ExtractionError,
        /// The model's raw reply text.
        raw: String,
    },
    /// The candidate JSON did not decode into a valid move.
    #[display("response decode failed: {source}")]
    #[from(skip)]
    Decode {
        /// What went wrong decoding the candidate.
        source: DecodeError,
        /// The model's raw reply text.
        raw: String,
    },
}

impl std::error::Error for ProposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Prompt(source) => Some(source),
            Self::Llm(source) => Some(source),
            Self::Extraction { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl ProposeError {
    /// The raw model reply, when the failure happened after the model
    /// answered.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Extraction { raw, .. } | Self::Decode { raw, .. } => Some(raw),
            Self::Prompt(_) | Self::Llm(_) => None,
        }
    }
}

/// Proposes single moves for Catan game states via a chat transport.
///
/// Stateless across calls: each invocation is one prompt, one model
/// call, one decode. Cancellation is dropping the future.
#[derive(Debug, Clone)]
pub struct MoveAgent<C: ChatTransport> {
    transport: C,
}

impl<C: ChatTransport> MoveAgent<C> {
    /// Creates an agent over the given transport.
    pub fn new(transport: C) -> Self {
        Self { transport }
    }

    /// Asks the model for one move for the given game state.
    ///
    /// The state is read, never mutated, and no reference to it is held
    /// after the call returns.
    #[instrument(
        skip(self, state),
        fields(turn = state.turn_number, player = state.current_player_id)
    )]
    pub async fn propose_move(
        &self,
        state: &GameState,
    ) -> Result<ModelMoveResponse, ProposeError> {
        let instruction = prompt::build_user_instruction(state)?;
        debug!(len = instruction.len(), "requesting model completion");

        let raw = self.transport.complete(SYSTEM_PROMPT, &instruction).await?;

        let candidate = match extract_json_object(&raw) {
            Ok(candidate) => candidate,
            Err(source) => {
                warn!(raw_len = raw.len(), "no JSON object in model reply");
                return Err(ProposeError::Extraction { source, raw });
            }
        };

        match decode_move_response(candidate) {
            Ok(response) => {
                info!(action = %response.action, "model proposed a move");
                Ok(response)
            }
            Err(source) => {
                warn!(error = %source, "model reply did not decode");
                Err(ProposeError::Decode { source, raw })
            }
        }
    }
}
