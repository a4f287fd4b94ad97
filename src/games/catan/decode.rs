//! Decoding the model's candidate JSON into a typed move.
//!
//! The walker is hand-written rather than a serde derive because the
//! error contract names exact field paths and per-variant constraints
//! (conditional trade counterparty, positive trade amounts) that a
//! blanket derive cannot report.

use derive_more::{Display, From};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::action::{BuildType, ModelMoveResponse, MoveAction, TradeType};
use super::validate::{self, ValidationError};

/// Failure to decode a candidate JSON object into a [`ModelMoveResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum DecodeError {
    /// The candidate was not valid JSON.
    #[display("malformed JSON: {_0}")]
    #[from(skip)]
    MalformedJson(String),
    /// A required top-level field was absent or null.
    #[display("missing required field '{_0}'")]
    #[from(skip)]
    MissingField(String),
    /// A top-level field held the wrong JSON type.
    #[display("field '{path}' must be a {expected}")]
    #[from(skip)]
    WrongType {
        /// Dot path of the offending field.
        path: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },
    /// The `type` discriminator matched no known action.
    #[display("unknown action type '{_0}'")]
    #[from(skip)]
    UnknownActionType(String),
    /// A variant-level constraint was violated.
    #[display("invalid action: {_0}")]
    Invalid(ValidationError),
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(source) => Some(source),
            _ => None,
        }
    }
}

/// Decodes candidate JSON text into a validated [`ModelMoveResponse`].
///
/// All-or-nothing: any violation fails the whole decode, never a
/// partially populated response.
#[instrument(skip(candidate), fields(len = candidate.len()))]
pub fn decode_move_response(candidate: &str) -> Result<ModelMoveResponse, DecodeError> {
    let value: Value = serde_json::from_str(candidate).map_err(|e| {
        warn!(error = %e, "candidate is not valid JSON");
        DecodeError::MalformedJson(e.to_string())
    })?;

    let root = value.as_object().ok_or_else(|| DecodeError::WrongType {
        path: "(root)".to_string(),
        expected: "object",
    })?;

    let reasoning = require_top_level_str(root, "reasoning")?.to_string();
    let action_value = require_top_level(root, "action")?;
    let action_obj = action_value
        .as_object()
        .ok_or_else(|| DecodeError::WrongType {
            path: "action".to_string(),
            expected: "object",
        })?;

    let action_type = require_top_level_str(action_obj, "type").map_err(|err| match err {
        DecodeError::MissingField(_) => DecodeError::MissingField("action.type".to_string()),
        DecodeError::WrongType { expected, .. } => DecodeError::WrongType {
            path: "action.type".to_string(),
            expected,
        },
        other => other,
    })?;

    let action = match action_type {
        "build" => decode_build(action_obj)?,
        "trade" => decode_trade(action_obj)?,
        "move_robber" => decode_move_robber(action_obj)?,
        "end_turn" => MoveAction::EndTurn,
        other => {
            warn!(action_type = other, "unknown action discriminator");
            return Err(DecodeError::UnknownActionType(other.to_string()));
        }
    };

    debug!(%action, "decoded model move");
    Ok(ModelMoveResponse { reasoning, action })
}

fn decode_build(obj: &Map<String, Value>) -> Result<MoveAction, DecodeError> {
    let build_type: BuildType = validate::require_enum(obj, "build_type", "action")?;
    let location = validate::require_str(obj, "location", "action")?.to_string();
    Ok(MoveAction::Build {
        build_type,
        location,
    })
}

fn decode_trade(obj: &Map<String, Value>) -> Result<MoveAction, DecodeError> {
    let trade_type: TradeType = validate::require_enum(obj, "trade_type", "action")?;
    let target_player_id =
        validate::optional_positive_u32(obj, "target_player_id", "action")?;
    let give = validate::require_positive_resource_counts(obj, "give", "action")?;
    let receive = validate::require_positive_resource_counts(obj, "receive", "action")?;

    if trade_type == TradeType::Player && target_player_id.is_none() {
        return Err(DecodeError::Invalid(ValidationError::MissingTradeTarget));
    }

    Ok(MoveAction::Trade {
        trade_type,
        target_player_id,
        give,
        receive,
    })
}

fn decode_move_robber(obj: &Map<String, Value>) -> Result<MoveAction, DecodeError> {
    let target_hex_id = validate::require_u32(obj, "target_hex_id", "action")?;
    let steal_from_player_id =
        validate::optional_positive_u32(obj, "steal_from_player_id", "action")?;
    Ok(MoveAction::MoveRobber {
        target_hex_id,
        steal_from_player_id,
    })
}

fn require_top_level<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Value, DecodeError> {
    match obj.get(key) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(DecodeError::MissingField(key.to_string())),
    }
}

fn require_top_level_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, DecodeError> {
    require_top_level(obj, key)?
        .as_str()
        .ok_or_else(|| DecodeError::WrongType {
            path: key.to_string(),
            expected: "string",
        })
}
