//! Catan move-proposal domain.
//!
//! The types here are a transport model shared with the language model:
//! game-state snapshots flow out as prompt JSON, and proposed moves flow
//! back in as the tagged-union wire format decoded by [`decode_move_response`].

mod action;
mod decode;
mod extract;
mod state;
mod validate;

pub use action::{BuildType, ModelMoveResponse, MoveAction, TradeType};
pub use decode::{DecodeError, decode_move_response};
pub use extract::{ExtractionError, extract_json_object};
pub use state::{BoardState, GameState, HexTile, Player, Resource, RobberState, TurnPhase};
pub use validate::ValidationError;
