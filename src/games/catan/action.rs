//! Proposed-move types decoded from the model's response.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumString};

use super::state::Resource;

/// What a build action constructs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BuildType {
    /// A road on an edge.
    Road,
    /// A settlement on a node.
    Settlement,
    /// A city upgrading a settlement.
    City,
    /// A development card purchase.
    DevelopmentCard,
}

/// Counterparty class of a trade.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TradeType {
    /// Trade with another player; requires a target player id.
    Player,
    /// Four-for-one trade with the bank.
    Bank,
    /// Port-rate trade.
    Port,
}

/// A single move proposed by the model.
///
/// The wire format is a tagged union discriminated by the `type` field,
/// so each variant serializes to the object shape the model is told to
/// produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveAction {
    /// Construct a road, settlement, city, or development card.
    Build {
        /// What to build.
        build_type: BuildType,
        /// Symbolic location id such as `node_12` or `edge_5_6`.
        location: String,
    },
    /// Exchange resources with a player, the bank, or a port.
    Trade {
        /// Counterparty class.
        trade_type: TradeType,
        /// Counterparty player id; required when `trade_type` is `player`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_player_id: Option<u32>,
        /// Resources offered, all counts positive.
        give: BTreeMap<Resource, u32>,
        /// Resources requested, all counts positive.
        receive: BTreeMap<Resource, u32>,
    },
    /// Relocate the robber, optionally stealing from a player.
    MoveRobber {
        /// Destination hex id.
        target_hex_id: u32,
        /// Player to steal from, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        steal_from_player_id: Option<u32>,
    },
    /// Pass the turn.
    EndTurn,
}

impl fmt::Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build {
                build_type,
                location,
            } => write!(f, "build {build_type} at {location}"),
            Self::Trade {
                trade_type,
                target_player_id,
                give,
                receive,
            } => {
                write!(f, "trade with {trade_type}")?;
                if let Some(target) = target_player_id {
                    write!(f, " {target}")?;
                }
                write!(
                    f,
                    ": give {}, receive {}",
                    format_counts(give),
                    format_counts(receive)
                )
            }
            Self::MoveRobber {
                target_hex_id,
                steal_from_player_id,
            } => {
                write!(f, "move robber to hex {target_hex_id}")?;
                if let Some(victim) = steal_from_player_id {
                    write!(f, ", steal from player {victim}")?;
                }
                Ok(())
            }
            Self::EndTurn => write!(f, "end turn"),
        }
    }
}

fn format_counts(counts: &BTreeMap<Resource, u32>) -> String {
    if counts.is_empty() {
        return "nothing".to_string();
    }
    counts
        .iter()
        .map(|(resource, count)| format!("{count} {resource}"))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// The model's full reply: a short explanation plus one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMoveResponse {
    /// Short explanation of the move.
    pub reasoning: String,
    /// The proposed move.
    pub action: MoveAction,
}
