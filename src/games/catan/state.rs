//! Game-state types shared with the language model.
//!
//! This is a transport model, not a rules engine. The structs carry the
//! snapshot the caller serializes for the model; validation is structural
//! only (types, enum membership, required fields). Cross-entity integrity
//! such as robber hex existence or node adjacency belongs to the game
//! engine that owns the state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use tracing::instrument;

use super::validate::{self, ValidationError};

/// A tradeable resource type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    /// Brick, produced by hills.
    Brick,
    /// Lumber, produced by forests.
    Lumber,
    /// Wool, produced by pastures.
    Wool,
    /// Grain, produced by fields.
    Grain,
    /// Ore, produced by mountains.
    Ore,
}

/// A player in the shared game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique id within the game (positive).
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Victory points scored so far.
    #[serde(default)]
    pub victory_points: u32,
    /// Resource counts; resources not present count as zero.
    #[serde(default)]
    pub resources: BTreeMap<Resource, u32>,
    /// Roads as undirected `(node_a, node_b)` pairs.
    #[serde(default)]
    pub roads: Vec<(u32, u32)>,
    /// Node ids holding settlements.
    #[serde(default)]
    pub settlements: Vec<u32>,
    /// Node ids holding cities.
    #[serde(default)]
    pub cities: Vec<u32>,
}

/// One hex on the simplified board. The desert carries neither a
/// resource nor a number token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexTile {
    /// Unique id within the board.
    pub id: u32,
    /// Produced resource; `None` for the desert.
    #[serde(default)]
    pub resource: Option<Resource>,
    /// Dice number token (2-12); `None` for the desert.
    #[serde(default)]
    pub number_token: Option<u32>,
}

/// Current robber location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobberState {
    /// Id of the hex the robber occupies.
    pub hex_id: u32,
}

/// Simplified board representation intended for the model.
///
/// Hex order is display order, not semantically significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// The board's hexes.
    pub hexes: Vec<HexTile>,
    /// Robber location.
    pub robber: RobberState,
}

/// Phase of the current turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    /// Turn has started, dice not yet rolled.
    StartOfTurn,
    /// Dice rolled, production resolved.
    AfterRoll,
    /// Main action window.
    MainAction,
    /// Turn is wrapping up.
    EndOfTurn,
}

/// Immutable snapshot of a Catan game, the unit of input to the
/// move-proposal pipeline.
///
/// Constructed and owned by the external game engine; the agent reads it,
/// never mutates it, and holds no reference to it between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Players in turn order.
    pub players: Vec<Player>,
    /// Id of the player to move; matches one of `players`.
    pub current_player_id: u32,
    /// The board snapshot.
    pub board: BoardState,
    /// Turn counter (positive).
    pub turn_number: u32,
    /// Phase of the current turn.
    pub phase: TurnPhase,
}

impl GameState {
    /// Parses and validates a game state from untrusted JSON text.
    ///
    /// Fails with a [`ValidationError`] naming the offending field path.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validates a game state from an untrusted JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let root = validate::as_object(value, "(root)")?;

        let players_value = validate::require_array(root, "players", "")?;
        let mut players = Vec::with_capacity(players_value.len());
        for (index, player_value) in players_value.iter().enumerate() {
            players.push(Player::from_value(player_value, &format!("players[{index}]"))?);
        }

        let current_player_id = validate::require_positive_u32(root, "current_player_id", "")?;
        let board = BoardState::from_value(validate::require(root, "board", "")?, "board")?;
        let turn_number = validate::require_positive_u32(root, "turn_number", "")?;
        let phase: TurnPhase = validate::require_enum(root, "phase", "")?;

        if !players.iter().any(|player| player.id == current_player_id) {
            return Err(ValidationError::UnknownValue {
                path: "current_player_id".to_string(),
                value: current_player_id.to_string(),
            });
        }

        Ok(Self {
            players,
            current_player_id,
            board,
            turn_number,
            phase,
        })
    }

    /// Constructs a small example game state intended to exercise the model.
    pub fn sample() -> Self {
        let you = Player {
            id: 1,
            name: "You".to_string(),
            victory_points: 2,
            resources: BTreeMap::from([
                (Resource::Brick, 1),
                (Resource::Lumber, 1),
                (Resource::Wool, 1),
                (Resource::Grain, 0),
                (Resource::Ore, 0),
            ]),
            roads: vec![(1, 2)],
            settlements: vec![2],
            cities: Vec::new(),
        };
        let opponent = Player {
            id: 2,
            name: "Opponent".to_string(),
            victory_points: 2,
            resources: BTreeMap::from([
                (Resource::Brick, 0),
                (Resource::Lumber, 0),
                (Resource::Wool, 0),
                (Resource::Grain, 0),
                (Resource::Ore, 0),
            ]),
            roads: vec![(5, 6)],
            settlements: vec![5],
            cities: Vec::new(),
        };

        let board = BoardState {
            hexes: vec![
                HexTile {
                    id: 1,
                    resource: Some(Resource::Brick),
                    number_token: Some(6),
                },
                HexTile {
                    id: 2,
                    resource: Some(Resource::Lumber),
                    number_token: Some(8),
                },
                // desert
                HexTile {
                    id: 3,
                    resource: None,
                    number_token: None,
                },
            ],
            robber: RobberState { hex_id: 3 },
        };

        Self {
            players: vec![you, opponent],
            current_player_id: 1,
            board,
            turn_number: 1,
            phase: TurnPhase::MainAction,
        }
    }
}

impl Player {
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let obj = validate::as_object(value, path)?;

        let id = validate::require_positive_u32(obj, "id", path)?;
        let name = validate::require_str(obj, "name", path)?.to_string();
        let victory_points = validate::optional_u32(obj, "victory_points", path)?.unwrap_or(0);
        let resources = validate::optional_resource_counts(obj, "resources", path)?;

        let roads_path = validate::join_path(path, "roads");
        let mut roads = Vec::new();
        for (index, road_value) in validate::optional_array(obj, "roads", path)?
            .iter()
            .enumerate()
        {
            roads.push(node_pair(road_value, &format!("{roads_path}[{index}]"))?);
        }

        let settlements = node_list(obj, "settlements", path)?;
        let cities = node_list(obj, "cities", path)?;

        Ok(Self {
            id,
            name,
            victory_points,
            resources,
            roads,
            settlements,
            cities,
        })
    }
}

impl HexTile {
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let obj = validate::as_object(value, path)?;
        Ok(Self {
            id: validate::require_u32(obj, "id", path)?,
            resource: validate::optional_enum(obj, "resource", path)?,
            number_token: validate::optional_u32(obj, "number_token", path)?,
        })
    }
}

impl RobberState {
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let obj = validate::as_object(value, path)?;
        Ok(Self {
            hex_id: validate::require_u32(obj, "hex_id", path)?,
        })
    }
}

impl BoardState {
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let obj = validate::as_object(value, path)?;

        let hexes_path = validate::join_path(path, "hexes");
        let mut hexes = Vec::new();
        for (index, hex_value) in validate::require_array(obj, "hexes", path)?.iter().enumerate() {
            hexes.push(HexTile::from_value(hex_value, &format!("{hexes_path}[{index}]"))?);
        }

        let robber = RobberState::from_value(
            validate::require(obj, "robber", path)?,
            &validate::join_path(path, "robber"),
        )?;

        Ok(Self { hexes, robber })
    }
}

fn node_pair(value: &Value, path: &str) -> Result<(u32, u32), ValidationError> {
    let pair = value
        .as_array()
        .filter(|items| items.len() == 2)
        .ok_or_else(|| ValidationError::WrongType {
            path: path.to_string(),
            expected: "pair of node ids",
        })?;
    Ok((
        validate::u32_value(&pair[0], &format!("{path}[0]"))?,
        validate::u32_value(&pair[1], &format!("{path}[1]"))?,
    ))
}

fn node_list(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<Vec<u32>, ValidationError> {
    let list_path = validate::join_path(prefix, key);
    let mut nodes = Vec::new();
    for (index, node_value) in validate::optional_array(obj, key, prefix)?.iter().enumerate() {
        nodes.push(validate::u32_value(node_value, &format!("{list_path}[{index}]"))?);
    }
    Ok(nodes)
}
