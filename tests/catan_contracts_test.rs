//! Contract tests for the Catan wire format: state validation, JSON
//! extraction, and move decoding through the public API.

use std::collections::BTreeMap;

use catan_agent::{
    BuildType, DecodeError, GameState, ModelMoveResponse, MoveAction, Resource,
    TradeType, ValidationError, build_user_instruction, decode_move_response,
    extract_json_object,
};

fn round_trip(response: &ModelMoveResponse) {
    let text = serde_json::to_string(response).expect("response serializes");
    let decoded = decode_move_response(&text)
        .unwrap_or_else(|err| panic!("serialized response must decode: {err}\n{text}"));
    assert_eq!(&decoded, response, "decode must invert serialization");
}

#[test]
fn test_build_round_trips_through_decoder() {
    round_trip(&ModelMoveResponse {
        reasoning: "settle next to the six".to_string(),
        action: MoveAction::Build {
            build_type: BuildType::Settlement,
            location: "node_12".to_string(),
        },
    });
}

#[test]
fn test_trade_round_trips_through_decoder() {
    round_trip(&ModelMoveResponse {
        reasoning: "need ore for a city".to_string(),
        action: MoveAction::Trade {
            trade_type: TradeType::Player,
            target_player_id: Some(2),
            give: BTreeMap::from([(Resource::Wool, 2)]),
            receive: BTreeMap::from([(Resource::Ore, 1)]),
        },
    });
}

#[test]
fn test_robber_round_trips_through_decoder() {
    round_trip(&ModelMoveResponse {
        reasoning: "starve the leader".to_string(),
        action: MoveAction::MoveRobber {
            target_hex_id: 2,
            steal_from_player_id: Some(2),
        },
    });
}

#[test]
fn test_end_turn_round_trips_through_decoder() {
    round_trip(&ModelMoveResponse {
        reasoning: "nothing to do".to_string(),
        action: MoveAction::EndTurn,
    });
}

#[test]
fn test_player_trade_without_target_is_rejected() {
    let text = r#"{
        "reasoning": "swap",
        "action": {
            "type": "trade",
            "trade_type": "player",
            "give": { "brick": 1 },
            "receive": { "grain": 1 }
        }
    }"#;
    let err = decode_move_response(text).expect_err("player trade needs a target");
    assert_eq!(
        err,
        DecodeError::Invalid(ValidationError::MissingTradeTarget),
        "the conditional counterparty requirement must be enforced"
    );
}

#[test]
fn test_truncated_json_fails_decode() {
    let err = decode_move_response("{\"reasoning\": \"hm\", \"action\": {")
        .expect_err("truncated JSON must fail");
    assert!(
        matches!(err, DecodeError::MalformedJson(_)),
        "expected MalformedJson, got {err}"
    );
}

#[test]
fn test_trailing_comma_fails_decode() {
    let err = decode_move_response(
        "{\"reasoning\": \"pass\", \"action\": {\"type\": \"end_turn\",}}",
    )
    .expect_err("trailing comma must not be coerced");
    assert!(
        matches!(err, DecodeError::MalformedJson(_)),
        "expected MalformedJson, got {err}"
    );
}

#[test]
fn test_extractor_recovers_object_from_prose() {
    let raw = "Sure! Here is my move:\n{\"reasoning\": \"pass\", \"action\": {\"type\": \"end_turn\"}}\nGood luck!";
    let candidate = extract_json_object(raw).expect("object embedded in prose extracts");
    let response = decode_move_response(candidate).expect("extracted candidate decodes");
    assert_eq!(response.action, MoveAction::EndTurn);
}

#[test]
fn test_sample_state_round_trips_as_json() {
    let state = GameState::sample();
    let text = serde_json::to_string(&state).expect("sample serializes");
    let recovered = GameState::from_json_str(&text).expect("serialized sample validates");
    assert_eq!(recovered, state);
}

#[test]
fn test_state_validation_names_nested_paths() {
    let text = r#"{
        "players": [{ "id": 1, "name": "You", "resources": { "gems": 1 } }],
        "current_player_id": 1,
        "board": { "hexes": [], "robber": { "hex_id": 1 } },
        "turn_number": 1,
        "phase": "main_action"
    }"#;
    let err = GameState::from_json_str(text).expect_err("unknown resource must fail");
    assert_eq!(
        err,
        ValidationError::UnknownValue {
            path: "players[0].resources.gems".to_string(),
            value: "gems".to_string(),
        }
    );
}

#[test]
fn test_state_rejects_unknown_current_player() {
    let text = r#"{
        "players": [{ "id": 1, "name": "You" }],
        "current_player_id": 9,
        "board": { "hexes": [], "robber": { "hex_id": 1 } },
        "turn_number": 1,
        "phase": "start_of_turn"
    }"#;
    let err = GameState::from_json_str(text).expect_err("player 9 does not exist");
    assert_eq!(
        err,
        ValidationError::UnknownValue {
            path: "current_player_id".to_string(),
            value: "9".to_string(),
        }
    );
}

#[test]
fn test_state_rejects_unknown_phase() {
    let text = r#"{
        "players": [{ "id": 1, "name": "You" }],
        "current_player_id": 1,
        "board": { "hexes": [], "robber": { "hex_id": 1 } },
        "turn_number": 1,
        "phase": "halftime"
    }"#;
    let err = GameState::from_json_str(text).expect_err("halftime is not a phase");
    assert_eq!(
        err,
        ValidationError::UnknownValue {
            path: "phase".to_string(),
            value: "halftime".to_string(),
        }
    );
}

#[test]
fn test_instruction_embeds_the_state_verbatim() {
    let state = GameState::sample();
    let instruction = build_user_instruction(&state).expect("sample state encodes");
    let state_json = serde_json::to_string(&state).expect("sample serializes");
    assert!(
        instruction.ends_with(&state_json),
        "instruction must end with the canonical state JSON"
    );
    assert!(
        instruction.contains("game_state_json: "),
        "instruction must carry the state preamble"
    );
}
