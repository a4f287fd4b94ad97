//! End-to-end pipeline tests with scripted transports standing in for
//! the model endpoint.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use catan_agent::{
    ChatTransport, DecodeError, ExtractionError, GameState, LlmError, MoveAgent,
    MoveAction, ProposeError, SYSTEM_PROMPT,
};

/// Transport that replies with a fixed result, recording what it was sent.
struct ScriptedTransport {
    reply: Result<String, LlmError>,
    seen: Mutex<Option<(String, String)>>,
}

impl ScriptedTransport {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(None),
        }
    }

    fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        *self.seen.lock().expect("seen lock") =
            Some((system_prompt.to_string(), user_message.to_string()));
        self.reply.clone()
    }
}

#[tokio::test]
async fn test_fenced_end_turn_reply_decodes() {
    let transport = ScriptedTransport::replying(
        "```json\n{\"reasoning\": \"nothing beneficial\", \"action\": {\"type\": \"end_turn\"}}\n```",
    );
    let agent = MoveAgent::new(transport);

    let response = agent
        .propose_move(&GameState::sample())
        .await
        .expect("fenced end_turn must decode");
    assert_eq!(response.action, MoveAction::EndTurn);
    assert_eq!(response.reasoning, "nothing beneficial");
}

#[tokio::test]
async fn test_robber_reply_decodes_with_prose_around_it() {
    let transport = ScriptedTransport::replying(
        "My move: {\"reasoning\": \"block the eight\", \"action\": {\"type\": \"move_robber\", \"target_hex_id\": 2, \"steal_from_player_id\": 2}}",
    );
    let agent = MoveAgent::new(transport);

    let response = agent
        .propose_move(&GameState::sample())
        .await
        .expect("robber move must decode");
    assert_eq!(
        response.action,
        MoveAction::MoveRobber {
            target_hex_id: 2,
            steal_from_player_id: Some(2),
        }
    );
}

#[tokio::test]
async fn test_unknown_action_type_surfaces_raw_text() {
    let raw = "{\"reasoning\": \"creative\", \"action\": {\"type\": \"teleport\"}}";
    let agent = MoveAgent::new(ScriptedTransport::replying(raw));

    let err = agent
        .propose_move(&GameState::sample())
        .await
        .expect_err("teleport is not a legal action type");
    match &err {
        ProposeError::Decode { source, .. } => assert_eq!(
            source,
            &DecodeError::UnknownActionType("teleport".to_string())
        ),
        other => panic!("expected decode failure, got {other}"),
    }
    assert_eq!(err.raw_response(), Some(raw), "raw model text must survive");
}

#[tokio::test]
async fn test_prose_only_reply_is_an_extraction_failure() {
    let agent = MoveAgent::new(ScriptedTransport::replying(
        "I think ending the turn is wise here.",
    ));

    let err = agent
        .propose_move(&GameState::sample())
        .await
        .expect_err("no JSON object to extract");
    match &err {
        ProposeError::Extraction { source, .. } => {
            assert_eq!(source, &ExtractionError::NoJsonObject)
        }
        other => panic!("expected extraction failure, got {other}"),
    }
    assert!(err.raw_response().is_some(), "raw model text must survive");
}

#[tokio::test]
async fn test_timeout_stays_distinct_from_transport_failure() {
    let timeout_agent = MoveAgent::new(ScriptedTransport::failing(LlmError::Timeout(60)));
    let transport_agent = MoveAgent::new(ScriptedTransport::failing(
        LlmError::Transport("connection refused".to_string()),
    ));
    let state = GameState::sample();

    let timeout_err = timeout_agent
        .propose_move(&state)
        .await
        .expect_err("scripted timeout must fail");
    let transport_err = transport_agent
        .propose_move(&state)
        .await
        .expect_err("scripted transport failure must fail");

    assert!(
        matches!(timeout_err, ProposeError::Llm(LlmError::Timeout(60))),
        "expected timeout, got {timeout_err}"
    );
    assert!(
        matches!(transport_err, ProposeError::Llm(LlmError::Transport(_))),
        "expected transport failure, got {transport_err}"
    );
    assert_eq!(timeout_err.raw_response(), None);
}

#[tokio::test]
async fn test_pipeline_sends_system_prompt_and_state() {
    let transport = Arc::new(ScriptedTransport::replying(
        "{\"reasoning\": \"pass\", \"action\": {\"type\": \"end_turn\"}}",
    ));
    let state = GameState::sample();
    let state_json = serde_json::to_string(&state).expect("sample serializes");

    let agent = MoveAgent::new(Arc::clone(&transport));
    agent
        .propose_move(&state)
        .await
        .expect("scripted reply decodes");

    let (system, user) = transport
        .seen
        .lock()
        .expect("seen lock")
        .clone()
        .expect("transport must have been called");
    assert_eq!(system, SYSTEM_PROMPT);
    assert!(
        user.contains(&state_json),
        "user message must embed the canonical state JSON"
    );
}
