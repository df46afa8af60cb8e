use std::sync::Arc;
use std::time::Duration;

use medichat::core::action::{Action, Effect, update};
use medichat::core::generator::{self, Reply};
use medichat::core::session::{ChatSession, Turn};
use medichat::core::state::App;
use medichat::inference::{
    CompletionProvider, CompletionRequest, GeminiProvider, NO_CONTENT_MESSAGE, ProviderError,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const GENERATE_PATH: &str = "/v1beta/models/gemini:generateContent";

// ============================================================================
// Helper Functions
// ============================================================================

fn provider_for(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(
        format!("{}{}", server.uri(), GENERATE_PATH),
        Some(Duration::from_secs(5)),
    )
    .expect("mock server uri is a valid endpoint")
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

async fn mount_reply(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

// ============================================================================
// Provider Tests
// ============================================================================

#[tokio::test]
async fn test_successful_reply_is_cleaned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "contents": [ { "role": "user", "parts": [ { "text": "When are you open?" } ] } ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply_body("  We are open **Monday** to **Friday**.\n")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let turns = vec![Turn::user("When are you open?")];

    let reply = generator::respond(&provider, &turns).await;

    assert!(!reply.is_error);
    assert_eq!(reply.text, "We are open Monday to Friday.");
}

#[tokio::test]
async fn test_api_error_uses_error_message() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })),
    )
    .await;

    let provider = provider_for(&mock_server);
    let turns = vec![Turn::user("Hello")];

    let result = provider.complete(CompletionRequest { turns: &turns }).await;
    match result {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let reply = generator::respond(&provider, &turns).await;
    assert!(reply.is_error);
    assert_eq!(reply.text, "API key not valid (HTTP 400)");
}

#[tokio::test]
async fn test_missing_candidates_is_empty_content() {
    let mock_server = MockServer::start().await;
    mount_reply(&mock_server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let provider = provider_for(&mock_server);
    let turns = vec![Turn::user("Hello")];

    let reply = generator::respond(&provider, &turns).await;

    assert!(reply.is_error);
    assert_eq!(reply.text, NO_CONTENT_MESSAGE);
}

#[tokio::test]
async fn test_blank_reply_becomes_error_turn() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(reply_body("  \n ")),
    )
    .await;

    let provider: Arc<dyn CompletionProvider> = Arc::new(provider_for(&mock_server));
    let mut app = App::new(provider.clone(), None, "mock".to_string());

    let Effect::SpawnRequest(request_id) = update(&mut app, Action::Submit("hi".to_string())) else {
        panic!("Expected SpawnRequest");
    };
    let reply = generator::respond_guarded(provider, app.session.payload()).await;
    assert_eq!(reply, Reply::error(NO_CONTENT_MESSAGE));
    update(&mut app, Action::ResponseReady { request_id, reply });

    let last = app.session.turns().last().expect("reply turn");
    assert!(last.is_error());
    assert!(app.session.payload().iter().all(|turn| !turn.text.trim().is_empty()));
}

#[tokio::test]
async fn test_reply_with_unexpected_role_is_accepted() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "role": "assistant", "parts": [ { "text": "Mornings only." } ] } }
            ]
        })),
    )
    .await;

    let provider = provider_for(&mock_server);
    let reply = generator::respond(&provider, &[Turn::user("Saturday hours?")]).await;

    assert_eq!(reply, Reply::text("Mornings only."));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(reply_body("too late"))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let provider = GeminiProvider::new(
        format!("{}{}", mock_server.uri(), GENERATE_PATH),
        Some(Duration::from_millis(300)),
    )
    .expect("mock server uri is a valid endpoint");

    let reply = generator::respond(&provider, &[Turn::user("Hello")]).await;

    assert_eq!(reply, Reply::error("Request timed out"));
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<html>gateway</html>"),
    )
    .await;

    let provider = provider_for(&mock_server);
    let turns = vec![Turn::user("Hello")];

    let result = provider.complete(CompletionRequest { turns: &turns }).await;
    assert!(matches!(result, Err(ProviderError::Parse(_))));

    let reply = generator::respond(&provider, &turns).await;
    assert!(reply.is_error);
    assert!(reply.text.starts_with("Could not read the API response"));
}

#[tokio::test]
async fn test_payload_carries_hidden_context_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "model", "parts": [ { "text": "You are the clinic assistant." } ] },
                { "role": "user", "parts": [ { "text": "Do you take walk-ins?" } ] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Yes.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let mut session = ChatSession::new(Some("You are the clinic assistant.".to_string()));
    session
        .append_user_turn("Do you take walk-ins?")
        .expect("first turn is accepted");

    let payload = session.payload();
    assert_eq!(payload.len(), 2);

    let reply = generator::respond(&provider, &payload).await;
    assert_eq!(reply.text, "Yes.");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_error_reply() {
    let provider = GeminiProvider::new(
        "http://127.0.0.1:1/generate".to_string(),
        Some(Duration::from_secs(2)),
    )
    .expect("valid endpoint");
    let turns = vec![Turn::user("Hello")];

    let reply = generator::respond(&provider, &turns).await;

    assert!(reply.is_error);
    assert!(!reply.text.is_empty());
}

#[tokio::test]
async fn test_full_flow_through_update() {
    let mock_server = MockServer::start().await;
    mount_reply(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(reply_body("Please call **555-0100**.")),
    )
    .await;

    let provider: Arc<dyn CompletionProvider> = Arc::new(provider_for(&mock_server));
    let mut app = App::new(
        provider.clone(),
        Some("You are the clinic assistant.".to_string()),
        "mock".to_string(),
    );

    let effect = update(&mut app, Action::Submit("How do I book?".to_string()));
    let Effect::SpawnRequest(request_id) = effect else {
        panic!("Expected SpawnRequest, got {:?}", effect);
    };
    assert!(app.is_loading());

    let reply = generator::respond_guarded(provider, app.session.payload()).await;
    update(&mut app, Action::ResponseReady { request_id, reply });

    assert!(!app.is_loading());
    let visible: Vec<&str> = app
        .session
        .visible_turns()
        .map(|turn| turn.text.as_str())
        .collect();
    assert_eq!(visible, vec!["How do I book?", "Please call 555-0100."]);
    assert_eq!(app.status_message, "Ready");
}
