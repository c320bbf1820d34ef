//! End-to-end: submit over real HTTP against a mock fusion backend.

use chat_core::{Config, Role};
use chat_state::ERROR_REPLY;
use httpmock::MockServer;
use session_manager::ChatSession;

fn config_for(server: &MockServer, streaming: bool) -> Config {
    Config {
        base_url: server.base_url(),
        streaming,
        idle_timeout_secs: 5,
        ..Config::default()
    }
}

#[tokio::test]
async fn streaming_submit_round_trip() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/generate-stream")
                .json_body(serde_json::json!({ "prompt": "Explain recursion" }));
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(concat!(
                    "data: {\"type\":\"status\",\"message\":\"Thinking...\"}\n",
                    "data: {\"type\":\"status\",\"message\":\"Refining..\"}\n",
                    "data: {\"type\":\"result\",\"content\":\"Recursion is...\"}\n",
                ));
        })
        .await;

    let mut chat = ChatSession::new(&config_for(&server, true));
    assert!(chat.submit("  Explain recursion  ").await);

    mock.assert_async().await;

    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[0].role, Role::User);
    assert_eq!(chat.messages()[0].content, "Explain recursion");
    assert_eq!(chat.messages()[1].role, Role::Assistant);
    assert_eq!(chat.messages()[1].content, "Recursion is...");
    assert_eq!(chat.status_feed(), ["Thinking...", "Refining.."]);
    assert!(!chat.pending());
}

#[tokio::test]
async fn request_failure_surfaces_fixed_reply() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method("POST").path("/generate-stream");
            then.status(503);
        })
        .await;

    let mut chat = ChatSession::new(&config_for(&server, true));
    chat.submit("hello").await;

    assert!(!chat.pending());
    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[1].content, ERROR_REPLY);
    assert!(chat.status_feed().last().unwrap().contains("503"));
}

#[tokio::test]
async fn malformed_lines_are_invisible_to_the_session() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method("POST").path("/generate-stream");
            then.status(200).body(concat!(
                "data: {not json\n",
                "data: {\"type\":\"status\",\"message\":\"ok\"}\n",
                "data: {\"type\":\"result\",\"content\":\"fine\"}\n",
            ));
        })
        .await;

    let mut chat = ChatSession::new(&config_for(&server, true));
    chat.submit("q").await;

    // The malformed line reaches neither messages nor the feed.
    assert_eq!(chat.status_feed(), ["ok"]);
    assert_eq!(chat.messages()[1].content, "fine");
}

#[tokio::test]
async fn stream_without_terminal_returns_to_idle() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method("POST").path("/generate-stream");
            then.status(200)
                .body("data: {\"type\":\"status\",\"message\":\"a\"}\n");
        })
        .await;

    let mut chat = ChatSession::new(&config_for(&server, true));
    chat.submit("q").await;

    assert!(!chat.pending());
    assert_eq!(chat.messages()[1].content, ERROR_REPLY);
}

#[tokio::test]
async fn batch_mode_round_trip() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/generate")
                .json_body(serde_json::json!({ "prompt": "q" }));
            then.status(200)
                .json_body(serde_json::json!({ "content": "combined answer" }));
        })
        .await;

    let mut chat = ChatSession::new(&config_for(&server, false));
    chat.submit("q").await;

    mock.assert_async().await;
    assert_eq!(chat.messages()[1].content, "combined answer");
    assert!(chat.status_feed().is_empty());
    assert!(!chat.pending());
}
