//! Conversation API integration tests.
//!
//! Drives `/api/v2/conversations` through the full router with axum-test.

mod common;

use axum::http::{header::COOKIE, StatusCode};
use chat_api::db;
use chat_api::models::{
    Assistant, Conversation, Message, MessageFrom, ObjectId, Owner, SharedConversation,
};
use serde_json::Value;

use common::{build_test_app, login, session_cookie, session_id};

const ACCESS_DENIED: &str = "You don't have access to this conversation. If someone gave you this link, ask them to use the 'share' feature instead.";

fn owner(secret: &str) -> Owner {
    Owner::Session(session_id(secret))
}

fn tree_conversation(owner: &Owner, title: &str) -> Conversation {
    let mut conv = Conversation::new(owner, title, "zephyr");
    let root = Message::new(MessageFrom::System, "");
    let mut user = Message::new(MessageFrom::User, "hello");
    user.ancestors = Some(vec![root.id.clone()]);
    conv.root_message_id = Some(root.id.clone());
    conv.messages = vec![root, user];
    conv
}

// ============================================================================
// GET /conversations/:id
// ============================================================================

#[tokio::test]
async fn test_get_own_conversation() {
    let (server, state) = build_test_app().await;
    let conv = tree_conversation(&owner("alice"), "Hello there");
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], conv.id.to_hex());
    assert_eq!(body["title"], "Hello there");
    assert_eq!(body["model"], "zephyr");
    assert_eq!(body["modelId"], "zephyr");
    assert_eq!(body["modelTools"], true);
    assert_eq!(body["shared"], false);
    assert_eq!(body["rootMessageId"], conv.messages[0].id.as_str());
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert!(body["updatedAt"].is_string());
    assert!(body.get("assistant").is_none());
    assert!(body.get("assistantId").is_none());
}

#[tokio::test]
async fn test_legacy_conversation_is_converted() {
    let (server, state) = build_test_app().await;
    let mut conv = Conversation::new(&owner("alice"), "Legacy", "zephyr");
    conv.preprompt = Some("Be brief".into());
    conv.messages = vec![
        Message::new(MessageFrom::User, "hi"),
        Message::new(MessageFrom::Assistant, "hello"),
    ];
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["from"], "system");
    assert_eq!(messages[0]["content"], "Be brief");
    assert_eq!(body["rootMessageId"], messages[0]["id"]);
    assert_eq!(body["preprompt"], "Be brief");
    assert_eq!(messages[2]["ancestors"].as_array().unwrap().len(), 2);
    assert_eq!(messages[2]["children"], serde_json::json!([]));
}

#[tokio::test]
async fn test_foreign_conversation_is_forbidden() {
    let (server, state) = build_test_app().await;
    let conv = tree_conversation(&owner("alice"), "Private");
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("mallory"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(body["error"]["message"], ACCESS_DENIED);
}

#[tokio::test]
async fn test_unknown_conversation_is_not_found() {
    let (server, _state) = build_test_app().await;

    let response = server
        .get(&format!("/api/v2/conversations/{}", ObjectId::new()))
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Conversation not found.");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (server, _state) = build_test_app().await;

    let response = server
        .get("/api/v2/conversations/not-a-valid-id")
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid conversation ID format");
}

#[tokio::test]
async fn test_logged_in_user_owns_by_user_id() {
    let (server, state) = build_test_app().await;
    let user = login(&state.db, "Ada", "ada-secret").await;
    let conv = tree_conversation(&Owner::User(user.id), "Signed in");
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("ada-secret"))
        .await;
    response.assert_status_ok();

    // An anonymous session with the same cookie secret but no login is someone else.
    let (other_server, other_state) = build_test_app().await;
    db::save_conversation(&other_state.db, &conv).await.unwrap();
    let response = other_server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("ada-secret"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_assistant_is_embedded() {
    let (server, state) = build_test_app().await;
    let assistant = Assistant::new("someone", "Pirate", "zephyr");
    db::save_assistant(&state.db, &assistant).await.unwrap();

    let mut conv = tree_conversation(&owner("alice"), "Arr");
    conv.assistant_id = Some(assistant.id);
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .get(&format!("/api/v2/conversations/{}", conv.id))
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["assistantId"], assistant.id.to_hex());
    assert_eq!(body["assistant"]["name"], "Pirate");
}

// ============================================================================
// Shared conversations
// ============================================================================

#[tokio::test]
async fn test_shared_conversation_by_short_id() {
    let (server, state) = build_test_app().await;
    let source = tree_conversation(&owner("alice"), "Shared chat");
    let shared = SharedConversation {
        id: "AbC1234".into(),
        hash: "deadbeef".into(),
        title: source.title.clone(),
        root_message_id: source.root_message_id.clone(),
        messages: source.messages.clone(),
        model: source.model.clone(),
        preprompt: None,
        assistant_id: None,
        created_at: source.created_at,
        updated_at: source.updated_at,
    };
    db::save_shared_conversation(&state.db, &shared).await.unwrap();

    let response = server
        .get("/api/v2/conversations/AbC1234")
        .add_header(COOKIE, session_cookie("bob"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "AbC1234");
    assert_eq!(body["shared"], true);
    assert_eq!(body["title"], "Shared chat");
}

#[tokio::test]
async fn test_unknown_short_id_is_not_found() {
    let (server, _state) = build_test_app().await;

    let response = server.get("/api/v2/conversations/zzzzzzz").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Conversation not found");
}

// ============================================================================
// Stub routes
// ============================================================================

#[tokio::test]
async fn test_stub_routes_answer_not_implemented() {
    let (server, state) = build_test_app().await;
    let conv = tree_conversation(&owner("alice"), "Stubs");
    db::save_conversation(&state.db, &conv).await.unwrap();
    let message_id = conv.messages[1].id.clone();
    let cookie = session_cookie("alice");

    let base = format!("/api/v2/conversations/{}", conv.id);
    let responses = vec![
        server.post(&base).add_header(COOKIE, cookie.clone()).await,
        server
            .get(&format!("{}/output/abc123", base))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .post(&format!("{}/share", base))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .post(&format!("{}/stop-generating", base))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .get(&format!("{}/messages/{}", base, message_id))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .delete(&format!("{}/messages/{}", base, message_id))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .get(&format!("{}/messages/{}/prompt", base, message_id))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .post(&format!("{}/messages/{}/vote", base, message_id))
            .add_header(COOKIE, cookie.clone())
            .await,
        server
            .post("/api/v2/conversations")
            .add_header(COOKIE, cookie.clone())
            .await,
    ];

    for response in responses {
        response.assert_status(StatusCode::NOT_IMPLEMENTED);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "NOT_IMPLEMENTED");
    }
}

#[tokio::test]
async fn test_stub_routes_check_access_first() {
    let (server, state) = build_test_app().await;
    let conv = tree_conversation(&owner("alice"), "Private");
    db::save_conversation(&state.db, &conv).await.unwrap();

    let response = server
        .post(&format!("/api/v2/conversations/{}/share", conv.id))
        .add_header(COOKIE, session_cookie("mallory"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post("/api/v2/conversations/bogus/stop-generating")
        .add_header(COOKIE, session_cookie("mallory"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// GET /conversations
// ============================================================================

#[tokio::test]
async fn test_list_conversations_newest_first() {
    let (server, state) = build_test_app().await;
    let alice = owner("alice");

    let older = tree_conversation(&alice, "Older");
    let mut newer = tree_conversation(&alice, "Newer");
    newer.updated_at = older.updated_at + chrono::Duration::minutes(1);
    let foreign = tree_conversation(&owner("bob"), "Bob's");
    for conv in [&older, &newer, &foreign] {
        db::save_conversation(&state.db, conv).await.unwrap();
    }

    let response = server
        .get("/api/v2/conversations")
        .add_header(COOKIE, session_cookie("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Newer");
    assert_eq!(items[0]["_id"], newer.id.to_hex());
    assert_eq!(items[1]["title"], "Older");
    assert!(items[0].get("messages").is_none());

    let response = server
        .get("/api/v2/conversations")
        .add_query_param("p", 1)
        .add_header(COOKIE, session_cookie("alice"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}
