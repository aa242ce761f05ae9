//! REST API integration tests
//!
//! Each test starts an in-process gateway on an ephemeral port.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error_code, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use stream_core::UserId;

async fn create_session(server: &TestServer, owner: UserId) -> SessionBody {
    let response = server.post_as("/sessions", owner, &EmptyBody {}).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Greeting and Health
// ============================================================================

#[tokio::test]
async fn test_greeting() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Hello World!");
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_create_session() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();

    let session = create_session(&server, owner).await;

    assert_eq!(session.owner_id, owner.to_string());
    assert!(session.invited_user_ids.is_empty());
    assert_eq!(session.message_count, 0);
    assert_eq!(session.listener_count, 0);
}

#[tokio::test]
async fn test_list_owned_sessions() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();

    let first = create_session(&server, owner).await;
    let second = create_session(&server, owner).await;
    create_session(&server, UserId::generate()).await;

    let response = server.get_as("/sessions", owner).await.unwrap();
    let sessions: Vec<SessionBody> = assert_json(response, StatusCode::OK).await.unwrap();

    let mut ids: Vec<String> = sessions.into_iter().map(|s| s.id).collect();
    ids.sort();
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let missing = UserId::generate().to_string();

    let response = server
        .get_as(&format!("/sessions/{missing}"), UserId::generate())
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_STREAMING_SESSION");
}

#[tokio::test]
async fn test_malformed_session_id_is_bad_request() {
    let server = TestServer::start().await.unwrap();

    let response = server.get_as("/sessions/not-a-uuid", UserId::generate()).await.unwrap();

    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Caller identity
// ============================================================================

#[tokio::test]
async fn test_missing_caller_is_unauthorized() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/sessions").await.unwrap();

    let code = assert_error_code(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_USER_ID");
}

#[tokio::test]
async fn test_malformed_caller_is_bad_request() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .get(format!("{}/sessions", server.base_url()))
        .header(integration_tests::USER_ID_HEADER, "12345")
        .send()
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_USER_ID");
}

// ============================================================================
// Invites
// ============================================================================

#[tokio::test]
async fn test_owner_invites_accounts() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let (alice, bob) = (UserId::generate(), UserId::generate());
    let session = create_session(&server, owner).await;
    let path = format!("/sessions/{}/invites", session.id);

    let response = server.post_as(&path, owner, &InviteBody::users(&[alice, bob])).await.unwrap();
    let result: InviteResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.session_id, session.id);
    assert_eq!(result.invited, 2);

    // Inviting again changes nothing
    let response = server.post_as(&path, owner, &InviteBody::users(&[alice])).await.unwrap();
    let result: InviteResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.invited, 0);

    let response = server.get_as(&format!("/sessions/{}", session.id), alice).await.unwrap();
    let fetched: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.invited_user_ids.len(), 2);
    assert!(fetched.invited_user_ids.contains(&bob.to_string()));
}

#[tokio::test]
async fn test_non_owner_cannot_invite() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let intruder = UserId::generate();
    let session = create_session(&server, owner).await;

    let response = server
        .post_as(
            &format!("/sessions/{}/invites", session.id),
            intruder,
            &InviteBody::users(&[intruder]),
        )
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_SESSION_OWNER");
}

#[tokio::test]
async fn test_invite_into_unknown_session() {
    let server = TestServer::start().await.unwrap();
    let missing = UserId::generate().to_string();

    let response = server
        .post_as(
            &format!("/sessions/{missing}/invites"),
            UserId::generate(),
            &InviteBody::users(&[UserId::generate()]),
        )
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_STREAMING_SESSION");
}

#[tokio::test]
async fn test_empty_invite_rejected() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let response = server
        .post_as(&format!("/sessions/{}/invites", session.id), owner, &InviteBody::users(&[]))
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_owner_writes_and_invited_user_reads() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let viewer = UserId::generate();
    let session = create_session(&server, owner).await;

    server
        .post_as(&format!("/sessions/{}/invites", session.id), owner, &InviteBody::users(&[viewer]))
        .await
        .unwrap();

    let messages_path = format!("/sessions/{}/messages", session.id);
    for text in ["first", "second"] {
        let response = server
            .post_as(&messages_path, owner, &WriteMessageBody::text(text))
            .await
            .unwrap();
        let result: WriteMessageResult = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(result.message.text, text);
        assert_eq!(result.message.author_id, Some(owner.to_string()));
        assert_eq!(result.delivered, 0);
        assert_eq!(result.failed, 0);
    }

    let response = server.get_as(&messages_path, viewer).await.unwrap();
    let messages: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn test_only_owner_writes() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let viewer = UserId::generate();
    let session = create_session(&server, owner).await;

    server
        .post_as(&format!("/sessions/{}/invites", session.id), owner, &InviteBody::users(&[viewer]))
        .await
        .unwrap();

    let response = server
        .post_as(
            &format!("/sessions/{}/messages", session.id),
            viewer,
            &WriteMessageBody::text("hijack"),
        )
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_SESSION_OWNER");
}

#[tokio::test]
async fn test_uninvited_user_cannot_read() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let response = server
        .get_as(&format!("/sessions/{}/messages", session.id), UserId::generate())
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_INVITED");
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let response = server
        .post_as(
            &format!("/sessions/{}/messages", session.id),
            owner,
            &WriteMessageBody::text(""),
        )
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_configured_length_limit() {
    let config = integration_tests::test_config(&[("MAX_MESSAGE_LENGTH", "5")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let response = server
        .post_as(
            &format!("/sessions/{}/messages", session.id),
            owner,
            &WriteMessageBody::text("too long"),
        )
        .await
        .unwrap();

    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CONTENT_TOO_LONG");
}
