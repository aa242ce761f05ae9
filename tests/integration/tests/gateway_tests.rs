//! WebSocket gateway integration tests
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{assert_json, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::json;
use stream_core::UserId;

async fn create_session(server: &TestServer, owner: UserId) -> SessionBody {
    let response = server.post_as("/sessions", owner, &EmptyBody {}).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn invite(server: &TestServer, owner: UserId, session_id: &str, users: &[UserId]) {
    let response = server
        .post_as(&format!("/sessions/{session_id}/invites"), owner, &InviteBody::users(users))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn write(server: &TestServer, owner: UserId, session_id: &str, text: &str) -> WriteMessageResult {
    let response = server
        .post_as(
            &format!("/sessions/{session_id}/messages"),
            owner,
            &WriteMessageBody::text(text),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

/// Poll the session summary until its listener count settles at `expected`
async fn wait_for_listeners(server: &TestServer, owner: UserId, session_id: &str, expected: usize) {
    for _ in 0..50 {
        let response = server.get_as(&format!("/sessions/{session_id}"), owner).await.unwrap();
        let session: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();
        if session.listener_count == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("listener count never reached {expected}");
}

#[tokio::test]
async fn test_hello_and_heartbeat() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_gateway().await.unwrap();

    client.send_json(json!({ "op": 1, "d": null })).await.unwrap();

    let ack = client.next_json().await.unwrap();
    assert_eq!(ack["op"], 11);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_listener_receives_live_messages() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let viewer = UserId::generate();
    let session = create_session(&server, owner).await;
    invite(&server, owner, &session.id, &[viewer]).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(viewer, &session.id).await.unwrap();

    let (event, ready) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "READY");
    assert_eq!(ready["session_id"], session.id.as_str());
    assert_eq!(ready["message_count"], 0);

    wait_for_listeners(&server, owner, &session.id, 1).await;

    let result = write(&server, owner, &session.id, "live").await;
    assert_eq!(result.delivered, 1);

    let (event, payload) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "MESSAGE_CREATE");
    assert_eq!(payload["text"], "live");
    assert_eq!(payload["author_id"], owner.to_string().as_str());
}

#[tokio::test]
async fn test_backlog_replayed_before_live_messages() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let viewer = UserId::generate();
    let session = create_session(&server, owner).await;
    invite(&server, owner, &session.id, &[viewer]).await;

    write(&server, owner, &session.id, "one").await;
    write(&server, owner, &session.id, "two").await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(viewer, &session.id).await.unwrap();

    let (event, ready) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "READY");
    assert_eq!(ready["message_count"], 2);

    for expected in ["one", "two"] {
        let (event, payload) = client.next_dispatch().await.unwrap();
        assert_eq!(event, "MESSAGE_HISTORY");
        assert_eq!(payload["text"], expected);
    }

    wait_for_listeners(&server, owner, &session.id, 1).await;
    write(&server, owner, &session.id, "three").await;

    let (event, payload) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "MESSAGE_CREATE");
    assert_eq!(payload["text"], "three");
}

#[tokio::test]
async fn test_owner_can_listen_without_invite() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(owner, &session.id).await.unwrap();

    let (event, _) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "READY");
}

#[tokio::test]
async fn test_uninvited_listener_closed() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(UserId::generate(), &session.id).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), Some(4003));
}

#[tokio::test]
async fn test_unknown_session_closed() {
    let server = TestServer::start().await.unwrap();
    let missing = UserId::generate().to_string();

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(UserId::generate(), &missing).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), Some(4004));
}

#[tokio::test]
async fn test_listen_twice_closed() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(owner, &session.id).await.unwrap();
    client.listen(owner, &session.id).await.unwrap();

    let (event, _) = client.next_dispatch().await.unwrap();
    assert_eq!(event, "READY");
    assert_eq!(client.expect_close().await.unwrap(), Some(4005));
}

#[tokio::test]
async fn test_unknown_opcode_closed() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_gateway().await.unwrap();

    client.send_json(json!({ "op": 42 })).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), Some(4001));
}

#[tokio::test]
async fn test_malformed_listen_payload_closed() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_gateway().await.unwrap();

    client
        .send_json(json!({ "op": 2, "d": { "session_id": "nope" } }))
        .await
        .unwrap();

    assert_eq!(client.expect_close().await.unwrap(), Some(4002));
}

#[tokio::test]
async fn test_unlisten_detaches_listener() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(owner, &session.id).await.unwrap();
    client.next_dispatch().await.unwrap();
    wait_for_listeners(&server, owner, &session.id, 1).await;

    client
        .send_json(json!({ "op": 3, "d": { "session_id": session.id } }))
        .await
        .unwrap();
    wait_for_listeners(&server, owner, &session.id, 0).await;

    let result = write(&server, owner, &session.id, "nobody").await;
    assert_eq!(result.delivered, 0);
}

#[tokio::test]
async fn test_closing_socket_detaches_listener() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let session = create_session(&server, owner).await;

    let mut client = server.connect_gateway().await.unwrap();
    client.listen(owner, &session.id).await.unwrap();
    client.next_dispatch().await.unwrap();
    wait_for_listeners(&server, owner, &session.id, 1).await;

    client.close().await.unwrap();
    wait_for_listeners(&server, owner, &session.id, 0).await;
}

#[tokio::test]
async fn test_two_listeners_each_receive() {
    let server = TestServer::start().await.unwrap();
    let owner = UserId::generate();
    let (alice, bob) = (UserId::generate(), UserId::generate());
    let session = create_session(&server, owner).await;
    invite(&server, owner, &session.id, &[alice, bob]).await;

    let mut first = server.connect_gateway().await.unwrap();
    let mut second = server.connect_gateway().await.unwrap();
    first.listen(alice, &session.id).await.unwrap();
    second.listen(bob, &session.id).await.unwrap();
    first.next_dispatch().await.unwrap();
    second.next_dispatch().await.unwrap();
    wait_for_listeners(&server, owner, &session.id, 2).await;

    let result = write(&server, owner, &session.id, "both").await;
    assert_eq!(result.delivered, 2);

    for client in [&mut first, &mut second] {
        let (event, payload) = client.next_dispatch().await.unwrap();
        assert_eq!(event, "MESSAGE_CREATE");
        assert_eq!(payload["text"], "both");
    }
}
