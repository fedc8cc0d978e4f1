//! Integration tests for session lifecycle: welcome, login, disconnect.

mod common;

use common::{TestClient, TestServer};
use parlor_proto::Response;

#[tokio::test]
async fn test_welcome_is_the_first_line() {
    let port = 17601;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = TestClient::connect(&server.address())
        .await
        .expect("Failed to connect alice");
    let alice_id = alice.welcome().await.expect("Alice got no welcome");

    let mut bob = TestClient::connect(&server.address())
        .await
        .expect("Failed to connect bob");
    let bob_id = bob.welcome().await.expect("Bob got no welcome");

    // Each session speaks for its own freshly allocated user id.
    assert_ne!(alice_id, bob_id);
}

#[tokio::test]
async fn test_login_pushes_history_then_rooms() {
    let port = 17602;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = TestClient::connect(&server.address())
        .await
        .expect("Failed to connect alice");
    let alice_id = alice.welcome().await.expect("Alice got no welcome");

    alice
        .send_raw("login|alice|19|Houston|Rice")
        .await
        .expect("Login send failed");

    let first = alice.recv().await.expect("No history push");
    match first {
        Response::UserChatHistory {
            user_id,
            user_name,
            chats,
        } => {
            assert_eq!(user_id, alice_id);
            assert_eq!(user_name, "alice");
            assert!(chats.is_empty());
        }
        other => panic!("Expected UserChatHistory first, got {:?}", other),
    }

    let second = alice.recv().await.expect("No rooms push");
    match second {
        Response::UserRooms {
            user_id,
            user_name,
            owned,
            joined,
            available,
        } => {
            assert_eq!(user_id, alice_id);
            assert_eq!(user_name, "alice");
            assert!(owned.is_empty());
            assert!(joined.is_empty());
            assert!(available.is_empty());
        }
        other => panic!("Expected UserRooms second, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_login_is_rejected() {
    let port = 17603;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = server.connect().await.expect("Failed to connect alice");
    alice.welcome().await.expect("Alice got no welcome");
    alice
        .login("alice", 19, "Houston", "Rice")
        .await
        .expect("Alice login failed");

    alice
        .send_raw("login|alice|19|Houston|Rice")
        .await
        .expect("Second login send failed");

    let resp = alice.recv().await.expect("No response to second login");
    assert!(
        matches!(&resp, Response::Error { code, .. } if code == "already_logged_in"),
        "Expected already_logged_in, got {:?}",
        resp
    );
}

#[tokio::test]
async fn test_requests_require_login() {
    let port = 17604;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = server.connect().await.expect("Failed to connect alice");
    alice.welcome().await.expect("Alice got no welcome");

    alice
        .send_raw("create|Teens|13|19|Houston|Lanier")
        .await
        .expect("Create send failed");

    let resp = alice.recv().await.expect("No response to create");
    assert!(
        matches!(&resp, Response::Error { code, .. } if code == "not_logged_in"),
        "Expected not_logged_in, got {:?}",
        resp
    );
}

#[tokio::test]
async fn test_unknown_operation_is_reported() {
    let port = 17605;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = server.connect().await.expect("Failed to connect alice");
    alice.welcome().await.expect("Alice got no welcome");

    alice.send_raw("shout|1|hello").await.expect("Send failed");

    let resp = alice.recv().await.expect("No response to unknown tag");
    assert!(
        matches!(&resp, Response::Error { code, .. } if code == "unknown_command"),
        "Expected unknown_command, got {:?}",
        resp
    );
}

#[tokio::test]
async fn test_malformed_request_is_reported() {
    let port = 17606;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = server.connect().await.expect("Failed to connect alice");
    alice.welcome().await.expect("Alice got no welcome");

    // Age must parse as a number.
    alice
        .send_raw("login|alice|young|Houston|Rice")
        .await
        .expect("Send failed");

    let resp = alice.recv().await.expect("No response to bad login");
    assert!(
        matches!(&resp, Response::Error { code, .. } if code == "malformed"),
        "Expected malformed, got {:?}",
        resp
    );
}

#[tokio::test]
async fn test_disconnect_logs_out_of_rooms() {
    let port = 17607;
    let server = TestServer::spawn(port)
        .await
        .expect("Failed to spawn test server");

    let mut alice = server.connect().await.expect("Failed to connect alice");
    alice.welcome().await.expect("Alice got no welcome");
    alice
        .login("alice", 16, "Houston", "Lanier")
        .await
        .expect("Alice login failed");

    let mut bob = server.connect().await.expect("Failed to connect bob");
    let bob_id = bob.welcome().await.expect("Bob got no welcome");
    bob.login("bob", 15, "Houston", "Lanier")
        .await
        .expect("Bob login failed");

    let room_id = alice
        .create("Teens", 13, 19, "Houston", "Lanier")
        .await
        .expect("Alice create failed");
    bob.join(room_id).await.expect("Bob join failed");

    // Dropping the socket is the only goodbye a client sends.
    drop(bob);

    let responses = alice
        .recv_until(|resp| {
            matches!(resp, Response::UserRooms { owned, .. }
                if owned.iter().any(|room| {
                    room.notifications.iter().any(|n| n == "bob is logging out.")
                }))
        })
        .await
        .expect("Alice never saw the logout notice");

    let Some(Response::UserRooms { owned, .. }) = responses.last() else {
        panic!("Expected UserRooms last");
    };
    assert!(!owned[0].members.contains_key(&bob_id));
}
