//! E2E tests for like/save/follow toggles

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_toggles_require_auth() {
    let server = TestServer::new().await;

    for path in [
        "/api/like-unlike/some-post",
        "/api/save-unsave/some-post",
        "/api/follow/some-user",
    ] {
        let response = server.client.post(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 401, "{} should require auth", path);
    }
}

#[tokio::test]
async fn test_like_toggle_flips_state_and_reports_fresh_count() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;
    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    // First toggle: liked
    let response = server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["liked"], true);
    assert_eq!(body["likeCount"], 1);

    // Second toggle: unliked, count back to zero
    let response = server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["liked"], false);
    assert_eq!(body["likeCount"], 0);
}

#[tokio::test]
async fn test_like_unknown_post_is_not_found() {
    let server = TestServer::new().await;
    let (_id, token) = server.create_user("alice").await;

    let response = server
        .client
        .post(server.url("/api/like-unlike/no-such-post"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_save_toggle_round_trip_removes_saved_listing_entry() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;
    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    let response = server
        .client
        .post(server.url(&format!("/api/save-unsave/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["saved"], true);

    // Second toggle reports saved=false
    let response = server
        .client
        .post(server.url(&format!("/api/save-unsave/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["saved"], false);

    // The post no longer appears in bob's saved listing
    let response = server
        .client
        .get(server.url("/api/saved-posts"))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let saved: Value = response.json().await.unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_follow_toggle_round_trip() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (bob_id, _bob_token) = server.create_user("bob").await;

    let response = server
        .client
        .post(server.url(&format!("/api/follow/{}", bob_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["following"], true);

    // Bob's profile shows one follower from alice's point of view
    let response = server
        .client
        .get(server.url(&format!("/api/get-user/{}", bob_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["followersCount"], 1);
    assert_eq!(profile["isFollowing"], true);

    // Toggle again: unfollowed
    let response = server
        .client
        .post(server.url(&format!("/api/follow/{}", bob_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["following"], false);

    let response = server
        .client
        .get(server.url(&format!("/api/get-user/{}", bob_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["followersCount"], 0);
    assert_eq!(profile["isFollowing"], false);
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let server = TestServer::new().await;
    let (alice_id, alice_token) = server.create_user("alice").await;

    let response = server
        .client
        .post(server.url(&format!("/api/follow/{}", alice_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You can't follow yourself.");
}

#[tokio::test]
async fn test_follow_unknown_user_is_not_found() {
    let server = TestServer::new().await;
    let (_id, token) = server.create_user("alice").await;

    let response = server
        .client
        .post(server.url("/api/follow/no-such-user"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
