//! E2E tests for feed assembly, explore, and single-post retrieval

mod common;

use common::TestServer;
use serde_json::Value;

async fn follow(server: &TestServer, token: &str, user_id: &str) {
    let response = server
        .client
        .post(server.url(&format!("/api/follow/{}", user_id)))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

async fn get_feed(server: &TestServer, token: &str) -> Vec<Value> {
    let response = server
        .client
        .get(server.url("/api/get-feed-posts"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_feed_is_empty_when_following_no_one() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;

    // Content exists, but the feed is strictly graph-scoped
    server
        .create_post(&bob_token, &["https://cdn.example.com/b.webp"])
        .await;

    assert!(get_feed(&server, &alice_token).await.is_empty());
}

#[tokio::test]
async fn test_feed_returns_followed_authors_posts_with_annotations() {
    let server = TestServer::new().await;
    let (_viewer_id, viewer_token) = server.create_user("viewer").await;
    let (author_a_id, author_a_token) = server.create_user("author_a").await;
    let (author_b_id, _author_b_token) = server.create_user("author_b").await;

    // A has 3 posts, B has none
    let mut post_ids = Vec::new();
    for i in 0..3 {
        let image = format!("https://cdn.example.com/a{}.webp", i);
        let post_id = server.create_post(&author_a_token, &[image.as_str()]).await;
        post_ids.push(post_id);
    }

    follow(&server, &viewer_token, &author_a_id).await;
    follow(&server, &viewer_token, &author_b_id).await;

    // Viewer likes and saves the first post
    server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_ids[0])))
        .header("Authorization", format!("Bearer {}", viewer_token))
        .send()
        .await
        .unwrap();
    server
        .client
        .post(server.url(&format!("/api/save-unsave/{}", post_ids[0])))
        .header("Authorization", format!("Bearer {}", viewer_token))
        .send()
        .await
        .unwrap();

    let feed = get_feed(&server, &viewer_token).await;
    assert_eq!(feed.len(), 3);

    for entry in &feed {
        assert_eq!(entry["author"]["username"], "author_a");
        assert!(entry["images"].as_array().unwrap().len() == 1);
        if entry["id"] == post_ids[0].as_str() {
            assert_eq!(entry["isLiked"], true);
            assert_eq!(entry["isSaved"], true);
            assert_eq!(entry["likeCount"], 1);
        } else {
            assert_eq!(entry["isLiked"], false);
            assert_eq!(entry["isSaved"], false);
            assert_eq!(entry["likeCount"], 0);
        }
    }
}

#[tokio::test]
async fn test_get_post_for_an_uninvolved_viewer() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;
    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    let response = server
        .client
        .get(server.url(&format!("/api/get-post/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let post: Value = response.json().await.unwrap();
    assert_eq!(post["isLiked"], false);
    assert_eq!(post["isSaved"], false);
    assert_eq!(post["likeCount"], 0);
    assert_eq!(post["author"]["username"], "alice");
    assert_eq!(post["hashtags"][0], "testing");
}

#[tokio::test]
async fn test_get_unknown_post_is_not_found() {
    let server = TestServer::new().await;
    let (_id, token) = server.create_user("alice").await;

    let response = server
        .client
        .get(server.url("/api/get-post/no-such-post"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_explore_samples_across_all_posts() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;

    for i in 0..3 {
        let image = format!("https://cdn.example.com/{}.webp", i);
        server.create_post(&bob_token, &[image.as_str()]).await;
    }

    // Alice follows nobody; explore is graph-independent
    let response = server
        .client
        .get(server.url("/api/explore"))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let sample: Value = response.json().await.unwrap();
    let sample = sample.as_array().unwrap();
    assert_eq!(sample.len(), 3);
    for entry in sample {
        assert!(entry["id"].is_string());
        assert!(entry["images"].is_array());
        assert_eq!(entry["likeCount"], 0);
        // No viewer state on the discovery surface
        assert!(entry.get("isLiked").is_none());
    }
}

#[tokio::test]
async fn test_feed_requires_auth() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/get-feed-posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}
