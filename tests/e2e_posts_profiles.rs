//! E2E tests for post creation/deletion and profile surfaces

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_create_post_validates_schema() {
    let server = TestServer::new().await;
    let (_id, token) = server.create_user("alice").await;

    // Missing hashtags and images
    let response = server
        .client
        .post(server.url("/api/create-post"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "caption": "hi", "hashtags": [], "images": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"hashtags".to_string()));
    assert!(fields.contains(&"images".to_string()));

    // Non-URL image reference
    let response = server
        .client
        .post(server.url("/api/create-post"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "hashtags": ["sky"],
            "images": ["not-a-url"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_only_the_author_can_delete_a_post() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;
    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    let response = server
        .client
        .delete(server.url(&format!("/api/delete-post/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = server
        .client
        .delete(server.url(&format!("/api/delete-post/{}", post_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .get(server.url(&format!("/api/get-post/{}", post_id)))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_my_profile_reports_counts_and_post_grid() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;

    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    // Bob likes alice's post and follows alice
    server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/api/myprofile"))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["totalPosts"], 1);
    assert_eq!(profile["posts"][0]["likeCount"], 1);
    assert_eq!(
        profile["posts"][0]["images"][0],
        "https://cdn.example.com/a.webp"
    );
    // Own profile carries no isFollowing flag
    assert!(profile.get("isFollowing").is_none());
}

#[tokio::test]
async fn test_edit_profile_validates_and_applies_changes() {
    let server = TestServer::new().await;
    let (_id, token) = server.create_user("alice").await;

    // Name too short
    let response = server
        .client
        .put(server.url("/api/edit-profile"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "name": "a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = server
        .client
        .put(server.url("/api/edit-profile"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "name": "Alice Liddell",
            "bio": "photographer",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["name"], "Alice Liddell");
    assert_eq!(body["user"]["bio"], "photographer");

    let response = server
        .client
        .get(server.url("/api/myprofile"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["name"], "Alice Liddell");
    assert_eq!(profile["bio"], "photographer");
}

#[tokio::test]
async fn test_search_requires_query_and_excludes_self() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    server.create_user("alicia").await;

    let response = server
        .client
        .get(server.url("/api/search"))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = server
        .client
        .get(server.url("/api/search?username=ali"))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let results: Value = response.json().await.unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["username"], "alicia");
}

#[tokio::test]
async fn test_liked_posts_listing_tracks_toggles() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.create_user("alice").await;
    let (_bob_id, bob_token) = server.create_user("bob").await;
    let post_id = server
        .create_post(&alice_token, &["https://cdn.example.com/a.webp"])
        .await;

    server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/api/liked-posts"))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let liked: Value = response.json().await.unwrap();
    assert_eq!(liked.as_array().unwrap().len(), 1);
    assert_eq!(liked[0]["id"], post_id.as_str());
    assert_eq!(liked[0]["likeCount"], 1);

    // Unlike removes it from the listing
    server
        .client
        .post(server.url(&format!("/api/like-unlike/{}", post_id)))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/api/liked-posts"))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    let liked: Value = response.json().await.unwrap();
    assert!(liked.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}
