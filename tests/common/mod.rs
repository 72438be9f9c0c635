//! Common test utilities for E2E tests

use chrono::{Duration, Utc};
use lenspost::auth::{AuthContext, create_access_token};
use lenspost::data::{EntityId, User};
use lenspost::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

pub const TEST_TOKEN_SECRET: &str = "test-secret-key-32-bytes-long!!!";

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            auth: config::AuthConfig {
                token_secret: TEST_TOKEN_SECRET.to_string(),
                token_max_age: 604_800,
            },
            feed: config::FeedConfig {
                home_sample_size: 50,
                explore_sample_size: 20,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = lenspost::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Insert a user directly and mint a bearer token for them.
    ///
    /// Credential issuance is external to the service, so tests seed
    /// identities at the storage layer and sign tokens with the
    /// configured secret.
    pub async fn create_user(&self, username: &str) -> (String, String) {
        let user = User {
            id: EntityId::new().0,
            username: username.to_string(),
            name: Some(format!("{} name", username)),
            bio: None,
            avatar_url: Some(format!("https://cdn.example.com/{}.webp", username)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state.db.insert_user(&user).await.unwrap();

        let now = Utc::now();
        let context = AuthContext {
            user_id: user.id.clone(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now + Duration::days(7),
        };
        let token = create_access_token(&context, TEST_TOKEN_SECRET).unwrap();

        (user.id, token)
    }

    /// Create a post for a user and return its ID.
    pub async fn create_post(&self, token: &str, images: &[&str]) -> String {
        let response = self
            .client
            .post(self.url("/api/create-post"))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "caption": "test post",
                "hashtags": ["testing"],
                "images": images,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        let body: serde_json::Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }
}
