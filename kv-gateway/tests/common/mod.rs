use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use auth::Claims;
use auth::JwtHandler;
use kv_gateway::app::App;
use kv_gateway::config::BootstrapUser;
use kv_gateway::config::Config;
use kv_gateway::config::Env;
use kv_gateway::config::JwtConfig;
use kv_gateway::config::PasswordConfig;
use kv_gateway::config::ServerConfig;
use kv_gateway::config::StorageBackend;
use kv_gateway::config::StorageConfig;
use kv_gateway::config::UserBackend;
use kv_gateway::config::UsersConfig;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory backends
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let config = Config {
            env: Env::Local,
            server: ServerConfig {
                // Port 0 lets the OS assign one
                address: "127.0.0.1:0".to_string(),
                shutdown_grace_secs: 1,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
                token_ttl_secs: 3600,
            },
            password: PasswordConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            users: UsersConfig {
                backend: UserBackend::Memory,
                database_url: None,
                bootstrap: vec![BootstrapUser {
                    username: "admin".to_string(),
                    password: "presale".to_string(),
                }],
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                nodes: Vec::new(),
                keyspace: "kv_gateway".to_string(),
                table: "entries".to_string(),
                connect_timeout_ms: 1000,
                write_timeout_ms: 5000,
            },
        };

        let app = App::build(&config).await.expect("Failed to build app");
        let address = format!(
            "http://{}",
            app.local_addr().expect("Failed to read bound address")
        );

        tokio::spawn(async move {
            app.run(std::future::pending())
                .await
                .expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET.as_bytes()),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Log in and return the issued token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Token missing from login response")
            .to_string()
    }

    /// Sign a token that expired an hour ago
    pub fn expired_token(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Clock before Unix epoch")
            .as_secs() as i64;

        let claims = Claims::issued_at(1, "admin", now - 7200, std::time::Duration::from_secs(3600));
        self.jwt_handler
            .encode(&claims)
            .expect("Failed to sign token")
    }
}
