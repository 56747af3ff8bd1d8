//! Common test utilities - VttTest harness for end-to-end testing

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tokio::task::JoinHandle;
use vttd::{Config, Server};

/// Test harness that spawns a real vttd server on a random port
pub struct VttTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl VttTest {
    /// Start a new test server instance
    pub async fn start() -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            db_path: None, // In-memory for tests
        };

        let server = Arc::new(Server::new(config).await?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with no body
    pub async fn post_empty(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Get direct access to the database for test setup/assertions
    pub fn db(&self) -> Arc<vttd::db::Database> {
        self.server.db()
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }

    /// Register an account via the API, returning (account_id, token)
    pub async fn register(&self, username: &str) -> Result<(String, String)> {
        let resp = self
            .post(
                "/auth/register",
                &serde_json::json!({ "username": username, "password": "secret123" }),
            )
            .await?;
        anyhow::ensure!(resp.status() == 201, "register failed: {}", resp.status());

        let body: serde_json::Value = resp.json().await?;
        Ok((
            body["account_id"].as_str().unwrap_or_default().to_string(),
            body["token"].as_str().unwrap_or_default().to_string(),
        ))
    }

    /// Create a campaign via the API
    pub async fn create_campaign(&self, id: &str, name: &str, owner_id: &str) -> Result<()> {
        let resp = self
            .post(
                "/campaign/create",
                &serde_json::json!({ "id": id, "name": name, "owner_id": owner_id }),
            )
            .await?;
        anyhow::ensure!(resp.status() == 201, "campaign create failed: {}", resp.status());
        Ok(())
    }

    /// Create a room and open it, ready for tabletop operations
    pub async fn create_open_room(&self, id: &str, campaign_id: &str, name: &str) -> Result<()> {
        let resp = self
            .post(
                "/room/create",
                &serde_json::json!({ "id": id, "campaign_id": campaign_id, "name": name }),
            )
            .await?;
        anyhow::ensure!(resp.status() == 201, "room create failed: {}", resp.status());

        let resp = self.post_empty(&format!("/room/{}/open", id)).await?;
        anyhow::ensure!(resp.status() == 200, "room open failed: {}", resp.status());
        Ok(())
    }
}

impl Drop for VttTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
