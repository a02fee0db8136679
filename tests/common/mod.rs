#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use favs_api::database::DatabaseManager;
use favs_api::state::AppState;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    /// Serve the app on its own thread and runtime so it outlives any single test's runtime
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cheap hashes; must be set before the config singleton is first read
        std::env::set_var("SECURITY_BCRYPT_COST", "4");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("failed to build server runtime")?;

        thread::Builder::new()
            .name("favs-api-test-server".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let app = favs_api::app(AppState::new(DatabaseManager::in_memory()));
                    let listener = match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
                        Ok(listener) => listener,
                        Err(e) => {
                            eprintln!("test server failed to bind {}: {}", port, e);
                            return;
                        }
                    };
                    if let Err(e) = axum::serve(listener, app).await {
                        eprintln!("test server stopped: {}", e);
                    }
                })
            })
            .context("failed to spawn server thread")?;

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A suffix unique within this test process
pub fn unique(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{} {}-{}", prefix, millis, COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub fn unique_email(prefix: &str) -> String {
    unique(prefix).replace(' ', "") + "@email.com"
}

/// An account registered and logged in, ready to call /api
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub async fn new(server: &TestServer) -> Result<Self> {
        let client = reqwest::Client::new();
        let credentials = json!({ "email": unique_email("owner"), "password": "1234" });

        let register: Value = client
            .post(server.url("/auth/local/register"))
            .json(&credentials)
            .send()
            .await?
            .json()
            .await?;
        let login: Value = client
            .post(server.url("/auth/local/login"))
            .json(&credentials)
            .send()
            .await?
            .json()
            .await?;

        Ok(Self {
            user_id: register["data"]["_id"].as_str().context("register returned no id")?.to_string(),
            token: login["data"].as_str().context("login returned no token")?.to_string(),
        })
    }

    pub fn get(&self, server: &TestServer, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(server.url(path)).bearer_auth(&self.token)
    }

    pub fn post(&self, server: &TestServer, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().post(server.url(path)).bearer_auth(&self.token)
    }

    pub fn put(&self, server: &TestServer, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().put(server.url(path)).bearer_auth(&self.token)
    }

    pub fn delete(&self, server: &TestServer, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().delete(server.url(path)).bearer_auth(&self.token)
    }
}

/// Assert the error envelope shape and return its message
pub fn error_message(body: &Value) -> &str {
    assert_eq!(body["error"], true, "not an error envelope: {}", body);
    assert!(body.get("success").is_none(), "error envelope carries success: {}", body);
    body["message"].as_str().unwrap_or_default()
}
