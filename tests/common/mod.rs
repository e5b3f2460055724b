#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::Method,
    middleware::{self, Next},
};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::oneshot;

use recordkeeper::client::{App, MemoryStore, NotificationCenter};
use recordkeeper::config::AppConfig;
use recordkeeper::server;
use recordkeeper::state::AppState;

pub const EMAIL: &str = "nuevo@test.com";
pub const PASSWORD: &str = "password123";

/// An in-process API server on its own port and its own database file
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    requests: Arc<Mutex<Vec<(Method, String)>>>,
    shutdown: Option<oneshot::Sender<()>>,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir()?;
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.store.db_path = dir.path().join("db.json");
        // Keep hashing fast
        config.security.bcrypt_cost = 4;

        let state = AppState::from_config(config).await?;

        let requests: Arc<Mutex<Vec<(Method, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();
        let app = server::app(state.clone()).layer(middleware::from_fn(move |req: Request, next: Next| {
            let log = log.clone();
            async move {
                log.lock()
                    .unwrap()
                    .push((req.method().clone(), req.uri().path().to_string()));
                next.run(req).await
            }
        }));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await;
        });

        Ok(Self {
            port,
            base_url,
            state,
            requests,
            shutdown: Some(shutdown),
            _dir: dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// How many requests with `method` reached the server
    pub fn count(&self, method: &Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Log in as the seed user and return the bearer token
    pub async fn token(&self) -> Result<String> {
        let res = reqwest::Client::new()
            .post(self.url("/login"))
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status().is_success(), "login failed: {}", res.status());

        let body: serde_json::Value = res.json().await?;
        body["accessToken"]
            .as_str()
            .map(str::to_string)
            .context("missing accessToken")
    }

    /// A client app wired to this server with in-memory storage
    pub fn client(&self) -> Result<ClientHarness> {
        let storage = Arc::new(MemoryStore::new());
        let notifications = Arc::new(NotificationCenter::new());
        let app = App::new(&self.base_url, storage.clone(), notifications.clone())?;
        Ok(ClientHarness {
            app,
            storage,
            notifications,
        })
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub struct ClientHarness {
    pub app: App,
    pub storage: Arc<MemoryStore>,
    pub notifications: Arc<NotificationCenter>,
}
