#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

pub const PASSWORD: &str = "testpass123";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_habit-tracker-api"));
        cmd.arg("serve")
            .env("HABIT_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
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
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A server owned by the calling test, or `None` when no database is configured.
/// The process is killed when the returned value goes out of scope.
pub async fn ensure_server() -> Result<Option<TestServer>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping integration test");
        return Ok(None);
    }

    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(30)).await?;
    Ok(Some(server))
}

/// Thin JSON client, optionally carrying a bearer token
pub struct Api {
    pub base_url: String,
    pub token: Option<String>,
    pub username: String,
    client: reqwest::Client,
}

impl Api {
    pub fn anonymous(server: &TestServer) -> Self {
        Self {
            base_url: server.base_url.clone(),
            token: None,
            username: String::new(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("non-JSON response: {}", text))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, None).await
    }

    /// Create a habit and return its id
    pub async fn create_habit(&self, name: &str, target: i64) -> Result<String> {
        let (status, body) = self
            .post(
                "/habits",
                json!({
                    "name": name,
                    "description": format!("{} every day", name),
                    "target": target,
                    "unit": "times"
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create habit failed: {} {}", status, body);
        Ok(id_of(&body))
    }

    /// Create a record and return its id
    pub async fn create_record(&self, habit: &str, date: &str, amount: i64) -> Result<String> {
        let (status, body) = self
            .post(
                "/daily-records",
                json!({ "habit": habit, "date": date, "amount_achieved": amount }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create record failed: {} {}", status, body);
        Ok(id_of(&body))
    }
}

pub fn id_of(body: &Value) -> String {
    body["data"]["id"].as_str().unwrap_or_default().to_string()
}

pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// Register a fresh account and log it in
pub async fn user(server: &TestServer) -> Result<Api> {
    let mut api = Api::anonymous(server);
    let username = unique_username();

    let (status, body) = api
        .post("/auth/register", json!({ "username": username, "password": PASSWORD }))
        .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

    let (status, body) = api
        .post("/auth/login", json!({ "username": username, "password": PASSWORD }))
        .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

    api.token = body["data"]["token"].as_str().map(str::to_string);
    api.username = username;
    Ok(api)
}
