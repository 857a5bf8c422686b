//! Shared fixtures for the integration tests: a live server bound to an
//! ephemeral port and a scripted models client that records its calls.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use car_search::catalog::{CatalogSource, InMemoryCatalog};
use car_search::models::{Make, Model};
use car_search::search::ModelsClient;
use car_search::web::{self, AppState, PageSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(catalog: Arc<dyn CatalogSource>, settings: PageSettings) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let state = Arc::new(AppState { catalog, settings });

        let handle = tokio::spawn(async move {
            axum::serve(listener, web::router(state)).await.expect("Server crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub async fn sample() -> Self {
        Self::start(Arc::new(InMemoryCatalog::sample()), PageSettings::default()).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn model(name: &str, count: u64) -> Model {
    Model { model: name.to_string(), count }
}

/// Catalog whose model lookups always fail
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn makes(&self) -> Result<Vec<Make>> {
        Ok(Vec::new())
    }

    async fn models(&self, _make: Option<&str>) -> Result<Vec<Model>> {
        anyhow::bail!("database unavailable")
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// Models client answering from a fixed table and recording each request
#[derive(Default)]
pub struct FakeModels {
    table: HashMap<String, Vec<Model>>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, make: &str, models: Vec<Model>) -> Self {
        self.table.insert(make.to_string(), models);
        self
    }

    pub fn failing_for(mut self, make: &str) -> Self {
        self.failing.push(make.to_string());
        self
    }

    pub fn calls_for(&self, make: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| *m == make).count()
    }
}

#[async_trait]
impl ModelsClient for FakeModels {
    async fn fetch_models(&self, make: &str) -> Result<Vec<Model>> {
        self.calls.lock().unwrap().push(make.to_string());
        if self.failing.iter().any(|m| m == make) {
            anyhow::bail!("503 Service Unavailable");
        }
        Ok(self.table.get(make).cloned().unwrap_or_default())
    }
}
