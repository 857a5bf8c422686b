use crate::cache::KeyedCache;
use crate::models::Model;
use crate::search::types::{model_options, SelectOption, ALL};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of the model list for a make, as seen from the form
#[async_trait]
pub trait ModelsClient: Send + Sync {
    async fn fetch_models(&self, make: &str) -> Result<Vec<Model>>;
}

/// Cache key for the models of `make`, identical to the request path
pub fn models_key(make: &str) -> String {
    format!("/api/models?make={}", make)
}

/// Fetches models from a running search service over HTTP
pub struct HttpModelsClient {
    client: Client,
    base_url: Url,
}

impl HttpModelsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid service URL {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ModelsClient for HttpModelsClient {
    async fn fetch_models(&self, make: &str) -> Result<Vec<Model>> {
        let url = self
            .base_url
            .join("/api/models")
            .context("Failed to build models URL")?;

        debug!("Fetching URL: {}?make={}", url, make);

        let response = self
            .client
            .get(url)
            .query(&[("make", make)])
            .send()
            .await
            .context("Failed to fetch models")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch models: {}", response.status());
        }

        response
            .json::<Vec<Model>>()
            .await
            .context("Failed to decode models response")
    }
}

/// Shared fetch context for model dropdowns: the client plus the request cache
/// every dropdown on the page reads through.
#[derive(Clone)]
pub struct ModelFetcher {
    client: Arc<dyn ModelsClient>,
    cache: Arc<KeyedCache<Vec<Model>>>,
    snap_to_all: bool,
}

impl ModelFetcher {
    pub fn new(client: Arc<dyn ModelsClient>, dedup_window: Duration) -> Self {
        Self {
            client,
            cache: Arc::new(KeyedCache::new(dedup_window)),
            snap_to_all: false,
        }
    }

    /// Reset the model field to `all` when a fetched list no longer offers it
    pub fn snap_to_all(mut self, enabled: bool) -> Self {
        self.snap_to_all = enabled;
        self
    }

    pub fn cache(&self) -> &KeyedCache<Vec<Model>> {
        &self.cache
    }

    async fn fetch(&self, make: &str) -> Result<Vec<Model>> {
        let key = models_key(make);
        let client = Arc::clone(&self.client);
        let make = make.to_string();
        self.cache
            .get_or_fetch(&key, || async move { client.fetch_models(&make).await })
            .await
    }

    /// Start a fetch without waiting for it. Outside a runtime the fetch is
    /// deferred until the next [`ModelSelect::settle`].
    fn spawn_fetch(&self, make: &str) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(make, "No runtime, deferring models fetch");
            return;
        };

        let fetcher = self.clone();
        let make = make.to_string();
        handle.spawn(async move {
            if let Err(err) = fetcher.fetch(&make).await {
                warn!(make = %make, error = %err, "Models fetch failed, keeping fallback list");
            }
        });
    }
}

/// Model dropdown bound to a form field. The selected value lives in the form;
/// this only tracks which make the options belong to.
pub struct ModelSelect {
    name: String,
    make: String,
    fallback: Vec<Model>,
    fetcher: ModelFetcher,
}

impl ModelSelect {
    /// Mount the dropdown for `make` and start fetching its models.
    pub fn new(name: &str, make: &str, fallback: Vec<Model>, fetcher: ModelFetcher) -> Self {
        let select = Self {
            name: name.to_string(),
            make: make.to_string(),
            fallback,
            fetcher,
        };
        select.fetcher.spawn_fetch(&select.make);
        select
    }

    /// Name of the bound form field
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn key(&self) -> String {
        models_key(&self.make)
    }

    /// React to the form's make changing. Resets the bound `field` to `all`
    /// before the new list is requested. Returns false when `make` is unchanged.
    pub fn on_make_change(&mut self, make: &str, field: &mut String) -> bool {
        if make == self.make {
            return false;
        }

        debug!(from = %self.make, to = %make, "Make changed, resetting {}", self.name);
        self.make = make.to_string();
        *field = ALL.to_string();
        self.fetcher.spawn_fetch(&self.make);
        true
    }

    /// Models for the current make if fetched, otherwise the fallback list
    pub fn models(&self) -> Vec<Model> {
        self.fetched().unwrap_or_else(|| self.fallback.clone())
    }

    /// Fetched models for the current make, if resolved
    pub fn fetched(&self) -> Option<Vec<Model>> {
        self.fetcher.cache.peek(&self.key())
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.cache.is_pending(&self.key())
    }

    pub fn options(&self) -> Vec<SelectOption> {
        model_options(&self.models())
    }

    /// Wait for the current make's fetch, joining one already in flight. Returns
    /// whether a fetched list is available; failures leave the fallback in place.
    pub async fn settle(&self, field: &mut String) -> bool {
        match self.fetcher.fetch(&self.make).await {
            Ok(models) => {
                if self.fetcher.snap_to_all
                    && *field != ALL
                    && !models.iter().any(|m| m.model == *field)
                {
                    debug!(model = %field, make = %self.make, "Selected model not offered, snapping to all");
                    *field = ALL.to_string();
                }
                true
            }
            Err(err) => {
                warn!(make = %self.make, error = %err, "Models fetch failed, keeping fallback list");
                false
            }
        }
    }
}
