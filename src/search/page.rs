use crate::catalog::CatalogSource;
use crate::models::{Make, Model};
use crate::search::types::query_value;
use anyhow::{Context, Result};
use tracing::debug;

/// Reference data the search page renders with
#[derive(Debug, Clone, Default)]
pub struct SearchPageData {
    pub makes: Vec<Make>,
    /// Models of the make in the URL, or of every make when none is given
    pub models: Vec<Model>,
}

/// Load makes and models for a page request. Both loads run concurrently and
/// either failure fails the whole request.
pub async fn load_search_page(
    catalog: &dyn CatalogSource,
    query: &[(String, String)],
) -> Result<SearchPageData> {
    let make = query_value(query, "make");

    let (makes, models) = tokio::try_join!(
        async { catalog.makes().await.context("Failed to load makes") },
        async { catalog.models(make).await.context("Failed to load models") },
    )?;

    debug!(
        source = catalog.source_name(),
        make = ?make,
        makes = makes.len(),
        models = models.len(),
        "Prepared search page data"
    );

    Ok(SearchPageData { makes, models })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use async_trait::async_trait;

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogSource for BrokenCatalog {
        async fn makes(&self) -> Result<Vec<Make>> {
            Ok(vec![Make { make: "Ford".into(), count: 1 }])
        }

        async fn models(&self, _make: Option<&str>) -> Result<Vec<Model>> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn models_follow_make_in_query() {
        let catalog = InMemoryCatalog::sample();
        let query = vec![("make".to_string(), "Ford".to_string())];

        let data = load_search_page(&catalog, &query).await.unwrap();
        assert_eq!(data.makes.len(), 4);
        let models: Vec<&str> = data.models.iter().map(|m| m.model.as_str()).collect();
        assert_eq!(models, ["Fiesta", "Focus", "Mustang Mach-E"]);
    }

    #[tokio::test]
    async fn missing_make_loads_every_model() {
        let catalog = InMemoryCatalog::sample();
        let data = load_search_page(&catalog, &[]).await.unwrap();
        assert_eq!(data.models, catalog.models(None).await.unwrap());
    }

    #[tokio::test]
    async fn one_failed_load_fails_the_page() {
        let err = load_search_page(&BrokenCatalog, &[]).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load models"));
    }
}
