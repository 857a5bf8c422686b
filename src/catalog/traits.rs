use crate::models::{Make, Model};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only source of make/model aggregates for the search page
/// A SQL-backed store can sit behind this the same way the in-memory one does
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every distinct make with its listing count
    async fn makes(&self) -> Result<Vec<Make>>;

    /// Models of `make` with their listing counts. `None` or `"all"` means unfiltered.
    async fn models(&self, make: Option<&str>) -> Result<Vec<Model>>;

    /// Get the name of the catalog backend
    fn source_name(&self) -> &'static str;
}
