use crate::catalog::traits::CatalogSource;
use crate::models::{Fuel, Listing, Make, Model};
use crate::search::ALL;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Catalog that aggregates an in-memory list of listings
pub struct InMemoryCatalog {
    listings: Vec<Listing>,
}

impl InMemoryCatalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Load listings from a JSON array on disk
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read listings file {}", path.display()))?;

        let listings: Vec<Listing> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse listings file {}", path.display()))?;

        info!(path = %path.display(), listings = listings.len(), "Loaded listings");
        Ok(Self::new(listings))
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Built-in listings used when no data file is configured
    pub fn sample() -> Self {
        let rows: [(&str, &str, u16, u64, u64, Fuel); 14] = [
            ("Toyota", "Corolla", 2018, 14_500, 62_000, Fuel::Petrol),
            ("Toyota", "Corolla", 2021, 21_900, 18_000, Fuel::Hybrid),
            ("Toyota", "Yaris", 2016, 7_800, 94_000, Fuel::Petrol),
            ("Toyota", "RAV4", 2020, 29_400, 41_000, Fuel::Hybrid),
            ("Honda", "Civic", 2017, 12_300, 77_000, Fuel::Petrol),
            ("Honda", "Civic", 2019, 16_950, 52_000, Fuel::Petrol),
            ("Honda", "Jazz", 2015, 6_400, 101_000, Fuel::Petrol),
            ("Honda", "CR-V", 2022, 34_000, 12_000, Fuel::Hybrid),
            ("Ford", "Focus", 2014, 4_900, 143_000, Fuel::Diesel),
            ("Ford", "Fiesta", 2019, 10_200, 38_000, Fuel::Petrol),
            ("Ford", "Mustang Mach-E", 2023, 47_500, 6_000, Fuel::Electric),
            ("Audi", "A3", 2018, 18_700, 69_000, Fuel::Diesel),
            ("Audi", "A4", 2016, 15_100, 118_000, Fuel::Diesel),
            ("Audi", "e-tron", 2021, 52_000, 27_000, Fuel::Electric),
        ];

        let listings = rows
            .into_iter()
            .enumerate()
            .map(|(i, (make, model, year, price, kilometers, fuel))| Listing {
                id: i as u64 + 1,
                make: make.to_string(),
                model: model.to_string(),
                year,
                price,
                kilometers,
                fuel,
                details: format!("{} {} {}, {} km.", year, make, model, kilometers),
                photo_url: None,
            })
            .collect();

        Self::new(listings)
    }
}

/// Count occurrences of `key` over the listings, ordered by name
fn aggregate<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, u64> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn makes(&self) -> Result<Vec<Make>> {
        let makes: Vec<Make> = aggregate(self.listings.iter().map(|l| l.make.as_str()))
            .into_iter()
            .map(|(make, count)| Make {
                make: make.to_string(),
                count,
            })
            .collect();

        debug!(makes = makes.len(), "Aggregated makes");
        Ok(makes)
    }

    async fn models(&self, make: Option<&str>) -> Result<Vec<Model>> {
        let make = make.filter(|m| !m.is_empty() && *m != ALL);

        let models: Vec<Model> = aggregate(
            self.listings
                .iter()
                .filter(|l| make.map_or(true, |m| l.make == m))
                .map(|l| l.model.as_str()),
        )
        .into_iter()
        .map(|(model, count)| Model {
            model: model.to_string(),
            count,
        })
        .collect();

        debug!(make = ?make, models = models.len(), "Aggregated models");
        Ok(models)
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
