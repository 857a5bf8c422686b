use serde::{Deserialize, Serialize};

/// A manufacturer and how many listings reference it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Make {
    pub make: String,
    pub count: u64,
}

/// A model name (scoped to a make) and its listing count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    pub model: String,
    pub count: u64,
}

/// Fuel type of a listed car
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Fuel {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

/// Core car listing row, aggregated into make/model counts by the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub price: u64,
    pub kilometers: u64,
    pub fuel: Fuel,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}
