use crate::models::{Make, Model};
use crate::search::model_select::{ModelFetcher, ModelSelect};
use crate::search::page::SearchPageData;
use crate::search::types::{
    make_options, price_options, FilterState, Layout, PriceBound, SelectOption, RESULTS_PATH,
};
use anyhow::{Context, Result};
use reqwest::Url;
use tracing::info;

// Navigations are built as absolute URLs and reported path-relative.
const LOCAL_ORIGIN: &str = "http://localhost";

/// How a navigation treats the browser history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// A client-side route change produced by submitting the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub pathname: String,
    pub query: Vec<(String, String)>,
    pub history: HistoryMode,
    /// Re-run the target page's data loading without a full reload
    pub shallow: bool,
}

impl Navigation {
    /// Path plus encoded query string, e.g. `/cars?make=Toyota&page=1`
    pub fn href(&self) -> Result<String> {
        let base = format!("{}{}", LOCAL_ORIGIN, self.pathname);
        let url = Url::parse_with_params(&base, &self.query)
            .with_context(|| format!("Invalid navigation target {}", self.pathname))?;

        Ok(match url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
            _ => url.path().to_string(),
        })
    }
}

/// Form fields, named as they appear in the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Make,
    Model,
    MinPrice,
    MaxPrice,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::MinPrice => "minPrice",
            Self::MaxPrice => "maxPrice",
        }
    }
}

/// Headless search form: holds the field values and derives every dropdown
pub struct SearchForm {
    values: FilterState,
    makes: Vec<Make>,
    model_select: ModelSelect,
    layout: Layout,
}

impl SearchForm {
    /// Build the form for a page visit. Initial values come from `query`.
    pub fn new(
        data: SearchPageData,
        query: &[(String, String)],
        layout: Layout,
        fetcher: ModelFetcher,
    ) -> Self {
        let values = FilterState::from_query(query);
        let model_select = ModelSelect::new(Field::Model.name(), &values.make, data.models, fetcher);

        Self {
            values,
            makes: data.makes,
            model_select,
            layout,
        }
    }

    pub fn values(&self) -> &FilterState {
        &self.values
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn model_select(&self) -> &ModelSelect {
        &self.model_select
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Make => &self.values.make,
            Field::Model => &self.values.model,
            Field::MinPrice => &self.values.min_price,
            Field::MaxPrice => &self.values.max_price,
        }
    }

    /// Set a field the way a dropdown change would. Changing the make resets
    /// the model before returning.
    pub fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::Make => {
                self.values.make = value.to_string();
                self.model_select
                    .on_make_change(&self.values.make, &mut self.values.model);
            }
            Field::Model => self.values.model = value.to_string(),
            Field::MinPrice => self.values.min_price = value.to_string(),
            Field::MaxPrice => self.values.max_price = value.to_string(),
        }
    }

    pub fn make_options(&self) -> Vec<SelectOption> {
        make_options(&self.makes)
    }

    pub fn model_options(&self) -> Vec<SelectOption> {
        self.model_select.options()
    }

    pub fn price_options(&self, bound: PriceBound) -> Vec<SelectOption> {
        price_options(bound)
    }

    pub fn models(&self) -> Vec<Model> {
        self.model_select.models()
    }

    /// Wait for the model list of the current make to resolve
    pub async fn settle(&mut self) -> bool {
        self.model_select.settle(&mut self.values.model).await
    }

    /// Navigate to the results page with the current filters, starting at page 1
    pub fn submit(&self) -> Navigation {
        let mut query = self.values.to_query();
        query.push(("page".to_string(), "1".to_string()));

        info!(
            make = %self.values.make,
            model = %self.values.model,
            min_price = %self.values.min_price,
            max_price = %self.values.max_price,
            "Search submitted"
        );

        Navigation {
            pathname: RESULTS_PATH.to_string(),
            query,
            history: HistoryMode::Replace,
            shallow: true,
        }
    }
}
