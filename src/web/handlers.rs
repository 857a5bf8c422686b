use crate::models::{Make, Model};
use crate::search::types::{query_value, FilterState};
use crate::search::load_search_page;
use crate::web::error::AppError;
use crate::web::render;
use crate::web::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;
use tracing::debug;

const SEARCH_SCRIPT: &str = include_str!("../../assets/search.js");

type QueryPairs = Query<Vec<(String, String)>>;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

pub async fn search_page(
    State(state): State<Arc<AppState>>,
    Query(query): QueryPairs,
) -> Result<Html<String>, AppError> {
    let data = load_search_page(state.catalog.as_ref(), &query).await?;
    let values = FilterState::from_query(&query);

    let form = render::search_form(&values, &data.makes, &data.models, &state.settings);
    Ok(Html(render::search_page(form).into_string()))
}

pub async fn search_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SEARCH_SCRIPT,
    )
}

// ---------------------------------------------------------------------------
// Data endpoints
// ---------------------------------------------------------------------------

pub async fn api_models(
    State(state): State<Arc<AppState>>,
    Query(query): QueryPairs,
) -> Result<Json<Vec<Model>>, AppError> {
    let make = query_value(&query, "make");
    let models = state.catalog.models(make).await?;
    debug!(make = ?make, models = models.len(), "Served models");
    Ok(Json(models))
}

pub async fn api_makes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Make>>, AppError> {
    Ok(Json(state.catalog.makes().await?))
}

pub async fn api_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
