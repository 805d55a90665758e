use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::keywords::aggregate_keywords;
use crate::matching::phrases::{extract_phrases, PhraseInput, MAX_PHRASES};
use crate::matching::postings::{find_postings, list_categories, PostingFilter};
use crate::models::posting::Posting;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobOptionsResponse {
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
}

/// GET /api/v1/jobs
/// Category vocabulary plus, when a category is supplied, the keyword chips
/// aggregated from its recent postings.
pub async fn handle_job_options(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<JobOptionsResponse>, AppError> {
    let categories = list_categories(state.store.as_ref(), &state.profile).await?;
    let keywords = match trimmed(params.category.as_deref()) {
        Some(category) => {
            aggregate_keywords(state.store.as_ref(), &state.profile, category, None, None).await?
        }
        None => Vec::new(),
    };
    Ok(Json(JobOptionsResponse {
        categories,
        keywords,
    }))
}

/// GET /api/v1/categories
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = list_categories(state.store.as_ref(), &state.profile).await?;
    Ok(Json(categories))
}

/// GET /api/v1/keywords?category=…
pub async fn handle_keywords(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let category = trimmed(params.category.as_deref())
        .ok_or_else(|| AppError::Validation("category is required".to_string()))?;
    let keywords =
        aggregate_keywords(state.store.as_ref(), &state.profile, category, None, None).await?;
    Ok(Json(keywords))
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub category: Option<String>,
    /// Free role text; accepts one string or a list of phrases.
    pub role: Option<PhraseInput>,
    /// Free tech text; same shapes as `role`.
    pub tech: Option<PhraseInput>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub jobs: Vec<Posting>,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let category = trimmed(req.category.as_deref())
        .ok_or_else(|| AppError::Validation("category is required".to_string()))?;

    let filter = PostingFilter {
        category: category.to_string(),
        role_phrases: req
            .role
            .as_ref()
            .map(|input| extract_phrases(input, MAX_PHRASES))
            .unwrap_or_default(),
        tech_phrases: req
            .tech
            .as_ref()
            .map(|input| extract_phrases(input, MAX_PHRASES))
            .unwrap_or_default(),
        limit: req.limit,
    };
    let jobs = find_postings(state.store.as_ref(), &state.profile, &filter).await?;
    Ok(Json(MatchResponse { jobs }))
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
