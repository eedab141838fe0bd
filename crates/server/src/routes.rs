//! JSON API routes.
//!
//! Endpoints:
//! - `POST /api/search`            — AI gift suggestions for a free-text query
//! - `POST /api/quiz/search`       — compile quiz answers and fetch suggestions
//! - `POST /api/subscribe`         — email list signup relay
//! - `GET  /api/gifts`             — full curated catalog
//! - `GET  /api/gifts/random`      — random sample, optionally by category
//! - `GET  /api/gifts/{id}`        — one gift
//! - `GET  /api/catalog/search`    — text search over the curated catalog
//! - `GET  /api/categories`        — curated browse categories
//! - `GET  /api/categories/{slug}` — category plus its gifts

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use cupid_agent::GiftSuggester;
use cupid_core::accents::{accent_for_tags, TagAccent};
use cupid_core::categories;
use cupid_core::domain::suggestion::AiGiftSuggestion;
use cupid_core::quiz::compile_query;
use cupid_core::retailers::purchase_url;
use cupid_core::{Category, Gift, GiftCatalog, QuizAnswers, RetailerDirectory, RoutingPolicy};

use crate::mailer::{campaign_tags, MailerError, SubscriberSink};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<GiftCatalog>,
    pub suggester: Arc<dyn GiftSuggester>,
    pub mailer: Arc<dyn SubscriberSink>,
    pub routing: RoutingPolicy,
    pub directory: RetailerDirectory,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub suggestions: Vec<SuggestionView>,
}

#[derive(Debug, Serialize)]
pub struct QuizSearchResponse {
    pub query: String,
    pub suggestions: Vec<SuggestionView>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
    pub recipient: Option<String>,
    pub budget: Option<String>,
    pub personality: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// A suggestion as served to clients: the generated idea plus the assembled
/// purchase link, the retailer it routes to, and a card styling hint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    #[serde(flatten)]
    pub suggestion: AiGiftSuggestion,
    pub purchase_url: Option<String>,
    pub retailer: &'static str,
    pub accent: TagAccent,
}

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    pub count: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    #[serde(flatten)]
    pub category: Category,
    pub gifts: Vec<Gift>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn bad_request(message: &str) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message.to_string() }))
}

fn not_found(message: &str) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError { error: message.to_string() }))
}

fn internal(message: &str) -> (StatusCode, Json<ApiError>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError { error: message.to_string() }))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/quiz/search", post(quiz_search))
        .route("/api/subscribe", post(subscribe))
        .route("/api/gifts", get(list_gifts))
        .route("/api/gifts/random", get(random_gifts))
        .route("/api/gifts/{id}", get(get_gift))
        .route("/api/catalog/search", get(catalog_search))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{slug}", get(get_category))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Suggestion handlers
// ---------------------------------------------------------------------------

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(bad_request("Query is required"));
    }

    let suggestions = fetch_suggestions(&state, query).await?;
    Ok(Json(SearchResponse { suggestions }))
}

async fn quiz_search(
    State(state): State<AppState>,
    Json(answers): Json<QuizAnswers>,
) -> ApiResult<QuizSearchResponse> {
    let query = compile_query(&answers);
    info!(event_name = "api.quiz.completed", query_len = query.len(), "quiz answers compiled");

    let suggestions = fetch_suggestions(&state, &query).await?;
    Ok(Json(QuizSearchResponse { query, suggestions }))
}

async fn fetch_suggestions(
    state: &AppState,
    query: &str,
) -> Result<Vec<SuggestionView>, (StatusCode, Json<ApiError>)> {
    match state.suggester.suggest(query).await {
        Ok(suggestions) => Ok(suggestions
            .into_iter()
            .map(|suggestion| assemble_view(suggestion, &state.routing, &state.directory))
            .collect()),
        Err(source) => {
            error!(
                event_name = "api.search.provider_failed",
                error = %source,
                "suggestion fetch failed"
            );
            Err(internal("Failed to search for gifts"))
        }
    }
}

fn assemble_view(
    suggestion: AiGiftSuggestion,
    routing: &RoutingPolicy,
    directory: &RetailerDirectory,
) -> SuggestionView {
    let retailer = routing.select(&suggestion.tags);
    let accent = accent_for_tags(&suggestion.tags);
    let link = purchase_url(&suggestion, routing, directory);

    SuggestionView {
        purchase_url: link,
        retailer: retailer.display_name(),
        accent,
        suggestion,
    }
}

// ---------------------------------------------------------------------------
// Subscription handler
// ---------------------------------------------------------------------------

async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<SubscribeResponse> {
    if !request.email.contains('@') {
        return Err(bad_request("Valid email required"));
    }

    let tags = campaign_tags(
        request.recipient.as_deref(),
        request.budget.as_deref(),
        request.personality.as_deref(),
    );

    match state.mailer.subscribe(&request.email, &tags).await {
        Ok(()) => {
            info!(event_name = "api.subscribe.accepted", tag_count = tags.len(), "subscriber added");
            Ok(Json(SubscribeResponse { success: true }))
        }
        Err(MailerError::NotConfigured) => Err(internal("Email service not configured")),
        Err(MailerError::Request { message }) => {
            error!(
                event_name = "api.subscribe.relay_failed",
                error = %message,
                "mailing list relay failed"
            );
            Err(internal("Failed to subscribe"))
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog handlers
// ---------------------------------------------------------------------------

async fn list_gifts(State(state): State<AppState>) -> Json<Vec<Gift>> {
    Json(state.catalog.all().to_vec())
}

async fn get_gift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Gift> {
    match state.catalog.get(&id) {
        Some(gift) => Ok(Json(gift.clone())),
        None => Err(not_found("Gift not found")),
    }
}

const DEFAULT_RANDOM_COUNT: usize = 6;

async fn random_gifts(
    State(state): State<AppState>,
    Query(params): Query<RandomParams>,
) -> ApiResult<Vec<Gift>> {
    let count = params.count.unwrap_or(DEFAULT_RANDOM_COUNT);

    let filter = match &params.category {
        Some(slug) => match categories::by_slug(slug) {
            Some(category) => Some(category.filter),
            None => return Err(not_found("Category not found")),
        },
        None => None,
    };

    let sample =
        state.catalog.random_sample(count, filter.as_ref()).into_iter().cloned().collect();
    Ok(Json(sample))
}

async fn catalog_search(
    State(state): State<AppState>,
    Query(params): Query<CatalogSearchParams>,
) -> Json<Vec<Gift>> {
    Json(state.catalog.text_search(&params.q).into_iter().cloned().collect())
}

async fn list_categories() -> Json<Vec<Category>> {
    Json(categories::all())
}

async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<CategoryResponse> {
    match categories::by_slug(&slug) {
        Some(category) => {
            let gifts = state.catalog.filter(&category.filter).into_iter().cloned().collect();
            Ok(Json(CategoryResponse { category, gifts }))
        }
        None => Err(not_found("Category not found")),
    }
}
