use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use cupid_core::GiftCatalog;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<GiftCatalog>,
    suggestions_configured: bool,
}

impl HealthState {
    pub fn new(catalog: Arc<GiftCatalog>, suggestions_configured: bool) -> Self {
        Self { catalog, suggestions_configured }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog: HealthCheck,
    pub suggestions: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let suggestions = suggestions_check(state.suggestions_configured);

    // A degraded suggestion provider never fails the service: the catalog
    // and manual search remain usable without it.
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready && suggestions.status == "ready" { "ready" } else { "degraded" },
        catalog,
        suggestions,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(catalog: &GiftCatalog) -> HealthCheck {
    if catalog.is_empty() {
        HealthCheck { status: "degraded", detail: "catalog contains no gifts".to_string() }
    } else {
        HealthCheck { status: "ready", detail: format!("{} gifts loaded", catalog.len()) }
    }
}

fn suggestions_check(configured: bool) -> HealthCheck {
    if configured {
        HealthCheck { status: "ready", detail: "suggestion provider configured".to_string() }
    } else {
        HealthCheck {
            status: "degraded",
            detail: "suggestion provider credentials not configured".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use cupid_core::GiftCatalog;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_is_ready_with_a_loaded_catalog_and_provider() {
        let catalog = Arc::new(GiftCatalog::embedded().expect("embedded catalog"));

        let (status, Json(payload)) = health(State(HealthState::new(catalog, true))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.catalog.status, "ready");
        assert_eq!(payload.suggestions.status, "ready");
    }

    #[tokio::test]
    async fn missing_provider_degrades_without_failing_the_service() {
        let catalog = Arc::new(GiftCatalog::embedded().expect("embedded catalog"));

        let (status, Json(payload)) = health(State(HealthState::new(catalog, false))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.catalog.status, "ready");
        assert_eq!(payload.suggestions.status, "degraded");
    }

    #[tokio::test]
    async fn an_empty_catalog_reports_service_unavailable() {
        let raw = r#"{"metadata": {"lastUpdated": "2026-01-05", "totalGifts": 0}, "gifts": []}"#;
        let catalog = Arc::new(GiftCatalog::from_json(raw).expect("empty catalog"));

        let (status, Json(payload)) = health(State(HealthState::new(catalog, true))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.catalog.status, "degraded");
    }
}
