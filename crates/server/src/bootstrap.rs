use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use cupid_agent::SuggestionEngine;
use cupid_core::catalog::CatalogError;
use cupid_core::config::{AppConfig, ConfigError, LoadOptions};
use cupid_core::{GiftCatalog, RetailerDirectory, RoutingPolicy};

use crate::mailer::KitMailer;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<GiftCatalog>,
    pub suggestions: Arc<SuggestionEngine>,
    pub mailer: Arc<KitMailer>,
    pub routing: RoutingPolicy,
    pub directory: RetailerDirectory,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application").finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("suggestion engine initialization failed: {0}")]
    Suggestions(anyhow::Error),
    #[error("mailer initialization failed: {0}")]
    Mailer(anyhow::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let catalog = match &config.catalog.path {
        Some(path) => GiftCatalog::load(path)?,
        None => GiftCatalog::embedded()?,
    };
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        gift_count = catalog.len(),
        source = %config.catalog.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "gift catalog loaded"
    );

    let suggestions =
        SuggestionEngine::from_config(&config.llm).map_err(BootstrapError::Suggestions)?;
    let mailer = KitMailer::from_config(&config.mailer).map_err(BootstrapError::Mailer)?;
    info!(
        event_name = "system.bootstrap.integrations_ready",
        suggestions_configured = suggestions.is_configured(),
        mailer_configured = mailer.is_configured(),
        "outbound integrations initialized"
    );

    let directory = RetailerDirectory::with_amazon_tag(&config.affiliate.amazon_tag);

    Ok(Application {
        config,
        catalog: Arc::new(catalog),
        suggestions: Arc::new(suggestions),
        mailer: Arc::new(mailer),
        routing: RoutingPolicy::default(),
        directory,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use cupid_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use tempfile::TempDir;

    use crate::bootstrap::{bootstrap_with_config, BootstrapError};

    fn base_config() -> AppConfig {
        AppConfig::default()
    }

    #[tokio::test]
    async fn bootstrap_succeeds_on_defaults_with_the_embedded_catalog() {
        let app = bootstrap_with_config(base_config())
            .await
            .expect("bootstrap should succeed without any credentials");

        assert!(!app.catalog.is_empty());
        assert!(!app.suggestions.is_configured());
        assert!(!app.mailer.is_configured());
    }

    #[tokio::test]
    async fn bootstrap_loads_a_catalog_from_a_configured_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("gifts.json");
        fs::write(
            &path,
            r#"{
                "metadata": {"lastUpdated": "2026-01-05", "totalGifts": 1},
                "gifts": [
                    {"id": "only-gift", "name": "Only Gift", "description": "d",
                     "priceRange": "under25", "recipientType": ["partner"],
                     "interests": [], "vibe": ["romantic"], "relationshipStage": ["new"]}
                ]
            }"#,
        )
        .expect("write catalog");

        let mut config = base_config();
        config.catalog.path = Some(path);

        let app = bootstrap_with_config(config).await.expect("bootstrap with file catalog");
        assert_eq!(app.catalog.len(), 1);
        assert!(app.catalog.get("only-gift").is_some());
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_a_missing_catalog_file() {
        let mut config = base_config();
        config.catalog.path = Some("/definitely/not/here/gifts.json".into());

        let error = bootstrap_with_config(config).await.expect_err("missing file must fail");
        assert!(matches!(error, BootstrapError::Catalog(_)));
    }

    #[tokio::test]
    async fn bootstrap_propagates_config_validation_failures() {
        let result = crate::bootstrap::bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("   ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        let error = result.expect_err("blank api key must fail validation");
        assert!(error.to_string().contains("llm.api_key"));
    }
}
