use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use cupid_core::config::{LlmConfig, LlmProvider};
use cupid_core::domain::suggestion::AiGiftSuggestion;

use crate::llm::{ChatCompletionsClient, LlmClient};
use crate::parse::parse_suggestions;

/// The fixed system prompt constraining the provider to the suggestion JSON
/// shape, the four price tiers, and the routing tag vocabulary.
pub const SYSTEM_PROMPT: &str = r#"You are a Valentine's Day gift expert helping people in the UK find the perfect gift for their partner.

When given a search query, suggest 5-8 specific, purchasable gift ideas. For each gift:
- Be specific (brand names, product types) not generic
- Consider UK availability
- Mix price ranges unless budget is specified
- Include both physical products and experience vouchers

For priceEstimate, use ONLY one of these exact tiers (no specific amounts):
- "Under £25"
- "£25-50"
- "£50-100"
- "£100+"

IMPORTANT tag rules:
- "experience" = ONLY for experience vouchers/gift cards (spa days, driving experiences, cooking classes you BOOK). NOT for physical products.
- "personalised" = custom/engraved items, made-to-order gifts
- "practical" = useful everyday items
- "romantic" = sentimental, relationship-focused
- "tech" = electronics, gadgets
- "luxury" = high-end, premium items
- "handmade" = artisan, crafted items
- "budget-friendly" = affordable options

Respond in JSON format only, no other text:
{
  "gifts": [
    {
      "name": "Specific product name (can include brand)",
      "searchQuery": "Generic search term WITHOUT brand names (e.g. 'instant film camera' not 'Fujifilm Instax')",
      "description": "One sentence description",
      "priceEstimate": "Under £25" or "£25-50" or "£50-100" or "£100+",
      "whyItWorks": "Why this matches the query",
      "whereToBuy": ["Amazon UK", "John Lewis", etc],
      "tags": ["romantic", "practical", "experience", "luxury", "budget-friendly", "personalised", "tech", "handmade"]
    }
  ]
}"#;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion provider request failed: {message}")]
    Provider { message: String },
}

#[async_trait]
pub trait GiftSuggester: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<AiGiftSuggestion>, SuggestionError>;
}

/// Fetches gift ideas for a free-text query.
///
/// Failure policy: a missing provider configuration serves an empty list
/// (logged server-side, invisible to clients); a transport or status failure
/// surfaces as [`SuggestionError`] for the route to map; a reply that cannot
/// be parsed serves an empty list.
pub struct SuggestionEngine {
    client: Option<Arc<dyn LlmClient>>,
}

impl SuggestionEngine {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client: Some(client) }
    }

    /// An engine with no provider behind it; every query yields an empty
    /// suggestion list.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Builds the engine from configuration. Perplexity and OpenAI need an
    /// API key and fall back to the disabled engine without one; Ollama runs
    /// keyless.
    pub fn from_config(config: &LlmConfig) -> anyhow::Result<Self> {
        let needs_key =
            matches!(config.provider, LlmProvider::Perplexity | LlmProvider::OpenAi);
        if needs_key && config.api_key.is_none() {
            error!(
                event_name = "suggest.provider_unconfigured",
                provider = ?config.provider,
                "llm.api_key is not set; suggestion queries will return no results"
            );
            return Ok(Self::disabled());
        }

        let client = ChatCompletionsClient::from_config(config)?;
        info!(
            event_name = "suggest.provider_ready",
            provider = ?config.provider,
            model = %config.model,
            "suggestion provider initialized"
        );
        Ok(Self::new(Arc::new(client)))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl GiftSuggester for SuggestionEngine {
    async fn suggest(&self, query: &str) -> Result<Vec<AiGiftSuggestion>, SuggestionError> {
        let Some(client) = &self.client else {
            return Ok(Vec::new());
        };

        let user_message = format!("Find Valentine's gift ideas for: {query}");
        let content = client.complete(SYSTEM_PROMPT, &user_message).await.map_err(|source| {
            error!(
                event_name = "suggest.provider_failed",
                error = %source,
                "suggestion provider call failed"
            );
            SuggestionError::Provider { message: source.to_string() }
        })?;

        Ok(parse_suggestions(&content))
    }
}
