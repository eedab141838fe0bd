//! Email-list subscription relay to the Kit (ConvertKit) v4 forms API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use cupid_core::config::MailerConfig;

/// Constant campaign tag applied to every signup from this site.
pub const CAMPAIGN_TAG: &str = "valentine-quiz";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mailing list service is not configured")]
    NotConfigured,
    #[error("mailing list request failed: {message}")]
    Request { message: String },
}

#[async_trait]
pub trait SubscriberSink: Send + Sync {
    async fn subscribe(&self, email: &str, tags: &[String]) -> Result<(), MailerError>;
}

/// Derives segmentation tags from the optional quiz context accompanying a
/// signup: the campaign tag plus one `field-value` tag per present field.
pub fn campaign_tags(
    recipient: Option<&str>,
    budget: Option<&str>,
    personality: Option<&str>,
) -> Vec<String> {
    let mut tags = vec![CAMPAIGN_TAG.to_string()];
    if let Some(recipient) = recipient {
        tags.push(format!("recipient-{recipient}"));
    }
    if let Some(budget) = budget {
        tags.push(format!("budget-{budget}"));
    }
    if let Some(personality) = personality {
        tags.push(format!("personality-{personality}"));
    }
    tags
}

struct KitCredentials {
    api_key: SecretString,
    form_id: String,
}

/// Relay to the Kit v4 forms API. Unconfigured credentials make every call
/// fail with [`MailerError::NotConfigured`], which the route reports without
/// exposing configuration state beyond a generic message.
pub struct KitMailer {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<KitCredentials>,
}

impl KitMailer {
    pub fn from_config(config: &MailerConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;

        let credentials = match (&config.api_key, &config.form_id) {
            (Some(api_key), Some(form_id)) => {
                Some(KitCredentials { api_key: api_key.clone(), form_id: form_id.clone() })
            }
            _ => None,
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[derive(Serialize)]
struct KitSubscribeRequest<'a> {
    email_address: &'a str,
    tags: &'a [String],
}

#[async_trait]
impl SubscriberSink for KitMailer {
    async fn subscribe(&self, email: &str, tags: &[String]) -> Result<(), MailerError> {
        let Some(credentials) = &self.credentials else {
            error!(
                event_name = "subscribe.mailer_unconfigured",
                "mailer api key or form id is not configured"
            );
            return Err(MailerError::NotConfigured);
        };

        let url = format!("{}/v4/forms/{}/subscribers", self.base_url, credentials.form_id);
        let response = self
            .http
            .post(url)
            .bearer_auth(credentials.api_key.expose_secret())
            .json(&KitSubscribeRequest { email_address: email, tags })
            .send()
            .await
            .map_err(|source| MailerError::Request { message: source.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(
                event_name = "subscribe.mailer_rejected",
                status = %status,
                detail = %detail,
                "mailing list provider rejected the subscription"
            );
            return Err(MailerError::Request {
                message: format!("provider responded with status {status}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{campaign_tags, KitMailer, MailerError, SubscriberSink, CAMPAIGN_TAG};
    use cupid_core::config::MailerConfig;

    #[test]
    fn tags_always_lead_with_the_campaign_tag() {
        let tags = campaign_tags(None, None, None);
        assert_eq!(tags, vec![CAMPAIGN_TAG.to_string()]);
    }

    #[test]
    fn quiz_context_becomes_prefixed_tags() {
        let tags = campaign_tags(Some("boyfriend"), Some("under25"), Some("romantic"));
        assert_eq!(
            tags,
            vec![
                "valentine-quiz".to_string(),
                "recipient-boyfriend".to_string(),
                "budget-under25".to_string(),
                "personality-romantic".to_string(),
            ]
        );
    }

    #[test]
    fn partial_context_only_adds_present_fields() {
        let tags = campaign_tags(None, Some("over100"), None);
        assert_eq!(tags, vec!["valentine-quiz".to_string(), "budget-over100".to_string()]);
    }

    #[tokio::test]
    async fn unconfigured_mailer_refuses_to_subscribe() {
        let mailer = KitMailer::from_config(&MailerConfig {
            api_key: None,
            form_id: None,
            base_url: "https://api.convertkit.com".to_string(),
        })
        .expect("construct mailer");

        assert!(!mailer.is_configured());
        let error = mailer
            .subscribe("love@example.com", &campaign_tags(None, None, None))
            .await
            .expect_err("must refuse");
        assert!(matches!(error, MailerError::NotConfigured));
    }
}
