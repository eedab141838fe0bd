//! Turning a provider's free-text reply into suggestions.
//!
//! Providers are prompted to answer with JSON only, but replies routinely
//! arrive wrapped in prose or markdown fences. The first well-formed JSON
//! object is pulled out by brace matching and everything that fails to parse
//! degrades to an empty suggestion list.

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use cupid_core::domain::suggestion::{AiGiftSuggestion, PriceEstimate};

/// Extracts the first balanced `{...}` object, ignoring braces inside JSON
/// string literals and their escapes. Returns `None` when no balanced object
/// exists.
pub fn extract_first_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in content[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Debug, Deserialize)]
struct ProviderReply {
    #[serde(default)]
    gifts: Vec<ProviderGift>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderGift {
    name: String,
    #[serde(default)]
    search_query: String,
    #[serde(default)]
    description: String,
    price_estimate: String,
    #[serde(default)]
    why_it_works: String,
    #[serde(default)]
    where_to_buy: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parses a provider reply into suggestions, stamping each with a fresh id.
/// Unparseable content yields an empty list; individual items with an
/// off-tier price estimate are dropped.
pub fn parse_suggestions(content: &str) -> Vec<AiGiftSuggestion> {
    let Some(json) = extract_first_json_object(content) else {
        warn!(event_name = "suggest.parse.no_json_object", "provider reply contained no JSON object");
        return Vec::new();
    };

    let reply: ProviderReply = match serde_json::from_str(json) {
        Ok(reply) => reply,
        Err(error) => {
            warn!(
                event_name = "suggest.parse.invalid_json",
                error = %error,
                "provider reply JSON did not match the expected shape"
            );
            return Vec::new();
        }
    };

    reply
        .gifts
        .into_iter()
        .filter_map(|gift| {
            let Some(price_estimate) = PriceEstimate::parse_lenient(&gift.price_estimate) else {
                warn!(
                    event_name = "suggest.parse.off_tier_price",
                    price_estimate = %gift.price_estimate,
                    name = %gift.name,
                    "dropping suggestion with unrecognised price tier"
                );
                return None;
            };

            Some(AiGiftSuggestion {
                id: format!("ai-{}", Uuid::new_v4()),
                name: gift.name,
                search_query: gift.search_query,
                description: gift.description,
                price_estimate,
                why_it_works: gift.why_it_works,
                where_to_buy: gift.where_to_buy,
                tags: gift.tags.into_iter().map(|tag| tag.to_ascii_lowercase()).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{extract_first_json_object, parse_suggestions};
    use cupid_core::domain::suggestion::PriceEstimate;

    const WELL_FORMED: &str = r#"{
        "gifts": [
            {
                "name": "Fujifilm Instax Mini 12",
                "searchQuery": "instant film camera",
                "description": "Retro instant camera for capturing date nights.",
                "priceEstimate": "£50-100",
                "whyItWorks": "Turns moments into keepsakes.",
                "whereToBuy": ["Amazon UK", "Argos"],
                "tags": ["Tech", "romantic"]
            },
            {
                "name": "Spa Day for Two",
                "searchQuery": "spa day voucher",
                "description": "A full day of treatments together.",
                "priceEstimate": "£100+",
                "whyItWorks": "Shared relaxation.",
                "whereToBuy": ["Virgin Experience Days"],
                "tags": ["experience", "luxury"]
            }
        ]
    }"#;

    #[test]
    fn extracts_the_object_from_surrounding_prose() {
        let content = format!("Here are some ideas!\n```json\n{WELL_FORMED}\n```\nEnjoy!");
        let extracted = extract_first_json_object(&content).expect("object should be found");
        assert_eq!(extracted, WELL_FORMED);
    }

    #[test]
    fn extraction_ignores_braces_inside_strings() {
        let content = r#"note {"text": "a } inside a string", "n": 1} tail"#;
        let extracted = extract_first_json_object(content).expect("object should be found");
        assert_eq!(extracted, r#"{"text": "a } inside a string", "n": 1}"#);
    }

    #[test]
    fn extraction_returns_none_without_a_balanced_object() {
        assert_eq!(extract_first_json_object("no json here"), None);
        assert_eq!(extract_first_json_object(r#"{"unterminated": true"#), None);
    }

    #[test]
    fn parses_suggestions_and_stamps_fresh_ids() {
        let suggestions = parse_suggestions(WELL_FORMED);
        assert_eq!(suggestions.len(), 2);

        assert!(suggestions[0].id.starts_with("ai-"));
        assert_ne!(suggestions[0].id, suggestions[1].id);
        assert_eq!(suggestions[0].price_estimate, PriceEstimate::From50To100);
        assert_eq!(suggestions[0].tags, vec!["tech".to_string(), "romantic".to_string()]);
        assert_eq!(suggestions[1].search_query, "spa day voucher");
    }

    #[test]
    fn off_tier_items_are_dropped_and_the_rest_kept() {
        let content = r#"{
            "gifts": [
                {"name": "Keeper", "searchQuery": "q", "description": "d",
                 "priceEstimate": "Under £25", "whyItWorks": "w", "whereToBuy": [], "tags": []},
                {"name": "Dropped", "searchQuery": "q", "description": "d",
                 "priceEstimate": "£37.99", "whyItWorks": "w", "whereToBuy": [], "tags": []}
            ]
        }"#;

        let suggestions = parse_suggestions(content);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Keeper");
    }

    #[test]
    fn malformed_replies_degrade_to_an_empty_list() {
        assert!(parse_suggestions("no json at all").is_empty());
        assert!(parse_suggestions(r#"{"gifts": "not an array"}"#).is_empty());
        assert!(parse_suggestions("{}").is_empty());
    }
}
