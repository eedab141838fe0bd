//! Retailer selection and affiliate search-link construction.
//!
//! Which retailers are routable changes with affiliate-program approvals, so
//! both the routing rules and the endpoint directory are plain data: adding
//! or removing a retailer is an edit to a rule list or a directory entry,
//! never a new branch in calling code.

use serde::{Deserialize, Serialize};

use crate::domain::suggestion::AiGiftSuggestion;
use crate::priority::{first_match, PriorityRule};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RetailerKey {
    #[serde(rename = "amazon")]
    Amazon,
    #[serde(rename = "etsy")]
    Etsy,
    #[serde(rename = "noths")]
    Noths,
    #[serde(rename = "virginexp")]
    VirginExp,
}

impl RetailerKey {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::Etsy => "Etsy",
            Self::Noths => "Not On The High Street",
            Self::VirginExp => "Virgin Experience Days",
        }
    }
}

/// Ordered tag rules deciding which retailer a suggestion is sent to.
/// Exactly one retailer is always chosen; unmatched tag sets take the
/// default marketplace. Selection is stable for a given input since the
/// result decides which affiliate program is credited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingPolicy {
    rules: Vec<PriorityRule<RetailerKey>>,
    default: RetailerKey,
}

impl Default for RoutingPolicy {
    /// Experience vouchers route to Virgin Experience Days; personalised and
    /// handmade items to Not On The High Street; everything else to Amazon.
    fn default() -> Self {
        Self {
            rules: vec![
                PriorityRule::new(RetailerKey::VirginExp, &["experience"]),
                PriorityRule::new(
                    RetailerKey::Noths,
                    &["personalised", "personalized", "custom", "handmade", "unique"],
                ),
            ],
            default: RetailerKey::Amazon,
        }
    }
}

impl RoutingPolicy {
    pub fn new(rules: Vec<PriorityRule<RetailerKey>>, default: RetailerKey) -> Self {
        Self { rules, default }
    }

    /// The configuration used while partner affiliate programs are pending
    /// approval: every suggestion resolves to the default marketplace.
    pub fn amazon_only() -> Self {
        Self::new(Vec::new(), RetailerKey::Amazon)
    }

    pub fn select(&self, tags: &[String]) -> RetailerKey {
        first_match(tags, &self.rules, self.default)
    }
}

/// Normalises a product name into a retailer search term: parenthetical and
/// bracketed asides are dropped, slashes become spaces, and whitespace is
/// collapsed. Idempotent.
pub fn clean_search_term(raw: &str) -> String {
    let mut kept = String::with_capacity(raw.len());
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;

    for ch in raw.chars() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            '/' if paren_depth == 0 && bracket_depth == 0 => kept.push(' '),
            _ if paren_depth == 0 && bracket_depth == 0 => kept.push(ch),
            _ => {}
        }
    }

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affiliate {
    pub param: String,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchEndpoint {
    pub base: String,
    pub query_param: String,
    pub affiliate: Option<Affiliate>,
}

impl SearchEndpoint {
    fn new(base: &str, query_param: &str) -> Self {
        Self { base: base.to_string(), query_param: query_param.to_string(), affiliate: None }
    }

    fn with_affiliate(mut self, param: &str, tag: &str) -> Self {
        self.affiliate = Some(Affiliate { param: param.to_string(), tag: tag.to_string() });
        self
    }
}

pub const DEFAULT_AMAZON_AFFILIATE_TAG: &str = "aanthony08-21";

/// The set of retailers search links can currently be built for. A retailer
/// missing from the directory yields no link rather than a broken one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetailerDirectory {
    endpoints: Vec<(RetailerKey, SearchEndpoint)>,
}

impl Default for RetailerDirectory {
    fn default() -> Self {
        Self::with_amazon_tag(DEFAULT_AMAZON_AFFILIATE_TAG)
    }
}

impl RetailerDirectory {
    pub fn with_amazon_tag(amazon_tag: &str) -> Self {
        Self {
            endpoints: vec![
                (
                    RetailerKey::Amazon,
                    SearchEndpoint::new("https://www.amazon.co.uk/s", "k")
                        .with_affiliate("tag", amazon_tag),
                ),
                (RetailerKey::Etsy, SearchEndpoint::new("https://www.etsy.com/uk/search", "q")),
                (
                    RetailerKey::Noths,
                    SearchEndpoint::new("https://www.notonthehighstreet.com/search", "term"),
                ),
                (
                    RetailerKey::VirginExp,
                    SearchEndpoint::new("https://www.virginexperiencedays.co.uk/search", "query"),
                ),
            ],
        }
    }

    /// Drops a retailer from the directory, e.g. when its affiliate program
    /// lapses.
    pub fn without(mut self, retailer: RetailerKey) -> Self {
        self.endpoints.retain(|(key, _)| *key != retailer);
        self
    }

    /// Builds the search URL for `raw_term` at the given retailer, or `None`
    /// when the retailer has no directory entry.
    pub fn search_url(&self, retailer: RetailerKey, raw_term: &str) -> Option<String> {
        let endpoint =
            self.endpoints.iter().find(|(key, _)| *key == retailer).map(|(_, endpoint)| endpoint)?;

        let term = clean_search_term(raw_term);
        let encoded = urlencoding::encode(&term);
        let mut url = format!("{}?{}={}", endpoint.base, endpoint.query_param, encoded);
        if let Some(affiliate) = &endpoint.affiliate {
            url.push_str(&format!("&{}={}", affiliate.param, affiliate.tag));
        }

        Some(url)
    }
}

/// Routes a suggestion to its retailer and builds the purchase link from its
/// brand-free search query (falling back to the display name).
pub fn purchase_url(
    suggestion: &AiGiftSuggestion,
    policy: &RoutingPolicy,
    directory: &RetailerDirectory,
) -> Option<String> {
    let term = if suggestion.search_query.trim().is_empty() {
        &suggestion.name
    } else {
        &suggestion.search_query
    };

    directory.search_url(policy.select(&suggestion.tags), term)
}
