use serde::{Deserialize, Serialize};

/// One of exactly four price tiers a generated suggestion may carry. The
/// provider is prompted with the literal strings; anything it returns is
/// normalised through [`PriceEstimate::parse_lenient`] before a suggestion
/// is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceEstimate {
    #[serde(rename = "Under £25")]
    Under25,
    #[serde(rename = "£25-50")]
    From25To50,
    #[serde(rename = "£50-100")]
    From50To100,
    #[serde(rename = "£100+")]
    Over100,
}

impl PriceEstimate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under25 => "Under £25",
            Self::From25To50 => "£25-50",
            Self::From50To100 => "£50-100",
            Self::Over100 => "£100+",
        }
    }

    /// Maps a free-form tier string onto a tier, tolerating case, currency
    /// signs, and spacing drift ("under £25", "GBP 25-50", "£100 +"). Returns
    /// `None` for values that name no tier, including numeric amounts.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '+' || *ch == '-')
            .collect();

        match normalized.as_str() {
            value if value.contains("under25") || value.contains("under-25") => Some(Self::Under25),
            value if value.contains("25-50") || value.contains("25to50") => Some(Self::From25To50),
            value if value.contains("50-100") || value.contains("50to100") => {
                Some(Self::From50To100)
            }
            value
                if value.contains("100+")
                    || value.contains("over100")
                    || value.contains("over-100") =>
            {
                Some(Self::Over100)
            }
            _ => None,
        }
    }
}

/// An AI-generated gift idea. Ephemeral: assembled per request, never
/// persisted, and `id` is not stable across requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGiftSuggestion {
    pub id: String,
    /// Display name; may include a brand.
    pub name: String,
    /// Brand-free generic term used for retailer searches.
    pub search_query: String,
    pub description: String,
    pub price_estimate: PriceEstimate,
    pub why_it_works: String,
    /// Advisory retailer display names from the provider; routing ignores
    /// these and works from `tags`.
    pub where_to_buy: Vec<String>,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::PriceEstimate;

    #[test]
    fn lenient_parse_accepts_the_canonical_tier_strings() {
        assert_eq!(PriceEstimate::parse_lenient("Under £25"), Some(PriceEstimate::Under25));
        assert_eq!(PriceEstimate::parse_lenient("£25-50"), Some(PriceEstimate::From25To50));
        assert_eq!(PriceEstimate::parse_lenient("£50-100"), Some(PriceEstimate::From50To100));
        assert_eq!(PriceEstimate::parse_lenient("£100+"), Some(PriceEstimate::Over100));
    }

    #[test]
    fn lenient_parse_tolerates_case_and_spacing_drift() {
        assert_eq!(PriceEstimate::parse_lenient("under £ 25"), Some(PriceEstimate::Under25));
        assert_eq!(PriceEstimate::parse_lenient("GBP 25 - 50"), Some(PriceEstimate::From25To50));
        assert_eq!(PriceEstimate::parse_lenient("£ 50 - 100"), Some(PriceEstimate::From50To100));
        assert_eq!(PriceEstimate::parse_lenient("over £100"), Some(PriceEstimate::Over100));
        assert_eq!(PriceEstimate::parse_lenient("£100 +"), Some(PriceEstimate::Over100));
    }

    #[test]
    fn lenient_parse_rejects_values_outside_the_tiers() {
        assert_eq!(PriceEstimate::parse_lenient("£37.99"), None);
        assert_eq!(PriceEstimate::parse_lenient("cheap"), None);
        assert_eq!(PriceEstimate::parse_lenient(""), None);
    }

    #[test]
    fn tier_serializes_as_its_display_string() {
        let json = serde_json::to_string(&PriceEstimate::From25To50).expect("serialize");
        assert_eq!(json, "\"£25-50\"");
    }
}
