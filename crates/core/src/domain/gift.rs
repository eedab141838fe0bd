use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GiftId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "25to50")]
    From25To50,
    #[serde(rename = "50to100")]
    From50To100,
    #[serde(rename = "over100")]
    Over100,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Girlfriend,
    Boyfriend,
    Wife,
    Husband,
    Partner,
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Girlfriend => "girlfriend",
            Self::Boyfriend => "boyfriend",
            Self::Wife => "wife",
            Self::Husband => "husband",
            Self::Partner => "partner",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    Romantic,
    Practical,
    Experiential,
    Funny,
    Luxury,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStage {
    New,
    Established,
    Longterm,
}

/// A curated catalog entry. Immutable for the process lifetime; the catalog
/// has no create/update/delete paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: GiftId,
    pub name: String,
    pub description: String,
    pub price_range: PriceRange,
    pub recipient_type: Vec<RecipientType>,
    pub interests: Vec<String>,
    pub vibe: Vec<Vibe>,
    pub relationship_stage: Vec<RelationshipStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Overrides the gift name when building retailer search links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl Gift {
    /// The term used for retailer searches: the explicit override when
    /// present, the display name otherwise.
    pub fn retailer_search_term(&self) -> &str {
        self.search_term.as_deref().unwrap_or(&self.name)
    }
}
