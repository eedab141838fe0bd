use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::gift::{Gift, PriceRange, RecipientType, Vibe};

const EMBEDDED_DATASET: &str = include_str!("../data/gifts.json");

/// Predicate over the catalog. Present fields are AND-combined; within a
/// field a gift matches when any listed value intersects the gift's own
/// value(s).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_range: Vec<PriceRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient_type: Vec<RecipientType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vibe: Vec<Vibe>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
}

impl CategoryFilter {
    pub fn matches(&self, gift: &Gift) -> bool {
        if !self.price_range.is_empty() && !self.price_range.contains(&gift.price_range) {
            return false;
        }

        if !self.recipient_type.is_empty()
            && !gift.recipient_type.iter().any(|recipient| self.recipient_type.contains(recipient))
        {
            return false;
        }

        if !self.vibe.is_empty() && !gift.vibe.iter().any(|vibe| self.vibe.contains(vibe)) {
            return false;
        }

        if !self.interests.is_empty()
            && !gift.interests.iter().any(|interest| self.interests.contains(interest))
        {
            return false;
        }

        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub last_updated: String,
    pub total_gifts: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    metadata: CatalogMetadata,
    gifts: Vec<Gift>,
    #[serde(default)]
    interest_options: Vec<String>,
    #[serde(default)]
    budget_tiers: BTreeMap<PriceRange, String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

/// The read-only gift catalog. Loaded once at startup; no mutation paths.
#[derive(Clone, Debug)]
pub struct GiftCatalog {
    gifts: Vec<Gift>,
    interest_options: Vec<String>,
    budget_tiers: BTreeMap<PriceRange, String>,
    metadata: CatalogMetadata,
}

impl GiftCatalog {
    /// Loads the dataset compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::validate(&file.gifts)?;

        Ok(Self {
            gifts: file.gifts,
            interest_options: file.interest_options,
            budget_tiers: file.budget_tiers,
            metadata: file.metadata,
        })
    }

    fn validate(gifts: &[Gift]) -> Result<(), CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        for gift in gifts {
            if !seen.insert(gift.id.0.as_str()) {
                return Err(CatalogError::Validation(format!("duplicate gift id `{}`", gift.id.0)));
            }
            if gift.recipient_type.is_empty() {
                return Err(CatalogError::Validation(format!(
                    "gift `{}` lists no recipient types",
                    gift.id.0
                )));
            }
            if gift.vibe.is_empty() {
                return Err(CatalogError::Validation(format!(
                    "gift `{}` lists no vibes",
                    gift.id.0
                )));
            }
        }
        Ok(())
    }

    pub fn all(&self) -> &[Gift] {
        &self.gifts
    }

    pub fn len(&self) -> usize {
        self.gifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gifts.is_empty()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn get(&self, id: &str) -> Option<&Gift> {
        self.gifts.iter().find(|gift| gift.id.0 == id)
    }

    pub fn interest_options(&self) -> &[String] {
        &self.interest_options
    }

    pub fn price_label(&self, range: PriceRange) -> Option<&str> {
        self.budget_tiers.get(&range).map(String::as_str)
    }

    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Gift> {
        self.gifts.iter().filter(|gift| filter.matches(gift)).collect()
    }

    /// Uniform sample without replacement from the (optionally filtered)
    /// catalog. Returns every match when fewer than `count` qualify.
    pub fn random_sample(&self, count: usize, filter: Option<&CategoryFilter>) -> Vec<&Gift> {
        self.random_sample_with(&mut rand::thread_rng(), count, filter)
    }

    pub fn random_sample_with<R: Rng>(
        &self,
        rng: &mut R,
        count: usize,
        filter: Option<&CategoryFilter>,
    ) -> Vec<&Gift> {
        let mut pool: Vec<&Gift> = match filter {
            Some(filter) => self.filter(filter),
            None => self.gifts.iter().collect(),
        };

        pool.shuffle(rng);
        pool.truncate(count);
        pool
    }

    /// Case-insensitive substring match over name, description, and interest
    /// tags. Matches keep catalog order; a blank query matches nothing.
    pub fn text_search(&self, query: &str) -> Vec<&Gift> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.gifts
            .iter()
            .filter(|gift| {
                gift.name.to_lowercase().contains(&needle)
                    || gift.description.to_lowercase().contains(&needle)
                    || gift.interests.iter().any(|interest| {
                        interest.to_lowercase().contains(&needle)
                    })
            })
            .collect()
    }
}
