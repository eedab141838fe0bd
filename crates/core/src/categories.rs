use serde::{Deserialize, Serialize};

use crate::catalog::CategoryFilter;
use crate::domain::gift::{PriceRange, RecipientType, Vibe};

/// A curated browse page: a slug, display copy, and the filter that selects
/// its gifts from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub filter: CategoryFilter,
}

impl Category {
    fn new(slug: &str, name: &str, description: &str, filter: CategoryFilter) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            filter,
        }
    }
}

pub fn all() -> Vec<Category> {
    vec![
        Category::new(
            "under-25",
            "Under £25",
            "Thoughtful gifts that won't break the bank",
            CategoryFilter { price_range: vec![PriceRange::Under25], ..CategoryFilter::default() },
        ),
        Category::new(
            "for-him",
            "For Him",
            "Gifts perfect for boyfriends and husbands",
            CategoryFilter {
                recipient_type: vec![RecipientType::Boyfriend, RecipientType::Husband],
                ..CategoryFilter::default()
            },
        ),
        Category::new(
            "for-her",
            "For Her",
            "Gifts perfect for girlfriends and wives",
            CategoryFilter {
                recipient_type: vec![RecipientType::Girlfriend, RecipientType::Wife],
                ..CategoryFilter::default()
            },
        ),
        Category::new(
            "experiences",
            "Experiences",
            "Create memories together with experiential gifts",
            CategoryFilter { vibe: vec![Vibe::Experiential], ..CategoryFilter::default() },
        ),
        Category::new(
            "romantic",
            "Romantic",
            "Classic romantic gifts to sweep them off their feet",
            CategoryFilter { vibe: vec![Vibe::Romantic], ..CategoryFilter::default() },
        ),
        Category::new(
            "practical",
            "Practical",
            "Useful gifts they'll actually use every day",
            CategoryFilter { vibe: vec![Vibe::Practical], ..CategoryFilter::default() },
        ),
        Category::new(
            "luxury",
            "Luxury",
            "Special occasion splurges for someone special",
            CategoryFilter { price_range: vec![PriceRange::Over100], ..CategoryFilter::default() },
        ),
        Category::new(
            "fun-playful",
            "Fun & Playful",
            "Lighthearted gifts that bring joy and laughter",
            CategoryFilter { vibe: vec![Vibe::Funny], ..CategoryFilter::default() },
        ),
    ]
}

pub fn by_slug(slug: &str) -> Option<Category> {
    all().into_iter().find(|category| category.slug == slug)
}
