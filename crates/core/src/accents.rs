use serde::{Deserialize, Serialize};

use crate::priority::{first_match, PriorityRule};

/// Theme accent applied to a suggestion card, keyed off its tags. Returned
/// to clients as a styling hint so every surface colours cards the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagAccent {
    Burgundy,
    Gold,
    BurgundyLight,
    GoldMuted,
    Charcoal,
}

fn accent_rules() -> Vec<PriorityRule<TagAccent>> {
    vec![
        PriorityRule::new(TagAccent::Burgundy, &["romantic"]),
        PriorityRule::new(TagAccent::Gold, &["practical"]),
        PriorityRule::new(TagAccent::BurgundyLight, &["experience"]),
        PriorityRule::new(TagAccent::GoldMuted, &["luxury"]),
        PriorityRule::new(TagAccent::Charcoal, &["budget-friendly"]),
    ]
}

/// Picks the accent for a tag set; untagged or unrecognised cards fall back
/// to the default romantic burgundy.
pub fn accent_for_tags(tags: &[String]) -> TagAccent {
    first_match(tags, &accent_rules(), TagAccent::Burgundy)
}
