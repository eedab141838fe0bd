pub mod accents;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod countdown;
pub mod domain;
pub mod prefs;
pub mod priority;
pub mod quiz;
pub mod retailers;

pub use accents::{accent_for_tags, TagAccent};
pub use catalog::{CatalogError, CategoryFilter, GiftCatalog};
pub use categories::Category;
pub use domain::gift::{Gift, GiftId, PriceRange, RecipientType, RelationshipStage, Vibe};
pub use domain::quiz::{AgeBand, Budget, Personality, QuizAnswers};
pub use domain::suggestion::{AiGiftSuggestion, PriceEstimate};
pub use prefs::{MemoryPreferenceStore, PreferenceStore};
pub use quiz::{
    compile_query, QuizAction, QuizAnswer, QuizError, QuizFlow, QuizSession, QuizState, QuizStep,
    SettleOutcome,
};
pub use retailers::{clean_search_term, purchase_url, RetailerDirectory, RetailerKey, RoutingPolicy};
