pub mod engine;
pub mod llm;
pub mod parse;

pub use engine::{GiftSuggester, SuggestionEngine, SuggestionError, SYSTEM_PROMPT};
pub use llm::{ChatCompletionsClient, LlmClient};
pub use parse::{extract_first_json_object, parse_suggestions};
