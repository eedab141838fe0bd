//! End-to-end quiz flow against the suggestion engine: the session emits a
//! fetch action, the caller runs it, and settles with whatever came back —
//! an empty list on any failure.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use cupid_agent::{GiftSuggester, LlmClient, SuggestionEngine};
use cupid_core::domain::gift::{RecipientType, RelationshipStage};
use cupid_core::domain::quiz::{Budget, Personality};
use cupid_core::quiz::{QuizAction, QuizAnswer, QuizSession, QuizState, SettleOutcome};

struct CannedClient {
    reply: &'static str,
}

#[async_trait]
impl LlmClient for CannedClient {
    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String> {
        Ok(self.reply.to_string())
    }
}

struct DownstreamOutage;

#[async_trait]
impl LlmClient for DownstreamOutage {
    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String> {
        bail!("upstream returned status 500")
    }
}

fn complete_quiz(session: &mut QuizSession) -> (String, u64) {
    session.select(QuizAnswer::Recipient(RecipientType::Girlfriend)).expect("recipient");
    session.select(QuizAnswer::Relationship(RelationshipStage::New)).expect("relationship");
    session.toggle_interest("music").expect("toggle");
    session.advance().expect("continue");
    session.select(QuizAnswer::Budget(Budget::From25To50)).expect("budget");
    let outcome = session.select(QuizAnswer::Personality(Personality::Funny)).expect("personality");

    match outcome.actions.as_slice() {
        [QuizAction::FetchSuggestions { query, generation }] => (query.clone(), *generation),
        other => panic!("expected a single fetch action, got {other:?}"),
    }
}

/// Runs the fetch the way a UI driver does: any error settles as empty.
async fn run_fetch(
    session: &mut QuizSession,
    engine: &SuggestionEngine,
    query: &str,
    generation: u64,
) -> SettleOutcome {
    let suggestions = engine.suggest(query).await.unwrap_or_default();
    session.settle_suggestions(generation, suggestions)
}

#[tokio::test]
async fn completed_quiz_reaches_results_with_suggestions() {
    let reply = r#"{"gifts": [
        {"name": "Couples karaoke machine", "searchQuery": "home karaoke machine",
         "description": "Sing-off nights at home.", "priceEstimate": "£25-50",
         "whyItWorks": "Playful and musical.", "whereToBuy": ["Amazon UK"],
         "tags": ["funny", "budget-friendly"]}
    ]}"#;
    let engine = SuggestionEngine::new(Arc::new(CannedClient { reply }));
    let mut session = QuizSession::default();

    let (query, generation) = complete_quiz(&mut session);
    assert!(query.contains("my girlfriend"));
    assert_eq!(session.state(), QuizState::Loading);

    let outcome = run_fetch(&mut session, &engine, &query, generation).await;
    assert_eq!(outcome, SettleOutcome::Applied);
    assert_eq!(session.state(), QuizState::Results);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.results()[0].name, "Couples karaoke machine");
}

#[tokio::test]
async fn provider_outage_still_reaches_results_with_no_suggestions() {
    let engine = SuggestionEngine::new(Arc::new(DownstreamOutage));
    let mut session = QuizSession::default();

    let (query, generation) = complete_quiz(&mut session);
    let outcome = run_fetch(&mut session, &engine, &query, generation).await;

    assert_eq!(outcome, SettleOutcome::Applied);
    assert_eq!(session.state(), QuizState::Results);
    assert!(session.results().is_empty());
}

#[tokio::test]
async fn a_restart_during_the_fetch_discards_the_late_response() {
    let reply = r#"{"gifts": [
        {"name": "Late arrival", "searchQuery": "late arrival", "description": "d",
         "priceEstimate": "Under £25", "whyItWorks": "w", "whereToBuy": [], "tags": []}
    ]}"#;
    let engine = SuggestionEngine::new(Arc::new(CannedClient { reply }));
    let mut session = QuizSession::default();

    let (query, generation) = complete_quiz(&mut session);
    session.restart();

    let outcome = run_fetch(&mut session, &engine, &query, generation).await;
    assert_eq!(outcome, SettleOutcome::Stale);
    assert!(session.results().is_empty());
    assert_eq!(session.answers(), &Default::default());
}
