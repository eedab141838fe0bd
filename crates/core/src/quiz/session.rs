use thiserror::Error;

use crate::domain::quiz::QuizAnswers;
use crate::domain::suggestion::AiGiftSuggestion;
use crate::quiz::prompt::compile_query;
use crate::quiz::states::{
    QuizAction, QuizAnswer, QuizFlow, QuizState, QuizStep, TransitionOutcome,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("answer belongs to step {answered:?} but the quiz is on step {current:?}")]
    WrongStep { current: QuizStep, answered: QuizStep },
    #[error("step {0:?} is not part of this quiz flow")]
    StepNotInFlow(QuizStep),
    #[error("no question is active in state {0:?}")]
    NotOnQuestionStep(QuizState),
    #[error("interests can only be toggled on the interests step")]
    NotOnInterestsStep,
    #[error("at least one interest must be selected before continuing")]
    NoInterestsSelected,
}

/// What became of a suggestion settle: applied, or dropped because the
/// session has moved on since the fetch started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied,
    Stale,
}

/// One user's pass through the quiz.
///
/// Single-select answers advance automatically; the multi-select interests
/// step toggles in place and advances on an explicit continue. Answering the
/// final step compiles the provider query and enters `Loading`, handing the
/// caller a [`QuizAction::FetchSuggestions`] to run. The session reaches
/// `Results` when the fetch settles — with an empty list on failure, never
/// an error state.
///
/// Every trip into `Loading` (and every restart) bumps a generation counter;
/// a settle carrying a stale generation is dropped, so a response that
/// arrives after a restart can never resurrect cleared state.
#[derive(Clone, Debug)]
pub struct QuizSession {
    flow: QuizFlow,
    state: QuizState,
    answers: QuizAnswers,
    results: Vec<AiGiftSuggestion>,
    generation: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(QuizFlow::default())
    }
}

impl QuizSession {
    pub fn new(flow: QuizFlow) -> Self {
        let state = QuizState::Step(flow.first());
        Self { flow, state, answers: QuizAnswers::default(), results: Vec::new(), generation: 0 }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    pub fn results(&self) -> &[AiGiftSuggestion] {
        &self.results
    }

    /// Zero-based position of the current step and the total step count,
    /// for progress display. `None` outside the question steps.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let QuizState::Step(step) = self.state else {
            return None;
        };
        let position = self.flow.steps().iter().position(|candidate| *candidate == step)?;
        Some((position, self.flow.steps().len()))
    }

    /// Records a single-select answer and advances. On the last step this
    /// compiles the query and enters `Loading`, emitting the fetch action.
    pub fn select(&mut self, answer: QuizAnswer) -> Result<TransitionOutcome, QuizError> {
        let current = self.current_step()?;
        let answered = answer.step();

        if !self.flow.contains(answered) {
            return Err(QuizError::StepNotInFlow(answered));
        }
        if answered != current {
            return Err(QuizError::WrongStep { current, answered });
        }

        self.record(answer);
        Ok(self.advance_from(current))
    }

    /// Toggles membership of `interest` in the accumulated set. Valid only
    /// while the interests step is active; never advances.
    pub fn toggle_interest(&mut self, interest: &str) -> Result<(), QuizError> {
        if self.current_step()? != QuizStep::Interests {
            return Err(QuizError::NotOnInterestsStep);
        }

        if let Some(position) =
            self.answers.interests.iter().position(|existing| existing == interest)
        {
            self.answers.interests.remove(position);
        } else {
            self.answers.interests.push(interest.to_string());
        }

        Ok(())
    }

    /// Leaves the interests step. Refused while nothing is selected — the
    /// continue control stays disabled until the set is non-empty.
    pub fn advance(&mut self) -> Result<TransitionOutcome, QuizError> {
        let current = self.current_step()?;
        if current != QuizStep::Interests {
            return Err(QuizError::NotOnInterestsStep);
        }
        if self.answers.interests.is_empty() {
            return Err(QuizError::NoInterestsSelected);
        }

        Ok(self.advance_from(current))
    }

    /// Applies a settled suggestion fetch. The caller settles with an empty
    /// list on any failure; the session moves to `Results` either way. A
    /// generation mismatch means the fetch was outrun by a restart (or a
    /// newer fetch) and the settle is dropped.
    pub fn settle_suggestions(
        &mut self,
        generation: u64,
        suggestions: Vec<AiGiftSuggestion>,
    ) -> SettleOutcome {
        if self.state != QuizState::Loading || generation != self.generation {
            return SettleOutcome::Stale;
        }

        self.results = suggestions;
        self.state = QuizState::Results;
        SettleOutcome::Applied
    }

    /// Returns to the first step from any state, clearing answers and
    /// results and invalidating any in-flight fetch.
    pub fn restart(&mut self) -> TransitionOutcome {
        let from = self.state;
        self.answers = QuizAnswers::default();
        self.results.clear();
        self.generation += 1;
        self.state = QuizState::Step(self.flow.first());

        TransitionOutcome { from, to: self.state, actions: Vec::new() }
    }

    fn current_step(&self) -> Result<QuizStep, QuizError> {
        match self.state {
            QuizState::Step(step) => Ok(step),
            other => Err(QuizError::NotOnQuestionStep(other)),
        }
    }

    fn record(&mut self, answer: QuizAnswer) {
        match answer {
            QuizAnswer::Recipient(recipient) => self.answers.recipient = Some(recipient),
            QuizAnswer::Relationship(stage) => self.answers.relationship = Some(stage),
            QuizAnswer::Age(age_band) => self.answers.age_band = Some(age_band),
            QuizAnswer::Budget(budget) => self.answers.budget = Some(budget),
            QuizAnswer::Personality(personality) => self.answers.personality = Some(personality),
        }
    }

    fn advance_from(&mut self, current: QuizStep) -> TransitionOutcome {
        let from = self.state;

        match self.flow.next_after(current) {
            Some(next) => {
                self.state = QuizState::Step(next);
                TransitionOutcome { from, to: self.state, actions: Vec::new() }
            }
            None => {
                self.generation += 1;
                self.state = QuizState::Loading;
                let action = QuizAction::FetchSuggestions {
                    query: compile_query(&self.answers),
                    generation: self.generation,
                };
                TransitionOutcome { from, to: self.state, actions: vec![action] }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QuizError, QuizSession, SettleOutcome};
    use crate::domain::gift::{RecipientType, RelationshipStage};
    use crate::domain::quiz::{AgeBand, Budget, Personality};
    use crate::domain::suggestion::{AiGiftSuggestion, PriceEstimate};
    use crate::quiz::states::{QuizAction, QuizAnswer, QuizFlow, QuizState, QuizStep};

    fn suggestion(id: &str) -> AiGiftSuggestion {
        AiGiftSuggestion {
            id: id.to_string(),
            name: "Instant film camera".to_string(),
            search_query: "instant film camera".to_string(),
            description: "Retro camera for date nights".to_string(),
            price_estimate: PriceEstimate::From50To100,
            why_it_works: "Tangible memories".to_string(),
            where_to_buy: vec!["Amazon UK".to_string()],
            tags: vec!["romantic".to_string()],
        }
    }

    /// Answers every step of the default flow; returns the emitted fetch
    /// action's query and generation.
    fn complete_default_quiz(session: &mut QuizSession) -> (String, u64) {
        session.select(QuizAnswer::Recipient(RecipientType::Boyfriend)).expect("recipient");
        session.select(QuizAnswer::Relationship(RelationshipStage::New)).expect("relationship");
        session.toggle_interest("cooking").expect("toggle");
        session.toggle_interest("tech").expect("toggle");
        session.advance().expect("continue past interests");
        session.select(QuizAnswer::Budget(Budget::Under25)).expect("budget");
        let outcome =
            session.select(QuizAnswer::Personality(Personality::Romantic)).expect("personality");

        assert_eq!(outcome.to, QuizState::Loading);
        let [QuizAction::FetchSuggestions { query, generation }] = outcome.actions.as_slice()
        else {
            panic!("final step should emit exactly one fetch action");
        };
        (query.clone(), *generation)
    }

    #[test]
    fn single_select_steps_advance_in_flow_order() {
        let mut session = QuizSession::default();
        assert_eq!(session.state(), QuizState::Step(QuizStep::Recipient));
        assert_eq!(session.progress(), Some((0, 5)));

        let outcome =
            session.select(QuizAnswer::Recipient(RecipientType::Girlfriend)).expect("select");
        assert_eq!(outcome.to, QuizState::Step(QuizStep::Relationship));
        assert!(outcome.actions.is_empty());
        assert_eq!(session.progress(), Some((1, 5)));
    }

    #[test]
    fn answers_for_the_wrong_step_are_rejected() {
        let mut session = QuizSession::default();
        let error = session
            .select(QuizAnswer::Budget(Budget::Any))
            .expect_err("budget answer on recipient step");
        assert_eq!(
            error,
            QuizError::WrongStep { current: QuizStep::Recipient, answered: QuizStep::Budget }
        );
    }

    #[test]
    fn age_answers_are_rejected_when_the_flow_omits_the_step() {
        let mut session = QuizSession::default();
        let error = session.select(QuizAnswer::Age(AgeBand::Under25)).expect_err("no age step");
        assert_eq!(error, QuizError::StepNotInFlow(QuizStep::Age));
    }

    #[test]
    fn age_revision_asks_for_the_age_band() {
        let mut session = QuizSession::new(QuizFlow::with_age_step());
        session.select(QuizAnswer::Recipient(RecipientType::Wife)).expect("recipient");
        session.select(QuizAnswer::Relationship(RelationshipStage::Longterm)).expect("stage");

        let outcome = session.select(QuizAnswer::Age(AgeBand::From35To44)).expect("age");
        assert_eq!(outcome.to, QuizState::Step(QuizStep::Interests));
        assert_eq!(session.answers().age_band, Some(AgeBand::From35To44));
    }

    #[test]
    fn interests_toggle_without_advancing_and_gate_the_continue() {
        let mut session = QuizSession::default();
        session.select(QuizAnswer::Recipient(RecipientType::Partner)).expect("recipient");
        session
            .select(QuizAnswer::Relationship(RelationshipStage::Established))
            .expect("relationship");

        assert_eq!(session.advance().expect_err("empty set"), QuizError::NoInterestsSelected);

        session.toggle_interest("music").expect("toggle on");
        assert_eq!(session.state(), QuizState::Step(QuizStep::Interests));
        session.toggle_interest("music").expect("toggle off");
        assert_eq!(session.advance().expect_err("toggled back off"), QuizError::NoInterestsSelected);

        session.toggle_interest("music").expect("toggle on again");
        let outcome = session.advance().expect("continue");
        assert_eq!(outcome.to, QuizState::Step(QuizStep::Budget));
        assert_eq!(session.answers().interests, vec!["music".to_string()]);
    }

    #[test]
    fn completing_the_quiz_compiles_the_query_and_enters_loading() {
        let mut session = QuizSession::default();
        let (query, _) = complete_default_quiz(&mut session);

        assert_eq!(session.state(), QuizState::Loading);
        assert!(query.contains("my boyfriend"));
        assert!(query.contains("cooking, tech"));
        assert_eq!(session.progress(), None);
    }

    #[test]
    fn settling_moves_to_results_even_with_an_empty_list() {
        let mut session = QuizSession::default();
        let (_, generation) = complete_default_quiz(&mut session);

        assert_eq!(session.settle_suggestions(generation, Vec::new()), SettleOutcome::Applied);
        assert_eq!(session.state(), QuizState::Results);
        assert!(session.results().is_empty());
    }

    #[test]
    fn restart_clears_answers_results_and_returns_to_the_first_step() {
        let mut session = QuizSession::default();
        let (_, generation) = complete_default_quiz(&mut session);
        session.settle_suggestions(generation, vec![suggestion("ai-1")]);
        assert_eq!(session.results().len(), 1);

        let outcome = session.restart();
        assert_eq!(outcome.to, QuizState::Step(QuizStep::Recipient));
        assert_eq!(session.answers(), &Default::default());
        assert!(session.results().is_empty());
    }

    #[test]
    fn a_fetch_outrun_by_restart_is_dropped() {
        let mut session = QuizSession::default();
        let (_, stale_generation) = complete_default_quiz(&mut session);

        session.restart();
        assert_eq!(
            session.settle_suggestions(stale_generation, vec![suggestion("ai-late")]),
            SettleOutcome::Stale
        );
        assert_eq!(session.state(), QuizState::Step(QuizStep::Recipient));
        assert!(session.results().is_empty());
    }

    #[test]
    fn a_second_run_ignores_the_previous_runs_generation() {
        let mut session = QuizSession::default();
        let (_, first_generation) = complete_default_quiz(&mut session);
        session.settle_suggestions(first_generation, Vec::new());

        session.restart();
        let (_, second_generation) = complete_default_quiz(&mut session);
        assert_ne!(first_generation, second_generation);

        assert_eq!(
            session.settle_suggestions(first_generation, vec![suggestion("ai-old")]),
            SettleOutcome::Stale
        );
        assert_eq!(
            session.settle_suggestions(second_generation, vec![suggestion("ai-new")]),
            SettleOutcome::Applied
        );
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].id, "ai-new");
    }

    #[test]
    fn question_operations_are_rejected_outside_question_steps() {
        let mut session = QuizSession::default();
        let (_, generation) = complete_default_quiz(&mut session);

        assert!(matches!(
            session.select(QuizAnswer::Recipient(RecipientType::Wife)),
            Err(QuizError::NotOnQuestionStep(QuizState::Loading))
        ));
        assert!(matches!(
            session.toggle_interest("music"),
            Err(QuizError::NotOnQuestionStep(QuizState::Loading))
        ));

        session.settle_suggestions(generation, Vec::new());
        assert!(matches!(
            session.advance(),
            Err(QuizError::NotOnQuestionStep(QuizState::Results))
        ));
    }
}
