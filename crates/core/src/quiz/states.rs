use serde::{Deserialize, Serialize};

use crate::domain::gift::{RecipientType, RelationshipStage};
use crate::domain::quiz::{AgeBand, Budget, Personality};

/// One question step. The order steps are asked in is carried by
/// [`QuizFlow`], not by this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStep {
    Recipient,
    Relationship,
    Age,
    Interests,
    Budget,
    Personality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizState {
    Step(QuizStep),
    Loading,
    Results,
}

/// A single-select answer, tagged with the step it belongs to. Interests are
/// multi-select and go through `toggle_interest` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizAnswer {
    Recipient(RecipientType),
    Relationship(RelationshipStage),
    Age(AgeBand),
    Budget(Budget),
    Personality(Personality),
}

impl QuizAnswer {
    pub fn step(&self) -> QuizStep {
        match self {
            Self::Recipient(_) => QuizStep::Recipient,
            Self::Relationship(_) => QuizStep::Relationship,
            Self::Age(_) => QuizStep::Age,
            Self::Budget(_) => QuizStep::Budget,
            Self::Personality(_) => QuizStep::Personality,
        }
    }
}

/// Side effect requested by a transition. Emitted when the final step is
/// answered: the caller runs the fetch and settles the session with whatever
/// arrives (an empty list on failure).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizAction {
    FetchSuggestions { query: String, generation: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: QuizState,
    pub to: QuizState,
    pub actions: Vec<QuizAction>,
}

/// The configured step sequence. The `age` step exists in one product
/// revision and not the other, so the order is data rather than control
/// flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizFlow {
    steps: Vec<QuizStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuizFlowError {
    #[error("a quiz flow needs at least one step")]
    Empty,
    #[error("step {0:?} appears more than once")]
    DuplicateStep(QuizStep),
}

impl Default for QuizFlow {
    fn default() -> Self {
        Self {
            steps: vec![
                QuizStep::Recipient,
                QuizStep::Relationship,
                QuizStep::Interests,
                QuizStep::Budget,
                QuizStep::Personality,
            ],
        }
    }
}

impl QuizFlow {
    pub fn new(steps: Vec<QuizStep>) -> Result<Self, QuizFlowError> {
        if steps.is_empty() {
            return Err(QuizFlowError::Empty);
        }
        for (index, step) in steps.iter().enumerate() {
            if steps[..index].contains(step) {
                return Err(QuizFlowError::DuplicateStep(*step));
            }
        }
        Ok(Self { steps })
    }

    /// The revision that also asks for an age band, between relationship and
    /// interests.
    pub fn with_age_step() -> Self {
        Self {
            steps: vec![
                QuizStep::Recipient,
                QuizStep::Relationship,
                QuizStep::Age,
                QuizStep::Interests,
                QuizStep::Budget,
                QuizStep::Personality,
            ],
        }
    }

    pub fn steps(&self) -> &[QuizStep] {
        &self.steps
    }

    pub fn first(&self) -> QuizStep {
        self.steps[0]
    }

    pub fn next_after(&self, step: QuizStep) -> Option<QuizStep> {
        let position = self.steps.iter().position(|candidate| *candidate == step)?;
        self.steps.get(position + 1).copied()
    }

    pub fn contains(&self, step: QuizStep) -> bool {
        self.steps.contains(&step)
    }
}
