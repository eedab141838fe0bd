pub mod prompt;
pub mod session;
pub mod states;

pub use prompt::compile_query;
pub use session::{QuizError, QuizSession, SettleOutcome};
pub use states::{
    QuizAction, QuizAnswer, QuizFlow, QuizFlowError, QuizState, QuizStep, TransitionOutcome,
};
