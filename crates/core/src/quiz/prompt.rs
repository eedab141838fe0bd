//! The quiz-to-query compiler: turns a completed answer set into the
//! natural-language prompt sent to the suggestion provider. Total and pure —
//! its output is the literal text of a paid API call, so the same answers
//! must always compile to the same string.

use crate::domain::gift::RelationshipStage;
use crate::domain::quiz::{AgeBand, Budget, Personality, QuizAnswers};

pub fn compile_query(answers: &QuizAnswers) -> String {
    let mut parts: Vec<String> = Vec::new();

    let recipient = answers.recipient.map(|recipient| recipient.as_str()).unwrap_or("partner");
    parts.push(format!("Valentine's gift for my {recipient}"));

    match answers.relationship {
        Some(RelationshipStage::New) => parts.push("we're in a new relationship".to_string()),
        Some(RelationshipStage::Longterm) => {
            parts.push("we've been together for years".to_string());
        }
        _ => {}
    }

    if let Some(age_band) = answers.age_band {
        parts.push(format!("they're {}", age_phrase(age_band)));
    }

    if !answers.interests.is_empty() {
        parts.push(format!("they love {}", answers.interests.join(", ")));
    }

    if let Some(clause) = answers.budget.and_then(budget_clause) {
        parts.push(format!("budget {clause}"));
    }

    if let Some(personality) = answers.personality {
        parts.push(format!("prefer {}", personality_phrase(personality)));
    }

    parts.join(". ")
}

fn age_phrase(age_band: AgeBand) -> &'static str {
    match age_band {
        AgeBand::Under25 => "in their early 20s",
        AgeBand::From25To34 => "in their late 20s or early 30s",
        AgeBand::From35To44 => "in their late 30s or early 40s",
        AgeBand::Over45 => "over 45",
    }
}

fn budget_clause(budget: Budget) -> Option<&'static str> {
    match budget {
        Budget::Under25 => Some("under £25"),
        Budget::From25To50 => Some("£25-50"),
        Budget::From50To100 => Some("£50-100"),
        Budget::Over100 => Some("over £100"),
        Budget::Any => None,
    }
}

fn personality_phrase(personality: Personality) -> &'static str {
    match personality {
        Personality::Romantic => "romantic and sentimental gifts",
        Personality::Practical => "practical and useful gifts",
        Personality::Adventurous => "experience-based or adventurous gifts",
        Personality::Funny => "fun and playful gifts",
        Personality::Luxury => "luxurious and indulgent gifts",
    }
}
