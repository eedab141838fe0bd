use serde::{Deserialize, Serialize};

use crate::domain::gift::{RecipientType, RelationshipStage};

/// Quiz budget selection: the catalog price ranges plus a "no limit"
/// sentinel that contributes nothing to the compiled query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Budget {
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "25to50")]
    From25To50,
    #[serde(rename = "50to100")]
    From50To100,
    #[serde(rename = "over100")]
    Over100,
    #[serde(rename = "any")]
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Romantic,
    Practical,
    Adventurous,
    Funny,
    Luxury,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "25to34")]
    From25To34,
    #[serde(rename = "35to44")]
    From35To44,
    #[serde(rename = "over45")]
    Over45,
}

/// Accumulated quiz selections. Every field except `interests` is
/// single-valued once set; the session only treats the quiz as complete
/// when every configured step has been answered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_band: Option<AgeBand>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
}
