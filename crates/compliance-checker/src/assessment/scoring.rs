use serde::{Deserialize, Serialize};

use super::domain::{AnswerValue, AssessmentQuestion};
use super::error::{AnswerProblem, AssessmentError};

const PARTIAL_CREDIT: f64 = 0.5;

/// Contribution of one answer toward its module total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerScore {
    Scored { earned: f64, weight: u32 },
    /// `not_applicable`: counts toward neither numerator nor denominator.
    Excluded,
}

impl AnswerScore {
    pub fn earned(&self) -> f64 {
        match self {
            AnswerScore::Scored { earned, .. } => *earned,
            AnswerScore::Excluded => 0.0,
        }
    }

    pub fn counted_weight(&self) -> u32 {
        match self {
            AnswerScore::Scored { weight, .. } => *weight,
            AnswerScore::Excluded => 0,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, AnswerScore::Excluded)
    }
}

/// Score a single answer against its question's weight.
pub fn score_answer(
    question: &AssessmentQuestion,
    value: AnswerValue,
) -> Result<AnswerScore, AssessmentError> {
    if !question.answer_type.accepts(value) {
        return Err(AssessmentError::InvalidAnswerValue(
            AnswerProblem::OutsideDomain {
                question_id: question.id.clone(),
                value,
                answer_type: question.answer_type,
            },
        ));
    }

    let weight = question.weight;
    let earned = match value {
        AnswerValue::Yes => f64::from(weight),
        AnswerValue::Partial => f64::from(weight) * PARTIAL_CREDIT,
        AnswerValue::No => 0.0,
        AnswerValue::NotApplicable => return Ok(AnswerScore::Excluded),
    };

    Ok(AnswerScore::Scored { earned, weight })
}
