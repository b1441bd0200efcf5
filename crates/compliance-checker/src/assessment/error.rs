use super::domain::{ActivityTag, AnswerType, AnswerValue, QuestionId};

/// Recoverable input errors reported back to whoever drives the assessment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid activity selection: {0}")]
    InvalidSelection(SelectionProblem),
    #[error("invalid answer value: {0}")]
    InvalidAnswerValue(AnswerProblem),
}

impl AssessmentError {
    pub fn kind(&self) -> &'static str {
        match self {
            AssessmentError::InvalidSelection(_) => "invalid_selection",
            AssessmentError::InvalidAnswerValue(_) => "invalid_answer_value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionProblem {
    #[error("at least one activity must be selected")]
    Empty,
    #[error("unrecognized activities: {}", join_tags(.0))]
    UnknownActivities(Vec<ActivityTag>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerProblem {
    #[error("question {question_id} does not accept '{value}' (answer type {answer_type:?})")]
    OutsideDomain {
        question_id: QuestionId,
        value: AnswerValue,
        answer_type: AnswerType,
    },
    #[error("question {0} is not part of the catalog")]
    UnknownQuestion(QuestionId),
    #[error("question {0} does not apply to the selected activities")]
    NotSelected(QuestionId),
}

fn join_tags(tags: &[ActivityTag]) -> String {
    tags.iter()
        .map(|tag| tag.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
