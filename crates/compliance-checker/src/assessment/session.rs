use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::{calculate_result, AssessmentResult};
use super::catalog::{QuestionCatalog, StatusThresholds};
use super::domain::{
    AnswerValue, AssessmentAnswer, AssessmentQuestion, ModuleId, QuestionId, SelectedActivities,
};
use super::error::AssessmentError;
use super::filter::{filter_questions, FilteredQuestions};
use super::scoring::{score_answer, AnswerScore};

/// Answered/total counts for progress indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssessmentProgress {
    pub answered: usize,
    pub total: usize,
    pub current_index: usize,
}

impl AssessmentProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }
}

/// Progress of one assessment, owned by whoever drives it.
///
/// The selection and the question set are fixed at start; answers are replaced on re-answer.
#[derive(Debug, Clone)]
pub struct AssessmentState {
    selection: SelectedActivities,
    questions: FilteredQuestions,
    thresholds: StatusThresholds,
    answers: BTreeMap<QuestionId, AssessmentAnswer>,
    cursor: usize,
}

impl AssessmentState {
    pub fn start(
        catalog: &QuestionCatalog,
        selection: SelectedActivities,
    ) -> Result<Self, AssessmentError> {
        let questions = filter_questions(catalog, &selection)?;
        Ok(Self {
            selection,
            questions,
            thresholds: *catalog.thresholds(),
            answers: BTreeMap::new(),
            cursor: 0,
        })
    }

    pub fn selection(&self) -> &SelectedActivities {
        &self.selection
    }

    pub fn questions(&self) -> &FilteredQuestions {
        &self.questions
    }

    pub fn answers(&self) -> impl Iterator<Item = &AssessmentAnswer> {
        self.answers.values()
    }

    pub fn answer_for(&self, id: &QuestionId) -> Option<&AssessmentAnswer> {
        self.answers.get(id)
    }

    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        value: AnswerValue,
    ) -> Result<AnswerScore, AssessmentError> {
        self.record_answer_at(question_id, value, Utc::now())
    }

    pub fn record_answer_at(
        &mut self,
        question_id: &QuestionId,
        value: AnswerValue,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerScore, AssessmentError> {
        let question = self.questions.question(question_id).ok_or_else(|| {
            AssessmentError::InvalidAnswerValue(self.questions.rejection_for(question_id))
        })?;
        let score = score_answer(question, value)?;

        // A strictly newer stored answer wins, matching `latest_answers`.
        let superseded = self
            .answers
            .get(question_id)
            .is_some_and(|existing| existing.answered_at > answered_at);
        if !superseded {
            self.answers.insert(
                question_id.clone(),
                AssessmentAnswer {
                    question_id: question_id.clone(),
                    value,
                    answered_at,
                },
            );
        }

        Ok(score)
    }

    /// Answer the question under the cursor and move on. `None` once every question was visited.
    pub fn answer_current(
        &mut self,
        value: AnswerValue,
    ) -> Result<Option<AnswerScore>, AssessmentError> {
        let Some(id) = self.current_question().map(|question| question.id.clone()) else {
            return Ok(None);
        };
        let score = self.record_answer(&id, value)?;
        self.advance();
        Ok(Some(score))
    }

    pub fn current_question(&self) -> Option<&AssessmentQuestion> {
        self.questions.iter().nth(self.cursor)
    }

    pub fn current_module(&self) -> Option<&ModuleId> {
        self.current_question().map(|question| &question.module)
    }

    /// Move forward; returns `false` once past the last question.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.questions.len() {
            self.cursor += 1;
        }
        self.cursor < self.questions.len()
    }

    pub fn go_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn jump_to(&mut self, question_id: &QuestionId) -> bool {
        match self
            .questions
            .iter()
            .position(|question| &question.id == question_id)
        {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub fn progress(&self) -> AssessmentProgress {
        AssessmentProgress {
            answered: self.answers.len(),
            total: self.questions.len(),
            current_index: self.cursor,
        }
    }

    pub fn result(&self) -> Result<AssessmentResult, AssessmentError> {
        calculate_result(&self.questions, self.answers.values(), &self.thresholds)
    }
}
