use std::sync::Arc;

use tracing::{debug, info, warn};

use super::aggregate::{calculate_result, AssessmentResult};
use super::catalog::QuestionCatalog;
use super::domain::{
    ActivityTag, AnswerValue, AssessmentAnswer, QuestionId, SelectedActivities,
};
use super::error::{AnswerProblem, AssessmentError};
use super::filter::{filter_questions, FilteredQuestions};
use super::locale::Locale;
use super::scoring::{score_answer, AnswerScore};
use super::session::AssessmentState;

/// Façade over the catalog used by the HTTP router and the CLI.
///
/// Holds no per-assessment state; every call recomputes from its inputs.
#[derive(Debug, Clone)]
pub struct AssessmentService {
    catalog: Arc<QuestionCatalog>,
    default_locale: Locale,
}

impl AssessmentService {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            default_locale: Locale::english(),
        }
    }

    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn resolve_locale(&self, requested: Option<Locale>) -> Locale {
        requested.unwrap_or_else(|| self.default_locale.clone())
    }

    pub fn select(&self, activities: Vec<ActivityTag>) -> Result<SelectedActivities, AssessmentError> {
        SelectedActivities::new(activities).inspect_err(|err| {
            warn!(error = %err, "rejected activity selection");
        })
    }

    /// Start a client-owned assessment for the declared activities.
    pub fn start(&self, activities: Vec<ActivityTag>) -> Result<AssessmentState, AssessmentError> {
        let selection = self.select(activities)?;
        let state = AssessmentState::start(&self.catalog, selection)?;
        debug!(
            activities = state.selection().len(),
            questions = state.questions().len(),
            "assessment started"
        );
        Ok(state)
    }

    pub fn questions_for(
        &self,
        activities: Vec<ActivityTag>,
    ) -> Result<FilteredQuestions, AssessmentError> {
        let selection = self.select(activities)?;
        let questions = filter_questions(&self.catalog, &selection).inspect_err(|err| {
            warn!(error = %err, "rejected activity selection");
        })?;
        debug!(
            activities = selection.len(),
            modules = questions.groups().len(),
            questions = questions.len(),
            "filtered catalog questions"
        );
        Ok(questions)
    }

    pub fn score(
        &self,
        question_id: &QuestionId,
        value: AnswerValue,
    ) -> Result<AnswerScore, AssessmentError> {
        let question = self.catalog.question(question_id).ok_or_else(|| {
            AssessmentError::InvalidAnswerValue(AnswerProblem::UnknownQuestion(
                question_id.clone(),
            ))
        })?;
        score_answer(question, value)
    }

    /// Filter, score, and aggregate in one pass.
    pub fn evaluate(
        &self,
        activities: Vec<ActivityTag>,
        answers: &[AssessmentAnswer],
    ) -> Result<AssessmentResult, AssessmentError> {
        let questions = self.questions_for(activities)?;

        if let Some(unknown) = answers
            .iter()
            .find(|answer| self.catalog.question(&answer.question_id).is_none())
        {
            warn!(question_id = %unknown.question_id, "answer references unknown question");
            return Err(AssessmentError::InvalidAnswerValue(
                AnswerProblem::UnknownQuestion(unknown.question_id.clone()),
            ));
        }

        let result = calculate_result(&questions, answers, self.catalog.thresholds())
            .inspect_err(|err| warn!(error = %err, "rejected assessment answers"))?;

        info!(
            catalog_version = self.catalog.version(),
            answered = result.answered,
            pending = result.pending.len(),
            overall_score = result.overall_score,
            status = result.status.label(),
            "assessment evaluated"
        );
        Ok(result)
    }
}
