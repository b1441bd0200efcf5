use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::StatusThresholds;
use super::domain::{AnswerValue, AssessmentAnswer, ComplianceStatus, ModuleId, QuestionId};
use super::error::AssessmentError;
use super::filter::FilteredQuestions;
use super::scoring::score_answer;

/// Per-module totals derived from the current answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleScore {
    pub module: ModuleId,
    pub earned: f64,
    /// Weights of answered, applicable questions; the percentage denominator.
    pub scored_weight: u32,
    /// Weights of every question of the module included for the selection.
    pub max_possible: u32,
    pub percentage: Option<f64>,
    pub status: ComplianceStatus,
    pub answered: usize,
    pub not_applicable: usize,
    pub pending: usize,
}

/// Question answered `no` or `partial`, surfaced for remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceGap {
    pub question_id: QuestionId,
    pub module: ModuleId,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub overall_score: Option<f64>,
    pub status: ComplianceStatus,
    pub modules: Vec<ModuleScore>,
    pub pending: Vec<QuestionId>,
    pub gaps: Vec<ComplianceGap>,
    pub answered: usize,
    pub total_questions: usize,
}

impl AssessmentResult {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Overall score with an undefined score reported as zero.
    pub fn overall_score_or_zero(&self) -> f64 {
        self.overall_score.unwrap_or(0.0)
    }

    pub fn module(&self, id: &ModuleId) -> Option<&ModuleScore> {
        self.modules.iter().find(|score| &score.module == id)
    }
}

/// Reduce answers to the latest one per question.
pub fn latest_answers<'a, I>(answers: I) -> BTreeMap<QuestionId, &'a AssessmentAnswer>
where
    I: IntoIterator<Item = &'a AssessmentAnswer>,
{
    let mut latest: BTreeMap<QuestionId, &AssessmentAnswer> = BTreeMap::new();
    for answer in answers {
        match latest.get(&answer.question_id) {
            Some(existing) if existing.answered_at > answer.answered_at => {}
            _ => {
                latest.insert(answer.question_id.clone(), answer);
            }
        }
    }
    latest
}

/// Compute module and overall results for the filtered questions.
pub fn calculate_result<'a, I>(
    questions: &FilteredQuestions,
    answers: I,
    thresholds: &StatusThresholds,
) -> Result<AssessmentResult, AssessmentError>
where
    I: IntoIterator<Item = &'a AssessmentAnswer>,
{
    let latest = latest_answers(answers);

    if let Some(stray) = latest.keys().find(|id| !questions.contains(id)) {
        return Err(AssessmentError::InvalidAnswerValue(
            questions.rejection_for(stray),
        ));
    }

    let mut modules = Vec::with_capacity(questions.groups().len());
    let mut pending = Vec::new();
    let mut gaps = Vec::new();
    let mut total_earned = 0.0;
    let mut total_weight: u32 = 0;

    for group in questions.groups() {
        let mut score = ModuleScore {
            module: group.module.clone(),
            earned: 0.0,
            scored_weight: 0,
            max_possible: group.max_possible(),
            percentage: None,
            status: ComplianceStatus::Incomplete,
            answered: 0,
            not_applicable: 0,
            pending: 0,
        };

        for question in &group.questions {
            let Some(answer) = latest.get(&question.id) else {
                score.pending += 1;
                pending.push(question.id.clone());
                continue;
            };

            let outcome = score_answer(question, answer.value)?;
            score.answered += 1;
            if outcome.is_excluded() {
                score.not_applicable += 1;
                continue;
            }

            score.earned += outcome.earned();
            score.scored_weight += outcome.counted_weight();

            if matches!(answer.value, AnswerValue::No | AnswerValue::Partial) {
                gaps.push(ComplianceGap {
                    question_id: question.id.clone(),
                    module: group.module.clone(),
                    value: answer.value,
                });
            }
        }

        if score.scored_weight > 0 {
            let percentage = percentage_of(score.earned, score.scored_weight);
            score.percentage = Some(percentage);
            score.status = thresholds.status_for(percentage);
        }

        total_earned += score.earned;
        total_weight += score.scored_weight;
        modules.push(score);
    }

    let overall_score = (total_weight > 0).then(|| percentage_of(total_earned, total_weight));
    let status = overall_score
        .map(|score| thresholds.status_for(score))
        .unwrap_or(ComplianceStatus::Incomplete);
    let total_questions = questions.len();

    Ok(AssessmentResult {
        overall_score,
        status,
        modules,
        answered: total_questions - pending.len(),
        pending,
        gaps,
        total_questions,
    })
}

fn percentage_of(earned: f64, weight: u32) -> f64 {
    (earned / f64::from(weight) * 100.0).clamp(0.0, 100.0)
}
