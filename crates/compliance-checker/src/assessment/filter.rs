use std::collections::BTreeSet;

use serde::Serialize;

use super::catalog::QuestionCatalog;
use super::domain::{ActivityTag, AssessmentQuestion, ModuleId, QuestionId, SelectedActivities};
use super::error::{AnswerProblem, AssessmentError, SelectionProblem};

/// Questions of a single module that apply to the current selection, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleQuestionGroup {
    pub module: ModuleId,
    pub questions: Vec<AssessmentQuestion>,
}

impl ModuleQuestionGroup {
    pub fn max_possible(&self) -> u32 {
        self.questions.iter().map(|question| question.weight).sum()
    }
}

/// Output of the activity filter: non-empty module groups in catalog-defined module order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredQuestions {
    groups: Vec<ModuleQuestionGroup>,
    #[serde(skip)]
    catalog_ids: BTreeSet<QuestionId>,
}

impl FilteredQuestions {
    pub fn groups(&self) -> &[ModuleQuestionGroup] {
        &self.groups
    }

    /// Questions flattened in presentation order (module by module).
    pub fn iter(&self) -> impl Iterator<Item = &AssessmentQuestion> {
        self.groups.iter().flat_map(|group| group.questions.iter())
    }

    pub fn question(&self, id: &QuestionId) -> Option<&AssessmentQuestion> {
        self.iter().find(|question| &question.id == id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.question(id).is_some()
    }

    /// Why an answer for `id` cannot be accepted: unknown to the catalog or filtered out.
    pub fn rejection_for(&self, id: &QuestionId) -> AnswerProblem {
        if self.catalog_ids.contains(id) {
            AnswerProblem::NotSelected(id.clone())
        } else {
            AnswerProblem::UnknownQuestion(id.clone())
        }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Select the catalog questions whose activities intersect the selection.
pub fn filter_questions(
    catalog: &QuestionCatalog,
    selection: &SelectedActivities,
) -> Result<FilteredQuestions, AssessmentError> {
    if selection.is_empty() {
        return Err(AssessmentError::InvalidSelection(SelectionProblem::Empty));
    }

    let unknown: Vec<ActivityTag> = selection
        .iter()
        .filter(|tag| !catalog.knows_activity(tag))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(AssessmentError::InvalidSelection(
            SelectionProblem::UnknownActivities(unknown),
        ));
    }

    let groups = catalog
        .modules()
        .iter()
        .filter_map(|module| {
            let questions: Vec<AssessmentQuestion> = catalog
                .questions()
                .iter()
                .filter(|question| question.module == module.id && question.applies_to(selection))
                .cloned()
                .collect();

            (!questions.is_empty()).then(|| ModuleQuestionGroup {
                module: module.id.clone(),
                questions,
            })
        })
        .collect();

    let catalog_ids = catalog
        .questions()
        .iter()
        .map(|question| question.id.clone())
        .collect();

    Ok(FilteredQuestions {
        groups,
        catalog_ids,
    })
}
