use std::io::Write;

use serde::Serialize;

use super::aggregate::{AssessmentResult, ModuleScore};
use super::catalog::QuestionCatalog;
use super::domain::{
    ActivityTag, AnswerType, AnswerValue, AssessmentQuestion, ComplianceStatus, ModuleId,
    QuestionId,
};
use super::filter::FilteredQuestions;
use super::locale::{Locale, TextDirection};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write csv output: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    pub id: ModuleId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub tag: ActivityTag,
    pub label: String,
}

/// Catalog summary for the activity selection screen.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub version: String,
    pub locale: Locale,
    pub direction: TextDirection,
    pub modules: Vec<ModuleView>,
    pub activities: Vec<ActivityView>,
    pub question_count: usize,
}

impl CatalogView {
    pub fn render(catalog: &QuestionCatalog, locale: &Locale) -> Self {
        Self {
            version: catalog.version().to_string(),
            locale: locale.clone(),
            direction: locale.direction(),
            modules: catalog
                .modules()
                .iter()
                .map(|module| ModuleView {
                    id: module.id.clone(),
                    title: module.title.get(locale).to_string(),
                })
                .collect(),
            activities: catalog
                .activities()
                .iter()
                .map(|activity| ActivityView {
                    tag: activity.tag.clone(),
                    label: activity.label.get(locale).to_string(),
                })
                .collect(),
            question_count: catalog.questions().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub answer_type: AnswerType,
    pub accepted_answers: Vec<AnswerValue>,
    pub weight: u32,
}

impl QuestionView {
    fn render(question: &AssessmentQuestion, locale: &Locale) -> Self {
        Self {
            id: question.id.clone(),
            prompt: question.prompt.get(locale).to_string(),
            answer_type: question.answer_type,
            accepted_answers: question.answer_type.values(),
            weight: question.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionGroupView {
    pub module: ModuleId,
    pub title: String,
    pub questions: Vec<QuestionView>,
}

/// Filtered questions grouped by module, resolved for one locale.
pub fn question_groups(
    catalog: &QuestionCatalog,
    questions: &FilteredQuestions,
    locale: &Locale,
) -> Vec<QuestionGroupView> {
    questions
        .groups()
        .iter()
        .map(|group| QuestionGroupView {
            module: group.module.clone(),
            title: module_title(catalog, &group.module, locale),
            questions: group
                .questions
                .iter()
                .map(|question| QuestionView::render(question, locale))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleScoreView {
    pub module: ModuleId,
    pub title: String,
    pub earned: f64,
    pub scored_weight: u32,
    pub max_possible: u32,
    pub percentage: Option<f64>,
    pub status: ComplianceStatus,
    pub status_label: String,
    pub answered: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingQuestionView {
    pub question_id: QuestionId,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapView {
    pub question_id: QuestionId,
    pub module_title: String,
    pub prompt: String,
    pub answer: AnswerValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

/// Result resolved for display or export in one locale.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResultView {
    pub catalog_version: String,
    pub locale: Locale,
    pub direction: TextDirection,
    pub overall_score: Option<f64>,
    pub status: ComplianceStatus,
    pub status_label: String,
    pub complete: bool,
    pub answered: usize,
    pub total_questions: usize,
    pub modules: Vec<ModuleScoreView>,
    pub pending: Vec<PendingQuestionView>,
    pub gaps: Vec<GapView>,
}

impl AssessmentResultView {
    pub fn render(result: &AssessmentResult, catalog: &QuestionCatalog, locale: &Locale) -> Self {
        let prompt = |id: &QuestionId| {
            catalog
                .question(id)
                .map(|question| question.prompt.get(locale).to_string())
                .unwrap_or_else(|| id.0.clone())
        };

        Self {
            catalog_version: catalog.version().to_string(),
            locale: locale.clone(),
            direction: locale.direction(),
            overall_score: result.overall_score.map(round_one_decimal),
            status: result.status,
            status_label: result.status.localized_label().get(locale).to_string(),
            complete: result.is_complete(),
            answered: result.answered,
            total_questions: result.total_questions,
            modules: result
                .modules
                .iter()
                .map(|score| module_view(score, catalog, locale))
                .collect(),
            pending: result
                .pending
                .iter()
                .map(|id| PendingQuestionView {
                    question_id: id.clone(),
                    prompt: prompt(id),
                })
                .collect(),
            gaps: result
                .gaps
                .iter()
                .map(|gap| GapView {
                    question_id: gap.question_id.clone(),
                    module_title: module_title(catalog, &gap.module, locale),
                    prompt: prompt(&gap.question_id),
                    answer: gap.value,
                    guidance: catalog
                        .question(&gap.question_id)
                        .and_then(|question| question.guidance.as_ref())
                        .map(|guidance| guidance.get(locale).to_string()),
                })
                .collect(),
        }
    }
}

fn module_view(score: &ModuleScore, catalog: &QuestionCatalog, locale: &Locale) -> ModuleScoreView {
    ModuleScoreView {
        module: score.module.clone(),
        title: module_title(catalog, &score.module, locale),
        earned: round_one_decimal(score.earned),
        scored_weight: score.scored_weight,
        max_possible: score.max_possible,
        percentage: score.percentage.map(round_one_decimal),
        status: score.status,
        status_label: score.status.localized_label().get(locale).to_string(),
        answered: score.answered,
        pending: score.pending,
    }
}

fn module_title(catalog: &QuestionCatalog, id: &ModuleId, locale: &Locale) -> String {
    catalog
        .module(id)
        .map(|module| module.title.get(locale).to_string())
        .unwrap_or_else(|| id.0.clone())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    module: &'a str,
    title: &'a str,
    earned: f64,
    scored_weight: u32,
    max_possible: u32,
    percentage: String,
    status: &'a str,
}

/// Write one row per module followed by an `overall` row.
pub fn export_csv<W: Write>(view: &AssessmentResultView, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);

    for module in &view.modules {
        csv.serialize(CsvRow {
            module: &module.module.0,
            title: &module.title,
            earned: module.earned,
            scored_weight: module.scored_weight,
            max_possible: module.max_possible,
            percentage: format_percentage(module.percentage),
            status: &module.status_label,
        })?;
    }

    csv.serialize(CsvRow {
        module: "overall",
        title: "",
        earned: view.modules.iter().map(|module| module.earned).sum(),
        scored_weight: view.modules.iter().map(|module| module.scored_weight).sum(),
        max_possible: view.modules.iter().map(|module| module.max_possible).sum(),
        percentage: format_percentage(view.overall_score),
        status: &view.status_label,
    })?;

    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(view: &AssessmentResultView) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    export_csv(view, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn format_percentage(value: Option<f64>) -> String {
    value.map(|pct| format!("{pct:.1}")).unwrap_or_default()
}
