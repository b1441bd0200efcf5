//! Compliance self-assessment: catalog, activity filter, scorer, and aggregator.
//!
//! The engine is a set of pure functions over the catalog and the caller's answers. Nothing is
//! persisted here; [`AssessmentState`] lives with whoever drives the assessment.

pub mod aggregate;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod filter;
pub mod locale;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use aggregate::{calculate_result, AssessmentResult, ComplianceGap, ModuleScore};
pub use catalog::{CatalogError, QuestionCatalog, StatusThresholds, MAX_QUESTION_WEIGHT};
pub use domain::{
    ActivityDefinition, ActivityTag, AnswerType, AnswerValue, AssessmentAnswer,
    AssessmentQuestion, ComplianceModule, ComplianceStatus, ModuleId, QuestionId,
    SelectedActivities,
};
pub use error::{AnswerProblem, AssessmentError, SelectionProblem};
pub use filter::{filter_questions, FilteredQuestions, ModuleQuestionGroup};
pub use locale::{Locale, LocalizedText, TextDirection};
pub use report::{AssessmentResultView, CatalogView, ReportError};
pub use router::assessment_router;
pub use scoring::{score_answer, AnswerScore};
pub use service::AssessmentService;
pub use session::{AssessmentProgress, AssessmentState};
