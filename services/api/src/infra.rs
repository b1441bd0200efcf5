use compliance_checker::assessment::{AnswerValue, AssessmentAnswer, Locale, QuestionCatalog, QuestionId};
use compliance_checker::config::CatalogConfig;
use compliance_checker::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the configured catalog file, or the built-in catalog when none is set.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<QuestionCatalog, AppError> {
    let catalog = match &config.path {
        Some(path) => QuestionCatalog::from_path(path)?,
        None => QuestionCatalog::standard(),
    };

    info!(
        version = catalog.version(),
        modules = catalog.modules().len(),
        questions = catalog.questions().len(),
        source = if config.path.is_some() { "file" } else { "built-in" },
        "question catalog loaded"
    );
    Ok(catalog)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    ByQuestion(BTreeMap<String, String>),
    Recorded(Vec<AssessmentAnswer>),
}

/// Answers are either `{"lic-01": "yes"}` or a list of recorded answers.
pub(crate) fn read_answers<R: Read>(reader: R) -> Result<Vec<AssessmentAnswer>, AppError> {
    let file: AnswerFile = serde_json::from_reader(reader)
        .map_err(|err| AppError::Input(format!("answers file is not valid JSON: {err}")))?;

    match file {
        AnswerFile::Recorded(answers) => Ok(answers),
        AnswerFile::ByQuestion(entries) => entries
            .into_iter()
            .map(|(question_id, raw)| {
                let value = raw
                    .parse::<AnswerValue>()
                    .map_err(|err| AppError::Input(format!("{question_id}: {err}")))?;
                Ok(AssessmentAnswer::new(QuestionId::from(question_id), value))
            })
            .collect(),
    }
}

pub(crate) fn read_answers_from_path(path: &Path) -> Result<Vec<AssessmentAnswer>, AppError> {
    let file = File::open(path)?;
    read_answers(BufReader::new(file))
}

pub(crate) fn parse_locale(raw: &str) -> Result<Locale, String> {
    if raw.trim().is_empty() {
        return Err("locale must not be empty".to_string());
    }
    Ok(Locale::new(raw))
}
