use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{ActivityTag, AnswerValue, AssessmentAnswer, QuestionId};
use super::error::AssessmentError;
use super::locale::{Locale, TextDirection};
use super::report::{question_groups, to_csv_string, AssessmentResultView, CatalogView, QuestionGroupView};
use super::scoring::AnswerScore;
use super::service::AssessmentService;

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsRequest {
    pub activities: Vec<ActivityTag>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub catalog_version: String,
    pub locale: Locale,
    pub direction: TextDirection,
    pub total_questions: usize,
    pub groups: Vec<QuestionGroupView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
    pub score: AnswerScore,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultRequest {
    pub activities: Vec<ActivityTag>,
    #[serde(default)]
    pub answers: Vec<AssessmentAnswer>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

/// Router builder exposing the stateless assessment endpoints.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessment/catalog", get(catalog_handler))
        .route("/api/v1/assessment/questions", post(questions_handler))
        .route("/api/v1/assessment/score", post(score_handler))
        .route("/api/v1/assessment/result", post(result_handler))
        .route("/api/v1/assessment/result.csv", post(result_csv_handler))
        .with_state(service)
}

pub(crate) async fn catalog_handler(
    State(service): State<Arc<AssessmentService>>,
    Query(query): Query<LocaleQuery>,
) -> Response {
    let locale = service.resolve_locale(query.locale);
    let view = CatalogView::render(service.catalog(), &locale);
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn questions_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<QuestionsRequest>,
) -> Response {
    let locale = service.resolve_locale(request.locale);
    match service.questions_for(request.activities) {
        Ok(questions) => {
            let response = QuestionsResponse {
                catalog_version: service.catalog().version().to_string(),
                direction: locale.direction(),
                total_questions: questions.len(),
                groups: question_groups(service.catalog(), &questions, &locale),
                locale,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn score_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    match service.score(&request.question_id, request.answer) {
        Ok(score) => {
            let response = ScoreResponse {
                question_id: request.question_id,
                answer: request.answer,
                score,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn result_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ResultRequest>,
) -> Response {
    let locale = service.resolve_locale(request.locale);
    match service.evaluate(request.activities, &request.answers) {
        Ok(result) => {
            let view = AssessmentResultView::render(&result, service.catalog(), &locale);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn result_csv_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ResultRequest>,
) -> Response {
    let locale = service.resolve_locale(request.locale);
    let result = match service.evaluate(request.activities, &request.answers) {
        Ok(result) => result,
        Err(err) => return assessment_error_response(err),
    };

    let view = AssessmentResultView::render(&result, service.catalog(), &locale);
    match to_csv_string(&view) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "csv export failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) fn assessment_error_response(err: AssessmentError) -> Response {
    let payload = json!({
        "error": err.to_string(),
        "kind": err.kind(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
