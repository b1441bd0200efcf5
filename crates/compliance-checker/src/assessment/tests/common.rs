use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::catalog::{CatalogDocument, QuestionCatalog, StatusThresholds};
use crate::assessment::domain::{
    ActivityDefinition, ActivityTag, AnswerType, AnswerValue, AssessmentAnswer,
    AssessmentQuestion, ComplianceModule, ModuleId, QuestionId, SelectedActivities,
};
use crate::assessment::filter::{filter_questions, FilteredQuestions};
use crate::assessment::locale::LocalizedText;
use crate::assessment::service::AssessmentService;

pub(super) fn question(
    id: &str,
    module: &str,
    activities: &[&str],
    answer_type: AnswerType,
    weight: u32,
) -> AssessmentQuestion {
    AssessmentQuestion {
        id: QuestionId::from(id),
        module: ModuleId::from(module),
        prompt: LocalizedText::en_ar(format!("Question {id}?"), format!("السؤال {id}؟")),
        guidance: Some(LocalizedText::en_ar(
            format!("Fix {id}."),
            format!("عالج {id}."),
        )),
        activities: activities.iter().map(ActivityTag::new).collect(),
        answer_type,
        weight,
    }
}

/// Single "licensing" module with two graded questions weighted 10 and 20.
pub(super) fn licensing_catalog() -> QuestionCatalog {
    QuestionCatalog::try_from(CatalogDocument {
        version: "test-licensing".to_string(),
        thresholds: StatusThresholds::default(),
        modules: vec![ComplianceModule {
            id: ModuleId::from("licensing"),
            title: LocalizedText::en_ar("Licensing", "التراخيص"),
        }],
        activities: vec![
            ActivityDefinition {
                tag: ActivityTag::new("retail"),
                label: LocalizedText::en_ar("Retail", "تجزئة"),
            },
            ActivityDefinition {
                tag: ActivityTag::new("wholesale"),
                label: LocalizedText::en_ar("Wholesale", "جملة"),
            },
        ],
        questions: vec![
            question("q1", "licensing", &["retail"], AnswerType::GradedNa, 10),
            question("q2", "licensing", &["retail", "wholesale"], AnswerType::Graded, 20),
        ],
    })
    .expect("licensing catalog is valid")
}

/// Three modules; the middle one only applies to wholesale.
pub(super) fn multi_module_catalog() -> QuestionCatalog {
    QuestionCatalog::try_from(CatalogDocument {
        version: "test-multi".to_string(),
        thresholds: StatusThresholds::default(),
        modules: vec![
            ComplianceModule {
                id: ModuleId::from("licensing"),
                title: LocalizedText::en_ar("Licensing", "التراخيص"),
            },
            ComplianceModule {
                id: ModuleId::from("customs"),
                title: LocalizedText::en_ar("Customs", "الجمارك"),
            },
            ComplianceModule {
                id: ModuleId::from("privacy"),
                title: LocalizedText::en_ar("Privacy", "الخصوصية"),
            },
        ],
        activities: vec![
            ActivityDefinition {
                tag: ActivityTag::new("retail"),
                label: LocalizedText::en_ar("Retail", "تجزئة"),
            },
            ActivityDefinition {
                tag: ActivityTag::new("wholesale"),
                label: LocalizedText::en_ar("Wholesale", "جملة"),
            },
            ActivityDefinition {
                tag: ActivityTag::new("online"),
                label: LocalizedText::en_ar("Online", "إلكتروني"),
            },
        ],
        questions: vec![
            question("p1", "privacy", &["online"], AnswerType::YesNo, 10),
            question("l1", "licensing", &["retail", "wholesale"], AnswerType::YesNo, 20),
            question("c1", "customs", &["wholesale"], AnswerType::YesNoNa, 15),
            question("l2", "licensing", &["online"], AnswerType::Graded, 10),
            question("p2", "privacy", &["retail", "online"], AnswerType::GradedNa, 5),
        ],
    })
    .expect("multi-module catalog is valid")
}

pub(super) fn selection(tags: &[&str]) -> SelectedActivities {
    SelectedActivities::new(tags.iter().copied()).expect("non-empty selection")
}

pub(super) fn filtered(catalog: &QuestionCatalog, tags: &[&str]) -> FilteredQuestions {
    filter_questions(catalog, &selection(tags)).expect("selection is valid")
}

pub(super) fn answer(id: &str, value: AnswerValue) -> AssessmentAnswer {
    AssessmentAnswer::new(id, value)
}

pub(super) fn standard_service() -> Arc<AssessmentService> {
    Arc::new(AssessmentService::new(Arc::new(QuestionCatalog::standard())))
}

pub(super) fn licensing_service() -> Arc<AssessmentService> {
    Arc::new(AssessmentService::new(Arc::new(licensing_catalog())))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn json_request(uri: &str, payload: Value) -> axum::http::Request<Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serializable")))
        .expect("request builds")
}
