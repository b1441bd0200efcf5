//! End-to-end scenarios through the public assessment API: declare activities, answer the
//! filtered questions, and read back the localized result.

use std::io::Cursor;
use std::sync::Arc;

use compliance_checker::assessment::{
    ActivityTag, AnswerValue, AssessmentAnswer, AssessmentError, AssessmentResultView,
    AssessmentService, ComplianceStatus, Locale, QuestionCatalog, QuestionId, SelectionProblem,
};

const LICENSING_CATALOG: &str = r#"{
    "version": "licensing-only",
    "thresholds": { "compliant": 80.0, "at_risk": 50.0 },
    "modules": [
        { "id": "licensing", "title": { "en": "Licensing", "ar": "التراخيص" } }
    ],
    "activities": [
        { "tag": "retail", "label": { "en": "Retail", "ar": "تجارة التجزئة" } }
    ],
    "questions": [
        {
            "id": "q1",
            "module": "licensing",
            "prompt": { "en": "Is the trade license valid?", "ar": "هل الرخصة التجارية سارية؟" },
            "activities": ["retail"],
            "answer_type": "graded",
            "weight": 10
        },
        {
            "id": "q2",
            "module": "licensing",
            "prompt": { "en": "Are all branches licensed?", "ar": "هل جميع الفروع مرخصة؟" },
            "guidance": { "en": "License every branch.", "ar": "رخّص كل فرع." },
            "activities": ["retail"],
            "answer_type": "graded",
            "weight": 20
        }
    ]
}"#;

fn licensing_service() -> AssessmentService {
    let catalog =
        QuestionCatalog::from_reader(Cursor::new(LICENSING_CATALOG)).expect("catalog loads");
    AssessmentService::new(Arc::new(catalog))
}

#[test]
fn licensing_walkthrough_yields_at_risk() {
    let service = licensing_service();
    let mut state = service
        .start(vec![ActivityTag::new("retail")])
        .expect("assessment starts");

    state.answer_current(AnswerValue::Yes).expect("q1 answered");
    state.answer_current(AnswerValue::Partial).expect("q2 answered");

    let result = state.result().expect("result computes");
    let overall = result.overall_score.expect("overall defined");
    assert!((overall - 66.67).abs() < 0.01);
    assert_eq!(result.status, ComplianceStatus::AtRisk);

    let view = AssessmentResultView::render(&result, service.catalog(), &Locale::arabic());
    assert_eq!(view.overall_score, Some(66.7));
    assert_eq!(view.gaps[0].guidance.as_deref(), Some("رخّص كل فرع."));
}

#[test]
fn unanswered_assessment_is_incomplete() {
    let service = licensing_service();
    let result = service
        .evaluate(vec![ActivityTag::new("retail")], &[])
        .expect("evaluates");

    assert_eq!(
        result.pending,
        vec![QuestionId::from("q1"), QuestionId::from("q2")]
    );
    assert_eq!(result.overall_score_or_zero(), 0.0);
    assert_eq!(result.status, ComplianceStatus::Incomplete);
}

#[test]
fn empty_selection_fails_before_questions_are_shown() {
    let service = licensing_service();
    match service.questions_for(Vec::new()) {
        Err(AssessmentError::InvalidSelection(SelectionProblem::Empty)) => {}
        other => panic!("expected invalid selection, got {other:?}"),
    }
}

#[test]
fn standard_catalog_full_compliance_for_a_restaurant() {
    let service = AssessmentService::new(Arc::new(QuestionCatalog::standard()));
    let questions = service
        .questions_for(vec![ActivityTag::new("food_service")])
        .expect("valid selection");

    let answers: Vec<AssessmentAnswer> = questions
        .iter()
        .map(|question| AssessmentAnswer::new(question.id.clone(), AnswerValue::Yes))
        .collect();
    let result = service
        .evaluate(vec![ActivityTag::new("food_service")], &answers)
        .expect("evaluates");

    assert_eq!(result.overall_score, Some(100.0));
    assert_eq!(result.status, ComplianceStatus::Compliant);
    assert!(result.gaps.is_empty());
    assert!(result
        .modules
        .iter()
        .all(|module| module.status == ComplianceStatus::Compliant));
}

#[test]
fn unknown_question_ids_are_rejected() {
    let service = licensing_service();
    let answers = vec![AssessmentAnswer::new("q9", AnswerValue::Yes)];

    let err = service
        .evaluate(vec![ActivityTag::new("retail")], &answers)
        .expect_err("unknown question");
    assert_eq!(err.kind(), "invalid_answer_value");
    assert!(err.to_string().contains("q9"));
}
