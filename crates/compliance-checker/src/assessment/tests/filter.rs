use super::common::*;
use crate::assessment::domain::{ActivityTag, ModuleId, SelectedActivities};
use crate::assessment::error::{AssessmentError, SelectionProblem};
use crate::assessment::filter::filter_questions;
use crate::assessment::QuestionCatalog;

#[test]
fn filter_groups_by_catalog_module_order() {
    let catalog = multi_module_catalog();
    let questions = filtered(&catalog, &["retail", "wholesale", "online"]);

    let modules: Vec<&str> = questions
        .groups()
        .iter()
        .map(|group| group.module.0.as_str())
        .collect();
    assert_eq!(modules, vec!["licensing", "customs", "privacy"]);

    let order: Vec<&str> = questions.iter().map(|question| question.id.0.as_str()).collect();
    assert_eq!(order, vec!["l1", "l2", "c1", "p1", "p2"]);
}

#[test]
fn filter_omits_modules_without_relevant_questions() {
    let catalog = multi_module_catalog();
    let questions = filtered(&catalog, &["retail"]);

    assert_eq!(questions.len(), 2);
    assert!(questions
        .groups()
        .iter()
        .all(|group| group.module != ModuleId::from("customs")));
    assert!(!questions.contains(&"p1".into()));
}

#[test]
fn every_returned_question_shares_an_activity() {
    let catalog = QuestionCatalog::standard();
    for tags in [
        vec!["retail"],
        vec!["food_service"],
        vec!["financial_services", "import_export"],
        vec!["e_commerce", "real_estate"],
    ] {
        let selection = selection(&tags);
        let questions = filter_questions(&catalog, &selection).expect("valid selection");
        assert!(!questions.is_empty());
        for question in questions.iter() {
            assert!(question.activities.iter().any(|tag| selection.contains(tag)));
        }
    }
}

#[test]
fn max_possible_sums_included_weights() {
    let catalog = licensing_catalog();

    let both = filtered(&catalog, &["retail"]);
    assert_eq!(both.groups()[0].max_possible(), 30);

    let wholesale_only = filtered(&catalog, &["wholesale"]);
    assert_eq!(wholesale_only.groups()[0].max_possible(), 20);
}

#[test]
fn empty_selection_is_invalid() {
    let none: [&str; 0] = [];
    match SelectedActivities::new(none) {
        Err(AssessmentError::InvalidSelection(SelectionProblem::Empty)) => {}
        other => panic!("expected empty selection error, got {other:?}"),
    }
}

#[test]
fn unrecognized_activities_are_reported() {
    let catalog = licensing_catalog();
    let selection = selection(&["retail", "mining", "fishing"]);

    match filter_questions(&catalog, &selection) {
        Err(AssessmentError::InvalidSelection(SelectionProblem::UnknownActivities(tags))) => {
            assert_eq!(tags, vec![ActivityTag::new("fishing"), ActivityTag::new("mining")]);
        }
        other => panic!("expected unknown activities error, got {other:?}"),
    }
}
