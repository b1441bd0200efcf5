use std::sync::Arc;

use compliance_checker::assessment::{
    filter_questions, score_answer, ActivityTag, AnswerValue, AssessmentAnswer, AssessmentService,
    QuestionCatalog, SelectedActivities,
};
use proptest::prelude::*;
use proptest::sample::{subsequence, Index};
use proptest::test_runner::Config;

const ACTIVITIES: [&str; 6] = [
    "retail",
    "e_commerce",
    "food_service",
    "financial_services",
    "import_export",
    "real_estate",
];

fn activities() -> impl Strategy<Value = Vec<&'static str>> {
    subsequence(ACTIVITIES.to_vec(), 1..=ACTIVITIES.len())
}

fn answer_value() -> impl Strategy<Value = AnswerValue> {
    prop_oneof![
        Just(AnswerValue::Yes),
        Just(AnswerValue::Partial),
        Just(AnswerValue::No),
        Just(AnswerValue::NotApplicable),
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn every_catalog_question_is_answered_when_all_activities_are_selected(
        seed in proptest::collection::vec(any::<bool>(), QuestionCatalog::standard().questions().len()),
    ) {
        let service = AssessmentService::new(Arc::new(QuestionCatalog::standard()));
        let selected: Vec<ActivityTag> = ACTIVITIES.iter().map(ActivityTag::new).collect();
        let questions = service.questions_for(selected.clone()).expect("valid selection");
        prop_assert_eq!(questions.len(), service.catalog().questions().len());

        let answers: Vec<AssessmentAnswer> = questions
            .iter()
            .zip(seed.iter())
            .map(|(question, yes)| {
                let value = if *yes { AnswerValue::Yes } else { AnswerValue::No };
                AssessmentAnswer::new(question.id.clone(), value)
            })
            .collect();

        let result = service.evaluate(selected, &answers).expect("evaluates");
        prop_assert!(result.is_complete());
        prop_assert!(result.pending.is_empty());
    }

    #[test]
    fn filtered_questions_share_a_selected_activity(tags in activities()) {
        let catalog = QuestionCatalog::standard();
        let selection = SelectedActivities::new(tags).expect("non-empty");
        let questions = filter_questions(&catalog, &selection).expect("known activities");

        for question in questions.iter() {
            prop_assert!(question.activities.iter().any(|tag| selection.contains(tag)));
        }
    }

    #[test]
    fn scores_stay_within_question_weight(index in any::<Index>(), value in answer_value()) {
        let catalog = QuestionCatalog::standard();
        let question = index.get(catalog.questions());

        match score_answer(question, value) {
            Ok(score) => {
                prop_assert!(question.answer_type.accepts(value));
                prop_assert!(score.earned() >= 0.0);
                prop_assert!(score.earned() <= f64::from(question.weight));
            }
            Err(_) => prop_assert!(!question.answer_type.accepts(value)),
        }
    }

    #[test]
    fn replacing_no_with_yes_never_lowers_the_score(
        tags in activities(),
        seed in proptest::collection::vec(any::<bool>(), QuestionCatalog::standard().questions().len()),
        flip in any::<Index>(),
    ) {
        let service = AssessmentService::new(Arc::new(QuestionCatalog::standard()));
        let selected: Vec<ActivityTag> = tags.iter().map(ActivityTag::new).collect();
        let questions = service.questions_for(selected.clone()).expect("valid selection");

        let answers: Vec<AssessmentAnswer> = questions
            .iter()
            .zip(seed.iter())
            .map(|(question, yes)| {
                let value = if *yes { AnswerValue::Yes } else { AnswerValue::No };
                AssessmentAnswer::new(question.id.clone(), value)
            })
            .collect();

        let before = service.evaluate(selected.clone(), &answers).expect("evaluates");
        let before_score = before.overall_score_or_zero();
        prop_assert!((0.0..=100.0).contains(&before_score));

        let mut improved = answers.clone();
        let target = flip.index(improved.len());
        improved[target].value = AnswerValue::Yes;

        let after = service.evaluate(selected, &improved).expect("evaluates");
        prop_assert!(after.overall_score_or_zero() + 1e-9 >= before_score);
    }
}
