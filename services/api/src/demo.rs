use crate::infra::{load_catalog, parse_locale, read_answers_from_path};
use clap::Args;
use compliance_checker::assessment::report::to_csv_string;
use compliance_checker::assessment::{
    ActivityTag, AnswerValue, AssessmentQuestion, AssessmentResultView, AssessmentService,
    AssessmentState, CatalogView, Locale, QuestionCatalog, QuestionId,
};
use compliance_checker::config::AppConfig;
use compliance_checker::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Locale for titles and labels (e.g. en, ar). Defaults to APP_DEFAULT_LOCALE.
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<Locale>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Comma-separated business activities (e.g. retail,e_commerce)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) activities: Vec<String>,
    /// JSON answers file: {"lic-01": "yes", ...} or a list of recorded answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<Locale>,
    /// Print the module breakdown as CSV instead of text
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Activities for the scripted walkthrough. Defaults to food_service.
    #[arg(long, value_delimiter = ',')]
    pub(crate) activities: Vec<String>,
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<Locale>,
}

fn build_service() -> Result<AssessmentService, AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config.catalog)?;
    Ok(AssessmentService::new(Arc::new(catalog)).with_default_locale(config.catalog.default_locale))
}

fn activity_tags(raw: Vec<String>) -> Vec<ActivityTag> {
    raw.into_iter().map(ActivityTag::from).collect()
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let service = build_service()?;
    let locale = service.resolve_locale(args.locale);
    render_catalog(&CatalogView::render(service.catalog(), &locale));
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        activities,
        answers,
        locale,
        csv,
    } = args;

    let service = build_service()?;
    let locale = service.resolve_locale(locale);
    let answers = read_answers_from_path(&answers)?;
    let result = service.evaluate(activity_tags(activities), &answers)?;
    let view = AssessmentResultView::render(&result, service.catalog(), &locale);

    if csv {
        print!("{}", to_csv_string(&view)?);
    } else {
        render_result(&view);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { activities, locale } = args;
    let activities = if activities.is_empty() {
        vec!["food_service".to_string()]
    } else {
        activities
    };

    let service = AssessmentService::new(Arc::new(QuestionCatalog::standard()));
    let locale = service.resolve_locale(locale);
    let mut state = service.start(activity_tags(activities))?;

    println!("Compliance self-assessment demo");
    println!(
        "Activities: {}",
        state
            .selection()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("{} questions selected\n", state.questions().len());

    while let Some(question) = state.current_question().cloned() {
        let value = scripted_answer(&question);
        let position = state.progress().current_index + 1;
        let Some(score) = state.answer_current(value)? else {
            break;
        };
        let scored = if score.is_excluded() {
            "excluded".to_string()
        } else {
            format!("{:.1}/{}", score.earned(), score.counted_weight())
        };
        println!(
            "[{position}/{}] {} -> {} ({scored})",
            state.questions().len(),
            question.prompt.get(&locale),
            value,
        );
    }

    let result = state.result()?;
    println!();
    render_result(&AssessmentResultView::render(&result, service.catalog(), &locale));
    Ok(())
}

/// Mostly compliant business with one clear gap, so every report section has content.
fn scripted_answer(question: &AssessmentQuestion) -> AnswerValue {
    let preferred = match question.id.0.as_str() {
        "hs-01" | "cp-02" | "aml-02" => AnswerValue::No,
        "cp-03" | "lic-02" => AnswerValue::NotApplicable,
        "cp-01" | "dp-01" | "hs-02" => AnswerValue::Partial,
        _ => AnswerValue::Yes,
    };
    if question.answer_type.accepts(preferred) {
        preferred
    } else {
        AnswerValue::Yes
    }
}

fn render_catalog(view: &CatalogView) {
    println!("Question catalog {} ({})", view.version, view.locale);
    println!("\nModules");
    for module in &view.modules {
        println!("- {}: {}", module.id, module.title);
    }
    println!("\nActivities");
    for activity in &view.activities {
        println!("- {}: {}", activity.tag, activity.label);
    }
    println!("\n{} questions in total", view.question_count);
}

fn render_result(view: &AssessmentResultView) {
    let overall = view
        .overall_score
        .map(|score| format!("{score:.1}%"))
        .unwrap_or_else(|| "n/a".to_string());
    println!("Overall score: {overall} ({})", view.status_label);
    println!(
        "Answered {}/{} questions{}",
        view.answered,
        view.total_questions,
        if view.complete { "" } else { " (incomplete)" }
    );

    println!("\nModule breakdown");
    for module in &view.modules {
        let pct = module
            .percentage
            .map(|pct| format!("{pct:.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "- {}: {pct} ({}) | {:.1}/{} earned | {} pending",
            module.title, module.status_label, module.earned, module.scored_weight, module.pending
        );
    }

    if view.gaps.is_empty() {
        println!("\nCompliance gaps: none");
    } else {
        println!("\nCompliance gaps");
        for gap in &view.gaps {
            println!("- [{}] {} ({})", gap.module_title, gap.prompt, gap.answer);
            if let Some(guidance) = &gap.guidance {
                println!("    {guidance}");
            }
        }
    }

    if !view.pending.is_empty() {
        println!("\nUnanswered");
        for pending in &view.pending {
            println!("- {}: {}", pending.question_id, pending.prompt);
        }
    }
}
