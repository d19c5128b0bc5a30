use crate::infra::{load_scenario, parse_date, Scenario, ScenarioDataSource};
use chrono::{Local, NaiveDate};
use clap::Args;
use enterprise_subsidy::config::AppConfig;
use enterprise_subsidy::eligibility::{CourseEnrollmentDecision, DisabledEnrollmentReasonResolver};
use enterprise_subsidy::error::AppError;
use enterprise_subsidy::loader::{
    CourseLoader, CourseRoute, EnterpriseDataSource, LoaderOutcome, QueryCache,
};
use enterprise_subsidy::telemetry;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// JSON scenario with the recorded query responses
    #[arg(long)]
    pub(crate) scenario: PathBuf,
    /// Enterprise slug from the route
    #[arg(long)]
    pub(crate) enterprise_slug: String,
    /// Course key from the route
    #[arg(long)]
    pub(crate) course_key: String,
    /// Raw `course_run_key` query parameter
    #[arg(long)]
    pub(crate) course_run_key: Option<String>,
    /// Current URL path (defaults to the standard course page path)
    #[arg(long)]
    pub(crate) pathname: Option<String>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// Loader outcome plus the enrollment decision when the page proceeds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoursePageReport {
    pub(crate) outcome: LoaderOutcome,
    pub(crate) decision: Option<CourseEnrollmentDecision>,
}

pub(crate) async fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let ResolveArgs {
        scenario,
        enterprise_slug,
        course_key,
        course_run_key,
        pathname,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let scenario = load_scenario(&scenario)?;
    let mut route = CourseRoute::new(enterprise_slug, course_key)
        .with_course_run_key_param(course_run_key.as_deref());
    if let Some(pathname) = pathname {
        route = route.with_pathname(pathname);
    }
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let report = resolve_course_page(scenario, &route, today, &config).await?;
    render_report(&route, &report, json)
}

pub(crate) async fn resolve_course_page(
    scenario: Scenario,
    route: &CourseRoute,
    today: NaiveDate,
    config: &AppConfig,
) -> Result<CoursePageReport, AppError> {
    let user = scenario.user.clone();
    let source: Arc<dyn EnterpriseDataSource> = Arc::new(ScenarioDataSource::new(scenario));
    let cache = Arc::new(QueryCache::new(config.cache.stale_after));
    let loader = CourseLoader::new(source, Arc::clone(&cache));

    let outcome = loader.load(user.as_ref(), route).await?;
    let decision = match &outcome {
        LoaderOutcome::Proceed(loaded) => {
            let inputs = loaded.eligibility_inputs(&cache)?;
            let resolver = DisabledEnrollmentReasonResolver::new(config.support_links.clone());
            Some(CourseEnrollmentDecision::evaluate(&inputs, &resolver, today))
        }
        LoaderOutcome::Empty | LoaderOutcome::Redirect { .. } => None,
    };

    info!(course_key = %route.course_key, cached_queries = cache.len(), "course page resolved");
    Ok(CoursePageReport { outcome, decision })
}

pub(crate) fn render_report(
    route: &CourseRoute,
    report: &CoursePageReport,
    json: bool,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Course page {}", route.pathname);
    match &report.outcome {
        LoaderOutcome::Empty => println!("- Outcome: empty (nothing to render)"),
        LoaderOutcome::Redirect { url } => println!("- Outcome: redirect to {url}"),
        LoaderOutcome::Proceed(loaded) => println!(
            "- Outcome: proceed for {} ({})",
            loaded.enterprise.name,
            loaded.course_run_key.as_deref().unwrap_or("no pinned run")
        ),
    }

    let Some(decision) = &report.decision else {
        return Ok(());
    };

    match decision.course_price {
        Some(price) => println!("- List price: ${price:.2}"),
        None => println!("- List price: unavailable"),
    }
    if decision.has_successful_redemption {
        println!("- Learner already redeemed this course");
    }
    if let Some(subsidy) = &decision.applicable_subsidy {
        println!(
            "- Enrollment funded by {:?} ({:?} {:.0}) from {}",
            subsidy.subsidy_type,
            subsidy.discount_type,
            subsidy.discount_value,
            subsidy.source_id.as_deref().unwrap_or("unknown source")
        );
    }
    if let Some(reason) = &decision.disabled_reason {
        println!("- Enrollment disabled: {}", reason.reason);
        println!("  {}", reason.user_message);
        if let Some(action) = &reason.action {
            println!("  Call to action: {}", serde_json::to_string(action)?);
        }
    }

    Ok(())
}
