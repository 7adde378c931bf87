//! `studyplan generate` command: build a plan offline and print it as JSON.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;

use studyplan_core::catalog;
use studyplan_core::clock::{Clock, FixedClock, SystemClock};
use studyplan_core::plan::{StudyPlan, StudyPlanRequest, generate_study_plan};

/// Run the generate command.
///
/// `answers_source` is a path to a JSON file, `-` for stdin, or `None` for an
/// empty answers object (all defaults). `today` pins the clock to UTC
/// midnight of that date.
pub fn run_generate(
    mode: &str,
    answers_source: Option<&str>,
    today: Option<NaiveDate>,
) -> Result<()> {
    let catalog = catalog::load_catalog().context("failed to load catalog")?;
    if catalog.find_mode(mode).is_none() {
        tracing::warn!(mode, "mode is not in the catalog; using the detailed-study recommendation");
    }

    let answers_json = match answers_source {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read answers from stdin")?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answers file {path}"))?,
        None => "{}".to_string(),
    };

    let clock: Box<dyn Clock> = match today {
        Some(date) => Box::new(FixedClock::at_date(date)),
        None => Box::new(SystemClock),
    };

    let plan = build_plan(mode, &answers_json, clock.as_ref())?;
    let out = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
    println!("{out}");
    Ok(())
}

/// Validate `mode` and the answers JSON the same way the HTTP boundary does,
/// then generate a plan.
pub fn build_plan(mode: &str, answers_json: &str, clock: &dyn Clock) -> Result<StudyPlan> {
    let answers: Value =
        serde_json::from_str(answers_json).context("answers are not valid JSON")?;
    let body = serde_json::json!({ "mode": mode, "answers": answers });
    let request = StudyPlanRequest::from_json(&body).context("invalid generate request")?;
    Ok(generate_study_plan(
        &request.mode,
        &request.answers,
        clock.now(),
    ))
}
