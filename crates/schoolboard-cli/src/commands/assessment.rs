//! The `assessment` subcommands.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use schoolboard_core::assessment::AssessmentDraft;
use schoolboard_core::model::{Assessment, AssessmentStatus};
use schoolboard_core::traits::{create_assessment, fetch_all, fetch_one, set_assessment_status};
use schoolboard_report::markdown::assessment_board;

use super::context::Context;
use super::render::assessments_table;

pub async fn create(
    config_path: Option<PathBuf>,
    name: String,
    term_id: String,
    start: NaiveDate,
    end: NaiveDate,
    description: Option<String>,
) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let draft = AssessmentDraft {
        name,
        description,
        term_id,
        start_date: Some(start),
        end_date: Some(end),
        status: AssessmentStatus::Pending,
    };
    let today = Local::now().date_naive();
    let created = ctx.submit(create_assessment(&backend, &session, &draft, today).await)?;
    println!(
        "Created assessment {} ({} to {}, {})",
        created.id, created.start_date, created.end_date, created.status
    );
    Ok(())
}

pub async fn list(
    config_path: Option<PathBuf>,
    status: Option<AssessmentStatus>,
    format: String,
) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let mut assessments: Vec<Assessment> = ctx.api(fetch_all(&backend, &session).await)?;
    if let Some(status) = status {
        assessments.retain(|a| a.status == status);
    }
    assessments.sort_by_key(|a| a.start_date);

    match format.as_str() {
        "table" => println!("{}", assessments_table(&assessments)),
        "markdown" | "md" => print!("{}", assessment_board(&assessments)),
        "json" => println!("{}", serde_json::to_string_pretty(&assessments)?),
        other => anyhow::bail!("unknown format '{other}' (expected table, markdown or json)"),
    }
    Ok(())
}

pub async fn set_status(
    config_path: Option<PathBuf>,
    id: String,
    next: AssessmentStatus,
    force: bool,
) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let current: Assessment = ctx.api(fetch_one(&backend, &session, &id).await)?;

    if current.status == next {
        println!("Assessment {id} is already {next}.");
        return Ok(());
    }
    if force && !current.status.can_transition_to(next) {
        tracing::warn!(from = %current.status, to = %next, "forcing status change");
    }

    let updated =
        ctx.status_change(set_assessment_status(&backend, &session, &current, next, force).await)?;
    println!("Assessment {id}: {} -> {}", current.status, updated.status);
    Ok(())
}
