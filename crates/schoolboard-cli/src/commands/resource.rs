//! Generic `list`, `show`, `create`, `update` and `delete` commands.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use schoolboard_core::form::{submit, FormValues, SubmitMode};
use schoolboard_core::listing::{paginate, search};
use schoolboard_core::model::ResourceKind;
use schoolboard_core::traits::SchoolApi;

use super::context::Context;
use super::render::{record_table, records_table};

pub async fn list(
    config_path: Option<PathBuf>,
    kind: ResourceKind,
    query: Option<String>,
    page: usize,
    per_page: Option<usize>,
    format: String,
) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let records = ctx.api(backend.list(&session, kind, &[]).await)?;

    let matched: Vec<Value> = search(&records, query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    let page = paginate(&matched, page, per_page.unwrap_or(ctx.config.page_size));

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&page)?),
        "table" => {
            if page.items.is_empty() {
                println!("No {} found.", kind.path().trim_start_matches('/'));
            } else {
                println!("{}", records_table(kind, &page.items));
            }
            println!(
                "Page {} of {} ({} matching, {} total)",
                page.page,
                page.total_pages.max(1),
                page.total,
                records.len()
            );
        }
        other => anyhow::bail!("unknown format '{other}' (expected table or json)"),
    }
    Ok(())
}

pub async fn show(config_path: Option<PathBuf>, kind: ResourceKind, id: String) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let record = ctx.api(backend.get(&session, kind, &id).await)?;
    println!("{}", record_table(&record));
    Ok(())
}

pub async fn create(
    config_path: Option<PathBuf>,
    kind: ResourceKind,
    fields: Vec<String>,
) -> Result<()> {
    let values = FormValues::from_pairs(&fields)?;
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let record = ctx.submit(submit(&backend, &session, kind, &values, SubmitMode::Create).await)?;
    println!("Created {} {}", kind.label(), id_of(&record));
    Ok(())
}

pub async fn update(
    config_path: Option<PathBuf>,
    kind: ResourceKind,
    id: String,
    fields: Vec<String>,
) -> Result<()> {
    let values = FormValues::from_pairs(&fields)?;
    anyhow::ensure!(!values.is_empty(), "nothing to update, pass at least one --set key=value");
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    ctx.submit(submit(&backend, &session, kind, &values, SubmitMode::Update(id.clone())).await)?;
    println!("Updated {} {id}", kind.label());
    Ok(())
}

pub async fn delete(config_path: Option<PathBuf>, kind: ResourceKind, id: String) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    ctx.api(backend.delete(&session, kind, &id).await)?;
    tracing::info!(resource = %kind, %id, "deleted");
    println!("Deleted {} {id}", kind.label());
    Ok(())
}

fn id_of(record: &Value) -> &str {
    record
        .get("_id")
        .or_else(|| record.get("id"))
        .and_then(Value::as_str)
        .unwrap_or("")
}
