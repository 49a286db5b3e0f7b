//! The `timetable show` command.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use schoolboard_core::model::{Class, Course, Subject};
use schoolboard_core::timetable::TimetableGrid;
use schoolboard_core::traits::{fetch_all, fetch_one, fetch_timetable};
use schoolboard_report::html::generate_timetable_html;
use schoolboard_report::markdown::timetable_markdown;
use schoolboard_report::TimetableSnapshot;

use super::context::Context;
use super::render::grid_table;

pub async fn show(
    config_path: Option<PathBuf>,
    class_id: Option<String>,
    input: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "markdown" | "md" | "html"),
        "unknown format '{format}' (expected table, markdown or html)"
    );

    let (title, snapshot) = match (input, class_id) {
        (Some(path), _) => {
            let snapshot = TimetableSnapshot::load(&path)?;
            let title = snapshot.title.clone().unwrap_or_else(|| title_from_path(&path));
            (title, snapshot)
        }
        (None, Some(class_id)) => fetch_snapshot(config_path, &class_id).await?,
        (None, None) => anyhow::bail!("pass --class <id> or --input <file>"),
    };

    let grid = TimetableGrid::build(&snapshot.entries);
    let labels = snapshot.labels();
    if !grid.unplaced.is_empty() {
        tracing::warn!(
            count = grid.unplaced.len(),
            "entries do not fit the weekday grid and are listed separately"
        );
    }

    let rendered = match format.as_str() {
        "markdown" | "md" => timetable_markdown(&title, &grid, &labels),
        "html" => generate_timetable_html(&title, &grid, &labels),
        _ => format!("{title}\n{}\n", grid_table(&grid, &labels)),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn fetch_snapshot(
    config_path: Option<PathBuf>,
    class_id: &str,
) -> Result<(String, TimetableSnapshot)> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;

    let (entries, courses, subjects, class) = ctx.api(futures::try_join!(
        fetch_timetable(&backend, &session, class_id),
        fetch_all::<Course>(&backend, &session),
        fetch_all::<Subject>(&backend, &session),
        fetch_one::<Class>(&backend, &session, class_id),
    ))?;
    tracing::debug!(entries = entries.len(), class = %class.name, "timetable fetched");

    let snapshot = TimetableSnapshot {
        title: Some(class.name.clone()),
        entries,
        courses,
        subjects,
    };
    Ok((class.name, snapshot))
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Timetable".to_string())
}
