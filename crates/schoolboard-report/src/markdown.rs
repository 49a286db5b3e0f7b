//! Markdown rendering for timetables and the assessment board.

use schoolboard_core::model::{Assessment, AssessmentStatus};
use schoolboard_core::timetable::TimetableGrid;

use crate::labels::Labels;

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render a timetable grid as a Markdown table, one row per slot.
pub fn timetable_markdown(title: &str, grid: &TimetableGrid, labels: &Labels) -> String {
    let mut md = format!("# {}\n\n", cell(title));

    md.push_str("| Time |");
    for day in &grid.days {
        md.push_str(&format!(" {day} |"));
    }
    md.push_str("\n|---|");
    md.push_str(&"---|".repeat(grid.days.len()));
    md.push('\n');

    for (slot, row) in grid.slots.iter().zip(&grid.rows) {
        md.push_str(&format!("| {} |", cell(slot)));
        for entry in row {
            match entry {
                Some(entry) => md.push_str(&format!(" {} |", cell(&labels.cell_text(entry)))),
                None => md.push_str("  |"),
            }
        }
        md.push('\n');
    }

    if !grid.unplaced.is_empty() {
        md.push_str(&format!("\n{} entries not on the grid:\n\n", grid.unplaced.len()));
        for entry in &grid.unplaced {
            md.push_str(&format!(
                "- {} {} - {}: {}\n",
                entry.day,
                entry.start_time,
                entry.end_time,
                labels.cell_text(entry)
            ));
        }
    }
    md
}

/// Assessments grouped by lifecycle status, in lifecycle order.
///
/// Statuses with no assessments are omitted.
pub fn assessment_board(assessments: &[Assessment]) -> String {
    let mut md = String::from("# Assessments\n");
    if assessments.is_empty() {
        md.push_str("\nNo assessments.\n");
        return md;
    }

    for status in AssessmentStatus::ALL {
        let mut group: Vec<&Assessment> =
            assessments.iter().filter(|a| a.status == status).collect();
        if group.is_empty() {
            continue;
        }
        group.sort_by_key(|a| a.start_date);

        md.push_str(&format!("\n## {} ({})\n\n", title_case(status.as_str()), group.len()));
        md.push_str("| Name | Start | End | Term |\n|---|---|---|---|\n");
        for a in group {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&a.name),
                a.start_date.format("%Y-%m-%d"),
                a.end_date.format("%Y-%m-%d"),
                cell(&a.term_id)
            ));
        }
    }
    md
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
